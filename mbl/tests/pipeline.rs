mod common;

use indoc::indoc;

use mbl::{
    BindConfig, Error, FrontEnd, JsonFrontEnd, Kind, ParseOptions, Pipeline, Selector, Substitution, AST,
};
use mbl_util::compare;

use crate::common::{init_log, run_test, FailingEmitter, StubEmitter, CIMGUI_JSON};

fn load(config: &BindConfig) -> Result<AST, Error> {
    JsonFrontEnd::new(CIMGUI_JSON).parse(&ParseOptions::from(config))
}

fn ignored(ast: &AST) -> Vec<String> {
    ast.walk()
        .into_iter()
        .filter(|id| ast[*id].is_ignored())
        .map(|id| ast.qualified_name(id))
        .collect()
}

#[test]
fn process_cimgui() -> Result<(), mbl_util::Error> {
    run_test(|| {
        let config = BindConfig::cimgui();
        let mut ast = load(&config)?;

        Pipeline::new(&config).process(&mut ast)?;

        compare(
            &format!("{ast:?}"),
            indoc!(
                r#"
                TranslationUnit cimgui.h
                  Variable GImGui: ImGuiContext* ignored
                  Class ImGuiContext incomplete
                  Class ImVec2
                    Property X: float original=x
                    Property Y: float original=y
                    Method ImVec2_destroy() -> void receiver=(self: ImVec2*)
                  Class ImDrawList
                    Property _VtxCurrentIdx: unsigned int
                    Method ImDrawList_AddLine(p1: const ImVec2, p2: const ImVec2, col: ImU32, thickness: float = 1.0f) -> void receiver=(self: ImDrawList*)
                  Typedef ImTextureID = void*
                  Class ImVector_ImTextureID
                    Property Size: int
                    Property Capacity: int
                    Property Data: ImTextureID* manual ignored
                  Class ImDrawCmd
                    Property TextureId: ImTextureID
                    Property UserCallbackData: void*
                  Class ImGuiStyle
                    Property Alpha: float
                    Property Alpha_1: int original=alpha
                  Enum ImGuiWindowFlags_ [ImGuiWindowFlags_None=0 ImGuiWindowFlags_NoTitleBar=1 ImGuiWindowFlags_NoResize=2 ImGuiWindowFlags_NoMove=4] flags
                  Enum ImGuiDir_ [ImGuiDir_None=-1 ImGuiDir_Left=0 ImGuiDir_Right=1 ImGuiDir_Up=2 ImGuiDir_Down=3]
                  Function Begin(name: const char*, p_open: bool* = NULL, flags: ImGuiWindowFlags = 0) -> bool original=igBegin
                  Function End() -> void original=igEnd
                  Function GetVersion() -> const char* original=igGetVersion
                  Function ImVec2_destroy(self: ImVec2*) -> void ignored
                  Function ImDrawList_AddLine(self: ImDrawList*, p1: const ImVec2, p2: const ImVec2, col: ImU32, thickness: float = 1.0f) -> void ignored
                TranslationUnit cimgui_impl.h
                  Function ImGui_ImplOpenGL3_Init(glsl_version: const char* = NULL) -> bool
                  Function ImGui_ImplOpenGL3_Shutdown() -> void
                "#
            ),
        )?;

        Ok(())
    })
}

#[test]
fn processing_twice_changes_nothing() -> Result<(), Error> {
    init_log();

    let config = BindConfig::cimgui();
    let pipeline = Pipeline::new(&config);
    let mut ast = load(&config)?;

    assert!(pipeline.process(&mut ast)? > 0);
    let once = format!("{ast:?}");

    assert_eq!(pipeline.process(&mut ast)?, 0);
    assert_eq!(format!("{ast:?}"), once);

    Ok(())
}

#[test]
fn suppression_ignores_exactly_the_selected_declarations() -> Result<(), Error> {
    init_log();

    let config = BindConfig::cimgui();
    let mut ast = load(&config)?;
    assert!(ignored(&ast).is_empty());

    Pipeline::new(&config).preprocess(&mut ast)?;
    assert_eq!(ignored(&ast), vec!["GImGui", "ImVector_ImTextureID::Data"]);

    // the filter matched on source names, so the rename to upper case did not get in the way
    let vector = ast.find_complete_class("ImVector_ImTextureID")?;
    let properties = ast
        .children_of_kind(vector, Kind::Property)
        .into_iter()
        .map(|id| (ast[id].name().to_string(), ast[id].is_ignored()))
        .collect::<Vec<_>>();
    assert_eq!(
        properties,
        vec![
            ("Size".to_string(), false),
            ("Capacity".to_string(), false),
            ("Data".to_string(), true)
        ]
    );

    Ok(())
}

#[test]
fn missing_property_stops_the_run() -> Result<(), Error> {
    init_log();

    let mut config = BindConfig::cimgui();
    config.suppress = vec![
        Selector::global("GImGui"),
        Selector::property("ImVector_ImTextureID", "Dta"),
    ];

    let mut ast = load(&config)?;
    let before = format!("{ast:?}");

    let err = Pipeline::new(&config).process(&mut ast).unwrap_err();
    match &err {
        Error::Passes(mbl_passes::Error::PropertyNotFound { class, property, .. }) => {
            assert_eq!(class, "ImVector_ImTextureID");
            assert_eq!(property, "Dta");
        }
        e => panic!("unexpected error {e:?}"),
    }

    // no renames, no promotions, nothing ignored
    assert_eq!(format!("{ast:?}"), before);

    Ok(())
}

#[test]
fn promoted_methods_drop_the_receiver() -> Result<(), Error> {
    init_log();

    let config = BindConfig::cimgui();
    let mut ast = load(&config)?;
    Pipeline::new(&config).process(&mut ast)?;

    let draw_list = ast.find_complete_class("ImDrawList")?;
    let methods = ast.children_of_kind(draw_list, Kind::Method);
    assert_eq!(methods.len(), 1);

    let method = ast[methods[0]].as_method().expect("method");
    let arguments = method
        .function()
        .arguments()
        .iter()
        .map(|a| a.name().to_string())
        .collect::<Vec<_>>();
    assert_eq!(arguments, vec!["p1", "p2", "col", "thickness"]);
    assert_eq!(method.receiver().map(|r| r.name()), Some("self"));

    let free = ast.get(method.promoted_from().expect("promoted")).expect("free function");
    assert!(ast[free].is_ignored());

    Ok(())
}

#[test]
fn run_rewrites_unclassified_blocks() -> Result<(), Error> {
    init_log();

    let config = BindConfig::cimgui();
    let mut emitter = StubEmitter {
        library: "cimgui".into(),
    };
    let (_, outputs) = Pipeline::new(&config).run(&mut JsonFrontEnd::new(CIMGUI_JSON), &mut emitter)?;

    let names = outputs.iter().map(|o| o.file_name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["cimgui.cs", "cimgui_impl.cs"]);

    assert_eq!(
        outputs[1].render(),
        indoc!(
            r#"
            // ImGui.h
            fn ImGui_ImplOpenGL3_Init
              [DllImport("ImGui")]
            fn ImGui_ImplOpenGL3_Shutdown
              [DllImport("ImGui")]
            "#
        )
    );

    let dir = tempfile::tempdir()?;
    mbl_write::write_outputs(&outputs, dir.path())?;
    let written = std::fs::read_to_string(dir.path().join("cimgui.cs"))?;
    assert!(written.starts_with("// ImGui.h\nclass ImGuiContext\n"));
    assert!(written.contains("fn Begin\n  [DllImport(\"ImGui\")]\n"));
    assert!(!written.contains("cimgui"));

    Ok(())
}

#[test]
fn bad_configuration_is_caught_before_parsing() {
    init_log();

    let mut config = BindConfig::cimgui();
    config.substitutions.push(Substitution::new("", "ImGui"));
    let result = Pipeline::new(&config).run(&mut JsonFrontEnd::new("does/not/exist.json"), &mut FailingEmitter);
    assert!(matches!(
        result,
        Err(Error::Write(mbl_write::Error::EmptySubstitution { index: 2 }))
    ));

    let mut config = BindConfig::cimgui();
    config.headers.push("imgui_impl_vulkan.h".into());
    assert!(matches!(
        load(&config),
        Err(Error::Ast(mbl_ast::error::Error::HeaderNotFound(_)))
    ));
}

#[test]
fn emitter_failures_are_reported() -> Result<(), Error> {
    init_log();

    let config = BindConfig::cimgui();
    let result = Pipeline::new(&config).run(&mut JsonFrontEnd::new(CIMGUI_JSON), &mut FailingEmitter);

    match result {
        Err(Error::Emit { source }) => assert_eq!(source.to_string(), "template \"class.cs\" is missing"),
        other => panic!("expected an emitter error, got {:?}", other.map(|(_, outputs)| outputs.len())),
    }

    Ok(())
}
