mod common;

use indoc::indoc;
use mbl_write::{error::Error, rewrite_outputs, write_outputs, Block, BlockKind, GeneratorOutput, Substitution};

use crate::common::init_log;

fn cimgui_outputs() -> Vec<GeneratorOutput> {
    vec![
        GeneratorOutput::new(
            "cimgui.cs",
            vec![
                Block::unknown("// generated from cimgui.h\n"),
                Block::new(BlockKind::Namespace, "namespace DearImguiSharp\n{\n").with_children(vec![
                    Block::unknown("    [DllImport(\"cimgui_impl\")]\n"),
                    Block::new(BlockKind::Method, "    static extern void cimgui_Render();\n"),
                ]),
                Block::unknown("}\n"),
            ],
        ),
        GeneratorOutput::new("internal/cimgui_impl.cs", vec![Block::unknown("// cimgui_impl\n")]),
    ]
}

#[test]
fn rewritten_outputs_are_written_to_disk() -> Result<(), Error> {
    init_log();

    let mut outputs = cimgui_outputs();
    let changed = rewrite_outputs(
        &mut outputs,
        &[
            Substitution::new("cimgui_impl", "ImGui"),
            Substitution::new("cimgui", "ImGui"),
        ],
    )?;
    assert_eq!(changed, 3);

    let dir = tempfile::tempdir()?;
    write_outputs(&outputs, dir.path())?;

    let main = std::fs::read_to_string(dir.path().join("cimgui.cs"))?;
    assert_eq!(
        main,
        indoc!(
            r#"
            // generated from ImGui.h
            namespace DearImguiSharp
            {
                [DllImport("ImGui")]
                static extern void cimgui_Render();
            }
            "#
        )
    );

    // file names are not part of the text
    let nested = std::fs::read_to_string(dir.path().join("internal").join("cimgui_impl.cs"))?;
    assert_eq!(nested, "// ImGui\n");

    Ok(())
}

#[test]
fn outputs_round_trip_through_json() -> Result<(), Error> {
    let outputs = cimgui_outputs();
    let json = serde_json::to_string(&outputs)?;
    assert_eq!(mbl_write::output::read_outputs_from_str(&json)?, outputs);

    Ok(())
}
