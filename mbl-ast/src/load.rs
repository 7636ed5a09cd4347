//! JSON interchange with the header-parsing front end and the emitter.
//!
//! The front end hands over a list of translation units as nested [`DeclNode`]s. After the passes have run the tree
//! is written back out in the same shape, with names, ignore flags and pass metadata updated.

use std::path::Path;

use log::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::ast::{Access, Decl, DeclData, DeclId, Kind, AST};
use crate::class::Class;
use crate::function::{Argument, Function, Method};
use crate::qualtype::QualType;
use crate::usr::USR;

use crate::error::Error;
type Result<T, E = Error> = std::result::Result<T, E>;

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_true(b: &bool) -> bool {
    *b
}

fn default_true() -> bool {
    true
}

fn is_public(access: &Access) -> bool {
    *access == Access::Public
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclNode {
    pub kind: Kind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usr: Option<USR>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ignore: bool,
    #[serde(default, skip_serializing_if = "is_public")]
    pub access: Access,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<USR>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<QualType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_variadic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_virtual: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Argument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted_from: Option<USR>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub qual_type: Option<QualType>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub manual_impl: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<(String, i64)>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_flags: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DeclNode>,
}

impl DeclNode {
    fn required<T: Clone>(&self, value: &Option<T>, field: &'static str) -> Result<T> {
        value.clone().ok_or_else(|| Error::MissingField {
            kind: self.kind,
            name: self.name.clone(),
            field,
        })
    }

    fn function(&self) -> Result<Function> {
        let mut function = Function::new(self.required(&self.result, "result")?, self.arguments.clone());
        function.set_variadic(self.is_variadic);
        Ok(function)
    }

    fn to_decl(&self, usr: USR) -> Result<Decl> {
        let data = match self.kind {
            Kind::TranslationUnit => DeclData::TranslationUnit,
            Kind::Namespace => DeclData::Namespace,
            Kind::Class => DeclData::Class(Class::new(self.complete, self.bases.clone())),
            Kind::Function => DeclData::Function(self.function()?),
            Kind::Method => {
                let mut method = Method::new(self.function()?);
                method.is_virtual = self.is_virtual;
                method.is_static = self.is_static;
                method.receiver = self.receiver.clone();
                method.promoted_from = self.promoted_from;
                DeclData::Method(method)
            }
            Kind::Property => {
                let mut decl = Decl::property(usr, &self.name, self.required(&self.qual_type, "type")?);
                if self.manual_impl {
                    if let Some(property) = decl.as_property_mut() {
                        property.set_manual_impl();
                    }
                }
                decl.data
            }
            Kind::Enum => {
                let mut decl = Decl::enumeration(usr, &self.name, self.variants.clone());
                if let Some(enm) = decl.as_enum_mut() {
                    enm.set_flags(self.is_flags);
                }
                decl.data
            }
            Kind::Typedef => Decl::typedef(usr, &self.name, self.required(&self.qual_type, "type")?).data,
            Kind::Variable => Decl::variable(usr, &self.name, self.required(&self.qual_type, "type")?).data,
        };

        let mut decl = Decl::new(usr, &self.name, data).with_access(self.access);
        if let Some(original_name) = &self.original_name {
            decl = decl.with_original_name(original_name);
        }
        if self.ignore {
            decl.ignore();
        }

        Ok(decl)
    }
}

fn matches_header(tu_name: &str, header: &str) -> bool {
    tu_name == header || Path::new(tu_name).ends_with(header)
}

/// Build an [`AST`] from the front end's translation units.
///
/// If `headers` is not empty, only translation units for those headers are kept, and every header must be present.
#[instrument(skip(nodes), level = "debug")]
pub fn build_ast(nodes: Vec<DeclNode>, headers: &[String]) -> Result<AST> {
    for header in headers {
        if !nodes.iter().any(|n| matches_header(&n.name, header)) {
            error!("Header \"{header}\" is not in the declaration tree");
            return Err(Error::HeaderNotFound(header.clone()));
        }
    }

    let mut ast = AST::new();
    for node in &nodes {
        if !headers.is_empty() && !headers.iter().any(|h| matches_header(&node.name, h)) {
            debug!("Skipping translation unit \"{}\" as it is not a configured header", node.name);
            continue;
        }

        insert_node(&mut ast, None, None, node)?;
    }

    Ok(ast)
}

fn insert_node(
    ast: &mut AST,
    parent: Option<DeclId>,
    parent_usr: Option<USR>,
    node: &DeclNode,
) -> Result<()> {
    let original_name = node.original_name.as_deref().unwrap_or(&node.name);
    let usr = match (node.usr, node.kind, parent_usr) {
        (Some(usr), _, _) => usr,
        (None, Kind::TranslationUnit, _) => Decl::translation_unit(&node.name).usr(),
        (None, _, Some(parent_usr)) => USR::new(&format!("{parent_usr}@{original_name}")),
        (None, _, None) => USR::new(original_name),
    };

    let id = ast.insert(parent, node.to_decl(usr)?)?;

    for child in &node.children {
        insert_node(ast, Some(id), Some(usr), child)?;
    }

    Ok(())
}

pub fn load_ast_from_str(json: &str, headers: &[String]) -> Result<AST> {
    let nodes: Vec<DeclNode> = serde_json::from_str(json)?;
    build_ast(nodes, headers)
}

pub fn load_ast_from_file<P: AsRef<Path>>(path: P, headers: &[String]) -> Result<AST> {
    let json = std::fs::read_to_string(path)?;
    load_ast_from_str(&json, headers)
}

fn dump_decl(ast: &AST, id: DeclId) -> DeclNode {
    let decl = &ast[id];

    let mut node = DeclNode {
        kind: decl.kind(),
        name: decl.name.clone(),
        usr: Some(decl.usr),
        original_name: if decl.original_name != decl.name {
            Some(decl.original_name.clone())
        } else {
            None
        },
        ignore: decl.ignore,
        access: decl.access,
        complete: true,
        bases: Vec::new(),
        result: None,
        arguments: Vec::new(),
        is_variadic: false,
        is_virtual: false,
        is_static: false,
        receiver: None,
        promoted_from: None,
        qual_type: None,
        manual_impl: false,
        variants: Vec::new(),
        is_flags: false,
        children: decl.children.iter().map(|c| dump_decl(ast, *c)).collect(),
    };

    match &decl.data {
        DeclData::TranslationUnit | DeclData::Namespace => (),
        DeclData::Class(class) => {
            node.complete = class.complete;
            node.bases = class.bases.clone();
        }
        DeclData::Function(function) => {
            node.result = Some(function.result.clone());
            node.arguments = function.arguments.clone();
            node.is_variadic = function.is_variadic;
        }
        DeclData::Method(method) => {
            node.result = Some(method.function.result.clone());
            node.arguments = method.function.arguments.clone();
            node.is_variadic = method.function.is_variadic;
            node.is_virtual = method.is_virtual;
            node.is_static = method.is_static;
            node.receiver = method.receiver.clone();
            node.promoted_from = method.promoted_from;
        }
        DeclData::Property(property) => {
            node.qual_type = Some(property.qual_type.clone());
            node.manual_impl = property.manual_impl;
        }
        DeclData::Enum(enm) => {
            node.variants = enm.variants.clone();
            node.is_flags = enm.is_flags;
        }
        DeclData::Typedef(typedef) => node.qual_type = Some(typedef.underlying.clone()),
        DeclData::Variable(variable) => node.qual_type = Some(variable.qual_type.clone()),
    }

    node
}

/// Convert the tree back into front end nodes, carrying everything the passes changed
pub fn dump_ast(ast: &AST) -> Vec<DeclNode> {
    ast.translation_units()
        .iter()
        .map(|tu| dump_decl(ast, *tu))
        .collect()
}

pub fn dump_ast_to_string(ast: &AST) -> Result<String> {
    Ok(serde_json::to_string_pretty(&dump_ast(ast))?)
}

pub fn write_ast_to_file<P: AsRef<Path>>(ast: &AST, path: P) -> Result<()> {
    std::fs::write(path, dump_ast_to_string(ast)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const TREE: &str = indoc!(
        r#"
        [
            {
                "kind": "translation_unit",
                "name": "cimgui.h",
                "children": [
                    {
                        "kind": "class",
                        "name": "ImVec2",
                        "children": [
                            { "kind": "property", "name": "x", "type": { "name": "float", "type_ref": { "builtin": "float" } } },
                            { "kind": "property", "name": "y", "type": { "name": "float", "type_ref": { "builtin": "float" } } }
                        ]
                    },
                    {
                        "kind": "function",
                        "name": "igSetNextWindowPos",
                        "result": { "name": "void", "type_ref": { "builtin": "void" } },
                        "arguments": [
                            { "name": "pos", "type": { "name": "const ImVec2", "type_ref": { "ref": "tu:cimgui.h@ImVec2" } } },
                            { "name": "cond", "type": { "name": "ImGuiCond", "type_ref": { "builtin": "int" } }, "default": "0" }
                        ]
                    },
                    { "kind": "enum", "name": "ImGuiCond_", "variants": [["ImGuiCond_None", 0], ["ImGuiCond_Always", 1]] }
                ]
            },
            { "kind": "translation_unit", "name": "imgui_internal.h" }
        ]
        "#
    );

    #[test]
    fn load_tree() -> Result<(), mbl_util::Error> {
        let ast = load_ast_from_str(TREE, &[])?;

        mbl_util::compare(
            &format!("{ast:?}"),
            indoc!(
                r#"
                TranslationUnit cimgui.h
                  Class ImVec2
                    Property x: float
                    Property y: float
                  Function igSetNextWindowPos(pos: const ImVec2, cond: ImGuiCond = 0) -> void
                  Enum ImGuiCond_ [ImGuiCond_None=0 ImGuiCond_Always=1]
                TranslationUnit imgui_internal.h
                "#
            ),
        )?;

        let vec2 = ast.find_complete_class("ImVec2")?;
        assert_eq!(ast[vec2].usr(), USR::new("tu:cimgui.h@ImVec2"));

        Ok(())
    }

    #[test]
    fn load_restricts_to_headers() -> Result<()> {
        let ast = load_ast_from_str(TREE, &["cimgui.h".to_string()])?;
        assert_eq!(ast.translation_units().len(), 1);

        assert!(matches!(
            load_ast_from_str(TREE, &["cimgui_impl.h".to_string()]),
            Err(Error::HeaderNotFound(h)) if h == "cimgui_impl.h"
        ));

        Ok(())
    }

    #[test]
    fn missing_fields_are_reported() {
        let json = r#"[{"kind": "translation_unit", "name": "a.h", "children": [{"kind": "function", "name": "f"}]}]"#;
        assert!(matches!(
            load_ast_from_str(json, &[]),
            Err(Error::MissingField { field: "result", .. })
        ));
    }

    #[test]
    fn dump_round_trips_pass_metadata() -> Result<()> {
        let mut ast = load_ast_from_str(TREE, &[])?;
        let function = ast.find_decls("igSetNextWindowPos")[0];
        ast[function].set_name("SetNextWindowPos");
        ast[function].ignore();

        let json = dump_ast_to_string(&ast)?;
        let reloaded = load_ast_from_str(&json, &[])?;
        assert_eq!(format!("{ast:?}"), format!("{reloaded:?}"));

        Ok(())
    }
}
