//! Marking declarations that must not appear in the generated wrapper.
//!
//! Selectors always match on the name as spelled in the header, so a filter list keeps working whatever the
//! normalizer later does to the names.

use std::fmt::Display;

use log::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mbl_ast::{DeclId, Kind, AST};
use mbl_util::Trace;

use crate::error::Error;
use crate::Result;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "select", rename_all = "snake_case")]
pub enum Selector {
    /// Every namespace-scope declaration with this name
    Global { name: String },
    /// One field of the complete definition of `class`
    Property { class: String, property: String },
}

impl Selector {
    pub fn global(name: &str) -> Selector {
        Selector::Global { name: name.into() }
    }

    pub fn property(class: &str, property: &str) -> Selector {
        Selector::Property {
            class: class.into(),
            property: property.into(),
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Global { name } => write!(f, "{name}"),
            Selector::Property { class, property } => write!(f, "{class}::{property}"),
        }
    }
}

fn is_namespace_scope(ast: &AST, id: DeclId) -> bool {
    match ast[id].parent() {
        Some(parent) => matches!(ast[parent].kind(), Kind::TranslationUnit | Kind::Namespace),
        None => false,
    }
}

fn select(ast: &AST, selector: &Selector) -> Result<Vec<DeclId>> {
    match selector {
        Selector::Global { name } => {
            let ids = ast
                .find_decls(name)
                .iter()
                .copied()
                .filter(|id| is_namespace_scope(ast, *id))
                .collect::<Vec<_>>();

            if ids.is_empty() {
                error!("Could not find global declaration \"{name}\" to ignore");
                return Err(Error::DeclarationNotFound {
                    name: name.clone(),
                    source: Trace::new(),
                });
            }

            Ok(ids)
        }
        Selector::Property { class, property } => {
            let class_id = ast
                .find_complete_class(class)
                .map_err(|source| Error::ClassNotFound {
                    name: class.clone(),
                    source,
                })?;

            let id = ast
                .children_of_kind(class_id, Kind::Property)
                .into_iter()
                .find(|id| ast[*id].original_name() == property)
                .ok_or_else(|| {
                    error!("Class \"{class}\" has no property \"{property}\"");
                    Error::PropertyNotFound {
                        class: class.clone(),
                        property: property.clone(),
                        source: Trace::new(),
                    }
                })?;

            Ok(vec![id])
        }
    }
}

/// Ignore everything `selector` picks out. Returns the number of declarations newly ignored.
#[instrument(skip(ast), level = "debug")]
pub fn suppress(ast: &mut AST, selector: &Selector) -> Result<usize> {
    Ok(select(ast, selector)?.into_iter().map(|id| ignore(ast, id)).sum())
}

fn ignore(ast: &mut AST, id: DeclId) -> usize {
    if ast[id].is_ignored() {
        return 0;
    }

    debug!("Ignoring {:?} \"{}\"", ast[id].kind(), ast.qualified_name(id));
    ast[id].ignore();
    1
}

/// Apply every selector, or none of them if any fails to resolve
#[instrument(skip(ast), level = "debug")]
pub fn suppress_all(ast: &mut AST, selectors: &[Selector]) -> Result<usize> {
    let mut selected = Vec::new();
    for selector in selectors {
        selected.extend(select(ast, selector)?);
    }

    Ok(selected.into_iter().map(|id| ignore(ast, id)).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use mbl_ast::qualtype::QualType;
    use mbl_ast::Decl;

    fn imgui_tree() -> (AST, DeclId) {
        let (mut ast, tu) = new_tree("cimgui.h");
        ast.insert(
            Some(tu),
            Decl::variable(usr("c:@GImGui"), "GImGui", QualType::pointer(QualType::void())),
        )
        .expect("variable");
        let vector = class(&mut ast, tu, "ImVector_ImTextureID");
        property(&mut ast, vector, "Size", QualType::int());
        property(&mut ast, vector, "Data", QualType::pointer(QualType::void()));
        (ast, vector)
    }

    #[test]
    fn global_selector_ignores_only_the_named_declaration() -> Result<()> {
        let (mut ast, _) = imgui_tree();
        let before = ast.walk().into_iter().filter(|id| ast[*id].is_ignored()).count();

        assert_eq!(suppress(&mut ast, &Selector::global("GImGui"))?, 1);

        let ignored = ast
            .walk()
            .into_iter()
            .filter(|id| ast[*id].is_ignored())
            .map(|id| ast[id].name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(before, 0);
        assert_eq!(ignored, vec!["GImGui".to_string()]);

        // already ignored
        assert_eq!(suppress(&mut ast, &Selector::global("GImGui"))?, 0);

        Ok(())
    }

    #[test]
    fn property_selector_leaves_siblings_alone() -> Result<()> {
        let (mut ast, vector) = imgui_tree();

        suppress(&mut ast, &Selector::property("ImVector_ImTextureID", "Data"))?;

        let properties = ast
            .children_of_kind(vector, Kind::Property)
            .into_iter()
            .map(|id| (ast[id].name().to_string(), ast[id].is_ignored()))
            .collect::<Vec<_>>();
        assert_eq!(
            properties,
            vec![("Size".to_string(), false), ("Data".to_string(), true)]
        );

        Ok(())
    }

    #[test]
    fn unresolved_selectors_are_errors() {
        let (mut ast, _) = imgui_tree();

        let err = suppress(&mut ast, &Selector::property("ImVector_ImTextureID", "Dta")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find property \"Dta\" on class \"ImVector_ImTextureID\""
        );

        assert!(matches!(
            suppress(&mut ast, &Selector::property("ImVector_ImTexture", "Data")),
            Err(Error::ClassNotFound { .. })
        ));

        // Size is a property, not a global
        assert!(matches!(
            suppress(&mut ast, &Selector::global("Size")),
            Err(Error::DeclarationNotFound { .. })
        ));

        assert!(ast.walk().into_iter().all(|id| !ast[id].is_ignored()));
    }

    #[test]
    fn a_bad_selector_ignores_nothing() {
        let (mut ast, _) = imgui_tree();
        let selectors = vec![
            Selector::global("GImGui"),
            Selector::property("ImVector_ImTextureID", "Dta"),
        ];

        assert!(matches!(
            suppress_all(&mut ast, &selectors),
            Err(Error::PropertyNotFound { .. })
        ));
        assert!(ast.walk().into_iter().all(|id| !ast[id].is_ignored()));
    }
}
