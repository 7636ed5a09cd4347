//! Renaming declarations to the naming convention of the generated wrapper.

use log::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mbl_ast::{DeclId, Kind, AST};

use crate::error::Error;
use crate::Result;

/// How the library prefix is removed from declaration names
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Prefix {
    #[default]
    None,
    /// Remove `prefix` once if the name starts with it
    Literal { prefix: String },
    /// Remove every leading character that appears in `chars`, so "ig" strips "iggy" down to "y"
    CharSet { chars: String },
}

impl Prefix {
    pub fn literal(prefix: &str) -> Prefix {
        Prefix::Literal {
            prefix: prefix.into(),
        }
    }

    pub fn char_set(chars: &str) -> Prefix {
        Prefix::CharSet { chars: chars.into() }
    }

    pub fn strip<'a>(&self, name: &'a str) -> &'a str {
        match self {
            Prefix::None => name,
            Prefix::Literal { prefix } => name.strip_prefix(prefix.as_str()).unwrap_or(name),
            Prefix::CharSet { chars } => name.trim_start_matches(|c: char| chars.contains(c)),
        }
    }
}

/// Declaration kinds that can be given an upper-case leading letter
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameTarget {
    Class,
    Property,
    Function,
    Method,
    Enum,
}

impl RenameTarget {
    pub fn matches(&self, kind: Kind) -> bool {
        matches!(
            (self, kind),
            (RenameTarget::Class, Kind::Class)
                | (RenameTarget::Property, Kind::Property)
                | (RenameTarget::Function, Kind::Function)
                | (RenameTarget::Method, Kind::Method)
                | (RenameTarget::Enum, Kind::Enum)
        )
    }
}

/// Give every declaration whose source name is `original` the name `name`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub original: String,
    pub name: String,
}

impl Rename {
    pub fn new(original: &str, name: &str) -> Rename {
        Rename {
            original: original.into(),
            name: name.into(),
        }
    }
}

/// Strip `prefix` from free functions at translation unit scope and from classes at any namespace depth.
///
/// Declarations that have already been renamed are left alone, so running this twice does not strip twice.
#[instrument(skip(ast), level = "debug")]
pub fn strip_prefix(ast: &mut AST, prefix: &Prefix) -> usize {
    if *prefix == Prefix::None {
        return 0;
    }

    let mut changes = 0;
    for tu in ast.translation_units().to_vec() {
        for function in ast.children_of_kind(tu, Kind::Function) {
            changes += strip_decl(ast, function, prefix);
        }

        changes += strip_classes(ast, tu, prefix);
    }

    changes
}

fn strip_classes(ast: &mut AST, scope: DeclId, prefix: &Prefix) -> usize {
    let mut changes = 0;
    for namespace in ast.children_of_kind(scope, Kind::Namespace) {
        changes += strip_classes(ast, namespace, prefix);
    }

    for class in ast.children_of_kind(scope, Kind::Class) {
        changes += strip_decl(ast, class, prefix);
    }

    changes
}

fn strip_decl(ast: &mut AST, id: DeclId, prefix: &Prefix) -> usize {
    let decl = &ast[id];
    if decl.name() != decl.original_name() {
        return 0;
    }

    let stripped = prefix.strip(decl.name());
    if stripped.len() == decl.name().len() {
        return 0;
    }

    if stripped.is_empty() {
        warn!(
            "Stripping the prefix from {:?} \"{}\" would leave it without a name, keeping it as is",
            decl.kind(),
            decl.name()
        );
        return 0;
    }

    debug!("Renaming \"{}\" to \"{stripped}\"", decl.name());
    let stripped = stripped.to_string();
    ast[id].set_name(&stripped);
    1
}

/// Apply explicit renames, failing if any of them does not match a declaration
#[instrument(skip(ast), level = "debug")]
pub fn apply_renames(ast: &mut AST, renames: &[Rename]) -> Result<usize> {
    let mut changes = 0;
    for rename in renames {
        let ids = ast.find_decls(&rename.original).to_vec();
        if ids.is_empty() {
            error!("Could not find declaration \"{}\" to rename", rename.original);
            return Err(Error::DeclarationNotFound {
                name: rename.original.clone(),
                source: mbl_util::Trace::new(),
            });
        }

        for id in ids {
            if ast[id].name() != rename.name {
                ast[id].set_name(&rename.name);
                changes += 1;
            }
        }
    }

    Ok(changes)
}

fn upper_case_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-case the first letter of every declaration of the targeted kinds
#[instrument(skip(ast), level = "debug")]
pub fn rename_upper_case(ast: &mut AST, targets: &[RenameTarget]) -> usize {
    let mut changes = 0;
    for id in ast.walk() {
        let decl = &ast[id];
        if !targets.iter().any(|t| t.matches(decl.kind())) {
            continue;
        }

        let renamed = upper_case_first(decl.name());
        if renamed != decl.name() {
            trace!("Renaming \"{}\" to \"{renamed}\"", decl.name());
            ast[id].set_name(&renamed);
            changes += 1;
        }
    }

    changes
}

/// Run the whole normalizer: prefix stripping, then explicit renames, then case renaming
pub fn normalize(
    ast: &mut AST,
    prefix: &Prefix,
    renames: &[Rename],
    upper_case: &[RenameTarget],
) -> Result<usize> {
    let mut changes = strip_prefix(ast, prefix);
    changes += apply_renames(ast, renames)?;
    changes += rename_upper_case(ast, upper_case);
    Ok(changes)
}
