//! Structural fixups that reshape a C-style declaration tree so it maps onto an object-oriented wrapper.
//!
//! Every pass returns the number of changes it made. A pass that finds nothing to do returns zero, so running a
//! pass list a second time over its own output should report no changes at all.

use log::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mbl_ast::AST;

use crate::error::Error;
use crate::Result;

pub mod default_args;
pub mod duplicates;
pub mod flag_enums;
pub mod nested_visibility;
pub mod pointer_typedefs;
pub mod promote;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pass", rename_all = "snake_case")]
pub enum Pass {
    /// Turn free functions whose first argument is a class pointer into methods on that class
    FunctionToInstanceMethod {
        /// Drop a leading "ClassName_" from the promoted method's name
        #[serde(default)]
        strip_class_prefix: bool,
    },
    CheckDuplicatedNames,
    CheckFlagEnums,
    FixDefaultParamValuesOfOverrides,
    /// Drop default values that are followed by a required parameter
    HandleDefaultParamValues,
    MakeProtectedNestedTypesPublic,
    /// Hide pointer-to-opaque-typedef properties that need a hand-written accessor
    PointerTypedefProperties,
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::FunctionToInstanceMethod { .. } => "function_to_instance_method",
            Pass::CheckDuplicatedNames => "check_duplicated_names",
            Pass::CheckFlagEnums => "check_flag_enums",
            Pass::FixDefaultParamValuesOfOverrides => "fix_default_param_values_of_overrides",
            Pass::HandleDefaultParamValues => "handle_default_param_values",
            Pass::MakeProtectedNestedTypesPublic => "make_protected_nested_types_public",
            Pass::PointerTypedefProperties => "pointer_typedef_properties",
        }
    }

    pub fn run(&self, ast: &mut AST) -> Result<usize> {
        match self {
            Pass::FunctionToInstanceMethod { strip_class_prefix } => {
                promote::function_to_instance_method(ast, *strip_class_prefix)
            }
            Pass::CheckDuplicatedNames => Ok(duplicates::check_duplicated_names(ast)),
            Pass::CheckFlagEnums => Ok(flag_enums::check_flag_enums(ast)),
            Pass::FixDefaultParamValuesOfOverrides => {
                Ok(default_args::fix_default_param_values_of_overrides(ast))
            }
            Pass::HandleDefaultParamValues => Ok(default_args::handle_default_param_values(ast)),
            Pass::MakeProtectedNestedTypesPublic => {
                Ok(nested_visibility::make_protected_nested_types_public(ast))
            }
            Pass::PointerTypedefProperties => Ok(pointer_typedefs::pointer_typedef_properties(ast)),
        }
    }
}

/// The fixups in the order the cimgui binding runs them
pub fn default_passes() -> Vec<Pass> {
    vec![
        Pass::FunctionToInstanceMethod {
            strip_class_prefix: false,
        },
        Pass::CheckDuplicatedNames,
        Pass::CheckFlagEnums,
        Pass::FixDefaultParamValuesOfOverrides,
        Pass::HandleDefaultParamValues,
        Pass::MakeProtectedNestedTypesPublic,
        Pass::PointerTypedefProperties,
    ]
}

/// (earlier, later): if both are present, `later` must come after `earlier`
const ORDERING: &[(&str, &str)] = &[
    ("function_to_instance_method", "check_duplicated_names"),
    ("function_to_instance_method", "make_protected_nested_types_public"),
];

/// Check a pass list for repeats and for passes that depend on the output of another
pub fn validate_order(passes: &[Pass]) -> Result<()> {
    for (i, pass) in passes.iter().enumerate() {
        if passes[..i].iter().any(|p| p.name() == pass.name()) {
            return Err(Error::DuplicatePass(pass.name().to_string()));
        }
    }

    let position = |name: &str| passes.iter().position(|p| p.name() == name);
    for (earlier, later) in ORDERING {
        if let (Some(e), Some(l)) = (position(earlier), position(later)) {
            if l < e {
                return Err(Error::PassOrder {
                    earlier: earlier.to_string(),
                    later: later.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Validate then run `passes` in order, returning the total number of changes
#[instrument(skip(ast, passes), level = "debug")]
pub fn run_passes(ast: &mut AST, passes: &[Pass]) -> Result<usize> {
    validate_order(passes)?;

    let mut total = 0;
    for pass in passes {
        let changes = pass.run(ast).map_err(|e| Error::FailedToRunPass {
            name: pass.name().to_string(),
            source: Box::new(e),
        })?;

        if changes > 0 {
            info!("{}: {changes} change(s)", pass.name());
        } else {
            debug!("{}: no changes", pass.name());
        }
        total += changes;
    }

    Ok(total)
}
