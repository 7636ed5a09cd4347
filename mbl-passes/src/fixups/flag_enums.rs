use log::*;
use tracing::instrument;

use mbl_ast::{Kind, AST};

/// An enum is a set of flags if its nonzero values are distinct powers of two.
///
/// A zero value ("None") is allowed, but an enum with nothing else in it is not a bitfield. Negative values never
/// appear in a bitfield.
pub fn is_flag_enum(variants: &[(String, i64)]) -> bool {
    let mut seen = 0u64;
    let mut any = false;
    for (_, value) in variants {
        if *value == 0 {
            continue;
        }

        if *value < 0 {
            return false;
        }

        let value = *value as u64;
        if !value.is_power_of_two() || seen & value != 0 {
            return false;
        }

        seen |= value;
        any = true;
    }

    any
}

#[instrument(skip(ast), level = "debug")]
pub fn check_flag_enums(ast: &mut AST) -> usize {
    let mut changes = 0;
    for id in ast.walk() {
        if ast[id].kind() != Kind::Enum {
            continue;
        }

        let name = ast.qualified_name(id);
        if let Some(enm) = ast[id].as_enum_mut() {
            let is_flags = is_flag_enum(enm.variants());
            if is_flags != enm.is_flags() {
                if is_flags {
                    info!("Treating enum \"{name}\" as flags");
                }
                enm.set_flags(is_flags);
                changes += 1;
            }
        }
    }

    changes
}
