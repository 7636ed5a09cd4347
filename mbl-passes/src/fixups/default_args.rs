//! Default argument repairs.

use hashbrown::HashSet;
use log::*;
use tracing::instrument;

use mbl_ast::{DeclId, Kind, AST, USR};

/// Virtual methods in the base classes of `method_id`'s class that it overrides, nearest base first
fn overridden_methods(ast: &AST, method_id: DeclId) -> Vec<DeclId> {
    let method = &ast[method_id];
    let signature = match method.as_method() {
        Some(m) if !m.is_static() => m.function(),
        _ => return Vec::new(),
    };

    let class = match method.parent() {
        Some(class) => class,
        None => return Vec::new(),
    };

    let mut result = Vec::new();
    let mut visited: HashSet<USR> = HashSet::new();
    let mut stack = ast[class]
        .as_class()
        .map(|c| c.bases().iter().rev().copied().collect::<Vec<_>>())
        .unwrap_or_default();

    while let Some(base_usr) = stack.pop() {
        if !visited.insert(base_usr) {
            continue;
        }

        let base = match ast.get(base_usr).filter(|id| ast[*id].kind() == Kind::Class) {
            Some(base) => base,
            None => {
                debug!("Base class {base_usr} of \"{}\" is not in the tree", ast.qualified_name(class));
                continue;
            }
        };

        for candidate in ast.children_of_kind(base, Kind::Method) {
            let overrides = ast[candidate]
                .as_method()
                .map(|m| {
                    m.is_virtual()
                        && ast[candidate].original_name() == method.original_name()
                        && m.function().same_parameters(signature)
                })
                .unwrap_or(false);

            if overrides {
                result.push(candidate);
            }
        }

        if let Some(c) = ast[base].as_class() {
            stack.extend(c.bases().iter().rev().copied());
        }
    }

    result
}

/// Copy default values from overridden base methods onto overrides that leave them out.
///
/// Callers going through the derived type would otherwise lose the defaults. Where the override supplies its own
/// default, it wins.
#[instrument(skip(ast), level = "debug")]
pub fn fix_default_param_values_of_overrides(ast: &mut AST) -> usize {
    let methods = ast
        .walk()
        .into_iter()
        .filter(|id| ast[*id].kind() == Kind::Method && !ast[*id].is_ignored())
        .collect::<Vec<_>>();

    let mut changes = 0;
    for method_id in methods {
        let bases = overridden_methods(ast, method_id);
        if bases.is_empty() {
            continue;
        }

        let (own, mut inherited) = match ast[method_id].as_function() {
            Some(f) => (
                f.arguments()
                    .iter()
                    .map(|arg| arg.default_value().is_some())
                    .collect::<Vec<_>>(),
                f.arguments()
                    .iter()
                    .enumerate()
                    .map(|(i, arg)| match arg.default_value() {
                        Some(_) => None,
                        None => bases.iter().find_map(|b| {
                            ast[*b]
                                .as_function()
                                .and_then(|bf| bf.arguments().get(i))
                                .and_then(|a| a.default_value())
                                .map(|v| v.to_string())
                        }),
                    })
                    .collect::<Vec<_>>(),
            ),
            None => continue,
        };

        // a default followed by a required parameter would only be dropped again by handle_default_param_values
        let mut required_follows = false;
        for (has_own, default) in own.iter().zip(inherited.iter_mut()).rev() {
            if required_follows {
                *default = None;
            } else if !has_own && default.is_none() {
                required_follows = true;
            }
        }

        let name = ast.qualified_name(method_id);
        if let Some(function) = ast[method_id].as_function_mut() {
            for (arg, default) in function.arguments_mut().iter_mut().zip(inherited) {
                if let Some(default) = default {
                    debug!("{name}: \"{}\" inherits default value {default}", arg.name());
                    arg.set_default_value(Some(default));
                    changes += 1;
                }
            }
        }
    }

    changes
}

/// Clear default values that come before a parameter without one
#[instrument(skip(ast), level = "debug")]
pub fn handle_default_param_values(ast: &mut AST) -> usize {
    let callables = ast
        .walk()
        .into_iter()
        .filter(|id| ast[*id].kind().is_callable() && !ast[*id].is_ignored())
        .collect::<Vec<_>>();

    let mut changes = 0;
    for id in callables {
        let name = ast.qualified_name(id);
        if let Some(function) = ast[id].as_function_mut() {
            let mut required_follows = false;
            for arg in function.arguments_mut().iter_mut().rev() {
                match arg.default_value() {
                    None => required_follows = true,
                    Some(value) if required_follows => {
                        warn!(
                            "{name}: dropping default value {value} of \"{}\" as a later parameter has none",
                            arg.name()
                        );
                        arg.set_default_value(None);
                        changes += 1;
                    }
                    Some(_) => (),
                }
            }
        }
    }

    changes
}
