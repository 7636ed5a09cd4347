use log::*;
use tracing::instrument;

use mbl_ast::function::Method;
use mbl_ast::{Access, Decl, DeclId, Kind, AST, USR};

use crate::Result;

fn is_free_function(ast: &AST, id: DeclId) -> bool {
    let decl = &ast[id];
    decl.kind() == Kind::Function
        && !decl.is_ignored()
        && decl
            .parent()
            .map(|p| matches!(ast[p].kind(), Kind::TranslationUnit | Kind::Namespace))
            .unwrap_or(false)
}

/// Work out the method `function` becomes, and the class it belongs to, without touching the tree
fn promotion_for(ast: &AST, function_id: DeclId, strip_class_prefix: bool) -> Option<(DeclId, Decl)> {
    let function = &ast[function_id];
    let signature = function.as_function()?;
    let first = signature.arguments().first()?;
    let class_id = ast.class_for_type(first.qual_type())?;
    let class = &ast[class_id];
    if class.is_ignored() || !class.as_class()?.is_complete() {
        return None;
    }

    let usr = USR::new(&format!("{}#instance", function.usr()));
    if ast.get(usr).is_some() {
        return None;
    }

    let mut name = function.name();
    if strip_class_prefix {
        let prefix = format!("{}_", class.original_name());
        match name.strip_prefix(prefix.as_str()) {
            Some(rest) if !rest.is_empty() => name = rest,
            _ => (),
        }
    }

    let method = Method::from_free_function(signature, function.usr())?;
    let decl = Decl::method(usr, name, method)
        .with_original_name(function.original_name())
        .with_access(Access::Public);

    Some((class_id, decl))
}

/// Make every free function whose first argument names a complete class into an instance method on that class.
///
/// The free function is ignored rather than removed so that the emitter can still see where the method came from.
#[instrument(skip(ast), level = "debug")]
pub fn function_to_instance_method(ast: &mut AST, strip_class_prefix: bool) -> Result<usize> {
    let candidates = ast
        .walk()
        .into_iter()
        .filter(|id| is_free_function(ast, *id))
        .collect::<Vec<_>>();

    let mut changes = 0;
    for function_id in candidates {
        if let Some((class_id, method)) = promotion_for(ast, function_id, strip_class_prefix) {
            debug!(
                "Promoting \"{}\" to method \"{}\" on \"{}\"",
                ast[function_id].name(),
                method.name(),
                ast.qualified_name(class_id)
            );

            ast.insert(Some(class_id), method)?;
            ast[function_id].ignore();
            changes += 1;
        }
    }

    Ok(changes)
}
