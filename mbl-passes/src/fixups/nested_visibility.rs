use hashbrown::HashSet;
use log::*;
use tracing::instrument;

use mbl_ast::{Access, DeclId, Kind, AST, USR};

fn referenced_by_public_api(ast: &AST) -> HashSet<USR> {
    let mut referenced = HashSet::new();
    for id in ast.walk() {
        let decl = &ast[id];
        let is_api = matches!(
            decl.kind(),
            Kind::Function | Kind::Method | Kind::Property | Kind::Variable | Kind::Typedef
        );

        if is_api && ast.is_publicly_visible(id) {
            referenced.extend(decl.referenced_usrs());
        }
    }
    referenced
}

fn is_nested_type(ast: &AST, id: DeclId) -> bool {
    let decl = &ast[id];
    decl.kind().is_type()
        && !decl.is_ignored()
        && decl
            .parent()
            .map(|p| ast[p].kind() == Kind::Class)
            .unwrap_or(false)
}

/// Widen protected nested types to public when the public API mentions them.
///
/// Widening a nested typedef can expose further nested types through it, so this repeats until nothing changes.
/// Private nested types are reported but never widened.
#[instrument(skip(ast), level = "debug")]
pub fn make_protected_nested_types_public(ast: &mut AST) -> usize {
    let mut changes = 0;
    let mut reported = HashSet::new();

    loop {
        let referenced = referenced_by_public_api(ast);
        let mut widened = Vec::new();

        for id in ast.walk() {
            let decl = &ast[id];
            if !is_nested_type(ast, id) || !referenced.contains(&decl.usr()) {
                continue;
            }

            match decl.access() {
                Access::Protected => widened.push(id),
                Access::Private => {
                    if reported.insert(id) {
                        warn!(
                            "Private nested type \"{}\" is used by the public API but cannot be made public",
                            ast.qualified_name(id)
                        );
                    }
                }
                Access::Public => (),
            }
        }

        if widened.is_empty() {
            return changes;
        }

        for id in widened {
            info!("Making nested type \"{}\" public", ast.qualified_name(id));
            ast[id].set_access(Access::Public);
            changes += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use mbl_ast::function::Argument;
    use mbl_ast::qualtype::QualType;
    use mbl_ast::Decl;

    #[test]
    fn referenced_protected_types_become_public() {
        let (mut ast, tu) = new_tree("widgets.h");
        let widget = class(&mut ast, tu, "Widget");
        let state = class_with(&mut ast, widget, "State", Access::Protected, Vec::new());
        let hidden = class_with(&mut ast, widget, "Hidden", Access::Protected, Vec::new());
        let secret = class_with(&mut ast, widget, "Secret", Access::Private, Vec::new());

        let state_ptr = class_ptr(&ast, state);
        let secret_ptr = class_ptr(&ast, secret);
        method(&mut ast, widget, "GetState", vec![Argument::new("out", state_ptr)], false);
        method(&mut ast, widget, "GetSecret", vec![Argument::new("out", secret_ptr)], false);

        assert_eq!(make_protected_nested_types_public(&mut ast), 1);
        assert_eq!(ast[state].access(), Access::Public);
        assert_eq!(ast[hidden].access(), Access::Protected);
        assert_eq!(ast[secret].access(), Access::Private);

        assert_eq!(make_protected_nested_types_public(&mut ast), 0);
    }

    #[test]
    fn exposure_through_nested_typedefs_is_followed() -> crate::Result<()> {
        let (mut ast, tu) = new_tree("widgets.h");
        let widget = class(&mut ast, tu, "Widget");
        let impl_class = class_with(&mut ast, widget, "Impl", Access::Protected, Vec::new());
        let impl_ptr = class_ptr(&ast, impl_class);
        let handle = ast.insert(
            Some(widget),
            Decl::typedef(usr("c:@S@Widget@T@Handle"), "Handle", impl_ptr).with_access(Access::Protected),
        )?;
        property(
            &mut ast,
            widget,
            "handle",
            QualType::type_ref("Handle", usr("c:@S@Widget@T@Handle")),
        );

        assert_eq!(make_protected_nested_types_public(&mut ast), 2);
        assert_eq!(ast[handle].access(), Access::Public);
        assert_eq!(ast[impl_class].access(), Access::Public);

        Ok(())
    }
}
