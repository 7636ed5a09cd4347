use log::*;
use tracing::instrument;

use mbl_ast::qualtype::{QualType, TypeRef};
use mbl_ast::{Kind, AST};

/// `T*` where `T` is a typedef for a pointer to something opaque, like `ImTextureID*` with `typedef void* ImTextureID`.
///
/// The wrapper has no way to express a pointer to an opaque handle as a field, so these need a hand-written accessor.
fn is_pointer_to_opaque_typedef(ast: &AST, qual_type: &QualType) -> bool {
    let pointee = match qual_type.pointee() {
        Some(pointee) => pointee,
        None => return false,
    };

    let names_typedef = match &pointee.type_ref {
        TypeRef::Ref(usr) => ast
            .get_decl(*usr)
            .map(|d| d.kind() == Kind::Typedef)
            .unwrap_or(false),
        _ => false,
    };

    if !names_typedef {
        return false;
    }

    ast.resolve_typedef(pointee)
        .pointee()
        .map(|inner| ast.is_opaque(inner))
        .unwrap_or(false)
}

/// Flag properties whose type is a pointer to an opaque pointer typedef for manual implementation, and hide them from
/// the generated wrapper.
///
/// Properties that are already ignored are still flagged, so the emitter knows to write the accessor by hand.
#[instrument(skip(ast), level = "debug")]
pub fn pointer_typedef_properties(ast: &mut AST) -> usize {
    let properties = ast
        .walk()
        .into_iter()
        .filter(|id| {
            ast[*id]
                .as_property()
                .map(|p| !p.needs_manual_impl() && is_pointer_to_opaque_typedef(ast, p.qual_type()))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();

    let changes = properties.len();
    for id in properties {
        warn!(
            "Property \"{}\" of type {} needs a manual implementation, ignoring it",
            ast.qualified_name(id),
            ast[id].as_property().map(|p| p.qual_type().to_string()).unwrap_or_default()
        );

        if let Some(property) = ast[id].as_property_mut() {
            property.set_manual_impl();
        }
        ast[id].ignore();
    }

    changes
}
