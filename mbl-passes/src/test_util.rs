use mbl_ast::class::Class;
use mbl_ast::function::{Argument, Function, Method};
use mbl_ast::qualtype::QualType;
use mbl_ast::{Access, Decl, DeclId, AST, USR};

pub fn usr(s: &str) -> USR {
    USR::new(s)
}

/// A tree with a single translation unit to hang test declarations off
pub fn new_tree(file_name: &str) -> (AST, DeclId) {
    let mut ast = AST::new();
    let tu = ast
        .insert(None, Decl::translation_unit(file_name))
        .expect("translation unit");
    (ast, tu)
}

pub fn class(ast: &mut AST, parent: DeclId, name: &str) -> DeclId {
    class_with(ast, parent, name, Access::Public, Vec::new())
}

pub fn class_with(ast: &mut AST, parent: DeclId, name: &str, access: Access, bases: Vec<USR>) -> DeclId {
    let usr = usr(&format!("{}@S@{name}", ast[parent].usr()));
    ast.insert(
        Some(parent),
        Decl::class(usr, name, Class::new(true, bases)).with_access(access),
    )
    .expect("class")
}

pub fn class_ptr(ast: &AST, class: DeclId) -> QualType {
    QualType::pointer(QualType::type_ref(ast[class].name(), ast[class].usr()))
}

pub fn function(ast: &mut AST, parent: DeclId, name: &str, arguments: Vec<Argument>) -> DeclId {
    let usr = usr(&format!("{}@F@{name}{}", ast[parent].usr(), ast.len()));
    ast.insert(
        Some(parent),
        Decl::function(usr, name, Function::new(QualType::void(), arguments)),
    )
    .expect("function")
}

pub fn method(ast: &mut AST, class: DeclId, name: &str, arguments: Vec<Argument>, is_virtual: bool) -> DeclId {
    let usr = usr(&format!("{}@M@{name}{}", ast[class].usr(), ast.len()));
    let mut method = Method::new(Function::new(QualType::void(), arguments));
    method.set_virtual(is_virtual);
    ast.insert(Some(class), Decl::method(usr, name, method))
        .expect("method")
}

pub fn property(ast: &mut AST, class: DeclId, name: &str, qual_type: QualType) -> DeclId {
    let usr = usr(&format!("{}@FI@{name}{}", ast[class].usr(), ast.len()));
    ast.insert(Some(class), Decl::property(usr, name, qual_type))
        .expect("property")
}
