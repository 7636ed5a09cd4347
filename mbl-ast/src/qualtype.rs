use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::usr::USR;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Builtin(String),
    Ref(USR),
    Pointer(Box<QualType>),
    LValueReference(Box<QualType>),
    Unknown(String),
}

impl TypeRef {
    pub fn is_builtin(&self) -> bool {
        use TypeRef::*;
        match self {
            Builtin(_) => true,
            Pointer(p) => p.type_ref.is_builtin(),
            LValueReference(p) => p.type_ref.is_builtin(),
            _ => false,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualType {
    pub name: String,
    #[serde(default)]
    pub is_const: bool,
    pub type_ref: TypeRef,
}

impl std::fmt::Debug for QualType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            self.name,
            if self.is_const { " const" } else { "" }
        )
    }
}

impl Display for QualType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl QualType {
    pub fn builtin(name: &str) -> Self {
        QualType {
            name: name.into(),
            is_const: false,
            type_ref: TypeRef::Builtin(name.into()),
        }
    }

    pub fn void() -> Self {
        QualType::builtin("void")
    }

    pub fn bool() -> Self {
        QualType::builtin("bool")
    }

    pub fn int() -> Self {
        QualType::builtin("int")
    }

    pub fn float() -> Self {
        QualType::builtin("float")
    }

    /// A named reference to a class, enum or typedef declaration
    pub fn type_ref(name: &str, usr: USR) -> Self {
        QualType {
            name: name.into(),
            is_const: false,
            type_ref: TypeRef::Ref(usr),
        }
    }

    pub fn pointer(pointee: QualType) -> Self {
        QualType {
            name: format!("{}*", pointee.name),
            is_const: false,
            type_ref: TypeRef::Pointer(Box::new(pointee)),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(&self.type_ref, TypeRef::Builtin(name) if name == "void")
    }

    /// The type pointed or referred to, if this is a pointer or reference
    pub fn pointee(&self) -> Option<&QualType> {
        match &self.type_ref {
            TypeRef::Pointer(p) | TypeRef::LValueReference(p) => Some(p),
            _ => None,
        }
    }

    /// Collect every declaration this type names, at any level of indirection
    pub fn referenced_usrs(&self, usrs: &mut Vec<USR>) {
        match &self.type_ref {
            TypeRef::Ref(usr) => usrs.push(*usr),
            TypeRef::Pointer(p) | TypeRef::LValueReference(p) => p.referenced_usrs(usrs),
            TypeRef::Builtin(_) | TypeRef::Unknown(_) => (),
        }
    }
}
