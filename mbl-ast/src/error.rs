use crate::ast::Kind;
use crate::usr::USR;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not find class \"{0}\" in AST")]
    ClassNotFound(String),
    #[error("Multiple complete definitions found for class \"{0}\"")]
    MultipleMatches(String),
    #[error("A declaration with USR \"{0}\" is already in the AST")]
    DuplicateUsr(USR),
    #[error("{child:?} \"{name}\" cannot be declared inside {parent:?}")]
    InvalidParent {
        parent: Option<Kind>,
        child: Kind,
        name: String,
    },
    #[error("{kind:?} \"{name}\" is missing field \"{field}\"")]
    MissingField {
        kind: Kind,
        name: String,
        field: &'static str,
    },
    #[error("Header \"{0}\" was not found in the declaration tree")]
    HeaderNotFound(String),
    #[error("I/O error")]
    IoError(#[from] std::io::Error),
    #[error("Failed to read declaration tree JSON")]
    Json(#[from] serde_json::Error),
}
