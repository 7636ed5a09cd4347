use mbl_util::Trace;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not find declaration \"{name}\"")]
    DeclarationNotFound { name: String, source: Trace },
    #[error("Could not find class \"{name}\"")]
    ClassNotFound {
        name: String,
        source: mbl_ast::error::Error,
    },
    #[error("Could not find property \"{property}\" on class \"{class}\"")]
    PropertyNotFound {
        class: String,
        property: String,
        source: Trace,
    },
    #[error("Pass \"{later}\" must run after \"{earlier}\"")]
    PassOrder { earlier: String, later: String },
    #[error("Pass \"{0}\" is listed more than once")]
    DuplicatePass(String),
    #[error("Failed to run pass \"{name}\"")]
    FailedToRunPass {
        name: String,
        source: Box<dyn std::error::Error + 'static + Send + Sync>,
    },
    #[error("Declaration tree error")]
    Ast(#[from] mbl_ast::error::Error),
}
