//! Drives a declaration tree from the header-parsing front end through the customization passes and an emitter,
//! then rewrites the emitted text.
//!
//! ```no_run
//! use mbl::{BindConfig, FrontEnd, JsonFrontEnd, ParseOptions, Pipeline};
//!
//! # fn main() -> Result<(), mbl::Error> {
//! let config = BindConfig::cimgui();
//! let mut ast = JsonFrontEnd::new("cimgui.json").parse(&ParseOptions::from(&config))?;
//! Pipeline::new(&config).process(&mut ast)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod front_end;
pub mod pipeline;

pub use config::{read_config, write_config, BindConfig};
pub use front_end::{FrontEnd, JsonFrontEnd, ParseOptions};
pub use pipeline::Pipeline;

pub use mbl_ast::{Decl, DeclId, Kind, AST, USR};
pub use mbl_passes::{Pass, Prefix, Rename, RenameTarget, Selector};
pub use mbl_write::{Block, BlockKind, Emitter, GeneratorOutput, Substitution};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error in declaration tree")]
    Ast(#[from] mbl_ast::error::Error),
    #[error("Error running passes")]
    Passes(#[from] mbl_passes::error::Error),
    #[error("Error writing outputs")]
    Write(#[from] mbl_write::error::Error),
    #[error("Front end failed to parse headers")]
    FrontEnd {
        source: Box<dyn std::error::Error + 'static + Send + Sync>,
    },
    #[error("Emitter failed")]
    Emit {
        source: Box<dyn std::error::Error + 'static + Send + Sync>,
    },
    #[error("Failed to read config \"{path}\"")]
    FailedToReadConfig {
        path: std::path::PathBuf,
        source: Box<dyn std::error::Error + 'static + Send + Sync>,
    },
    #[error("I/O error")]
    IoError(#[from] std::io::Error),
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}
