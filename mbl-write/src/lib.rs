//! What happens to the tree after the passes: the emitter turns it into blocks of source text, the rewriter makes
//! its presentation-only fixes, and the outputs are written to disk.

use mbl_ast::AST;

pub mod error;
pub mod output;
pub mod rewrite;

pub use error::Error;
pub use output::{write_outputs, Block, BlockKind, GeneratorOutput};
pub use rewrite::{rewrite_outputs, Substitution};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Turns a processed declaration tree into generated source. Ignored declarations must not be emitted.
pub trait Emitter {
    fn emit(
        &mut self,
        ast: &AST,
    ) -> std::result::Result<Vec<GeneratorOutput>, Box<dyn std::error::Error + 'static + Send + Sync>>;
}
