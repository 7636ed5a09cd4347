//! The declaration tree the mumble passes operate on.
//!
//! The tree is produced by an external header-parsing front end (see [`load`]), mutated in place by the pass
//! pipeline, then handed to an emitter.

pub mod ast;
pub mod class;
pub mod enm;
pub mod error;
pub mod function;
pub mod index_map;
pub mod load;
pub mod qualtype;
pub mod typedef;
pub mod usr;

pub use ast::{Access, Decl, DeclData, DeclId, Kind, AST};
pub use usr::USR;
