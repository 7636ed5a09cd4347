//! The customization passes applied to a declaration tree between parsing and emission.
//!
//! Passes run in three stages. [`filter`] marks declarations that must not be bound, [`normalize`] renames what is
//! left to the target naming convention, and [`fixups`] reshapes the tree so it maps cleanly onto an object-oriented
//! wrapper.

pub mod error;
pub mod filter;
pub mod fixups;
pub mod normalize;

pub use error::Error;
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use filter::{suppress, suppress_all, Selector};
pub use fixups::{default_passes, run_passes, validate_order, Pass};
pub use normalize::{apply_renames, normalize, rename_upper_case, strip_prefix, Prefix, Rename, RenameTarget};

#[cfg(test)]
pub(crate) mod test_util;
