use std::path::{Path, PathBuf};

use log::*;
use tracing::instrument;

use mbl_ast::load::{load_ast_from_file, load_ast_from_str};
use mbl_ast::AST;

use crate::config::BindConfig;
use crate::Result;

/// What the front end needs to know to parse the headers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub headers: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub defines: Vec<String>,
}

impl From<&BindConfig> for ParseOptions {
    fn from(config: &BindConfig) -> Self {
        ParseOptions {
            headers: config.headers.clone(),
            include_dirs: config.include_dirs.clone(),
            defines: config.defines.clone(),
        }
    }
}

/// Produces the declaration tree for a set of headers
pub trait FrontEnd {
    fn parse(&mut self, options: &ParseOptions) -> Result<AST>;
}

enum Source {
    File(PathBuf),
    Text(String),
}

/// Reads a declaration tree that a header parser has already dumped to JSON.
///
/// Include directories and defines were applied when the dump was made, so only the header list is used here.
pub struct JsonFrontEnd {
    source: Source,
}

impl JsonFrontEnd {
    pub fn new<P: AsRef<Path>>(path: P) -> JsonFrontEnd {
        JsonFrontEnd {
            source: Source::File(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_json(json: &str) -> JsonFrontEnd {
        JsonFrontEnd {
            source: Source::Text(json.into()),
        }
    }
}

impl FrontEnd for JsonFrontEnd {
    #[instrument(skip(self), level = "debug")]
    fn parse(&mut self, options: &ParseOptions) -> Result<AST> {
        if !options.include_dirs.is_empty() || !options.defines.is_empty() {
            debug!("Include directories and defines are ignored when reading a tree dump");
        }

        let ast = match &self.source {
            Source::File(path) => load_ast_from_file(path, &options.headers)?,
            Source::Text(json) => load_ast_from_str(json, &options.headers)?,
        };

        info!(
            "Loaded {} declarations from {} translation unit(s)",
            ast.len(),
            ast.translation_units().len()
        );

        Ok(ast)
    }
}
