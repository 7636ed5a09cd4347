use log::*;
use tracing::instrument;

use mbl_ast::AST;
use mbl_passes::{normalize, run_passes, suppress_all, validate_order};
use mbl_write::rewrite::validate_substitutions;
use mbl_write::{rewrite_outputs, Emitter, GeneratorOutput};

use crate::config::BindConfig;
use crate::front_end::{FrontEnd, ParseOptions};
use crate::{Error, Result};

/// Runs the customization stages of a [`BindConfig`] in their fixed order:
///
/// 1. filter, then normalize names ([`Pipeline::preprocess`])
/// 2. structural fixups ([`Pipeline::run_fixups`])
/// 3. the emitter
/// 4. output rewriting ([`Pipeline::postprocess`])
///
/// Any error stops the run. Nothing after the failing stage is applied.
pub struct Pipeline<'a> {
    config: &'a BindConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a BindConfig) -> Pipeline<'a> {
        Pipeline { config }
    }

    pub fn config(&self) -> &BindConfig {
        self.config
    }

    /// Check the parts of the configuration that can be checked without a tree
    pub fn validate(&self) -> Result<()> {
        validate_order(&self.config.passes)?;
        validate_substitutions(&self.config.substitutions)?;
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    pub fn preprocess(&self, ast: &mut AST) -> Result<usize> {
        self.validate()?;

        let suppressed = suppress_all(ast, &self.config.suppress)?;
        let renamed = normalize(
            ast,
            &self.config.prefix,
            &self.config.renames,
            &self.config.rename_upper_case,
        )?;

        debug!("Suppressed {suppressed} declaration(s), renamed {renamed}");
        Ok(suppressed + renamed)
    }

    #[instrument(skip_all, level = "debug")]
    pub fn run_fixups(&self, ast: &mut AST) -> Result<usize> {
        Ok(run_passes(ast, &self.config.passes)?)
    }

    /// Everything that happens to the tree before it is emitted
    pub fn process(&self, ast: &mut AST) -> Result<usize> {
        let changes = self.preprocess(ast)?;
        Ok(changes + self.run_fixups(ast)?)
    }

    #[instrument(skip_all, level = "debug")]
    pub fn postprocess(&self, outputs: &mut [GeneratorOutput]) -> Result<usize> {
        Ok(rewrite_outputs(outputs, &self.config.substitutions)?)
    }

    /// Parse, process, emit and rewrite. Returns the processed tree along with the final outputs.
    pub fn run(
        &self,
        front_end: &mut dyn FrontEnd,
        emitter: &mut dyn Emitter,
    ) -> Result<(AST, Vec<GeneratorOutput>)> {
        self.validate()?;

        let mut ast = front_end.parse(&ParseOptions::from(self.config))?;
        self.process(&mut ast)?;

        let mut outputs = emitter.emit(&ast).map_err(|source| Error::Emit { source })?;
        self.postprocess(&mut outputs)?;

        info!(
            "Generated {} file(s) for {}",
            outputs.len(),
            self.config.library_name
        );

        Ok((ast, outputs))
    }
}
