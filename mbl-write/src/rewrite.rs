use log::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Error;
use crate::output::{BlockKind, GeneratorOutput};
use crate::Result;

/// Replace every occurrence of `from` with `to`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn new(from: &str, to: &str) -> Substitution {
        Substitution {
            from: from.into(),
            to: to.into(),
        }
    }
}

pub fn validate_substitutions(substitutions: &[Substitution]) -> Result<()> {
    match substitutions.iter().position(|s| s.from.is_empty()) {
        Some(index) => Err(Error::EmptySubstitution { index }),
        None => Ok(()),
    }
}

/// Apply `substitutions` in order to `text`. Later substitutions see the result of earlier ones.
pub fn rewrite_text(text: &str, substitutions: &[Substitution]) -> String {
    substitutions
        .iter()
        .fold(text.to_string(), |text, s| text.replace(&s.from, &s.to))
}

/// Rewrite the text of every [`BlockKind::Unknown`] block, at any depth, in every output.
///
/// Blocks of any other kind carry declarations and are never touched. Returns the number of blocks changed.
#[instrument(skip(outputs), level = "debug")]
pub fn rewrite_outputs(outputs: &mut [GeneratorOutput], substitutions: &[Substitution]) -> Result<usize> {
    validate_substitutions(substitutions)?;

    let mut changes = 0;
    for output in outputs.iter_mut() {
        let file_name = output.file_name.clone();
        output.visit_blocks_mut(|block| {
            if block.kind != BlockKind::Unknown {
                return;
            }

            let rewritten = rewrite_text(&block.text, substitutions);
            if rewritten != block.text {
                trace!("{file_name}: rewrote {:?}", block.text);
                block.text = rewritten;
                changes += 1;
            }
        });
    }

    Ok(changes)
}
