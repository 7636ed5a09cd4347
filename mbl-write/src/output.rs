use std::path::Path;

use log::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Error;
use crate::Result;

/// The structural role of a block of emitted text
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Text the emitter did not classify: boilerplate, library names, import statements
    #[default]
    Unknown,
    Header,
    Footer,
    Usings,
    Namespace,
    Class,
    Enum,
    Function,
    Method,
    Property,
    Field,
    Typedef,
    Comment,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub kind: BlockKind,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(kind: BlockKind, text: &str) -> Block {
        Block {
            kind,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn unknown(text: &str) -> Block {
        Block::new(BlockKind::Unknown, text)
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Block {
        self.children = children;
        self
    }

    /// This block's text followed by the text of its children, depth first
    pub fn render(&self) -> String {
        let mut result = self.text.clone();
        for child in &self.children {
            result.push_str(&child.render());
        }
        result
    }

    /// Call `f` on this block and every block below it
    pub fn visit_mut<F: FnMut(&mut Block)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }
}

/// Everything the emitter generated for one file
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratorOutput {
    pub file_name: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl GeneratorOutput {
    pub fn new(file_name: &str, blocks: Vec<Block>) -> GeneratorOutput {
        GeneratorOutput {
            file_name: file_name.into(),
            blocks,
        }
    }

    pub fn render(&self) -> String {
        self.blocks.iter().map(|b| b.render()).collect()
    }

    pub fn visit_blocks_mut<F: FnMut(&mut Block)>(&mut self, mut f: F) {
        for block in &mut self.blocks {
            block.visit_mut(&mut f);
        }
    }
}

pub fn read_outputs_from_str(json: &str) -> Result<Vec<GeneratorOutput>> {
    Ok(serde_json::from_str(json)?)
}

pub fn read_outputs_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<GeneratorOutput>> {
    let json = std::fs::read_to_string(path)?;
    read_outputs_from_str(&json)
}

/// Render every output to `output_directory`, creating it if needed
#[instrument(skip(outputs), level = "debug")]
pub fn write_outputs(outputs: &[GeneratorOutput], output_directory: &Path) -> Result<()> {
    std::fs::create_dir_all(output_directory).map_err(|source| Error::FailedToCreateDirectory {
        path: output_directory.to_path_buf(),
        source,
    })?;

    for output in outputs {
        let path = output_directory.join(&output.file_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Error::FailedToCreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        debug!("Writing {}", path.display());
        std::fs::write(&path, output.render())
            .map_err(|source| Error::FailedToWriteOutput { path, source })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn render_is_depth_first() {
        let output = GeneratorOutput::new(
            "ImGui.cs",
            vec![
                Block::new(BlockKind::Usings, "using System;\n"),
                Block::new(BlockKind::Namespace, "namespace DearImguiSharp\n{\n").with_children(vec![
                    Block::new(BlockKind::Class, "    public class ImVec2\n    {\n")
                        .with_children(vec![Block::new(BlockKind::Field, "        public float X;\n")]),
                    Block::unknown("    }\n"),
                ]),
                Block::unknown("}\n"),
            ],
        );

        assert_eq!(
            output.render(),
            indoc!(
                r#"
                using System;
                namespace DearImguiSharp
                {
                    public class ImVec2
                    {
                        public float X;
                    }
                }
                "#
            )
        );
    }

    #[test]
    fn blocks_deserialize_with_defaults() -> Result<()> {
        let outputs = read_outputs_from_str(
            r#"[{"file_name": "ImGui.cs", "blocks": [{"text": "a"}, {"kind": "class", "text": "b"}]}]"#,
        )?;

        assert_eq!(outputs[0].blocks[0].kind, BlockKind::Unknown);
        assert_eq!(outputs[0].blocks[1].kind, BlockKind::Class);
        assert_eq!(outputs[0].render(), "ab");

        Ok(())
    }
}
