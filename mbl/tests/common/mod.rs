#![allow(dead_code, unused_imports)]

use mbl::{Block, BlockKind, Emitter, GeneratorOutput, Kind, AST};

pub(crate) use mbl_util::{init_log, run_test};

pub(crate) const CIMGUI_JSON: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/cimgui.json");

/// Stands in for the template-driven emitter: one output per translation unit, one block per visible class or
/// function, with the library name in unclassified blocks
pub(crate) struct StubEmitter {
    pub library: String,
}

impl Emitter for StubEmitter {
    fn emit(
        &mut self,
        ast: &AST,
    ) -> Result<Vec<GeneratorOutput>, Box<dyn std::error::Error + 'static + Send + Sync>> {
        let mut outputs = Vec::new();
        for tu in ast.translation_units() {
            let header = ast[*tu].name();
            let mut blocks = vec![Block::unknown(&format!("// {header}\n"))];

            for id in ast.descendants(*tu) {
                if !ast.is_publicly_visible(id) {
                    continue;
                }

                match ast[id].kind() {
                    Kind::Class => blocks.push(Block::new(
                        BlockKind::Class,
                        &format!("class {}\n", ast[id].name()),
                    )),
                    Kind::Function => blocks.push(
                        Block::new(BlockKind::Function, &format!("fn {}\n", ast.qualified_name(id)))
                            .with_children(vec![Block::unknown(&format!(
                                "  [DllImport(\"{}\")]\n",
                                self.library
                            ))]),
                    ),
                    _ => (),
                }
            }

            outputs.push(GeneratorOutput::new(&header.replace(".h", ".cs"), blocks));
        }

        Ok(outputs)
    }
}

pub(crate) struct FailingEmitter;

#[derive(Debug)]
pub(crate) struct TemplateMissing;

impl std::fmt::Display for TemplateMissing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "template \"class.cs\" is missing")
    }
}

impl std::error::Error for TemplateMissing {}

impl Emitter for FailingEmitter {
    fn emit(
        &mut self,
        _ast: &AST,
    ) -> Result<Vec<GeneratorOutput>, Box<dyn std::error::Error + 'static + Send + Sync>> {
        Err(Box::new(TemplateMissing))
    }
}
