use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use mbl_passes::{default_passes, Pass, Prefix, Rename, RenameTarget, Selector};
use mbl_write::Substitution;

use crate::{Error, Result};

/// Everything that customizes a binding. Fixed for the whole run once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Shared library the generated wrapper loads
    pub library_name: String,
    pub output_namespace: String,
    pub headers: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub defines: Vec<String>,
    pub prefix: Prefix,
    pub rename_upper_case: Vec<RenameTarget>,
    pub renames: Vec<Rename>,
    pub suppress: Vec<Selector>,
    pub passes: Vec<Pass>,
    pub substitutions: Vec<Substitution>,
}

impl Default for BindConfig {
    fn default() -> Self {
        BindConfig {
            library_name: String::new(),
            output_namespace: String::new(),
            headers: Vec::new(),
            include_dirs: Vec::new(),
            defines: Vec::new(),
            prefix: Prefix::None,
            rename_upper_case: Vec::new(),
            renames: Vec::new(),
            suppress: Vec::new(),
            passes: default_passes(),
            substitutions: Vec::new(),
        }
    }
}

impl BindConfig {
    /// Binding for the cimgui C API to Dear ImGui
    pub fn cimgui() -> BindConfig {
        BindConfig {
            library_name: "cimgui.dll".into(),
            output_namespace: "DearImguiSharp".into(),
            headers: vec!["cimgui.h".into(), "cimgui_impl.h".into()],
            include_dirs: vec![PathBuf::from("./")],
            defines: vec!["CIMGUI_DEFINE_ENUMS_AND_STRUCTS".into()],
            prefix: Prefix::literal("ig"),
            rename_upper_case: vec![RenameTarget::Property, RenameTarget::Class],
            renames: Vec::new(),
            suppress: vec![
                Selector::global("GImGui"),
                Selector::property("ImVector_ImTextureID", "Data"),
            ],
            passes: default_passes(),
            substitutions: vec![
                Substitution::new("cimgui_impl", "ImGui"),
                Substitution::new("cimgui", "ImGui"),
            ],
        }
    }
}

pub fn read_config<P: AsRef<Path>>(path: P) -> Result<BindConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| Error::FailedToReadConfig {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    serde_json::from_str(&json).map_err(|e| Error::FailedToReadConfig {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

pub fn write_config<P: AsRef<Path>>(config: &BindConfig, path: P) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}
