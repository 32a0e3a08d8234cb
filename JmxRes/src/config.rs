//! Import options (`jmxres.toml`)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_true() -> bool {
    true
}

fn default_texture_from() -> String {
    ".ddj".to_string()
}

fn default_texture_to() -> String {
    ".dds".to_string()
}

/// What to do when one referenced mesh file fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshErrorPolicy {
    /// Fail the whole import.
    #[default]
    Abort,
    /// Log the failure, record it in the report, and keep going.
    Skip,
}

/// Texture extension substitution applied to stored texture names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureExtension {
    #[serde(default = "default_texture_from")]
    pub from: String,
    #[serde(default = "default_texture_to")]
    pub to: String,
}

impl Default for TextureExtension {
    fn default() -> Self {
        Self {
            from: default_texture_from(),
            to: default_texture_to(),
        }
    }
}

/// Options controlling a resource import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Client `Data` directory that stored paths are relative to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
    /// Decode referenced files on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default)]
    pub on_mesh_error: MeshErrorPolicy,
    #[serde(default)]
    pub texture_extension: TextureExtension,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            data_root: None,
            parallel: true,
            on_mesh_error: MeshErrorPolicy::default(),
            texture_extension: TextureExtension::default(),
        }
    }
}

impl ImportOptions {
    /// Load options from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_toml_str(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// The data root, falling back to the directory containing `resource`.
    pub fn root_for(&self, resource: &Path) -> PathBuf {
        self.data_root.clone().unwrap_or_else(|| {
            resource
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        })
    }
}
