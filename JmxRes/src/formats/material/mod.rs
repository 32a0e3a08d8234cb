//! `.bmt` material tables
//!
//! A material file holds an array of fixed-layout material records. Two
//! trailing fields are gated on bits of the record's `entry_flags`.

mod reader;
mod writer;

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::common::{Rgb, Rgba};

pub use reader::{parse_material_table, read_material_file, MaterialContext};
pub use writer::write_material_file;

/// Record has a trailing `u32` after the texture fields.
pub const FLAG_EXTRA_VALUE: u32 = 0x4;
/// Material is alpha blended.
pub const FLAG_TRANSPARENT: u32 = 0x200;
/// Record carries a normal map path.
pub const FLAG_NORMAL_MAP: u32 = 0x2000;

/// One decoded material record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialDef {
    pub name: String,
    pub diffuse: Rgb,
    pub diffuse_intensity: f32,
    pub ambient: Rgba,
    pub specular: Rgb,
    pub specular_intensity: f32,
    pub emissive: Rgb,
    pub emissive_alpha: f32,
    pub specular_power: f32,
    pub entry_flags: u32,
    /// Texture name exactly as stored.
    pub texture_path: String,
    /// Float stored after the texture name (observed as 1.0).
    pub texture_scale: f32,
    /// Short stored after the texture scale (observed 0, 24, 2080).
    pub texture_options: u16,
    /// The texture lives next to the material file rather than under the data root.
    pub same_directory: bool,
    pub normal_map_path: Option<String>,
    pub extra_value: Option<u32>,
    /// Resolved location of the diffuse texture, with the extension remapped.
    pub texture_file: PathBuf,
    /// Resolved location of the normal map, with the extension remapped.
    pub normal_map_file: Option<PathBuf>,
}

impl MaterialDef {
    pub fn is_transparent(&self) -> bool {
        self.entry_flags & FLAG_TRANSPARENT != 0
    }

    pub fn has_normal_map(&self) -> bool {
        self.entry_flags & FLAG_NORMAL_MAP != 0
    }
}

/// Materials of one resource, keyed by name in first-insertion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterialSet {
    materials: IndexMap<String, MaterialDef>,
}

impl MaterialSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a material. A material with the same name is replaced in place.
    ///
    /// Returns the replaced material, if any.
    pub fn insert(&mut self, material: MaterialDef) -> Option<MaterialDef> {
        let previous = self.materials.insert(material.name.clone(), material);
        if let Some(ref old) = previous {
            tracing::warn!("Duplicate material '{}', keeping the later definition", old.name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&MaterialDef> {
        self.materials.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialDef> {
        self.materials.values()
    }
}

impl Extend<MaterialDef> for MaterialSet {
    fn extend<I: IntoIterator<Item = MaterialDef>>(&mut self, iter: I) {
        for material in iter {
            self.insert(material);
        }
    }
}

impl IntoIterator for MaterialSet {
    type Item = MaterialDef;
    type IntoIter = indexmap::map::IntoValues<String, MaterialDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.materials.into_values()
    }
}
