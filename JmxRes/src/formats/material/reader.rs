//! `.bmt` reading

use std::path::{Path, PathBuf};

use super::{FLAG_EXTRA_VALUE, FLAG_NORMAL_MAP, MaterialDef};
use crate::config::TextureExtension;
use crate::error::Result;
use crate::formats::common::{Rgb, Rgba, VersionTag};
use crate::formats::cursor::BinaryCursor;
use crate::utils::path::{remap_texture_extension, resolve_data_path};

/// Smallest possible record: empty name and texture, no gated fields.
const MIN_RECORD_SIZE: usize = 4 + 16 * 4 + 4 + 4 + 4 + 2 + 1;

/// Where texture names are resolved.
#[derive(Debug, Clone, Copy)]
pub struct MaterialContext<'a> {
    /// Client data root used for textures that do not sit next to the material file.
    pub data_root: &'a Path,
    pub extension: &'a TextureExtension,
}

/// Read the material file at `path`, which was named inside `referenced_from`.
pub fn read_material_file(
    path: &Path,
    referenced_from: &Path,
    context: MaterialContext<'_>,
) -> Result<Vec<MaterialDef>> {
    let mut cursor = BinaryCursor::open_referenced(path, referenced_from)?;
    parse_material_table(&mut cursor, context)
}

/// Parse a whole material table from the start of `cursor`.
pub fn parse_material_table(
    cursor: &mut BinaryCursor,
    context: MaterialContext<'_>,
) -> Result<Vec<MaterialDef>> {
    cursor.seek(0);
    let version = VersionTag::read(cursor)?;
    let (count, mut materials) = cursor.read_count(MIN_RECORD_SIZE)?;
    tracing::debug!(
        "Material table {} ({}): {} entries",
        cursor.path().display(),
        version,
        count
    );

    let material_dir = cursor
        .path()
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    for _ in 0..count {
        materials.push(read_material(cursor, &material_dir, context)?);
    }

    Ok(materials)
}

fn read_material(
    cursor: &mut BinaryCursor,
    material_dir: &Path,
    context: MaterialContext<'_>,
) -> Result<MaterialDef> {
    let name = cursor.read_string()?;
    let diffuse = Rgb::read(cursor)?;
    let diffuse_intensity = cursor.read_f32()?;
    let ambient = Rgba::read(cursor)?;
    let specular = Rgb::read(cursor)?;
    let specular_intensity = cursor.read_f32()?;
    let emissive = Rgb::read(cursor)?;
    let emissive_alpha = cursor.read_f32()?;
    let specular_power = cursor.read_f32()?;
    let entry_flags = cursor.read_u32()?;
    let texture_path = cursor.read_string()?;
    let texture_scale = cursor.read_f32()?;
    let texture_options = cursor.read_u16()?;
    let same_directory = cursor.read_u8()? == 0;

    let normal_map_path = if entry_flags & FLAG_NORMAL_MAP != 0 {
        Some(cursor.read_string()?)
    } else {
        None
    };
    let extra_value = if entry_flags & FLAG_EXTRA_VALUE != 0 {
        Some(cursor.read_u32()?)
    } else {
        None
    };

    let base = if same_directory { material_dir } else { context.data_root };
    let texture_file = texture_location(base, &texture_path, context.extension);
    let normal_map_file = normal_map_path
        .as_deref()
        .map(|p| texture_location(base, p, context.extension));

    tracing::debug!(
        "Material '{}': texture {} (flags 0x{:X})",
        name,
        texture_file.display(),
        entry_flags
    );

    Ok(MaterialDef {
        name,
        diffuse,
        diffuse_intensity,
        ambient,
        specular,
        specular_intensity,
        emissive,
        emissive_alpha,
        specular_power,
        entry_flags,
        texture_path,
        texture_scale,
        texture_options,
        same_directory,
        normal_map_path,
        extra_value,
        texture_file,
        normal_map_file,
    })
}

fn texture_location(base: &Path, stored: &str, extension: &TextureExtension) -> PathBuf {
    let remapped = remap_texture_extension(stored, &extension.from, &extension.to);
    resolve_data_path(base, &remapped)
}
