//! `.bmt` writing

use super::{FLAG_EXTRA_VALUE, FLAG_NORMAL_MAP, MaterialDef};
use crate::error::Result;
use crate::formats::common::{JmxWriter, MATERIAL_TAG};

/// Serialize a material table.
///
/// Gated fields are written according to `entry_flags`; a missing optional
/// value under a set flag is written as an empty string or zero.
pub fn write_material_file(materials: &[MaterialDef]) -> Result<Vec<u8>> {
    let mut w = JmxWriter::new();
    w.write_tag(MATERIAL_TAG);
    w.write_u32(materials.len() as u32)?;

    for m in materials {
        w.write_string(&m.name)?;
        w.write_rgb(m.diffuse)?;
        w.write_f32(m.diffuse_intensity)?;
        w.write_rgba(m.ambient)?;
        w.write_rgb(m.specular)?;
        w.write_f32(m.specular_intensity)?;
        w.write_rgb(m.emissive)?;
        w.write_f32(m.emissive_alpha)?;
        w.write_f32(m.specular_power)?;
        w.write_u32(m.entry_flags)?;
        w.write_string(&m.texture_path)?;
        w.write_f32(m.texture_scale)?;
        w.write_u16(m.texture_options)?;
        w.write_u8(u8::from(!m.same_directory));

        if m.entry_flags & FLAG_NORMAL_MAP != 0 {
            w.write_string(m.normal_map_path.as_deref().unwrap_or_default())?;
        }
        if m.entry_flags & FLAG_EXTRA_VALUE != 0 {
            w.write_u32(m.extra_value.unwrap_or_default())?;
        }
    }

    Ok(w.into_bytes())
}
