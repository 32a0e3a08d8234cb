//! `.bsk` writing

use super::BoneDef;
use crate::error::Result;
use crate::formats::common::{JmxWriter, SKELETON_TAG};

/// Serialize bones in the given order.
///
/// `bind_position` is derived on read and is not written. Both trailing
/// blocks are written empty.
pub fn write_skeleton_file(bones: &[BoneDef]) -> Result<Vec<u8>> {
    let mut w = JmxWriter::new();
    w.write_tag(SKELETON_TAG);
    w.write_u32(bones.len() as u32)?;

    for bone in bones {
        w.write_u8(bone.kind);
        w.write_string(&bone.name)?;
        w.write_string(bone.parent_name.as_deref().unwrap_or_default())?;
        w.write_quat(bone.rotation_to_parent)?;
        w.write_vec3(bone.translation_to_parent)?;
        w.write_quat(bone.rotation_to_origin)?;
        w.write_vec3(bone.translation_to_origin)?;
        w.write_quat(bone.rotation_local)?;
        w.write_vec3(bone.translation_local)?;
        w.write_u32(bone.children.len() as u32)?;
        for child in &bone.children {
            w.write_string(child)?;
        }
    }

    w.write_count_block(&[])?;
    w.write_count_block(&[])?;
    Ok(w.into_bytes())
}
