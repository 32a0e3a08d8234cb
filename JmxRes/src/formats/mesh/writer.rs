//! `.bms` writing

use glam::Vec3;

use super::{MeshDef, VERTEX_PADDING, flip_uv, unmap_position};
use crate::error::Result;
use crate::formats::common::{JmxWriter, MESH_TAG};

/// Header slots, in file order.
const SLOT_VERTICES: u32 = 0;
const SLOT_FACES: u32 = 2;
const SLOT_UNKNOWN_0: u32 = 3;
const SLOT_UNKNOWN_1: u32 = 4;
const SLOT_LIGHTMAP_FLAG: u32 = 13;

/// Serialize a mesh, converting back to the stored coordinate frame.
///
/// Lightmap coordinates are written when `lightmap_uvs` is non-empty. Normals
/// are written as zero and the two unknown blocks as empty count blocks.
pub fn write_mesh_file(mesh: &MeshDef) -> Result<Vec<u8>> {
    let mut w = JmxWriter::new();
    w.write_tag(MESH_TAG);

    let table = w.position();
    for _ in 0..15 {
        w.write_u32(0)?;
    }
    let slot = |index: u32| table + index * 4;

    let lightmap = !mesh.lightmap_uvs.is_empty();
    if lightmap {
        w.patch_u32(slot(SLOT_LIGHTMAP_FLAG), 1);
    }

    w.write_string(&mesh.name)?;
    w.write_string(&mesh.material_name)?;
    w.write_u32(0)?;

    w.patch_u32(slot(SLOT_VERTICES), w.position());
    w.write_u32(mesh.vertices.len() as u32)?;
    for (i, &position) in mesh.vertices.iter().enumerate() {
        w.write_vec3(unmap_position(position))?;
        w.write_vec3(Vec3::ZERO)?;
        w.write_vec2(flip_uv(mesh.uvs.get(i).copied().unwrap_or_default()))?;
        if lightmap {
            w.write_vec2(mesh.lightmap_uvs.get(i).copied().unwrap_or_default())?;
        }
        w.write_zeros(VERTEX_PADDING);
    }

    w.patch_u32(slot(SLOT_FACES), w.position());
    w.write_u32(mesh.faces.len() as u32)?;
    for face in &mesh.faces {
        for &index in face {
            w.write_u16(index)?;
        }
    }

    for index in [SLOT_UNKNOWN_0, SLOT_UNKNOWN_1] {
        w.patch_u32(slot(index), w.position());
        w.write_count_block(&[])?;
    }

    Ok(w.into_bytes())
}
