//! `.bms` mesh files
//!
//! A mesh file opens with a table of absolute section offsets. Only the
//! vertex and face sections are interpreted; the two unknown blocks that
//! follow the faces are walked so their framing is checked, and the bone,
//! bounding box, gate and collision sections are not visited.
//!
//! Positions are stored in the client's frame and are permuted to
//! `(z, x, y)` on decode. Texture `v` is negated.

mod reader;
mod writer;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::material::{MaterialDef, MaterialSet};
use crate::error::{Error, Result};

pub use reader::{parse_mesh, parse_mesh_header, read_mesh_file};
pub use writer::write_mesh_file;

/// Bytes of per-vertex data after the UVs that are not interpreted.
pub const VERTEX_PADDING: usize = 12;

/// Section offsets stored in a mesh header, in file order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeshOffsets {
    pub vertices: u32,
    pub bones: u32,
    pub faces: u32,
    pub unknown_0: u32,
    pub unknown_1: u32,
    pub bounding_box: u32,
    pub gates: u32,
    pub collision: u32,
    pub unknown_2: u32,
    pub unknown_3: u32,
}

/// Decoded mesh header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshHeader {
    pub offsets: MeshOffsets,
    pub flags: [u32; 5],
    pub name: String,
    pub material_name: String,
}

impl MeshHeader {
    /// Vertices carry a second (lightmap) UV pair.
    pub fn has_lightmap(&self) -> bool {
        self.flags[3] != 0
    }
}

/// A triangle mesh in the target coordinate frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshDef {
    pub name: String,
    pub material_name: String,
    pub vertices: Vec<Vec3>,
    /// One UV per vertex, `v` already flipped.
    pub uvs: Vec<Vec2>,
    /// Lightmap coordinates as stored; empty unless the mesh has a lightmap.
    pub lightmap_uvs: Vec<Vec2>,
    pub faces: Vec<[u16; 3]>,
}

impl MeshDef {
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Look up this mesh's material.
    pub fn resolve_material<'a>(&self, materials: &'a MaterialSet) -> Result<&'a MaterialDef> {
        materials
            .get(&self.material_name)
            .ok_or_else(|| Error::UnresolvedMaterialReference {
                mesh: self.name.clone(),
                material: self.material_name.clone(),
            })
    }
}

/// Convert a stored position to the target frame.
pub fn remap_position(stored: Vec3) -> Vec3 {
    Vec3::new(stored.z, stored.x, stored.y)
}

/// Inverse of [`remap_position`].
pub fn unmap_position(target: Vec3) -> Vec3 {
    Vec3::new(target.y, target.z, target.x)
}

/// Flip the texture-space vertical axis.
pub fn flip_uv(uv: Vec2) -> Vec2 {
    Vec2::new(uv.x, -uv.y)
}
