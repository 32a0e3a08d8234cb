//! `.bms` reading

use std::path::Path;

use super::{MeshDef, MeshHeader, MeshOffsets, VERTEX_PADDING, flip_uv, remap_position};
use crate::error::{Error, Result};
use crate::formats::common::{VersionTag, section_present};
use crate::formats::cursor::BinaryCursor;

/// position + normal + uv + padding
const VERTEX_SIZE: usize = 12 + 12 + 8 + VERTEX_PADDING;
const LIGHTMAP_UV_SIZE: usize = 8;
const FACE_SIZE: usize = 6;

/// Read the mesh file at `path`, which was named inside `referenced_from`.
pub fn read_mesh_file(path: &Path, referenced_from: &Path) -> Result<MeshDef> {
    let mut cursor = BinaryCursor::open_referenced(path, referenced_from)?;
    parse_mesh(&mut cursor)
}

/// Parse the header at the start of a mesh file.
pub fn parse_mesh_header(cursor: &mut BinaryCursor) -> Result<MeshHeader> {
    cursor.seek(0);
    let version = VersionTag::read(cursor)?;

    let offsets = MeshOffsets {
        vertices: cursor.read_u32()?,
        bones: cursor.read_u32()?,
        faces: cursor.read_u32()?,
        unknown_0: cursor.read_u32()?,
        unknown_1: cursor.read_u32()?,
        bounding_box: cursor.read_u32()?,
        gates: cursor.read_u32()?,
        collision: cursor.read_u32()?,
        unknown_2: cursor.read_u32()?,
        unknown_3: cursor.read_u32()?,
    };

    let mut flags = [0u32; 5];
    for flag in &mut flags {
        *flag = cursor.read_u32()?;
    }

    let name = cursor.read_string()?;
    let material_name = cursor.read_string()?;
    let _unused = cursor.read_u32()?;

    tracing::debug!(
        "Mesh {} ({}): '{}' material '{}', offsets {:?}",
        cursor.path().display(),
        version,
        name,
        material_name,
        offsets
    );

    Ok(MeshHeader {
        offsets,
        flags,
        name,
        material_name,
    })
}

/// Parse a whole mesh file.
///
/// Face indices are validated against the vertex count. The material name
/// is returned unresolved; see [`MeshDef::resolve_material`].
pub fn parse_mesh(cursor: &mut BinaryCursor) -> Result<MeshDef> {
    let header = parse_mesh_header(cursor)?;
    let file_len = cursor.len();
    let offsets = header.offsets;

    let mut mesh = MeshDef {
        name: header.name.clone(),
        material_name: header.material_name.clone(),
        ..MeshDef::default()
    };

    if section_present(offsets.vertices, file_len) {
        cursor.seek(u64::from(offsets.vertices));
        read_vertices(cursor, &header, &mut mesh)?;
    }

    if section_present(offsets.faces, file_len) {
        cursor.seek(u64::from(offsets.faces));
        read_faces(cursor, &mut mesh)?;
    }

    for offset in [offsets.unknown_0, offsets.unknown_1] {
        if section_present(offset, file_len) {
            cursor.seek(u64::from(offset));
            let count = cursor.skip_count_block()?;
            tracing::trace!("Skipped unknown block at 0x{:X} ({} entries)", offset, count);
        }
    }

    tracing::debug!(
        "Mesh '{}': {} vertices, {} faces",
        mesh.name,
        mesh.vertices.len(),
        mesh.faces.len()
    );

    Ok(mesh)
}

fn read_vertices(cursor: &mut BinaryCursor, header: &MeshHeader, mesh: &mut MeshDef) -> Result<()> {
    let lightmap = header.has_lightmap();
    let record_size = if lightmap { VERTEX_SIZE + LIGHTMAP_UV_SIZE } else { VERTEX_SIZE };
    let (count, vertices) = cursor.read_count(record_size)?;
    mesh.vertices = vertices;
    mesh.uvs = Vec::with_capacity(mesh.vertices.capacity());
    if lightmap {
        mesh.lightmap_uvs = Vec::with_capacity(mesh.vertices.capacity());
    }

    for _ in 0..count {
        mesh.vertices.push(remap_position(cursor.read_vec3()?));
        let _normal = cursor.read_vec3()?;
        mesh.uvs.push(flip_uv(cursor.read_vec2()?));
        if lightmap {
            mesh.lightmap_uvs.push(cursor.read_vec2()?);
        }
        cursor.skip(VERTEX_PADDING)?;
    }
    Ok(())
}

fn read_faces(cursor: &mut BinaryCursor, mesh: &mut MeshDef) -> Result<()> {
    let vertex_count = mesh.vertices.len();
    let (count, faces) = cursor.read_count(FACE_SIZE)?;
    mesh.faces = faces;

    for face in 0..count {
        let indices = [cursor.read_u16()?, cursor.read_u16()?, cursor.read_u16()?];
        if let Some(&index) = indices.iter().find(|&&i| usize::from(i) >= vertex_count) {
            return Err(Error::MeshIndexOutOfRange {
                path: cursor.path().to_path_buf(),
                face,
                index,
                vertex_count,
            });
        }
        mesh.faces.push(indices);
    }
    Ok(())
}
