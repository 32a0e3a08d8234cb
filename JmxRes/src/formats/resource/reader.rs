//! `.bsr` reading

use std::path::Path;

use super::{
    MaterialReference, MeshReference, ResourceDescriptor, ResourceFile, ResourceReferences, ResourceType,
    SectionOffsets, SkeletonReference,
};
use crate::error::{Error, Result};
use crate::formats::common::VersionTag;
use crate::formats::cursor::BinaryCursor;

/// Read and parse a resource file from disk.
pub fn read_resource_file<P: AsRef<Path>>(path: P) -> Result<ResourceFile> {
    let mut cursor = BinaryCursor::open(path)?;
    parse_resource_file(&mut cursor)
}

/// Parse the fixed header at the start of a resource file.
pub fn parse_resource_header(cursor: &mut BinaryCursor) -> Result<ResourceDescriptor> {
    cursor.seek(0);
    let version = VersionTag::read(cursor)?;

    let mut offsets = SectionOffsets {
        material: cursor.read_u32()?,
        mesh: cursor.read_u32()?,
        skeleton: cursor.read_u32()?,
        animation: cursor.read_u32()?,
        mesh_group: cursor.read_u32()?,
        animation_group: cursor.read_u32()?,
        sound_effect: cursor.read_u32()?,
        bounding_box: cursor.read_u32()?,
        reserved: [cursor.read_u32()?, cursor.read_u32()?],
        flags: [0; 5],
    };
    for flag in &mut offsets.flags {
        *flag = cursor.read_u32()?;
    }

    let code = cursor.read_u32()?;
    let resource_type = ResourceType::from_code(code).ok_or_else(|| Error::UnknownResourceType {
        path: cursor.path().to_path_buf(),
        code,
    })?;
    let name = cursor.read_string()?;

    tracing::debug!(
        "Resource {} ({}): '{}' type {}",
        cursor.path().display(),
        version,
        name,
        resource_type
    );

    Ok(ResourceDescriptor {
        version,
        offsets,
        resource_type,
        name,
    })
}

/// Parse the header and every section that names other files.
///
/// Sections are visited in the order skeleton, material, mesh, then the
/// two group sections, which are walked and discarded.
pub fn parse_resource_file(cursor: &mut BinaryCursor) -> Result<ResourceFile> {
    let descriptor = parse_resource_header(cursor)?;
    let offsets = descriptor.offsets;
    let file_len = cursor.len();
    let present = |offset: u32| SectionOffsets::is_present(offset, file_len);

    let mut references = ResourceReferences::default();

    if present(offsets.skeleton) {
        cursor.seek(u64::from(offsets.skeleton));
        references.skeleton = read_skeleton_reference(cursor)?;
    }

    if present(offsets.material) {
        cursor.seek(u64::from(offsets.material));
        references.materials = read_material_list(cursor)?;
    }

    if present(offsets.mesh) {
        cursor.seek(u64::from(offsets.mesh));
        references.meshes = read_mesh_list(cursor, offsets.mesh_entries_have_extra())?;
    }

    let mut mesh_group_count = 0;
    if present(offsets.mesh_group) {
        cursor.seek(u64::from(offsets.mesh_group));
        mesh_group_count = walk_group_section(cursor)?;
    }

    let mut animation_group_count = 0;
    if present(offsets.animation_group) {
        cursor.seek(u64::from(offsets.animation_group));
        animation_group_count = walk_group_section(cursor)?;
    }

    tracing::debug!(
        "Resource '{}': {} material files, {} meshes, skeleton: {}, {} mesh groups, {} animation groups",
        descriptor.name,
        references.materials.len(),
        references.meshes.len(),
        references.skeleton.is_some(),
        mesh_group_count,
        animation_group_count
    );

    Ok(ResourceFile {
        descriptor,
        references,
        mesh_group_count,
        animation_group_count,
    })
}

fn read_skeleton_reference(cursor: &mut BinaryCursor) -> Result<Option<SkeletonReference>> {
    if cursor.read_u32()? == 0 {
        return Ok(None);
    }
    let path = cursor.read_string()?;
    let attach_bone = cursor.read_string()?;
    Ok(Some(SkeletonReference {
        path,
        attach_bone: (!attach_bone.is_empty()).then_some(attach_bone),
    }))
}

fn read_material_list(cursor: &mut BinaryCursor) -> Result<Vec<MaterialReference>> {
    let (count, mut list) = cursor.read_count(8)?;
    for _ in 0..count {
        let id = cursor.read_u32()?;
        let path = cursor.read_string()?;
        list.push(MaterialReference { id, path });
    }
    Ok(list)
}

fn read_mesh_list(cursor: &mut BinaryCursor, with_extra: bool) -> Result<Vec<MeshReference>> {
    let (count, mut list) = cursor.read_count(4)?;
    for _ in 0..count {
        let path = cursor.read_string()?;
        let extra = if with_extra { Some(cursor.read_u32()?) } else { None };
        list.push(MeshReference { path, extra });
    }
    Ok(list)
}

/// Walk `count × { name; u32 n; n × u32 }` and return the group count.
fn walk_group_section(cursor: &mut BinaryCursor) -> Result<u32> {
    let count = cursor.read_u32()?;
    for _ in 0..count {
        let name = cursor.read_string()?;
        let entries = cursor.skip_count_block()?;
        tracing::trace!("Group '{}' ({} entries)", name, entries);
    }
    Ok(count)
}
