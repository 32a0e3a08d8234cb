//! `.bsr` writing

use serde::{Deserialize, Serialize};

use super::{ResourceReferences, ResourceType};
use crate::error::Result;
use crate::formats::common::{JmxWriter, RESOURCE_TAG};

/// Header slots, in file order.
const SLOT_MATERIAL: u32 = 0;
const SLOT_MESH: u32 = 1;
const SLOT_SKELETON: u32 = 2;
const SLOT_MESH_GROUP: u32 = 4;
const SLOT_ANIMATION_GROUP: u32 = 5;
const OFFSET_SLOTS: u32 = 10;

/// A named list of indices, as stored in the group sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    pub indices: Vec<u32>,
}

/// Input to [`write_resource_file`].
#[derive(Debug, Clone, Copy)]
pub struct ResourceLayout<'a> {
    pub name: &'a str,
    pub resource_type: ResourceType,
    /// Header flags; `flags[0] == 1` makes every mesh entry carry its extra value.
    pub flags: [u32; 5],
    pub references: &'a ResourceReferences,
    pub mesh_groups: &'a [GroupDef],
    pub animation_groups: &'a [GroupDef],
}

/// Serialize a resource descriptor.
///
/// Section offsets are computed. Empty sections get offset 0, except the
/// material and mesh lists which are always written.
pub fn write_resource_file(layout: &ResourceLayout<'_>) -> Result<Vec<u8>> {
    let mut w = JmxWriter::new();
    w.write_tag(RESOURCE_TAG);

    let table = w.position();
    for _ in 0..OFFSET_SLOTS {
        w.write_u32(0)?;
    }
    let slot = |index: u32| table + index * 4;
    for flag in layout.flags {
        w.write_u32(flag)?;
    }
    w.write_u32(layout.resource_type.code())?;
    w.write_string(layout.name)?;

    let refs = layout.references;

    w.patch_u32(slot(SLOT_MATERIAL), w.position());
    w.write_u32(refs.materials.len() as u32)?;
    for material in &refs.materials {
        w.write_u32(material.id)?;
        w.write_string(&material.path)?;
    }

    let with_extra = layout.flags[0] == 1;
    w.patch_u32(slot(SLOT_MESH), w.position());
    w.write_u32(refs.meshes.len() as u32)?;
    for mesh in &refs.meshes {
        w.write_string(&mesh.path)?;
        if with_extra {
            w.write_u32(mesh.extra.unwrap_or_default())?;
        }
    }

    if let Some(skeleton) = &refs.skeleton {
        w.patch_u32(slot(SLOT_SKELETON), w.position());
        w.write_u32(1)?;
        w.write_string(&skeleton.path)?;
        w.write_string(skeleton.attach_bone.as_deref().unwrap_or_default())?;
    }

    for (index, groups) in [
        (SLOT_MESH_GROUP, layout.mesh_groups),
        (SLOT_ANIMATION_GROUP, layout.animation_groups),
    ] {
        if groups.is_empty() {
            continue;
        }
        w.patch_u32(slot(index), w.position());
        w.write_u32(groups.len() as u32)?;
        for group in groups {
            w.write_string(&group.name)?;
            w.write_count_block(&group.indices)?;
        }
    }

    Ok(w.into_bytes())
}
