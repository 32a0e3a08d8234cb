//! `.bsr` resource descriptors
//!
//! The resource file is the entry point of a model: a header of absolute
//! section offsets followed by sections that name the material, mesh and
//! skeleton files making up the model. Paths are relative to the client's
//! data root.

mod decode;
mod reader;
mod writer;

use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::{VersionTag, section_present};

pub use decode::{DecodedResource, SkippedMesh, decode_resource};
pub use reader::{parse_resource_file, parse_resource_header, read_resource_file};
pub use writer::{GroupDef, ResourceLayout, write_resource_file};

/// Section offsets and flags from the resource header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOffsets {
    pub material: u32,
    pub mesh: u32,
    pub skeleton: u32,
    pub animation: u32,
    pub mesh_group: u32,
    pub animation_group: u32,
    pub sound_effect: u32,
    pub bounding_box: u32,
    pub reserved: [u32; 2],
    pub flags: [u32; 5],
}

impl SectionOffsets {
    /// Mesh list entries carry an extra `u32`.
    pub fn mesh_entries_have_extra(&self) -> bool {
        self.flags[0] == 1
    }

    /// Whether `offset` names a section inside a file of `file_len` bytes.
    pub fn is_present(offset: u32, file_len: u64) -> bool {
        section_present(offset, file_len)
    }
}

/// Model category stored in the resource header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Character,
    Npc,
    Building,
    Artifact,
    Nature,
    Item,
    Other,
    CompoundCharacter,
    CompoundObject,
}

impl ResourceType {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0x20000 => Some(Self::Character),
            0x20001 => Some(Self::Npc),
            0x20002 => Some(Self::Building),
            0x20003 => Some(Self::Artifact),
            0x20004 => Some(Self::Nature),
            0x20005 => Some(Self::Item),
            0x20006 => Some(Self::Other),
            0x30000 => Some(Self::CompoundCharacter),
            0x30002 => Some(Self::CompoundObject),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Character => 0x20000,
            Self::Npc => 0x20001,
            Self::Building => 0x20002,
            Self::Artifact => 0x20003,
            Self::Nature => 0x20004,
            Self::Item => 0x20005,
            Self::Other => 0x20006,
            Self::CompoundCharacter => 0x30000,
            Self::CompoundObject => 0x30002,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Character => "Character",
            Self::Npc => "NPC",
            Self::Building => "Building",
            Self::Artifact => "Artifact",
            Self::Nature => "Nature",
            Self::Item => "Item",
            Self::Other => "Other",
            Self::CompoundCharacter => "CompoundCharacter",
            Self::CompoundObject => "CompoundObject",
        };
        f.write_str(name)
    }
}

/// The decoded resource header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDescriptor {
    pub version: VersionTag,
    pub offsets: SectionOffsets,
    pub resource_type: ResourceType,
    pub name: String,
}

/// Entry of the material list section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialReference {
    pub id: u32,
    pub path: String,
}

/// Entry of the mesh list section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshReference {
    pub path: String,
    /// Present when the header's first flag is set.
    pub extra: Option<u32>,
}

/// Content of the skeleton section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonReference {
    pub path: String,
    pub attach_bone: Option<String>,
}

/// Everything a resource file names, before any referenced file is opened.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceReferences {
    pub materials: Vec<MaterialReference>,
    pub meshes: Vec<MeshReference>,
    pub skeleton: Option<SkeletonReference>,
}

/// A parsed resource file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceFile {
    pub descriptor: ResourceDescriptor,
    pub references: ResourceReferences,
    /// Number of entries walked in the mesh-group section.
    pub mesh_group_count: u32,
    /// Number of entries walked in the animation-group section.
    pub animation_group_count: u32,
}
