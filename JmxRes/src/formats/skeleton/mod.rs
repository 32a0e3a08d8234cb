//! `.bsk` skeleton files
//!
//! Bones are stored in dependency order: a bone's parent always appears
//! before it. Each record carries transforms relative to its parent and to
//! the model origin, followed by the names of its children.

mod hierarchy;
mod reader;
mod writer;

use glam::{Quat, Vec3};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use hierarchy::{apply_axis_correction, axis_correction, build_bind_pose};
pub use reader::{parse_skeleton, read_skeleton_file};
pub use writer::write_skeleton_file;

/// One bone record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneDef {
    pub name: String,
    /// Leading byte of the record; not interpreted.
    pub kind: u8,
    pub parent_name: Option<String>,
    pub rotation_to_parent: Quat,
    pub translation_to_parent: Vec3,
    pub rotation_to_origin: Quat,
    pub translation_to_origin: Vec3,
    pub rotation_local: Quat,
    pub translation_local: Vec3,
    pub children: Vec<String>,
    /// Bind-pose position in the target frame. Derived, not stored.
    #[serde(default)]
    pub bind_position: Vec3,
}

impl BoneDef {
    /// A bone with identity transforms and no relations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: 0,
            parent_name: None,
            rotation_to_parent: Quat::IDENTITY,
            translation_to_parent: Vec3::ZERO,
            rotation_to_origin: Quat::IDENTITY,
            translation_to_origin: Vec3::ZERO,
            rotation_local: Quat::IDENTITY,
            translation_local: Vec3::ZERO,
            children: Vec::new(),
            bind_position: Vec3::ZERO,
        }
    }
}

/// A decoded skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonDef {
    pub name: String,
    /// Bones keyed by name, in file order.
    pub bones: IndexMap<String, BoneDef>,
    /// The first bone in file order.
    pub root: String,
    /// Bone the resource attaches this skeleton to, if any.
    pub attach_bone: Option<String>,
}

impl SkeletonDef {
    pub fn bone(&self, name: &str) -> Option<&BoneDef> {
        self.bones.get(name)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
