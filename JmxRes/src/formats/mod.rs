//! File format handlers for JMXV resource files
//!
//! Every file starts with a 12-byte version tag. Multi-byte values are
//! little-endian and strings are `u32`-length-prefixed code page 949 text.

pub mod common;
pub mod cursor;
pub mod material;
pub mod mesh;
pub mod resource;
pub mod skeleton;

// Re-export common types for convenience
pub use common::{FileKind, VersionTag};
pub use cursor::BinaryCursor;

// Re-export main definition types
pub use material::{MaterialDef, MaterialSet};
pub use mesh::MeshDef;
pub use resource::{DecodedResource, ResourceDescriptor, ResourceFile, ResourceType, decode_resource};
pub use skeleton::{BoneDef, SkeletonDef};
