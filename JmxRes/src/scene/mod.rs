//! Hand-off of decoded entities to a host scene
//!
//! Decoders never create host objects. [`import_resource`] decodes a
//! resource and feeds the result to a [`SceneSink`], which owns every
//! host-specific step. [`SceneCollector`] is a sink that simply keeps what
//! it is given.

mod collector;
mod import;

pub use collector::{CollectedMesh, SceneCollector};
pub use import::{ImportReport, import_decoded, import_resource};

use crate::error::Result;
use crate::formats::material::MaterialDef;
use crate::formats::mesh::MeshDef;
use crate::formats::skeleton::SkeletonDef;

/// Receiver of decoded entities, implemented by the host.
///
/// The import driver declares the skeleton first, then every material, then
/// each mesh together with the handle of the material it names. Errors are
/// reported as [`Error::SceneSink`](crate::Error::SceneSink) and abort the
/// import.
pub trait SceneSink {
    type MaterialHandle;
    type MeshHandle;
    type SkeletonHandle;

    fn declare_material(&mut self, material: MaterialDef) -> Result<Self::MaterialHandle>;

    fn declare_mesh(&mut self, mesh: MeshDef, material: &Self::MaterialHandle) -> Result<Self::MeshHandle>;

    fn declare_skeleton(&mut self, skeleton: SkeletonDef) -> Result<Self::SkeletonHandle>;
}
