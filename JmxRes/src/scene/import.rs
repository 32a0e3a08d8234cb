//! Resource import driver

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use super::SceneSink;
use crate::config::ImportOptions;
use crate::error::{Error, Result};
use crate::formats::resource::{DecodedResource, ResourceType, SkippedMesh, decode_resource};

/// Summary of one import.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub name: String,
    pub resource_type: ResourceType,
    pub material_count: usize,
    pub mesh_count: usize,
    pub bone_count: usize,
    pub attach_bone: Option<String>,
    pub skipped_meshes: Vec<SkippedMesh>,
}

/// Decode the resource at `path` and declare everything it contains to `sink`.
///
/// # Errors
/// Any decode error (subject to [`ImportOptions::on_mesh_error`]) or the
/// first error returned by the sink.
pub fn import_resource<S: SceneSink>(path: &Path, options: &ImportOptions, sink: &mut S) -> Result<ImportReport> {
    let decoded = decode_resource(path, options)?;
    import_decoded(decoded, sink)
}

/// Declare an already decoded resource to `sink`.
///
/// The skeleton goes first, then every material, then each mesh bound to
/// the handle of its material.
pub fn import_decoded<S: SceneSink>(decoded: DecodedResource, sink: &mut S) -> Result<ImportReport> {
    let DecodedResource {
        path,
        file,
        skeleton,
        materials,
        meshes,
        skipped_meshes,
    } = decoded;

    let mut bone_count = 0;
    let mut attach_bone = None;
    if let Some(skeleton) = skeleton {
        bone_count = skeleton.len();
        attach_bone.clone_from(&skeleton.attach_bone);
        sink.declare_skeleton(skeleton)?;
    }

    let material_count = materials.len();
    let mut handles: HashMap<String, S::MaterialHandle> = HashMap::with_capacity(material_count);
    for material in materials {
        let name = material.name.clone();
        let handle = sink.declare_material(material)?;
        handles.insert(name, handle);
    }

    let mesh_count = meshes.len();
    for mesh in meshes {
        let Some(handle) = handles.get(&mesh.material_name) else {
            return Err(Error::UnresolvedMaterialReference {
                mesh: mesh.name,
                material: mesh.material_name,
            });
        };
        sink.declare_mesh(mesh, handle)?;
    }

    let descriptor = file.descriptor;
    tracing::info!(
        "Imported '{}' ({}) from {}: {} materials, {} meshes, {} bones, {} meshes skipped",
        descriptor.name,
        descriptor.resource_type,
        path.display(),
        material_count,
        mesh_count,
        bone_count,
        skipped_meshes.len()
    );

    Ok(ImportReport {
        name: descriptor.name,
        resource_type: descriptor.resource_type,
        material_count,
        mesh_count,
        bone_count,
        attach_bone,
        skipped_meshes,
    })
}
