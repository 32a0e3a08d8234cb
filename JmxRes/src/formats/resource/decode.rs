//! Resource decoding: the descriptor plus every file it references
//!
//! The skeleton and material files are independent of each other and are
//! decoded side by side; mesh files are decoded in parallel once the
//! material set is known, since a mesh is only accepted if its material
//! resolves.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use super::{MaterialReference, MeshReference, ResourceFile, SkeletonReference, read_resource_file};
use crate::config::{ImportOptions, MeshErrorPolicy};
use crate::error::{Error, Result};
use crate::formats::material::{MaterialContext, MaterialSet, read_material_file};
use crate::formats::mesh::{MeshDef, read_mesh_file};
use crate::formats::skeleton::{SkeletonDef, read_skeleton_file};
use crate::utils::path::resolve_data_path;

/// A mesh left out under [`MeshErrorPolicy::Skip`].
#[derive(Debug, Serialize)]
pub struct SkippedMesh {
    /// Resolved path of the mesh file.
    pub path: PathBuf,
    /// Rendered error.
    pub reason: String,
    #[serde(skip)]
    pub error: Error,
}

/// A resource with all of its referenced files decoded.
#[derive(Debug)]
pub struct DecodedResource {
    pub path: PathBuf,
    pub file: ResourceFile,
    pub skeleton: Option<SkeletonDef>,
    pub materials: MaterialSet,
    /// Meshes in mesh-list order, each with a resolvable material.
    pub meshes: Vec<MeshDef>,
    pub skipped_meshes: Vec<SkippedMesh>,
}

/// Decode the resource at `path` and every file it names.
///
/// Stored paths are resolved against [`ImportOptions::root_for`]. Any
/// failure outside a mesh file aborts; a failing mesh aborts or is skipped
/// according to [`ImportOptions::on_mesh_error`].
///
/// # Errors
/// Returns the first error from the descriptor, skeleton or material files,
/// or from a mesh file under [`MeshErrorPolicy::Abort`].
pub fn decode_resource(path: &Path, options: &ImportOptions) -> Result<DecodedResource> {
    let file = read_resource_file(path)?;
    let root = options.root_for(path);
    let context = MaterialContext {
        data_root: &root,
        extension: &options.texture_extension,
    };

    let refs = &file.references;
    let (skeleton, materials) = if options.parallel {
        rayon::join(
            || decode_skeleton(refs.skeleton.as_ref(), &root, path),
            || decode_materials(&refs.materials, &root, path, context),
        )
    } else {
        (
            decode_skeleton(refs.skeleton.as_ref(), &root, path),
            decode_materials(&refs.materials, &root, path, context),
        )
    };
    let skeleton = skeleton?;
    let materials = materials?;

    let decode_one = |mesh: &MeshReference| {
        let mesh_path = resolve_data_path(&root, &mesh.path);
        let decoded = read_mesh_file(&mesh_path, path).and_then(|def| {
            def.resolve_material(&materials)?;
            Ok(def)
        });
        (mesh_path, decoded)
    };
    let results: Vec<(PathBuf, Result<MeshDef>)> = if options.parallel {
        refs.meshes.par_iter().map(decode_one).collect()
    } else {
        refs.meshes.iter().map(decode_one).collect()
    };

    let mut meshes = Vec::with_capacity(results.len());
    let mut skipped_meshes = Vec::new();
    for (mesh_path, result) in results {
        match (result, options.on_mesh_error) {
            (Ok(mesh), _) => meshes.push(mesh),
            (Err(e), MeshErrorPolicy::Abort) => return Err(e),
            (Err(e), MeshErrorPolicy::Skip) => {
                tracing::warn!("Skipping mesh {}: {}", mesh_path.display(), e);
                skipped_meshes.push(SkippedMesh {
                    path: mesh_path,
                    reason: e.to_string(),
                    error: e,
                });
            }
        }
    }

    tracing::debug!(
        "Decoded '{}': {} materials, {} meshes ({} skipped), {} bones",
        file.descriptor.name,
        materials.len(),
        meshes.len(),
        skipped_meshes.len(),
        skeleton.as_ref().map_or(0, SkeletonDef::len)
    );

    Ok(DecodedResource {
        path: path.to_path_buf(),
        file,
        skeleton,
        materials,
        meshes,
        skipped_meshes,
    })
}

fn decode_skeleton(
    reference: Option<&SkeletonReference>,
    root: &Path,
    referenced_from: &Path,
) -> Result<Option<SkeletonDef>> {
    let Some(reference) = reference else {
        return Ok(None);
    };
    let mut skeleton = read_skeleton_file(&resolve_data_path(root, &reference.path), referenced_from)?;
    skeleton.attach_bone.clone_from(&reference.attach_bone);
    Ok(Some(skeleton))
}

/// Merge every listed material table, later definitions replacing earlier ones.
fn decode_materials(
    references: &[MaterialReference],
    root: &Path,
    referenced_from: &Path,
    context: MaterialContext<'_>,
) -> Result<MaterialSet> {
    let mut set = MaterialSet::new();
    for reference in references {
        let table = read_material_file(&resolve_data_path(root, &reference.path), referenced_from, context)?;
        set.extend(table);
    }
    Ok(set)
}
