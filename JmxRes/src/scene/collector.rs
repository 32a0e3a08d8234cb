//! In-memory scene sink

use serde::Serialize;

use super::SceneSink;
use crate::error::{Error, Result};
use crate::formats::material::MaterialDef;
use crate::formats::mesh::MeshDef;
use crate::formats::skeleton::SkeletonDef;

/// A mesh together with the index of its material in [`SceneCollector::materials`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedMesh {
    pub mesh: MeshDef,
    pub material: usize,
}

/// Sink that stores every declared entity; handles are indices.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneCollector {
    pub materials: Vec<MaterialDef>,
    pub meshes: Vec<CollectedMesh>,
    pub skeletons: Vec<SkeletonDef>,
}

impl SceneCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Material bound to the mesh at `index`.
    pub fn material_of(&self, index: usize) -> Option<&MaterialDef> {
        self.meshes
            .get(index)
            .and_then(|m| self.materials.get(m.material))
    }
}

impl SceneSink for SceneCollector {
    type MaterialHandle = usize;
    type MeshHandle = usize;
    type SkeletonHandle = usize;

    fn declare_material(&mut self, material: MaterialDef) -> Result<usize> {
        self.materials.push(material);
        Ok(self.materials.len() - 1)
    }

    fn declare_mesh(&mut self, mesh: MeshDef, material: &usize) -> Result<usize> {
        if *material >= self.materials.len() {
            return Err(Error::SceneSink(format!(
                "mesh '{}' bound to unknown material handle {material}",
                mesh.name
            )));
        }
        self.meshes.push(CollectedMesh {
            mesh,
            material: *material,
        });
        Ok(self.meshes.len() - 1)
    }

    fn declare_skeleton(&mut self, skeleton: SkeletonDef) -> Result<usize> {
        self.skeletons.push(skeleton);
        Ok(self.skeletons.len() - 1)
    }
}
