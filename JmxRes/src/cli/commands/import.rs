//! CLI command for importing a resource

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::config::{ImportOptions, MeshErrorPolicy};
use crate::scene::{ImportReport, SceneCollector, import_resource};

/// Flags that override the options file.
#[derive(Debug, Default)]
pub struct ImportArgs {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub skip_bad_meshes: bool,
    pub serial: bool,
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct SceneExport<'a> {
    report: &'a ImportReport,
    scene: &'a SceneCollector,
}

/// Build the effective options: file values first, then command-line flags.
pub fn resolve_options(args: &ImportArgs) -> anyhow::Result<ImportOptions> {
    let mut options = match &args.config {
        Some(path) => ImportOptions::from_toml_file(path)?,
        None => ImportOptions::default(),
    };
    if let Some(root) = &args.root {
        options.data_root = Some(root.clone());
    }
    if args.skip_bad_meshes {
        options.on_mesh_error = MeshErrorPolicy::Skip;
    }
    if args.serial {
        options.parallel = false;
    }
    Ok(options)
}

pub fn execute(file: &Path, args: &ImportArgs) -> anyhow::Result<()> {
    let options = resolve_options(args)?;
    let mut scene = SceneCollector::new();
    let report = import_resource(file, &options, &mut scene)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!("Resource:  {} ({})", report.name, report.resource_type);
    println!("Materials: {}", report.material_count);
    println!("Meshes:    {}", report.mesh_count);
    if report.bone_count > 0 {
        match &report.attach_bone {
            Some(bone) => println!("Skeleton:  {} bones (attached to '{bone}')", report.bone_count),
            None => println!("Skeleton:  {} bones", report.bone_count),
        }
    }
    for skipped in &report.skipped_meshes {
        println!("Skipped:   {} ({})", skipped.path.display(), skipped.reason);
    }

    if let Some(output) = &args.output {
        let json = serde_json::to_string_pretty(&SceneExport {
            report: &report,
            scene: &scene,
        })?;
        std::fs::write(output, json).with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Wrote {}", output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("jmxres.toml");
        std::fs::write(&config, "data_root = \"/srv/silkroad/Data\"\non_mesh_error = \"abort\"\n").unwrap();

        let options = resolve_options(&ImportArgs {
            root: Some(PathBuf::from("/tmp/Data")),
            config: Some(config),
            skip_bad_meshes: true,
            serial: true,
            output: None,
        })
        .unwrap();
        assert_eq!(options.data_root, Some(PathBuf::from("/tmp/Data")));
        assert_eq!(options.on_mesh_error, MeshErrorPolicy::Skip);
        assert!(!options.parallel);
    }

    #[test]
    fn test_defaults_without_flags() {
        let options = resolve_options(&ImportArgs::default()).unwrap();
        assert_eq!(options.data_root, None);
        assert!(options.parallel);
    }
}
