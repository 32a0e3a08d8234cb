//! # JmxRes
//!
//! A pure-Rust decoder for JMXV game resource files.
//!
//! ## Supported Formats
//!
//! - **BSR** - Resource descriptors naming a model's files
//! - **BMT** - Material tables
//! - **BMS** - Meshes (positions, UVs, lightmap UVs, triangles)
//! - **BSK** - Skeletons with bind-pose reconstruction
//!
//! ## Quick Start
//!
//! ### Importing a Resource
//!
//! ```no_run
//! use jmxres::config::ImportOptions;
//! use jmxres::scene::{SceneCollector, import_resource};
//! use std::path::Path;
//!
//! let options = ImportOptions {
//!     data_root: Some("Data".into()),
//!     ..ImportOptions::default()
//! };
//! let mut scene = SceneCollector::new();
//! let report = import_resource(Path::new("Data/res/item/sword.bsr"), &options, &mut scene)?;
//! println!("{} meshes, {} materials", report.mesh_count, report.material_count);
//! # Ok::<(), jmxres::Error>(())
//! ```
//!
//! ### Reading a Single File
//!
//! ```no_run
//! use jmxres::formats::mesh::read_mesh_file;
//! use std::path::Path;
//!
//! let mesh = read_mesh_file(Path::new("Data/prim/mesh/item/sword.bms"), Path::new("sword.bsr"))?;
//! println!("{} triangles", mesh.triangle_count());
//! # Ok::<(), jmxres::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `jmxres` command-line binary

pub mod config;
pub mod error;
pub mod formats;
pub mod scene;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{ImportOptions, MeshErrorPolicy};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::formats::{
        BoneDef, DecodedResource, FileKind, MaterialDef, MaterialSet, MeshDef, ResourceDescriptor, ResourceType,
        SkeletonDef, decode_resource,
    };
    pub use crate::scene::{ImportReport, SceneCollector, SceneSink, import_resource};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
