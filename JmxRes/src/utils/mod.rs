//! Utility functions

pub mod path;

pub use path::{remap_texture_extension, resolve_data_path};
