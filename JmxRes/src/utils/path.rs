//! Path utilities

use std::path::{Path, PathBuf};

/// Resolve a path stored inside a resource file against the data root.
///
/// Stored paths use backslashes and are relative to the client's `Data`
/// directory. Leading separators are ignored.
pub fn resolve_data_path<P: AsRef<Path>>(root: P, stored: &str) -> PathBuf {
    let normalized = stored.replace('\\', "/");
    let mut resolved = root.as_ref().to_path_buf();
    for component in normalized.split('/').filter(|c| !c.is_empty()) {
        resolved.push(component);
    }
    resolved
}

/// Replace the placeholder texture extension with the on-disk one.
///
/// Matches the client's own substring replacement, so the search is
/// case-sensitive and applies to every occurrence.
pub fn remap_texture_extension(name: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return name.to_string();
    }
    name.replace(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_backslash_path() {
        let resolved = resolve_data_path("/data", "res\\item\\sword.bms");
        assert_eq!(resolved, Path::new("/data/res/item/sword.bms"));
    }

    #[test]
    fn test_resolve_ignores_leading_separator() {
        let resolved = resolve_data_path("/data", "\\prim\\mtrl\\a.bmt");
        assert_eq!(resolved, Path::new("/data/prim/mtrl/a.bmt"));
    }

    #[test]
    fn test_remap_texture_extension() {
        assert_eq!(remap_texture_extension("hair.ddj", ".ddj", ".dds"), "hair.dds");
        assert_eq!(remap_texture_extension("HAIR.DDJ", ".ddj", ".dds"), "HAIR.DDJ");
        assert_eq!(remap_texture_extension("hair.ddj", "", ".dds"), "hair.ddj");
    }
}
