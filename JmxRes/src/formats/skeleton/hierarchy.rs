//! Bind pose reconstruction
//!
//! "Translation to origin" is stored bind-pose absolute, so every bone's
//! position is taken from its own record while the traversal walks the
//! tree. The traversal is what checks that the tree is well formed.

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use glam::{Mat3, Vec3};
use indexmap::IndexMap;

use super::BoneDef;
use crate::error::{Error, Result};

/// Rotate 90° about X, then 90° about Y, then mirror X.
pub fn axis_correction() -> Mat3 {
    Mat3::from_diagonal(Vec3::new(-1.0, 1.0, 1.0))
        * Mat3::from_rotation_y(FRAC_PI_2)
        * Mat3::from_rotation_x(FRAC_PI_2)
}

/// Map a bind position from the stored frame to the target frame.
pub fn apply_axis_correction(position: Vec3) -> Vec3 {
    axis_correction() * position
}

/// Compute `bind_position` for every bone reachable from `root`.
///
/// Visits bones in pre-order following each bone's `children` list. Fails
/// with [`Error::MalformedHierarchy`] if a child is unknown, names a
/// different parent, is reached twice, or if any bone is never reached.
pub fn build_bind_pose(bones: &mut IndexMap<String, BoneDef>, root: &str, path: &Path) -> Result<()> {
    let mut positions: Vec<(String, Vec3)> = Vec::with_capacity(bones.len());
    let mut visited: HashSet<&str> = HashSet::with_capacity(bones.len());

    let Some(root_bone) = bones.get(root) else {
        return Err(Error::malformed(path, format!("root bone '{root}' does not exist")));
    };
    let mut stack: Vec<&BoneDef> = vec![root_bone];

    while let Some(bone) = stack.pop() {
        if !visited.insert(bone.name.as_str()) {
            return Err(Error::malformed(path, format!("bone '{}' is reached twice", bone.name)));
        }
        positions.push((bone.name.clone(), bone.translation_to_origin));

        // Push children in reverse so the first child is visited first
        for child_name in bone.children.iter().rev() {
            let Some(child) = bones.get(child_name) else {
                return Err(Error::malformed(
                    path,
                    format!("bone '{}' lists unknown child '{child_name}'", bone.name),
                ));
            };
            if child.parent_name.as_deref() != Some(bone.name.as_str()) {
                return Err(Error::malformed(
                    path,
                    format!("bone '{child_name}' is listed under '{}' but names a different parent", bone.name),
                ));
            }
            stack.push(child);
        }
    }

    if visited.len() != bones.len() {
        let orphan = bones
            .keys()
            .find(|name| !visited.contains(name.as_str()))
            .cloned()
            .unwrap_or_default();
        return Err(Error::malformed(path, format!("bone '{orphan}' is not reachable from '{root}'")));
    }

    let correction = axis_correction();
    for (name, position) in positions {
        if let Some(bone) = bones.get_mut(&name) {
            bone.bind_position = correction * position;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    fn chain() -> IndexMap<String, BoneDef> {
        let mut root = BoneDef::new("root");
        root.children = vec!["child1".to_string()];
        root.translation_to_origin = Vec3::new(1.0, 2.0, 3.0);

        let mut child1 = BoneDef::new("child1");
        child1.parent_name = Some("root".to_string());
        child1.children = vec!["child2".to_string()];
        child1.translation_to_parent = Vec3::new(10.0, 0.0, 0.0);
        child1.translation_to_origin = Vec3::new(0.0, 1.0, 0.0);

        let mut child2 = BoneDef::new("child2");
        child2.parent_name = Some("child1".to_string());
        child2.translation_to_origin = Vec3::new(0.0, 0.0, 4.0);

        [root, child1, child2]
            .into_iter()
            .map(|b| (b.name.clone(), b))
            .collect()
    }

    #[test]
    fn test_axis_correction_maps_axes() {
        assert!(approx(apply_axis_correction(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(-2.0, -3.0, -1.0)));
        assert!(approx(apply_axis_correction(Vec3::X), Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_axis_correction_is_deterministic() {
        let saved = vec![Vec3::new(0.5, -7.0, 2.25), Vec3::ZERO, Vec3::splat(-1.0)];
        let first: Vec<Vec3> = saved.iter().map(|&p| apply_axis_correction(p)).collect();
        let second: Vec<Vec3> = saved.iter().map(|&p| apply_axis_correction(p)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bind_positions_come_from_translation_to_origin() {
        let mut bones = chain();
        build_bind_pose(&mut bones, "root", Path::new("t.bsk")).unwrap();
        assert!(approx(bones["root"].bind_position, Vec3::new(-2.0, -3.0, -1.0)));
        // Parent offsets are not accumulated.
        assert!(approx(bones["child1"].bind_position, Vec3::new(-1.0, 0.0, 0.0)));
        assert!(approx(bones["child2"].bind_position, Vec3::new(0.0, -4.0, 0.0)));
    }

    #[test]
    fn test_unreachable_bone() {
        let mut bones = chain();
        bones.get_mut("child1").unwrap().children.clear();
        let err = build_bind_pose(&mut bones, "root", Path::new("t.bsk")).unwrap_err();
        assert!(err.to_string().contains("child2"));
    }

    #[test]
    fn test_child_with_wrong_parent() {
        let mut bones = chain();
        bones.get_mut("root").unwrap().children.push("child2".to_string());
        assert!(matches!(
            build_bind_pose(&mut bones, "root", Path::new("t.bsk")),
            Err(Error::MalformedHierarchy { .. })
        ));
    }

    #[test]
    fn test_child_listed_twice() {
        let mut bones = chain();
        bones.get_mut("root").unwrap().children.push("child1".to_string());
        let err = build_bind_pose(&mut bones, "root", Path::new("t.bsk")).unwrap_err();
        assert!(err.to_string().contains("reached twice"));
    }

    #[test]
    fn test_unknown_child() {
        let mut bones = chain();
        bones.get_mut("child2").unwrap().children.push("ghost".to_string());
        let err = build_bind_pose(&mut bones, "root", Path::new("t.bsk")).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
