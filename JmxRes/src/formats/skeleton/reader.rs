//! `.bsk` reading

use std::path::Path;

use indexmap::IndexMap;

use super::{BoneDef, SkeletonDef, build_bind_pose};
use crate::error::{Error, Result};
use crate::formats::common::VersionTag;
use crate::formats::cursor::BinaryCursor;

/// kind + two empty strings + 3 × (quat + vec3) + child count
const MIN_BONE_SIZE: usize = 1 + 4 + 4 + 3 * (16 + 12) + 4;

/// Read the skeleton file at `path`, which was named inside `referenced_from`.
pub fn read_skeleton_file(path: &Path, referenced_from: &Path) -> Result<SkeletonDef> {
    let mut cursor = BinaryCursor::open_referenced(path, referenced_from)?;
    parse_skeleton(&mut cursor)
}

/// Parse a skeleton file and reconstruct its bind pose.
///
/// The skeleton is named after the file stem.
pub fn parse_skeleton(cursor: &mut BinaryCursor) -> Result<SkeletonDef> {
    cursor.seek(0);
    let version = VersionTag::read(cursor)?;
    let path = cursor.path().to_path_buf();
    let count = cursor.read_u32()? as usize;
    tracing::debug!("Skeleton {} ({}): {} bones", path.display(), version, count);

    let fits = cursor.remaining() as usize / MIN_BONE_SIZE;
    let mut bones: IndexMap<String, BoneDef> = IndexMap::with_capacity(count.min(fits));
    for _ in 0..count {
        let bone = read_bone(cursor)?;
        if let Some(parent) = &bone.parent_name {
            if !bones.contains_key(parent) {
                return Err(Error::malformed(
                    &path,
                    format!("bone '{}' names parent '{parent}' before it is defined", bone.name),
                ));
            }
        }
        if bones.contains_key(&bone.name) {
            return Err(Error::malformed(&path, format!("bone '{}' is defined twice", bone.name)));
        }
        bones.insert(bone.name.clone(), bone);
    }

    // Two trailing count blocks close the file.
    for _ in 0..2 {
        cursor.skip_count_block()?;
    }

    let Some(root) = bones.keys().next().cloned() else {
        return Err(Error::malformed(&path, "skeleton has no bones"));
    };
    build_bind_pose(&mut bones, &root, &path)?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(SkeletonDef {
        name,
        bones,
        root,
        attach_bone: None,
    })
}

fn read_bone(cursor: &mut BinaryCursor) -> Result<BoneDef> {
    let kind = cursor.read_u8()?;
    let name = cursor.read_string()?;
    let parent = cursor.read_string()?;
    let rotation_to_parent = cursor.read_quat()?;
    let translation_to_parent = cursor.read_vec3()?;
    let rotation_to_origin = cursor.read_quat()?;
    let translation_to_origin = cursor.read_vec3()?;
    let rotation_local = cursor.read_quat()?;
    let translation_local = cursor.read_vec3()?;

    let (child_count, mut children) = cursor.read_count(4)?;
    for _ in 0..child_count {
        children.push(cursor.read_string()?);
    }

    Ok(BoneDef {
        name,
        kind,
        parent_name: (!parent.is_empty()).then_some(parent),
        rotation_to_parent,
        translation_to_parent,
        rotation_to_origin,
        translation_to_origin,
        rotation_local,
        translation_local,
        children,
        bind_position: glam::Vec3::ZERO,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::formats::skeleton::{apply_axis_correction, write_skeleton_file};
    use glam::{Quat, Vec3};
    use pretty_assertions::assert_eq;

    fn bone(name: &str, parent: Option<&str>, children: &[&str], origin: Vec3) -> BoneDef {
        let mut b = BoneDef::new(name);
        b.parent_name = parent.map(str::to_string);
        b.children = children.iter().map(|c| (*c).to_string()).collect();
        b.translation_to_origin = origin;
        b.rotation_to_origin = Quat::from_xyzw(0.0, 0.7071068, 0.0, 0.7071068);
        b.translation_to_parent = origin * 0.5;
        b.kind = 1;
        b
    }

    fn three_bones() -> Vec<BoneDef> {
        vec![
            bone("root", None, &["child1"], Vec3::new(0.0, 1.0, 0.0)),
            bone("child1", Some("root"), &["child2"], Vec3::new(0.0, 2.0, 0.5)),
            bone("child2", Some("child1"), &[], Vec3::new(0.25, 3.0, 0.5)),
        ]
    }

    fn parse(bytes: Vec<u8>) -> Result<SkeletonDef> {
        parse_skeleton(&mut BinaryCursor::new(bytes, "/data/res/char/man.bsk"))
    }

    #[test]
    fn test_three_bone_chain() {
        let skeleton = parse(write_skeleton_file(&three_bones()).unwrap()).unwrap();
        assert_eq!(skeleton.name, "man");
        assert_eq!(skeleton.root, "root");
        assert_eq!(skeleton.len(), 3);
        assert_eq!(skeleton.bones["child2"].parent_name.as_deref(), Some("child1"));
        assert_eq!(skeleton.bones["root"].parent_name, None);
        assert_eq!(skeleton.bones["child1"].children, vec!["child2".to_string()]);
    }

    #[test]
    fn test_roundtrip_preserves_records() {
        let source = three_bones();
        let skeleton = parse(write_skeleton_file(&source).unwrap()).unwrap();
        for (expected, decoded) in source.iter().zip(skeleton.bones.values()) {
            let mut decoded = decoded.clone();
            assert_eq!(decoded.bind_position, apply_axis_correction(expected.translation_to_origin));
            decoded.bind_position = expected.bind_position;
            assert_eq!(&decoded, expected);
        }
    }

    #[test]
    fn test_parent_must_precede_child() {
        let mut bones = three_bones();
        bones.swap(1, 2);
        let err = parse(write_skeleton_file(&bones).unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedHierarchy);
    }

    #[test]
    fn test_duplicate_bone_name() {
        let mut bones = three_bones();
        bones.push(bone("child2", Some("root"), &[], Vec3::ZERO));
        let err = parse(write_skeleton_file(&bones).unwrap()).unwrap_err();
        assert!(err.to_string().contains("defined twice"));
    }

    #[test]
    fn test_empty_skeleton() {
        let err = parse(write_skeleton_file(&[]).unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedHierarchy);
    }

    #[test]
    fn test_missing_trailing_blocks() {
        let mut bytes = write_skeleton_file(&three_bones()).unwrap();
        bytes.truncate(bytes.len() - 4);
        assert_eq!(parse(bytes).unwrap_err().kind(), ErrorKind::TruncatedInput);
    }
}
