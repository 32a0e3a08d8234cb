use glam::{Quat, Vec2, Vec3};
use jmxres::formats::material::write_material_file;
use jmxres::formats::mesh::write_mesh_file;
use jmxres::formats::resource::{
    MaterialReference, MeshReference, ResourceLayout, ResourceReferences, SkeletonReference, write_resource_file,
};
use jmxres::formats::skeleton::{apply_axis_correction, write_skeleton_file};
use jmxres::prelude::*;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// A data root populated with files written by the crate's own writers.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self { dir: tempdir().unwrap() }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn write_resource(&self, resource_type: ResourceType, references: &ResourceReferences) -> PathBuf {
        let bytes = write_resource_file(&ResourceLayout {
            name: "TEST_RESOURCE",
            resource_type,
            flags: [0; 5],
            references,
            mesh_groups: &[],
            animation_groups: &[],
        })
        .unwrap();
        self.write("res/test.bsr", &bytes)
    }

    fn options(&self) -> ImportOptions {
        ImportOptions {
            data_root: Some(self.root().to_path_buf()),
            ..ImportOptions::default()
        }
    }
}

fn blade(specular_power: f32) -> MaterialDef {
    MaterialDef {
        name: "blade".to_string(),
        specular_power,
        texture_path: "sword_01.ddj".to_string(),
        texture_scale: 1.0,
        same_directory: true,
        ..MaterialDef::default()
    }
}

fn triangle(name: &str, material: &str) -> MeshDef {
    MeshDef {
        name: name.to_string(),
        material_name: material.to_string(),
        vertices: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.5)],
        uvs: vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, -0.25), Vec2::new(0.5, -1.0)],
        lightmap_uvs: Vec::new(),
        faces: vec![[0, 1, 2]],
    }
}

fn mesh_ref(path: &str) -> MeshReference {
    MeshReference {
        path: path.to_string(),
        extra: None,
    }
}

/// Material table plus one mesh per name, all referenced from the resource.
fn item_fixture(meshes: &[(&str, MeshDef)]) -> (Fixture, PathBuf) {
    let fixture = Fixture::new();
    fixture.write("prim/mtrl/item/sword.bmt", &write_material_file(&[blade(32.0)]).unwrap());
    for (path, mesh) in meshes {
        fixture.write(&path.replace('\\', "/"), &write_mesh_file(mesh).unwrap());
    }
    let references = ResourceReferences {
        materials: vec![MaterialReference {
            id: 0,
            path: "prim\\mtrl\\item\\sword.bmt".to_string(),
        }],
        meshes: meshes.iter().map(|(path, _)| mesh_ref(path)).collect(),
        skeleton: None,
    };
    let resource = fixture.write_resource(ResourceType::Item, &references);
    (fixture, resource)
}

fn chain_bone(name: &str, parent: Option<&str>, child: Option<&str>, origin: Vec3) -> BoneDef {
    let mut bone = BoneDef::new(name);
    bone.parent_name = parent.map(str::to_string);
    bone.children = child.into_iter().map(str::to_string).collect();
    bone.translation_to_origin = origin;
    bone.rotation_to_parent = Quat::from_rotation_z(0.5);
    bone
}

#[test]
fn test_import_item_resource() {
    let mesh = triangle("sword", "blade");
    let (fixture, resource) = item_fixture(&[("prim\\mesh\\item\\sword.bms", mesh.clone())]);

    let mut scene = SceneCollector::new();
    let report = import_resource(&resource, &fixture.options(), &mut scene).unwrap();

    assert_eq!(report.name, "TEST_RESOURCE");
    assert_eq!(report.resource_type, ResourceType::Item);
    assert_eq!(report.material_count, 1);
    assert_eq!(report.mesh_count, 1);
    assert_eq!(report.bone_count, 0);
    assert!(report.skipped_meshes.is_empty());

    assert_eq!(scene.meshes.len(), 1);
    assert_eq!(scene.meshes[0].mesh, mesh);
    assert_eq!(scene.meshes[0].mesh.faces, vec![[0, 1, 2]]);

    let material = scene.material_of(0).unwrap();
    assert_eq!(material.name, "blade");
    assert_eq!(
        material.texture_file,
        fixture.root().join("prim").join("mtrl").join("item").join("sword_01.dds")
    );
    assert!(scene.skeletons.is_empty());
}

#[test]
fn test_mesh_invariants_hold_after_import() {
    let (fixture, resource) = item_fixture(&[
        ("prim\\mesh\\item\\sword.bms", triangle("sword", "blade")),
        ("prim\\mesh\\item\\guard.bms", triangle("guard", "blade")),
    ]);

    let mut scene = SceneCollector::new();
    import_resource(&resource, &fixture.options(), &mut scene).unwrap();

    let names: Vec<&str> = scene.meshes.iter().map(|m| m.mesh.name.as_str()).collect();
    assert_eq!(names, vec!["sword", "guard"]);
    for collected in &scene.meshes {
        let mesh = &collected.mesh;
        assert_eq!(mesh.uvs.len(), mesh.vertices.len());
        assert!(mesh.faces.iter().flatten().all(|&i| usize::from(i) < mesh.vertices.len()));
    }
}

#[test]
fn test_import_skeleton_chain() {
    let fixture = Fixture::new();
    let bones = [
        chain_bone("root", None, Some("child1"), Vec3::new(0.0, 1.0, 0.0)),
        chain_bone("child1", Some("root"), Some("child2"), Vec3::new(0.0, 2.0, 0.0)),
        chain_bone("child2", Some("child1"), None, Vec3::new(0.0, 3.0, 1.0)),
    ];
    fixture.write("prim/skel/char/man.bsk", &write_skeleton_file(&bones).unwrap());
    let references = ResourceReferences {
        skeleton: Some(SkeletonReference {
            path: "prim\\skel\\char\\man.bsk".to_string(),
            attach_bone: Some("child2".to_string()),
        }),
        ..ResourceReferences::default()
    };
    let resource = fixture.write_resource(ResourceType::Character, &references);

    let mut scene = SceneCollector::new();
    let report = import_resource(&resource, &fixture.options(), &mut scene).unwrap();
    assert_eq!(report.bone_count, 3);
    assert_eq!(report.attach_bone.as_deref(), Some("child2"));
    assert_eq!(report.mesh_count, 0);

    let skeleton = &scene.skeletons[0];
    assert_eq!(skeleton.name, "man");
    assert_eq!(skeleton.root, "root");
    let order: Vec<&str> = skeleton.bones.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["root", "child1", "child2"]);
    assert_eq!(skeleton.bones["child1"].parent_name.as_deref(), Some("root"));
    assert_eq!(skeleton.bones["child2"].parent_name.as_deref(), Some("child1"));
    for bone in &bones {
        assert_eq!(
            skeleton.bones[&bone.name].bind_position,
            apply_axis_correction(bone.translation_to_origin)
        );
    }
}

#[test]
fn test_face_index_out_of_range() {
    let mut mesh = triangle("sword", "blade");
    mesh.faces = vec![[0, 1, 5]];
    let (fixture, resource) = item_fixture(&[("prim\\mesh\\item\\sword.bms", mesh)]);

    let err = import_resource(&resource, &fixture.options(), &mut SceneCollector::new()).unwrap_err();
    match err {
        Error::MeshIndexOutOfRange {
            face,
            index,
            vertex_count,
            ..
        } => {
            assert_eq!(face, 0);
            assert_eq!(index, 5);
            assert_eq!(vertex_count, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_mesh_aborts_by_default() {
    let (fixture, _) = item_fixture(&[("prim\\mesh\\item\\sword.bms", triangle("sword", "blade"))]);
    let references = ResourceReferences {
        materials: vec![MaterialReference {
            id: 0,
            path: "prim\\mtrl\\item\\sword.bmt".to_string(),
        }],
        meshes: vec![mesh_ref("prim\\mesh\\item\\sword.bms"), mesh_ref("prim\\mesh\\item\\gone.bms")],
        skeleton: None,
    };
    let resource = fixture.write_resource(ResourceType::Item, &references);

    let mut scene = SceneCollector::new();
    let err = import_resource(&resource, &fixture.options(), &mut scene).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingReferencedFile);
    assert!(err.to_string().contains("gone.bms"));
    assert!(scene.meshes.is_empty());
}

#[test]
fn test_missing_mesh_skipped_under_policy() {
    let (fixture, _) = item_fixture(&[("prim\\mesh\\item\\sword.bms", triangle("sword", "blade"))]);
    let references = ResourceReferences {
        materials: vec![MaterialReference {
            id: 0,
            path: "prim\\mtrl\\item\\sword.bmt".to_string(),
        }],
        meshes: vec![mesh_ref("prim\\mesh\\item\\gone.bms"), mesh_ref("prim\\mesh\\item\\sword.bms")],
        skeleton: None,
    };
    let resource = fixture.write_resource(ResourceType::Item, &references);
    let options = ImportOptions {
        on_mesh_error: MeshErrorPolicy::Skip,
        ..fixture.options()
    };

    let mut scene = SceneCollector::new();
    let report = import_resource(&resource, &options, &mut scene).unwrap();
    assert_eq!(report.mesh_count, 1);
    assert_eq!(report.skipped_meshes.len(), 1);
    assert_eq!(report.skipped_meshes[0].error.kind(), ErrorKind::MissingReferencedFile);
    assert!(report.skipped_meshes[0].path.ends_with("gone.bms"));
    assert_eq!(scene.meshes[0].mesh.name, "sword");
}

#[test]
fn test_unresolved_material() {
    let (fixture, resource) = item_fixture(&[("prim\\mesh\\item\\sword.bms", triangle("sword", "ghost"))]);

    let err = import_resource(&resource, &fixture.options(), &mut SceneCollector::new()).unwrap_err();
    match err {
        Error::UnresolvedMaterialReference { mesh, material } => {
            assert_eq!(mesh, "sword");
            assert_eq!(material, "ghost");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_resource_type() {
    let (fixture, resource) = item_fixture(&[]);
    let mut bytes = std::fs::read(&resource).unwrap();
    // tag, 10 offsets, 5 flags, then the type code
    bytes[72..76].copy_from_slice(&0x40000u32.to_le_bytes());
    std::fs::write(&resource, bytes).unwrap();

    let err = decode_resource(&resource, &fixture.options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownResourceType);
}

#[test]
fn test_later_material_table_wins() {
    let fixture = Fixture::new();
    fixture.write("prim/mtrl/a.bmt", &write_material_file(&[blade(8.0)]).unwrap());
    fixture.write("prim/mtrl/b.bmt", &write_material_file(&[blade(64.0)]).unwrap());
    fixture.write("prim/mesh/sword.bms", &write_mesh_file(&triangle("sword", "blade")).unwrap());
    let references = ResourceReferences {
        materials: vec![
            MaterialReference {
                id: 0,
                path: "prim\\mtrl\\a.bmt".to_string(),
            },
            MaterialReference {
                id: 1,
                path: "prim\\mtrl\\b.bmt".to_string(),
            },
        ],
        meshes: vec![mesh_ref("prim\\mesh\\sword.bms")],
        skeleton: None,
    };
    let resource = fixture.write_resource(ResourceType::Item, &references);

    let decoded = decode_resource(&resource, &fixture.options()).unwrap();
    assert_eq!(decoded.materials.len(), 1);
    assert_eq!(decoded.materials.get("blade").unwrap().specular_power, 64.0);
}

#[test]
fn test_serial_and_parallel_agree() {
    let (fixture, resource) = item_fixture(&[
        ("prim\\mesh\\item\\sword.bms", triangle("sword", "blade")),
        ("prim\\mesh\\item\\guard.bms", triangle("guard", "blade")),
        ("prim\\mesh\\item\\gem.bms", triangle("gem", "blade")),
    ]);

    let mut parallel = SceneCollector::new();
    import_resource(&resource, &fixture.options(), &mut parallel).unwrap();

    let serial_options = ImportOptions {
        parallel: false,
        ..fixture.options()
    };
    let mut serial = SceneCollector::new();
    import_resource(&resource, &serial_options, &mut serial).unwrap();

    assert_eq!(
        serde_json::to_value(&parallel).unwrap(),
        serde_json::to_value(&serial).unwrap()
    );
}

#[test]
fn test_missing_resource_is_io_error() {
    let fixture = Fixture::new();
    let err = decode_resource(&fixture.root().join("nope.bsr"), &fixture.options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_data_root_defaults_to_resource_directory() {
    let fixture = Fixture::new();
    fixture.write("res/prim/mtrl/sword.bmt", &write_material_file(&[blade(1.0)]).unwrap());
    fixture.write("res/prim/mesh/sword.bms", &write_mesh_file(&triangle("sword", "blade")).unwrap());
    let references = ResourceReferences {
        materials: vec![MaterialReference {
            id: 0,
            path: "prim\\mtrl\\sword.bmt".to_string(),
        }],
        meshes: vec![mesh_ref("prim\\mesh\\sword.bms")],
        skeleton: None,
    };
    let resource = fixture.write_resource(ResourceType::Item, &references);

    let decoded = decode_resource(&resource, &ImportOptions::default()).unwrap();
    assert_eq!(decoded.meshes.len(), 1);
}
