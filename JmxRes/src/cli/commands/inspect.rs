//! CLI command for inspecting a single file

use std::path::Path;

use anyhow::bail;

use crate::config::TextureExtension;
use crate::formats::common::FileKind;
use crate::formats::cursor::BinaryCursor;
use crate::formats::material::{MaterialContext, parse_material_table};
use crate::formats::mesh::{parse_mesh, parse_mesh_header};
use crate::formats::resource::parse_resource_file;
use crate::formats::skeleton::{SkeletonDef, parse_skeleton};

/// Print a summary of `path`, detecting its kind from the version tag.
pub fn execute(path: &Path, root: Option<&Path>) -> anyhow::Result<()> {
    let data = std::fs::read(path)?;
    let Some(kind) = FileKind::detect(&data) else {
        bail!("{} is not a JMXV resource file", path.display());
    };
    let mut cursor = BinaryCursor::new(data, path);

    match kind {
        FileKind::Resource => inspect_resource(&mut cursor),
        FileKind::Material => {
            let root = root
                .map(Path::to_path_buf)
                .or_else(|| path.parent().map(Path::to_path_buf))
                .unwrap_or_default();
            inspect_material(&mut cursor, &root)
        }
        FileKind::Mesh => inspect_mesh(&mut cursor),
        FileKind::Skeleton => inspect_skeleton(&mut cursor),
    }
}

fn inspect_resource(cursor: &mut BinaryCursor) -> anyhow::Result<()> {
    let file = parse_resource_file(cursor)?;
    let d = &file.descriptor;
    let o = &d.offsets;

    println!("Resource File");
    println!("=============");
    println!("Version:   {}", d.version);
    println!("Name:      {}", d.name);
    println!("Type:      {} (0x{:05X})", d.resource_type, d.resource_type.code());
    println!("Flags:     {:?}", o.flags);
    println!();

    println!("Sections:");
    for (name, offset) in [
        ("material", o.material),
        ("mesh", o.mesh),
        ("skeleton", o.skeleton),
        ("animation", o.animation),
        ("mesh_group", o.mesh_group),
        ("animation_group", o.animation_group),
        ("sound_effect", o.sound_effect),
        ("bounding_box", o.bounding_box),
    ] {
        println!("  {name:16} 0x{offset:08X}");
    }
    println!();

    let refs = &file.references;
    println!("Materials ({}):", refs.materials.len());
    for material in &refs.materials {
        println!("  [{}] {}", material.id, material.path);
    }
    println!("Meshes ({}):", refs.meshes.len());
    for mesh in &refs.meshes {
        match mesh.extra {
            Some(extra) => println!("  {} ({extra})", mesh.path),
            None => println!("  {}", mesh.path),
        }
    }
    if let Some(skeleton) = &refs.skeleton {
        println!("Skeleton:  {}", skeleton.path);
        if let Some(bone) = &skeleton.attach_bone {
            println!("Attach to: {bone}");
        }
    }
    println!("Mesh groups:      {}", file.mesh_group_count);
    println!("Animation groups: {}", file.animation_group_count);
    Ok(())
}

fn inspect_material(cursor: &mut BinaryCursor, root: &Path) -> anyhow::Result<()> {
    let extension = TextureExtension::default();
    let materials = parse_material_table(
        cursor,
        MaterialContext {
            data_root: root,
            extension: &extension,
        },
    )?;

    println!("Material Table ({} entries)", materials.len());
    println!("==============");
    for material in &materials {
        let mut notes = Vec::new();
        if material.is_transparent() {
            notes.push("transparent");
        }
        if material.has_normal_map() {
            notes.push("normal map");
        }
        println!(
            "  {:24} flags 0x{:08X} {}",
            material.name,
            material.entry_flags,
            notes.join(", ")
        );
        println!("    texture: {}", material.texture_file.display());
        if let Some(normal) = &material.normal_map_file {
            println!("    normal:  {}", normal.display());
        }
    }
    Ok(())
}

fn inspect_mesh(cursor: &mut BinaryCursor) -> anyhow::Result<()> {
    let header = parse_mesh_header(cursor)?;
    let mesh = parse_mesh(cursor)?;

    println!("Mesh File");
    println!("=========");
    println!("Name:      {}", mesh.name);
    println!("Material:  {}", mesh.material_name);
    println!("Flags:     {:?}", header.flags);
    println!("Vertices:  {}", mesh.vertices.len());
    println!("Triangles: {}", mesh.triangle_count());
    println!("Lightmap:  {}", if header.has_lightmap() { "yes" } else { "no" });
    Ok(())
}

fn inspect_skeleton(cursor: &mut BinaryCursor) -> anyhow::Result<()> {
    let skeleton = parse_skeleton(cursor)?;

    println!("Skeleton '{}' ({} bones)", skeleton.name, skeleton.len());
    println!("========");
    print_bone(&skeleton, &skeleton.root, 0);
    Ok(())
}

fn print_bone(skeleton: &SkeletonDef, name: &str, depth: usize) {
    let Some(bone) = skeleton.bone(name) else {
        return;
    };
    let p = bone.bind_position;
    println!(
        "{:indent$}{} ({:.3}, {:.3}, {:.3})",
        "",
        bone.name,
        p.x,
        p.y,
        p.z,
        indent = depth * 2
    );
    for child in &bone.children {
        print_bone(skeleton, child, depth + 1);
    }
}
