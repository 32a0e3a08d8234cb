//! Types and helpers shared by every JMXV format

use std::fmt;

use byteorder::{LittleEndian, WriteBytesExt};
use encoding_rs::EUC_KR;
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::cursor::BinaryCursor;
use crate::error::{Error, Result};

/// Length of the version tag that opens every JMXV file.
pub const VERSION_TAG_LEN: usize = 12;

pub const RESOURCE_TAG: &[u8; VERSION_TAG_LEN] = b"JMXVRES 0109";
pub const MATERIAL_TAG: &[u8; VERSION_TAG_LEN] = b"JMXVBMT 0102";
pub const MESH_TAG: &[u8; VERSION_TAG_LEN] = b"JMXVBMS 0110";
pub const SKELETON_TAG: &[u8; VERSION_TAG_LEN] = b"JMXVBSK 0101";

/// Whether a stored section offset points inside a file of `file_len` bytes.
///
/// Zero is the format's "absent" marker; anything at or past the end is
/// treated the same way and never followed.
pub fn section_present(offset: u32, file_len: u64) -> bool {
    offset != 0 && u64::from(offset) < file_len
}

/// Opaque 12-byte version tag. Never validated beyond its length.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTag(pub [u8; VERSION_TAG_LEN]);

impl VersionTag {
    pub fn read(cursor: &mut BinaryCursor) -> Result<Self> {
        let bytes = cursor.read_bytes(VERSION_TAG_LEN)?;
        let mut tag = [0u8; VERSION_TAG_LEN];
        tag.copy_from_slice(&bytes);
        Ok(Self(tag))
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionTag({self})")
    }
}

/// The four JMXV file kinds this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Resource,
    Material,
    Mesh,
    Skeleton,
}

impl FileKind {
    /// Guess the kind from the first bytes of a file (`JMXVRES`, `JMXVBMT`, ...).
    pub fn detect(data: &[u8]) -> Option<Self> {
        let prefix = data.get(..7)?;
        match prefix {
            b"JMXVRES" => Some(Self::Resource),
            b"JMXVBMT" => Some(Self::Material),
            b"JMXVBMS" => Some(Self::Mesh),
            b"JMXVBSK" => Some(Self::Skeleton),
            _ => None,
        }
    }
}

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn read(cursor: &mut BinaryCursor) -> Result<Self> {
        Ok(Self {
            r: cursor.read_f32()?,
            g: cursor.read_f32()?,
            b: cursor.read_f32()?,
        })
    }
}

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub fn read(cursor: &mut BinaryCursor) -> Result<Self> {
        Ok(Self {
            r: cursor.read_f32()?,
            g: cursor.read_f32()?,
            b: cursor.read_f32()?,
            a: cursor.read_f32()?,
        })
    }
}

/// In-memory little-endian writer producing JMXV layouts.
#[derive(Debug, Default)]
pub struct JmxWriter {
    buf: Vec<u8>,
}

impl JmxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> u32 {
        self.buf.len() as u32
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_tag(&mut self, tag: &[u8; VERSION_TAG_LEN]) {
        self.buf.extend_from_slice(tag);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.buf.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.buf.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.buf.write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Overwrite a `u32` previously written at `offset`.
    pub fn patch_u32(&mut self, offset: u32, value: u32) {
        let start = offset as usize;
        self.buf[start..start + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn write_zeros(&mut self, n: usize) {
        self.buf.resize(self.buf.len() + n, 0);
    }

    /// Write a `u32` byte length and the code page 949 encoding of `value`.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let (bytes, _, unmappable) = EUC_KR.encode(value);
        if unmappable {
            return Err(Error::EncodingError {
                path: "<writer>".into(),
                offset: u64::from(self.position()),
            });
        }
        self.write_u32(bytes.len() as u32)?;
        self.buf.extend_from_slice(&bytes);
        Ok(())
    }

    pub fn write_vec2(&mut self, v: Vec2) -> Result<()> {
        self.write_f32(v.x)?;
        self.write_f32(v.y)
    }

    pub fn write_vec3(&mut self, v: Vec3) -> Result<()> {
        self.write_f32(v.x)?;
        self.write_f32(v.y)?;
        self.write_f32(v.z)
    }

    pub fn write_quat(&mut self, q: Quat) -> Result<()> {
        self.write_f32(q.x)?;
        self.write_f32(q.y)?;
        self.write_f32(q.z)?;
        self.write_f32(q.w)
    }

    pub fn write_rgb(&mut self, c: Rgb) -> Result<()> {
        self.write_f32(c.r)?;
        self.write_f32(c.g)?;
        self.write_f32(c.b)
    }

    pub fn write_rgba(&mut self, c: Rgba) -> Result<()> {
        self.write_rgb(Rgb { r: c.r, g: c.g, b: c.b })?;
        self.write_f32(c.a)
    }

    /// Write a `u32 count; count × u32` block.
    pub fn write_count_block(&mut self, values: &[u32]) -> Result<()> {
        self.write_u32(values.len() as u32)?;
        for &v in values {
            self.write_u32(v)?;
        }
        Ok(())
    }
}
