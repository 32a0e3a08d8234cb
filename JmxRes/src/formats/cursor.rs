//! Little-endian cursor over a fully loaded JMXV file.
//!
//! All JMXV files are small enough to be read into memory in one go, so the
//! cursor owns the bytes and the path they came from. Every failure is
//! reported with that path and the byte offset of the failing read.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::EUC_KR;
use glam::{Quat, Vec2, Vec3};

use crate::error::{Error, Result};

/// Sequential reader with absolute seeking.
pub struct BinaryCursor {
    inner: Cursor<Vec<u8>>,
    path: PathBuf,
}

impl BinaryCursor {
    /// Wrap bytes that were loaded from `path`.
    pub fn new(data: Vec<u8>, path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Cursor::new(data),
            path: path.into(),
        }
    }

    /// Read a top-level file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Ok(Self::new(data, path))
    }

    /// Read a file that another file referenced.
    ///
    /// Open failures become [`Error::MissingReferencedFile`].
    pub fn open_referenced<P: AsRef<Path>>(path: P, referenced_from: &Path) -> Result<Self> {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(data) => Ok(Self::new(data, path)),
            Err(source) => Err(Error::MissingReferencedFile {
                path: path.to_path_buf(),
                referenced_from: referenced_from.to_path_buf(),
                source,
            }),
        }
    }

    /// Path of the file being decoded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current byte offset.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Total length of the file in bytes.
    pub fn len(&self) -> u64 {
        self.inner.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    /// Bytes left between the current position and the end of the file.
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position())
    }

    /// Move to an absolute offset. Seeking past the end is allowed; the
    /// next read fails with [`Error::TruncatedInput`].
    pub fn seek(&mut self, offset: u64) {
        self.inner.set_position(offset);
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed as u64 {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    fn truncated(&self, needed: usize) -> Error {
        Error::TruncatedInput {
            path: self.path.clone(),
            offset: self.position(),
            needed,
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.inner.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.inner.read_u16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        Ok(self.inner.read_f32::<LittleEndian>()?)
    }

    /// Read exactly `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure(n)?;
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Advance `n` bytes without copying them out.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.inner.set_position(self.position() + n as u64);
        Ok(())
    }

    /// Read a `u32` length followed by that many code page 949 bytes.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let offset = self.position();
        let bytes = self.read_bytes(len)?;
        EUC_KR
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .map(std::borrow::Cow::into_owned)
            .ok_or_else(|| Error::EncodingError {
                path: self.path.clone(),
                offset,
            })
    }

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Read four floats in stored (x, y, z, w) order.
    pub fn read_quat(&mut self) -> Result<Quat> {
        Ok(Quat::from_xyzw(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    /// Read a `u32` element count and reserve capacity for it.
    ///
    /// The reservation is clamped to what the rest of the file could hold
    /// so a corrupt count cannot trigger a huge allocation.
    pub fn read_count<T>(&mut self, min_record_size: usize) -> Result<(usize, Vec<T>)> {
        let count = self.read_u32()? as usize;
        let fits = (self.remaining() as usize) / min_record_size.max(1);
        Ok((count, Vec::with_capacity(count.min(fits))))
    }

    /// Walk a `u32 count; count × u32` block and discard it.
    pub fn skip_count_block(&mut self) -> Result<u32> {
        let count = self.read_u32()?;
        self.skip(count as usize * 4)?;
        Ok(count)
    }
}
