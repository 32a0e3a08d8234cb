//! Error types for `JmxRes`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `JmxRes` operations.
///
/// Every decoding variant carries the file it was raised for so a failure in
/// one referenced file can be told apart from its siblings.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations on the top-level file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file named inside another file could not be opened.
    #[error("missing referenced file {path} (referenced from {referenced_from}): {source}")]
    MissingReferencedFile {
        /// The resolved path that could not be opened.
        path: PathBuf,
        /// The file that stored the reference.
        referenced_from: PathBuf,
        /// The underlying open/read failure.
        #[source]
        source: std::io::Error,
    },

    // ==================== Stream Errors ====================
    /// Fewer bytes remain than a field requires.
    #[error("truncated input in {path}: needed {needed} bytes at offset {offset}")]
    TruncatedInput {
        /// File being decoded.
        path: PathBuf,
        /// Byte offset where the read started.
        offset: u64,
        /// Number of bytes the field required.
        needed: usize,
    },

    /// A length-prefixed string is not valid code page 949 text.
    #[error("undecodable string in {path} at offset {offset}")]
    EncodingError {
        /// File being decoded.
        path: PathBuf,
        /// Byte offset of the string payload.
        offset: u64,
    },

    // ==================== Format Errors ====================
    /// The resource header carries a type code outside the known set.
    #[error("unknown resource type 0x{code:05X} in {path}")]
    UnknownResourceType {
        /// Resource file.
        path: PathBuf,
        /// The raw type code.
        code: u32,
    },

    /// A mesh names a material that no decoded material table defines.
    #[error("mesh '{mesh}' references unknown material '{material}'")]
    UnresolvedMaterialReference {
        /// Mesh name.
        mesh: String,
        /// Material name stored in the mesh file.
        material: String,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} in {path} references vertex {index} but mesh has {vertex_count} vertices")]
    MeshIndexOutOfRange {
        /// Mesh file.
        path: PathBuf,
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u16,
        /// Number of vertices decoded.
        vertex_count: usize,
    },

    /// Skeleton parent/child references are inconsistent or cyclic.
    #[error("malformed bone hierarchy in {path}: {message}")]
    MalformedHierarchy {
        /// Skeleton file.
        path: PathBuf,
        /// What is inconsistent.
        message: String,
    },

    // ==================== Host / Config Errors ====================
    /// The scene sink rejected an entity.
    #[error("scene sink error: {0}")]
    SceneSink(String),

    /// An import options file could not be parsed.
    #[error("invalid config {path}: {message}")]
    Config {
        /// Config file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    MissingReferencedFile,
    TruncatedInput,
    EncodingError,
    UnknownResourceType,
    UnresolvedMaterialReference,
    MeshIndexOutOfRange,
    MalformedHierarchy,
    SceneSink,
    Config,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::MissingReferencedFile { .. } => ErrorKind::MissingReferencedFile,
            Error::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            Error::EncodingError { .. } => ErrorKind::EncodingError,
            Error::UnknownResourceType { .. } => ErrorKind::UnknownResourceType,
            Error::UnresolvedMaterialReference { .. } => ErrorKind::UnresolvedMaterialReference,
            Error::MeshIndexOutOfRange { .. } => ErrorKind::MeshIndexOutOfRange,
            Error::MalformedHierarchy { .. } => ErrorKind::MalformedHierarchy,
            Error::SceneSink(_) => ErrorKind::SceneSink,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::MalformedHierarchy {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for `JmxRes` operations.
pub type Result<T> = std::result::Result<T, Error>;
