//! Error types for `RvInject`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `RvInject` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Side-car Errors ====================
    /// A side-car text file required for a data file does not exist.
    #[error("side-car file not found: {path}")]
    SidecarMissing {
        /// The expected path to the side-car file.
        path: PathBuf,
    },

    /// Original and translated lines are not positionally aligned.
    #[error("alignment mismatch in {file}: {original} original lines, {translated} translated lines")]
    AlignmentMismatch {
        /// The file (side-car pair or scripts file) that is misaligned.
        file: String,
        /// Number of original entries.
        original: usize,
        /// Number of translated entries.
        translated: usize,
    },

    /// A table shared by several files could not be loaded.
    #[error("{category} translation table unavailable: {message}")]
    SharedTable {
        /// The category the table belongs to.
        category: String,
        /// The load error message.
        message: String,
    },

    // ==================== Graph / Codec Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 payload of a binary value could not be decoded.
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded graph does not have the shape the writer requires.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    // ==================== Configuration Errors ====================
    /// The configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // ==================== Processing Errors ====================
    /// The worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(err.to_string())
    }
}

/// A specialized Result type for `RvInject` operations.
pub type Result<T> = std::result::Result<T, Error>;
