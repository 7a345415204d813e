//! Compression utilities for script blobs

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::Result;

/// Level the engine's own tooling uses for script blobs.
pub const SCRIPT_COMPRESSION_LEVEL: u32 = 6;

/// Compresses translated script text into the blob stored in a scripts file.
pub trait ScriptCompressor: Send + Sync {
    /// Compress script source text.
    fn compress(&self, text: &str) -> Result<Vec<u8>>;
}

/// ZLIB compressor used by `Scripts` data files.
#[derive(Debug, Clone, Copy)]
pub struct ZlibCompressor {
    level: u32,
}

impl ZlibCompressor {
    /// Compressor with an explicit level (0-9).
    #[must_use]
    pub fn with_level(level: u32) -> Self {
        Self { level: level.min(9) }
    }
}

impl Default for ZlibCompressor {
    fn default() -> Self {
        Self::with_level(SCRIPT_COMPRESSION_LEVEL)
    }
}

impl ScriptCompressor for ZlibCompressor {
    fn compress(&self, text: &str) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(self.level));
        encoder.write_all(text.as_bytes())?;
        Ok(encoder.finish()?)
    }
}

/// Decompress a ZLIB script blob
///
/// # Errors
/// Returns an error if the data is not a valid ZLIB stream.
pub fn decompress_zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
