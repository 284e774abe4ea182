//! Compression handler trait definition

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};

/// Strategy trait for handling different compression methods
pub trait CompressionHandler: Send + Sync {
    /// Decompress one strip or tile
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>>;

    /// Compress one strip or tile
    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the TIFF compression code
    fn code(&self) -> u64;
}

/// Compression applied to written frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    None,
    #[default]
    Deflate,
    Zstd,
}

impl CompressionKind {
    pub fn code(&self) -> u64 {
        match self {
            CompressionKind::None => compression::NONE,
            CompressionKind::Deflate => compression::DEFLATE,
            CompressionKind::Zstd => compression::ZSTD,
        }
    }
}

impl FromStr for CompressionKind {
    type Err = TiffError;

    fn from_str(name: &str) -> TiffResult<Self> {
        match name.to_lowercase().as_str() {
            "none" | "uncompressed" => Ok(CompressionKind::None),
            "deflate" | "zip" => Ok(CompressionKind::Deflate),
            "zstd" => Ok(CompressionKind::Zstd),
            _ => Err(TiffError::GenericError(format!("Unknown compression type: {}", name))),
        }
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompressionKind::None => "none",
            CompressionKind::Deflate => "deflate",
            CompressionKind::Zstd => "zstd",
        };
        f.write_str(name)
    }
}
