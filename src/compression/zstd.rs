//! Zstandard strips (compression code 14)

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use log::trace;

const DEFAULT_LEVEL: i32 = 3;

pub struct ZstdHandler {
    level: i32,
}

impl ZstdHandler {
    pub fn new() -> Self {
        ZstdHandler { level: DEFAULT_LEVEL }
    }
}

impl Default for ZstdHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let block = zstd::decode_all(data)
            .map_err(|e| TiffError::GenericError(format!("ZSTD block is corrupt: {}", e)))?;
        trace!("ZSTD block {} -> {} bytes", data.len(), block.len());
        Ok(block)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        zstd::encode_all(data, self.level)
            .map_err(|e| TiffError::GenericError(format!("ZSTD encoding failed at level {}: {}", self.level, e)))
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }

    fn code(&self) -> u64 {
        compression::ZSTD
    }
}
