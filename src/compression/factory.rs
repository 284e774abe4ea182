//! Factory for creating compression handlers

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::{CompressionHandler, CompressionKind};
use super::uncompressed::UncompressedHandler;
use super::deflate::DeflateHandler;
use super::zstd::ZstdHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a handler for a TIFF compression code read from a file
    pub fn create_handler(code: u64) -> TiffResult<Box<dyn CompressionHandler>> {
        match code {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::DEFLATE | compression::DEFLATE_LEGACY => Ok(Box::new(DeflateHandler)),
            compression::ZSTD => Ok(Box::new(ZstdHandler::new())),
            _ => Err(TiffError::UnsupportedCompression(code)),
        }
    }

    /// Create the handler used when writing frames
    pub fn for_kind(kind: CompressionKind) -> Box<dyn CompressionHandler> {
        match kind {
            CompressionKind::None => Box::new(UncompressedHandler),
            CompressionKind::Deflate => Box::new(DeflateHandler),
            CompressionKind::Zstd => Box::new(ZstdHandler::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_handler_restores_its_input() {
        let data: Vec<u8> = (0..2048u32).map(|i| (i % 7) as u8).collect();
        for kind in [CompressionKind::None, CompressionKind::Deflate, CompressionKind::Zstd] {
            let handler = CompressionFactory::for_kind(kind);
            assert_eq!(handler.code(), kind.code());
            let packed = handler.compress(&data).unwrap();
            let decoder = CompressionFactory::create_handler(handler.code()).unwrap();
            assert_eq!(decoder.decompress(&packed).unwrap(), data, "{}", handler.name());
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        match CompressionFactory::create_handler(7) {
            Err(TiffError::UnsupportedCompression(7)) => {}
            Err(other) => panic!("unexpected error {}", other),
            Ok(handler) => panic!("unexpected handler {}", handler.name()),
        }
    }

    #[test]
    fn kinds_parse_from_config_names() {
        assert_eq!("ZSTD".parse::<CompressionKind>().unwrap(), CompressionKind::Zstd);
        assert_eq!("zip".parse::<CompressionKind>().unwrap(), CompressionKind::Deflate);
        assert!("lzw".parse::<CompressionKind>().is_err());
    }
}
