//! Compression handling for TIFF strips and tiles
//!
//! One handler per supported TIFF compression code, selected through
//! [`CompressionFactory`].

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;

pub use handler::{CompressionHandler, CompressionKind};
pub use uncompressed::UncompressedHandler;
pub use deflate::DeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
