//! TIFF file format module
//!
//! Reading and writing of TIFF/BigTIFF containers and their GeoTIFF tags.

pub mod errors;
pub mod ifd;
pub mod types;
pub mod reader;
pub mod geo;
pub mod builder;
pub(crate) mod writer;
pub mod constants;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use geo::{GeoKeyEntry, GeoKeys, GeoReference};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use types::TIFF;
pub use builder::TiffBuilder;
