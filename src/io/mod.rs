//! Low-level I/O for the raster codec
//!
//! Byte order strategies and the seekable reader abstraction.

pub mod seekable;
pub mod byte_order;
