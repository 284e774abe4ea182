//! Seekable reader trait
//!
//! Raster decoding jumps between the header, IFDs, tag arrays and the
//! strip/tile blocks, so every reader used by the codec must seek.

use std::io::{Read, Seek};

/// Readers the TIFF codec can decode from (files, buffered files, in-memory cursors)
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
