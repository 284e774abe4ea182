//! Utility modules for common functionality
//!
//! Logging, progress reporting and the byte-level helpers shared by the
//! TIFF reader and writer.

pub mod logger;
pub mod progress;
pub(crate) mod write_utils;
pub(crate) mod tag_utils;
