//! Monthly composite archive
//!
//! The archive is a flat directory of single-band rasters, one per month,
//! whose file names carry the acquisition year and month.

mod date;
mod selector;

pub use date::{DateExtractor, FixedOffsetDateExtractor};
pub use selector::{ArchiveEntry, ArchiveSelector};
