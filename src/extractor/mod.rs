//! Window extraction from archive rasters
//!
//! Maps a ground rectangle onto each source raster and writes the cropped,
//! still georeferenced, frame.

mod region;
mod window_extractor;

pub use region::{compute_window, ExtractionArea};
pub use window_extractor::{ExtractedFrame, RasterWindowExtractor};

use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do when a window reaches past the source raster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfBoundsPolicy {
    /// Reject the window
    #[default]
    Fail,
    /// Pad outside pixels with the nodata value, or 0 without one
    Fill,
}

impl fmt::Display for OutOfBoundsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutOfBoundsPolicy::Fail => write!(f, "fail"),
            OutOfBoundsPolicy::Fill => write!(f, "fill"),
        }
    }
}
