//! Single-band georeferenced rasters
//!
//! In-memory raster frames plus the reader and writer that move them
//! between GeoTIFF files and `f64` sample buffers.

mod blocks;
mod reader;
mod sample;
mod summary;
mod window;
mod writer;

pub use blocks::{BlockDecoder, BlockGrid};
pub use reader::RasterReader;
pub use sample::SampleType;
pub use summary::RasterSummary;
pub use window::PixelWindow;
pub use writer::RasterWriter;

use crate::coordinate::GeoTransform;
use crate::tiff::geo::{parse_nodata, GeoKeys};

/// Shape, type and georeferencing of a raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterProfile {
    pub width: usize,
    pub height: usize,
    pub sample_type: SampleType,
    pub transform: GeoTransform,
    pub geo_keys: GeoKeys,
    /// GDAL nodata text, carried through unchanged
    pub nodata: Option<String>,
}

impl RasterProfile {
    pub fn nodata_value(&self) -> Option<f64> {
        parse_nodata(self.nodata.as_deref())
    }

    /// True when `value` is the declared nodata marker
    pub fn is_nodata(&self, value: f64) -> bool {
        match self.nodata_value() {
            Some(nodata) if nodata.is_nan() => value.is_nan(),
            Some(nodata) => value == nodata,
            None => false,
        }
    }
}

/// Raster frame held in memory, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub profile: RasterProfile,
    pub data: Vec<f64>,
}

impl Raster {
    pub fn new(profile: RasterProfile, data: Vec<f64>) -> Self {
        Raster { profile, data }
    }

    pub fn width(&self) -> usize {
        self.profile.width
    }

    pub fn height(&self) -> usize {
        self.profile.height
    }

    /// Sample at column `col`, row `row`
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.profile.width || row >= self.profile.height {
            return None;
        }
        self.data.get(row * self.profile.width + col).copied()
    }

    /// Arithmetic mean over every pixel
    ///
    /// Nodata pixels take part like any other value. Empty frames have no mean.
    pub fn mean(&self) -> Option<f64> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.data.iter().sum::<f64>() / self.data.len() as f64)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_includes_every_pixel() {
        let mut profile = test_support::profile(2, 2);
        profile.nodata = Some("0".to_string());
        let raster = Raster::new(profile, vec![0.0, 2.0, 4.0, 6.0]);
        assert_eq!(raster.mean(), Some(3.0));
        assert!(raster.profile.is_nodata(0.0));
        assert_eq!(raster.get(1, 1), Some(6.0));
        assert_eq!(raster.get(2, 0), None);
    }
}
