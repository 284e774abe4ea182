//! One-screen description of a GeoTIFF

use std::fmt;
use std::path::{Path, PathBuf};

use crate::tiff::constants::geo_keys;
use crate::tiff::errors::TiffResult;

use super::{RasterProfile, RasterReader};

/// Profile of a raster plus statistics over its samples
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSummary {
    pub path: PathBuf,
    pub profile: RasterProfile,
    /// Pixels equal to the declared nodata value
    pub nodata_pixels: usize,
    /// Mean over every pixel, nodata included
    pub mean: Option<f64>,
}

impl RasterSummary {
    /// Reads the whole raster at `path`
    pub fn read(path: &Path) -> TiffResult<Self> {
        let mut reader = RasterReader::open(path)?;
        let raster = reader.read_all()?;
        let nodata_pixels = raster.data.iter().filter(|v| raster.profile.is_nodata(**v)).count();
        Ok(RasterSummary {
            path: reader.path().to_path_buf(),
            mean: raster.mean(),
            profile: raster.profile,
            nodata_pixels,
        })
    }

    /// Pixel convention named by the GTRasterTypeGeoKey
    pub fn raster_type(&self) -> &'static str {
        match self.profile.geo_keys.short_value(geo_keys::GT_RASTER_TYPE) {
            Some(geo_keys::RASTER_PIXEL_IS_AREA) => "PixelIsArea",
            Some(geo_keys::RASTER_PIXEL_IS_POINT) => "PixelIsPoint",
            Some(_) => "unknown",
            None => "unspecified",
        }
    }
}

impl fmt::Display for RasterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.profile;
        writeln!(f, "{}", self.path.display())?;
        writeln!(f, "  Size: {}x{} {}", p.width, p.height, p.sample_type)?;
        writeln!(f, "  Transform: {:?}", p.transform.to_gdal())?;
        writeln!(f, "  Raster type: {}", self.raster_type())?;
        match &p.nodata {
            Some(text) => writeln!(f, "  Nodata: {} ({} pixels)", text, self.nodata_pixels)?,
            None => writeln!(f, "  Nodata: none")?,
        }
        match self.mean {
            Some(mean) => write!(f, "  Mean: {}", mean),
            None => write!(f, "  Mean: n/a"),
        }
    }
}
