//! Window extraction from archive rasters

use chrono::NaiveDate;
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::compression::CompressionKind;
use crate::error::{NightError, NightResult};
use crate::raster::{Raster, RasterProfile, RasterReader, RasterWriter};
use crate::utils::logger::Logger;

use super::region::{compute_window, ExtractionArea};
use super::OutOfBoundsPolicy;

/// A cropped raster on disk with its acquisition month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFrame {
    pub path: PathBuf,
    pub date: NaiveDate,
}

/// Cuts a ground rectangle out of source rasters
pub struct RasterWindowExtractor<'a> {
    /// Meters per pixel shared by the whole archive
    ground_sample_distance: f64,
    policy: OutOfBoundsPolicy,
    writer: RasterWriter,
    logger: &'a Logger,
}

impl<'a> RasterWindowExtractor<'a> {
    pub fn new(
        ground_sample_distance: f64,
        policy: OutOfBoundsPolicy,
        compression: CompressionKind,
        logger: &'a Logger,
    ) -> Self {
        RasterWindowExtractor {
            ground_sample_distance,
            policy,
            writer: RasterWriter::new(compression),
            logger,
        }
    }

    /// Extracts `area` from `source` and writes the crop to `output`
    ///
    /// The crop keeps the source sample type, GeoKeys and nodata; its
    /// transform is moved to the window origin.
    pub fn extract(&self, source: &Path, output: &Path, date: NaiveDate, area: &ExtractionArea) -> NightResult<ExtractedFrame> {
        let raster = self.extract_raster(source, area)?;
        self.writer.write(output, &raster).map_err(|e| NightError::tiff(output, e))?;

        self.logger.log(&format!(
            "Extracted {}x{} window from {} to {}",
            raster.width(), raster.height(), source.display(), output.display()
        )).map_err(NightError::run_log)?;
        Ok(ExtractedFrame { path: output.to_path_buf(), date })
    }

    /// Reads the window for `area` into memory without writing it
    pub fn extract_raster(&self, source: &Path, area: &ExtractionArea) -> NightResult<Raster> {
        let mut reader = RasterReader::open(source).map_err(|e| NightError::tiff(source, e))?;
        let profile = reader.profile().clone();

        let center = profile.transform.map_to_pixel(area.center)
            .map_err(|e| NightError::tiff(source, e))?;
        let window = compute_window(center, area, self.ground_sample_distance)?;
        debug!("Area {:?} maps to pixel ({:.2}, {:.2}), window {}", area, center.x, center.y, window);

        if !window.is_within(profile.width, profile.height) {
            let overlaps = window.clip(profile.width, profile.height).is_some();
            let larger_than_source = window.width() > profile.width || window.height() > profile.height;
            if self.policy == OutOfBoundsPolicy::Fail || !overlaps || larger_than_source {
                return Err(NightError::WindowOutOfBounds {
                    path: source.to_path_buf(),
                    window,
                    width: profile.width,
                    height: profile.height,
                });
            }
            warn!("Window {} extends past {}, padding with fill value", window, source.display());
        }

        let fill = profile.nodata_value().unwrap_or(0.0);
        let data = reader.read_window(&window, fill).map_err(|e| NightError::tiff(source, e))?;

        let cropped = RasterProfile {
            width: window.width(),
            height: window.height(),
            transform: profile.transform.translated(window.col_off(), window.row_off()),
            ..profile
        };
        Ok(Raster::new(cropped, data))
    }
}
