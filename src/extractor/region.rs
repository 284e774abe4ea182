//! Extraction area and its pixel window
//!
//! An extraction area is a rectangle of ground, given by its center in map
//! coordinates and its extent in meters. The window is sized from the
//! archive's fixed ground sample distance, never from the file itself.

use crate::coordinate::Point;
use crate::error::{NightError, NightResult};
use crate::raster::PixelWindow;
use crate::request::AnalysisRequest;

/// Ground rectangle to cut out of each source raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionArea {
    /// Center in map coordinates (longitude, latitude)
    pub center: Point,
    /// East-west extent in meters
    pub width_m: f64,
    /// North-south extent in meters
    pub height_m: f64,
}

impl ExtractionArea {
    pub fn new(longitude: f64, latitude: f64, width_m: f64, height_m: f64) -> Self {
        ExtractionArea {
            center: Point::from_lon_lat(longitude, latitude),
            width_m,
            height_m,
        }
    }

    pub fn from_request(request: &AnalysisRequest) -> Self {
        Self::new(request.longitude, request.latitude, request.width_m, request.height_m)
    }
}

/// Computes the pixel window centered on a fractional pixel position
///
/// # Arguments
/// * `center` - Fractional pixel position (x = column, y = row) of the area center
/// * `area` - Ground extent of the window
/// * `ground_sample_distance` - Meters per pixel
///
/// # Returns
/// The window, or `InvalidWindow` when either side is under one pixel or
/// the window is too large to address
pub fn compute_window(center: Point, area: &ExtractionArea, ground_sample_distance: f64) -> NightResult<PixelWindow> {
    let cols = area.width_m / ground_sample_distance;
    let rows = area.height_m / ground_sample_distance;
    let width_px = cols.floor();
    let height_px = rows.floor();

    if !(width_px >= 1.0 && height_px >= 1.0) {
        return Err(NightError::InvalidWindow {
            width_m: area.width_m,
            height_m: area.height_m,
            ground_sample_distance,
        });
    }

    let col_off = (center.x - cols / 2.0).floor() as i64;
    let row_off = (center.y - rows / 2.0).floor() as i64;

    PixelWindow::new(col_off, row_off, width_px as usize, height_px as usize).ok_or(NightError::InvalidWindow {
        width_m: area.width_m,
        height_m: area.height_m,
        ground_sample_distance,
    })
}
