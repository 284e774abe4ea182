//! Point structure for representing coordinates

/// A point in a coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate (longitude in geographic systems, column in pixel space)
    pub x: f64,
    /// Y coordinate (latitude in geographic systems, row in pixel space)
    pub y: f64,
}

impl Point {
    /// Create a new 2D point
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Builds a map point from a longitude/latitude pair
    pub fn from_lon_lat(longitude: f64, latitude: f64) -> Self {
        Point { x: longitude, y: latitude }
    }
}
