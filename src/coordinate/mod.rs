//! Coordinate handling for geospatial data
//!
//! Map/pixel conversion through the affine geotransform of a raster.

mod point;
mod transform;

pub use self::point::Point;
pub use self::transform::GeoTransform;
