//! Affine geotransform between pixel and map coordinates

use super::point::Point;
use crate::tiff::errors::{TiffError, TiffResult};

/// Six-coefficient affine transform in GDAL order
///
/// `x = origin_x + col * pixel_width + row * row_rotation`
/// `y = origin_y + col * col_rotation + row * pixel_height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Creates a transform from GDAL-ordered coefficients
    pub fn from_gdal(coefficients: [f64; 6]) -> Self {
        GeoTransform {
            origin_x: coefficients[0],
            pixel_width: coefficients[1],
            row_rotation: coefficients[2],
            origin_y: coefficients[3],
            col_rotation: coefficients[4],
            pixel_height: coefficients[5],
        }
    }

    /// Returns the coefficients in GDAL order
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Builds a north-up transform from a ModelTiepoint and ModelPixelScale pair
    ///
    /// The tiepoint maps raster point (i, j) to map point (x, y); the scale
    /// gives the pixel size, with y growing southwards.
    pub fn from_tiepoint_and_scale(tiepoint: &[f64], scale: &[f64]) -> TiffResult<Self> {
        if tiepoint.len() < 6 || scale.len() < 2 {
            return Err(TiffError::GenericError(format!(
                "Malformed georeference: {} tiepoint values, {} scale values",
                tiepoint.len(), scale.len()
            )));
        }

        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
        let (sx, sy) = (scale[0], scale[1]);

        Ok(GeoTransform {
            origin_x: x - i * sx,
            pixel_width: sx,
            row_rotation: 0.0,
            origin_y: y + j * sy,
            col_rotation: 0.0,
            pixel_height: -sy,
        })
    }

    /// Builds a transform from a row-major 4x4 ModelTransformation matrix
    pub fn from_model_transformation(matrix: &[f64]) -> TiffResult<Self> {
        if matrix.len() < 16 {
            return Err(TiffError::GenericError(format!(
                "ModelTransformation needs 16 values, found {}",
                matrix.len()
            )));
        }

        Ok(GeoTransform {
            origin_x: matrix[3],
            pixel_width: matrix[0],
            row_rotation: matrix[1],
            origin_y: matrix[7],
            col_rotation: matrix[4],
            pixel_height: matrix[5],
        })
    }

    /// Returns the row-major 4x4 ModelTransformation matrix for this transform
    pub fn to_model_transformation(&self) -> [f64; 16] {
        [
            self.pixel_width, self.row_rotation, 0.0, self.origin_x,
            self.col_rotation, self.pixel_height, 0.0, self.origin_y,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]
    }

    /// True when the transform has no rotation terms
    pub fn is_north_up(&self) -> bool {
        self.row_rotation == 0.0 && self.col_rotation == 0.0
    }

    /// Maps a fractional pixel position (column, row) to map coordinates
    pub fn pixel_to_map(&self, col: f64, row: f64) -> Point {
        Point::new(
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Maps a map point to a fractional pixel position (x = column, y = row)
    ///
    /// Fails when the transform is not invertible.
    pub fn map_to_pixel(&self, point: Point) -> TiffResult<Point> {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;
        if det == 0.0 || !det.is_finite() {
            return Err(TiffError::GenericError(format!(
                "Geotransform {:?} is not invertible",
                self.to_gdal()
            )));
        }

        let dx = point.x - self.origin_x;
        let dy = point.y - self.origin_y;
        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (self.pixel_width * dy - self.col_rotation * dx) / det;

        Ok(Point::new(col, row))
    }

    /// Transform of a sub-raster whose top-left pixel is (col_off, row_off)
    pub fn translated(&self, col_off: i64, row_off: i64) -> Self {
        let origin = self.pixel_to_map(col_off as f64, row_off as f64);
        GeoTransform {
            origin_x: origin.x,
            origin_y: origin.y,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn north_up() -> GeoTransform {
        GeoTransform::from_gdal([-89.0, 0.005, 0.0, 41.0, 0.0, -0.005])
    }

    #[test]
    fn tiepoint_and_scale_give_north_up_transform() {
        let gt = GeoTransform::from_tiepoint_and_scale(
            &[0.0, 0.0, 0.0, -89.0, 41.0, 0.0],
            &[0.005, 0.005, 0.0],
        ).unwrap();
        assert_eq!(gt, north_up());
        assert!(gt.is_north_up());
    }

    #[test]
    fn map_to_pixel_inverts_pixel_to_map() {
        let gt = GeoTransform::from_gdal([100.0, 2.0, 0.5, 50.0, 0.25, -3.0]);
        let map = gt.pixel_to_map(12.5, 7.25);
        let pixel = gt.map_to_pixel(map).unwrap();
        assert_relative_eq!(pixel.x, 12.5, epsilon = 1e-9);
        assert_relative_eq!(pixel.y, 7.25, epsilon = 1e-9);
    }

    #[test]
    fn translated_moves_origin_only() {
        let gt = north_up().translated(54, 79);
        assert_relative_eq!(gt.origin_x, -89.0 + 54.0 * 0.005, epsilon = 1e-12);
        assert_relative_eq!(gt.origin_y, 41.0 - 79.0 * 0.005, epsilon = 1e-12);
        assert_eq!(gt.pixel_width, 0.005);
        assert_eq!(gt.pixel_height, -0.005);
    }

    #[test]
    fn model_transformation_round_trips_coefficients() {
        let gt = GeoTransform::from_gdal([10.0, 1.0, 0.1, 20.0, 0.2, -1.0]);
        let back = GeoTransform::from_model_transformation(&gt.to_model_transformation()).unwrap();
        assert_eq!(gt, back);
    }

    #[test]
    fn singular_transform_cannot_invert() {
        let gt = GeoTransform::from_gdal([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(gt.map_to_pixel(Point::new(1.0, 1.0)).is_err());
    }
}
