//! GeoTIFF frame writing

use log::debug;
use std::path::Path;

use crate::compression::{CompressionFactory, CompressionKind};
use crate::tiff::builder::TiffBuilder;
use crate::tiff::constants::{photometric, planar_config, tags};
use crate::tiff::errors::{TiffError, TiffResult};

use super::Raster;

/// Target uncompressed size of one strip
const STRIP_TARGET_BYTES: usize = 64 * 1024;

/// Above this payload size frames are written as BigTIFF
const CLASSIC_TIFF_LIMIT: usize = u32::MAX as usize / 2;

/// Writes rasters as single-band, stripped GeoTIFFs
pub struct RasterWriter {
    compression: CompressionKind,
}

impl RasterWriter {
    pub fn new(compression: CompressionKind) -> Self {
        RasterWriter { compression }
    }

    /// Writes `raster` to `path`, replacing any existing file
    pub fn write(&self, path: &Path, raster: &Raster) -> TiffResult<()> {
        let profile = &raster.profile;
        if raster.data.len() != profile.width * profile.height {
            return Err(TiffError::GenericError(format!(
                "Raster holds {} samples for a {}x{} grid",
                raster.data.len(), profile.width, profile.height
            )));
        }

        let sample_type = profile.sample_type;
        let row_bytes = profile.width * sample_type.bytes();
        let is_big_tiff = row_bytes * profile.height > CLASSIC_TIFF_LIMIT;
        let rows_per_strip = (STRIP_TARGET_BYTES / row_bytes.max(1)).clamp(1, profile.height.max(1));

        let mut builder = TiffBuilder::new(is_big_tiff);
        builder.set_longs(tags::IMAGE_WIDTH, &[profile.width as u32]);
        builder.set_longs(tags::IMAGE_LENGTH, &[profile.height as u32]);
        builder.set_shorts(tags::BITS_PER_SAMPLE, &[sample_type.bits()]);
        builder.set_shorts(tags::COMPRESSION, &[self.compression.code() as u16]);
        builder.set_shorts(tags::PHOTOMETRIC_INTERPRETATION, &[photometric::BLACK_IS_ZERO]);
        builder.set_shorts(tags::SAMPLES_PER_PIXEL, &[1]);
        builder.set_shorts(tags::PLANAR_CONFIGURATION, &[planar_config::CHUNKY]);
        builder.set_shorts(tags::SAMPLE_FORMAT, &[sample_type.format_code()]);
        builder.set_ascii(tags::SOFTWARE, concat!("nightkit ", env!("CARGO_PKG_VERSION")));

        let transform = &profile.transform;
        if transform.is_north_up() {
            builder.set_doubles(tags::MODEL_PIXEL_SCALE_TAG, &[transform.pixel_width, -transform.pixel_height, 0.0]);
            builder.set_doubles(tags::MODEL_TIEPOINT_TAG, &[0.0, 0.0, 0.0, transform.origin_x, transform.origin_y, 0.0]);
        } else {
            builder.set_doubles(tags::MODEL_TRANSFORMATION_TAG, &transform.to_model_transformation());
        }

        let keys = &profile.geo_keys;
        if !keys.is_empty() {
            builder.set_shorts(tags::GEO_KEY_DIRECTORY_TAG, &keys.directory);
        }
        if !keys.doubles.is_empty() {
            builder.set_doubles(tags::GEO_DOUBLE_PARAMS_TAG, &keys.doubles);
        }
        if let Some(ascii) = &keys.ascii {
            builder.set_ascii(tags::GEO_ASCII_PARAMS_TAG, ascii);
        }
        if let Some(nodata) = &profile.nodata {
            builder.set_ascii(tags::GDAL_NODATA, nodata);
        }

        let handler = CompressionFactory::for_kind(self.compression);
        let mut strips = Vec::new();
        for chunk in raster.data.chunks(rows_per_strip * profile.width) {
            let mut bytes = Vec::with_capacity(chunk.len() * sample_type.bytes());
            for &value in chunk {
                sample_type.encode_le(value, &mut bytes);
            }
            strips.push(handler.compress(&bytes)?);
        }
        builder.set_strips(strips, rows_per_strip as u32);

        debug!("Writing {}x{} {} frame to {} ({} compression)",
               profile.width, profile.height, sample_type, path.display(), handler.name());
        builder.write(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::GeoTransform;
    use crate::raster::test_support::profile;
    use crate::raster::{PixelWindow, RasterReader, SampleType};

    fn ramp(width: usize, height: usize) -> Vec<f64> {
        (0..width * height).map(|i| i as f64 * 0.5).collect()
    }

    #[test]
    fn written_frame_reads_back_with_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.tif");
        let mut p = profile(40, 30);
        p.nodata = Some("-9999".to_string());
        let raster = Raster::new(p, ramp(40, 30));

        RasterWriter::new(CompressionKind::Deflate).write(&path, &raster).unwrap();
        let mut reader = RasterReader::open(&path).unwrap();

        assert_eq!(reader.profile(), &raster.profile);
        assert_eq!(reader.read_all().unwrap().data, raster.data);
    }

    #[test]
    fn windows_straddling_strips_are_assembled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.tif");
        // 9000 f32 columns force one row per strip
        let mut p = profile(9000, 4);
        p.sample_type = SampleType::F32;
        let raster = Raster::new(p, ramp(9000, 4));

        RasterWriter::new(CompressionKind::Zstd).write(&path, &raster).unwrap();
        let mut reader = RasterReader::open(&path).unwrap();
        let window = PixelWindow::new(8998, 1, 2, 2).unwrap();
        let values = reader.read_window(&window, 0.0).unwrap();

        assert_eq!(values, vec![
            raster.get(8998, 1).unwrap(), raster.get(8999, 1).unwrap(),
            raster.get(8998, 2).unwrap(), raster.get(8999, 2).unwrap(),
        ]);
    }

    #[test]
    fn outside_pixels_take_fill_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.tif");
        let mut p = profile(4, 4);
        p.sample_type = SampleType::U16;
        let raster = Raster::new(p, (0..16).map(|v| v as f64).collect());

        RasterWriter::new(CompressionKind::None).write(&path, &raster).unwrap();
        let mut reader = RasterReader::open(&path).unwrap();
        let values = reader.read_window(&PixelWindow::new(-1, -1, 2, 2).unwrap(), 77.0).unwrap();

        assert_eq!(values, vec![77.0, 77.0, 77.0, 0.0]);
    }

    #[test]
    fn rotated_transform_survives_as_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotated.tif");
        let mut p = profile(3, 3);
        p.transform = GeoTransform::from_gdal([10.0, 1.0, 0.25, 20.0, 0.5, -1.0]);
        let raster = Raster::new(p, ramp(3, 3));

        RasterWriter::new(CompressionKind::Deflate).write(&path, &raster).unwrap();
        let reader = RasterReader::open(&path).unwrap();

        assert_eq!(reader.profile().transform, raster.profile.transform);
    }
}
