//! GeoTIFF georeference parsing
//!
//! Extracts the affine transform, the GeoKey directory with its parameter
//! tags and the GDAL nodata marker from an IFD. Keys are carried verbatim
//! so an extracted window can declare the same reference system.

use log::debug;

use crate::coordinate::GeoTransform;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// One key of a GeoKey directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    /// 0 for inline SHORT values, else the tag holding the value
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

/// Raw GeoKey directory plus its double and ASCII parameter tags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoKeys {
    pub directory: Vec<u16>,
    pub doubles: Vec<f64>,
    pub ascii: Option<String>,
}

impl GeoKeys {
    /// Whether the file declared no GeoKeys at all
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Decodes the key entries following the 4-short directory header
    pub fn entries(&self) -> Vec<GeoKeyEntry> {
        self.directory
            .get(4..)
            .unwrap_or(&[])
            .chunks_exact(4)
            .map(|c| GeoKeyEntry {
                key_id: c[0],
                tiff_tag_location: c[1],
                count: c[2],
                value_offset: c[3],
            })
            .collect()
    }

    /// Inline SHORT value of a key, if present
    pub fn short_value(&self, key_id: u16) -> Option<u16> {
        self.entries()
            .into_iter()
            .find(|e| e.key_id == key_id && e.tiff_tag_location == 0)
            .map(|e| e.value_offset)
    }
}

/// Georeferencing of one raster
#[derive(Debug, Clone, PartialEq)]
pub struct GeoReference {
    pub transform: GeoTransform,
    pub keys: GeoKeys,
    /// GDAL_NODATA text as stored in the file
    pub nodata: Option<String>,
}

/// Parses GDAL nodata text ("nan", "-3.4e38", "0")
pub fn parse_nodata(text: Option<&str>) -> Option<f64> {
    let text = text?.trim();
    if text.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    text.parse::<f64>().ok()
}

/// Reads the georeference of an IFD
///
/// A ModelTransformation tag takes precedence over a tiepoint/scale pair.
/// Without either, the raster cannot be located and extraction fails.
pub fn read_georeference(
    tiff_reader: &TiffReader,
    reader: &mut dyn SeekableReader,
    ifd: &IFD,
) -> TiffResult<GeoReference> {
    let transform = if ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG) {
        let matrix = tiff_reader.read_f64_values(reader, ifd, tags::MODEL_TRANSFORMATION_TAG)?;
        GeoTransform::from_model_transformation(&matrix)?
    } else if ifd.has_tag(tags::MODEL_TIEPOINT_TAG) && ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) {
        let tiepoint = tiff_reader.read_f64_values(reader, ifd, tags::MODEL_TIEPOINT_TAG)?;
        let scale = tiff_reader.read_f64_values(reader, ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
        GeoTransform::from_tiepoint_and_scale(&tiepoint, &scale)?
    } else {
        return Err(TiffError::MissingGeoreference);
    };
    debug!("Geotransform: {:?}", transform.to_gdal());

    let mut keys = GeoKeys::default();
    if ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
        keys.directory = tiff_reader
            .read_tag_values(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?
            .into_iter()
            .map(|v| v as u16)
            .collect();
    }
    if ifd.has_tag(tags::GEO_DOUBLE_PARAMS_TAG) {
        keys.doubles = tiff_reader.read_f64_values(reader, ifd, tags::GEO_DOUBLE_PARAMS_TAG)?;
    }
    if ifd.has_tag(tags::GEO_ASCII_PARAMS_TAG) {
        keys.ascii = Some(tiff_reader.read_ascii(reader, ifd, tags::GEO_ASCII_PARAMS_TAG)?);
    }
    debug!("GeoKey directory with {} keys", keys.entries().len());

    let nodata = if ifd.has_tag(tags::GDAL_NODATA) {
        Some(tiff_reader.read_ascii(reader, ifd, tags::GDAL_NODATA)?)
    } else {
        None
    };

    Ok(GeoReference { transform, keys, nodata })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_key_entries_after_header() {
        let keys = GeoKeys {
            directory: vec![1, 1, 0, 2, 1024, 0, 1, 2, 2048, 0, 1, 4326],
            doubles: Vec::new(),
            ascii: None,
        };
        let entries = keys.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].key_id, 2048);
        assert_eq!(keys.short_value(2048), Some(4326));
        assert_eq!(keys.short_value(3072), None);
    }

    #[test]
    fn parses_gdal_nodata_text() {
        assert_eq!(parse_nodata(Some("-9999")), Some(-9999.0));
        assert!(parse_nodata(Some("nan")).unwrap().is_nan());
        assert_eq!(parse_nodata(Some("junk")), None);
        assert_eq!(parse_nodata(None), None);
    }
}
