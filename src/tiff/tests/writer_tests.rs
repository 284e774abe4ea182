//! Tests for the TIFF builder and writer

use crate::tiff::builder::TiffBuilder;
use crate::tiff::constants::tags;
use crate::tiff::reader::TiffReader;
use std::fs::File;
use std::io::{BufReader, Read};

fn write_and_reload(builder: &TiffBuilder) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.tif");
    builder.write(&path).unwrap();
    (dir, path)
}

#[test]
fn test_written_tags_read_back() {
    let mut builder = TiffBuilder::new(false);
    builder.set_longs(tags::IMAGE_WIDTH, &[3]);
    builder.set_longs(tags::IMAGE_LENGTH, &[2]);
    builder.set_shorts(tags::BITS_PER_SAMPLE, &[8]);
    builder.set_doubles(tags::MODEL_PIXEL_SCALE_TAG, &[0.5, 0.25, 0.0]);
    builder.set_ascii(tags::GDAL_NODATA, "0");
    builder.set_strips(vec![vec![1, 2, 3], vec![4, 5, 6]], 1);

    let (_dir, path) = write_and_reload(&builder);
    let mut file = BufReader::new(File::open(&path).unwrap());
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut file).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    assert_eq!(reader.read_tag_values(&mut file, ifd, tags::IMAGE_WIDTH).unwrap(), vec![3]);
    assert_eq!(reader.read_tag_values(&mut file, ifd, tags::BITS_PER_SAMPLE).unwrap(), vec![8]);
    assert_eq!(
        reader.read_f64_values(&mut file, ifd, tags::MODEL_PIXEL_SCALE_TAG).unwrap(),
        vec![0.5, 0.25, 0.0]
    );
    assert_eq!(reader.read_ascii(&mut file, ifd, tags::GDAL_NODATA).unwrap(), "0");
    assert_eq!(reader.read_tag_values(&mut file, ifd, tags::STRIP_BYTE_COUNTS).unwrap(), vec![3, 3]);
}

#[test]
fn test_strip_offsets_point_at_strip_data() {
    let mut builder = TiffBuilder::new(false);
    builder.set_longs(tags::IMAGE_WIDTH, &[2]);
    builder.set_longs(tags::IMAGE_LENGTH, &[3]);
    builder.set_strips(vec![vec![10, 11], vec![20, 21], vec![30, 31]], 1);

    let (_dir, path) = write_and_reload(&builder);
    let mut bytes = Vec::new();
    File::open(&path).unwrap().read_to_end(&mut bytes).unwrap();

    let mut cursor = std::io::Cursor::new(bytes.clone());
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();
    let offsets = reader.read_tag_values(&mut cursor, ifd, tags::STRIP_OFFSETS).unwrap();

    assert_eq!(offsets.len(), 3);
    for (i, offset) in offsets.iter().enumerate() {
        let start = *offset as usize;
        assert_eq!(&bytes[start..start + 2], &[10 * (i as u8 + 1), 10 * (i as u8 + 1) + 1]);
    }
}

#[test]
fn test_bigtiff_single_strip_is_inline() {
    let mut builder = TiffBuilder::new(true);
    builder.set_longs(tags::IMAGE_WIDTH, &[4]);
    builder.set_longs(tags::IMAGE_LENGTH, &[1]);
    builder.set_strips(vec![vec![7, 7, 7, 7]], 1);

    let (_dir, path) = write_and_reload(&builder);
    let mut file = BufReader::new(File::open(&path).unwrap());
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut file).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    assert!(tiff.is_big_tiff);
    let offsets = reader.read_tag_values(&mut file, ifd, tags::STRIP_OFFSETS).unwrap();
    assert_eq!(offsets.len(), 1);
    assert_eq!(offsets[0] % 4, 0);
}
