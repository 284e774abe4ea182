//! Tests for the TIFF reader

use super::test_utils::{create_big_endian_tiff_buffer, create_test_bigtiff_buffer, create_test_tiff_buffer};
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::tags;
use crate::tiff::errors::TiffError;
use crate::tiff::reader::TiffReader;
use std::io::Cursor;

#[test]
fn test_reads_classic_little_endian_ifd() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    assert!(!tiff.is_big_tiff);
    assert_eq!(tiff.byte_order, ByteOrder::LittleEndian);
    assert_eq!(tiff.ifd_count(), 1);

    let ifd = tiff.main_ifd().unwrap();
    assert_eq!(reader.read_tag_values(&mut cursor, ifd, tags::IMAGE_WIDTH).unwrap(), vec![800]);
    assert_eq!(reader.read_tag_values(&mut cursor, ifd, tags::IMAGE_LENGTH).unwrap(), vec![600]);
    assert_eq!(reader.read_ascii(&mut cursor, ifd, tags::GDAL_NODATA).unwrap(), "-9999");
}

#[test]
fn test_inline_shorts_in_big_endian_file() {
    let mut cursor = create_big_endian_tiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    assert_eq!(tiff.byte_order, ByteOrder::BigEndian);
    assert_eq!(reader.read_tag_values(&mut cursor, ifd, tags::IMAGE_WIDTH).unwrap(), vec![640]);
    assert_eq!(reader.read_tag_values(&mut cursor, ifd, tags::BITS_PER_SAMPLE).unwrap(), vec![16, 32]);
}

#[test]
fn test_reads_bigtiff_header() {
    let mut cursor = create_test_bigtiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    assert!(tiff.is_big_tiff);
    assert!(reader.is_big_tiff());
    let ifd = tiff.main_ifd().unwrap();
    assert_eq!(reader.read_tag_values(&mut cursor, ifd, tags::IMAGE_WIDTH).unwrap(), vec![1024]);
}

#[test]
fn test_missing_tag_is_reported() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    match reader.read_tag_values(&mut cursor, ifd, tags::COMPRESSION) {
        Err(TiffError::TagNotFound(tag)) => assert_eq!(tag, tags::COMPRESSION),
        other => panic!("expected TagNotFound, got {:?}", other),
    }
}

#[test]
fn test_rejects_unknown_version() {
    let mut bytes = create_test_tiff_buffer().into_inner();
    bytes[2] = 99;
    let mut cursor = Cursor::new(bytes);

    match TiffReader::new().read(&mut cursor) {
        Err(TiffError::UnsupportedVersion(99)) => {}
        other => panic!("expected UnsupportedVersion, got {:?}", other),
    }
}

#[test]
fn test_rejects_truncated_file() {
    let mut cursor = Cursor::new(vec![0x49, 0x49, 42]);
    assert!(TiffReader::new().read(&mut cursor).is_err());
}
