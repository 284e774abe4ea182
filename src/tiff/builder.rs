//! TIFF file construction utilities
//!
//! Assembles a single-image TIFF: tags are staged on an IFD, values that do
//! not fit the entry word are kept as external blocks, and the writer lays
//! everything out when the file is produced.

use std::collections::BTreeMap;
use std::path::Path;
use log::debug;

use crate::tiff::constants::{field_types, tags};
use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::{field_type_size, IFD, IFDEntry};
use crate::tiff::writer;
use crate::utils::write_utils;

/// Builder for creating TIFF files
pub struct TiffBuilder {
    is_big_tiff: bool,
    pub ifd: IFD,
    external_data: BTreeMap<u16, Vec<u8>>,
    strips: Vec<Vec<u8>>,
}

impl TiffBuilder {
    /// Create a new TIFF builder
    pub fn new(is_big_tiff: bool) -> Self {
        debug!("Creating new TiffBuilder (is_big_tiff: {})", is_big_tiff);
        TiffBuilder {
            is_big_tiff,
            ifd: IFD::new(0, 0),
            external_data: BTreeMap::new(),
            strips: Vec::new(),
        }
    }

    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Stages a tag from its little-endian value bytes
    ///
    /// Values up to the entry word size are packed inline; larger ones are
    /// written as an external block.
    pub fn set_tag_bytes(&mut self, tag: u16, field_type: u16, bytes: Vec<u8>) {
        let count = (bytes.len() / field_type_size(field_type).max(1)) as u64;
        let inline_size = if self.is_big_tiff { 8 } else { 4 };

        let value_offset = if bytes.len() <= inline_size {
            self.external_data.remove(&tag);
            write_utils::pack_inline(&bytes)
        } else {
            self.external_data.insert(tag, bytes);
            0
        };

        self.ifd.add_entry(IFDEntry::new(tag, field_type, count, value_offset));
    }

    pub fn set_shorts(&mut self, tag: u16, values: &[u16]) {
        self.set_tag_bytes(tag, field_types::SHORT, write_utils::u16_bytes(values));
    }

    pub fn set_longs(&mut self, tag: u16, values: &[u32]) {
        self.set_tag_bytes(tag, field_types::LONG, write_utils::u32_bytes(values));
    }

    pub fn set_doubles(&mut self, tag: u16, values: &[f64]) {
        self.set_tag_bytes(tag, field_types::DOUBLE, write_utils::f64_bytes(values));
    }

    pub fn set_ascii(&mut self, tag: u16, text: &str) {
        self.set_tag_bytes(tag, field_types::ASCII, write_utils::ascii_bytes(text));
    }

    /// Stages the encoded strips of the image
    ///
    /// StripOffsets gets placeholder values sized for the final offsets;
    /// the writer fills them in once the layout is known.
    pub fn set_strips(&mut self, strips: Vec<Vec<u8>>, rows_per_strip: u32) {
        let counts: Vec<u64> = strips.iter().map(|s| s.len() as u64).collect();

        if self.is_big_tiff {
            self.set_tag_bytes(tags::STRIP_OFFSETS, field_types::LONG8, write_utils::u64_bytes(&vec![0; strips.len()]));
            self.set_tag_bytes(tags::STRIP_BYTE_COUNTS, field_types::LONG8, write_utils::u64_bytes(&counts));
        } else {
            let counts: Vec<u32> = counts.iter().map(|&c| c as u32).collect();
            self.set_longs(tags::STRIP_OFFSETS, &vec![0; strips.len()]);
            self.set_longs(tags::STRIP_BYTE_COUNTS, &counts);
        }
        self.set_longs(tags::ROWS_PER_STRIP, &[rows_per_strip]);

        debug!("Staged {} strips ({} bytes)", strips.len(), counts.iter().sum::<u64>());
        self.strips = strips;
    }

    /// Write the TIFF file to disk
    pub fn write(&self, output_path: &Path) -> TiffResult<()> {
        writer::write_file(
            output_path,
            self.is_big_tiff,
            &self.ifd,
            &self.external_data,
            &self.strips,
        )
    }
}
