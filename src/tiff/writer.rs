//! TIFF file layout and serialization
//!
//! Files are written little-endian in one forward pass:
//! header, the single IFD, external tag blocks, then the strips, each
//! section starting on a 4-byte boundary.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use log::debug;

use crate::tiff::constants::{header, tags};
use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::utils::write_utils;

/// Writes a single-IFD TIFF to `output_path`
pub fn write_file(
    output_path: &Path,
    is_big_tiff: bool,
    ifd: &IFD,
    external_data: &BTreeMap<u16, Vec<u8>>,
    strips: &[Vec<u8>],
) -> TiffResult<()> {
    debug!("Writing TIFF to {}", output_path.display());

    let file = File::create(output_path)?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);
    write_to(&mut writer, is_big_tiff, ifd, external_data, strips)?;
    writer.flush()?;
    Ok(())
}

/// Serializes a single-IFD TIFF into any writer
pub fn write_to(
    writer: &mut impl Write,
    is_big_tiff: bool,
    ifd: &IFD,
    external_data: &BTreeMap<u16, Vec<u8>>,
    strips: &[Vec<u8>],
) -> TiffResult<()> {
    let entries = write_utils::sorted_entries(&ifd.entries);
    let header_size: u64 = if is_big_tiff { 16 } else { 8 };
    let ifd_size = calculate_ifd_size(entries.len(), is_big_tiff);

    let mut current_offset = write_utils::align_to_4_bytes(header_size + ifd_size);

    let mut block_offsets = BTreeMap::new();
    for (tag, data) in external_data {
        block_offsets.insert(*tag, current_offset);
        current_offset = write_utils::align_to_4_bytes(current_offset + data.len() as u64);
    }

    let mut strip_offsets = Vec::with_capacity(strips.len());
    for strip in strips {
        strip_offsets.push(current_offset);
        current_offset = write_utils::align_to_4_bytes(current_offset + strip.len() as u64);
    }

    let strip_offset_bytes = if is_big_tiff {
        write_utils::u64_bytes(&strip_offsets)
    } else {
        let narrow: Vec<u32> = strip_offsets.iter().map(|&o| o as u32).collect();
        write_utils::u32_bytes(&narrow)
    };

    write_header(writer, is_big_tiff, header_size)?;
    write_ifd(writer, &entries, is_big_tiff, |entry| {
        if let Some(offset) = block_offsets.get(&entry.tag) {
            *offset
        } else if entry.tag == tags::STRIP_OFFSETS {
            write_utils::pack_inline(&strip_offset_bytes)
        } else {
            entry.value_offset
        }
    })?;
    write_utils::write_padding(writer, ifd_size as usize)?;

    for (tag, data) in external_data {
        let data = if *tag == tags::STRIP_OFFSETS { &strip_offset_bytes } else { data };
        writer.write_all(data)?;
        write_utils::write_padding(writer, data.len())?;
    }

    for strip in strips {
        writer.write_all(strip)?;
        write_utils::write_padding(writer, strip.len())?;
    }

    debug!("Wrote {} entries, {} blocks, {} strips ({} bytes)",
           entries.len(), external_data.len(), strips.len(), current_offset);
    Ok(())
}

/// Size of an IFD with `entry_count` entries, including the next-IFD link
fn calculate_ifd_size(entry_count: usize, is_big_tiff: bool) -> u64 {
    let entry_count = entry_count as u64;
    if is_big_tiff {
        8 + 20 * entry_count + 8
    } else {
        2 + 12 * entry_count + 4
    }
}

fn write_header(writer: &mut impl Write, is_big_tiff: bool, first_ifd_offset: u64) -> TiffResult<()> {
    writer.write_all(&header::LITTLE_ENDIAN_MARKER)?;

    if is_big_tiff {
        writer.write_all(&header::BIG_TIFF_VERSION.to_le_bytes())?;
        writer.write_all(&header::BIGTIFF_OFFSET_SIZE.to_le_bytes())?;
        writer.write_all(&0u16.to_le_bytes())?;
        writer.write_all(&first_ifd_offset.to_le_bytes())?;
    } else {
        writer.write_all(&header::TIFF_VERSION.to_le_bytes())?;
        writer.write_all(&(first_ifd_offset as u32).to_le_bytes())?;
    }

    Ok(())
}

fn write_ifd(
    writer: &mut impl Write,
    entries: &[IFDEntry],
    is_big_tiff: bool,
    value_word: impl Fn(&IFDEntry) -> u64,
) -> TiffResult<()> {
    if is_big_tiff {
        writer.write_all(&(entries.len() as u64).to_le_bytes())?;
    } else {
        writer.write_all(&(entries.len() as u16).to_le_bytes())?;
    }

    for entry in entries {
        writer.write_all(&entry.tag.to_le_bytes())?;
        writer.write_all(&entry.field_type.to_le_bytes())?;

        let value = value_word(entry);
        if is_big_tiff {
            writer.write_all(&entry.count.to_le_bytes())?;
            writer.write_all(&value.to_le_bytes())?;
        } else {
            writer.write_all(&(entry.count as u32).to_le_bytes())?;
            writer.write_all(&(value as u32).to_le_bytes())?;
        }
    }

    // Single image: no next IFD
    if is_big_tiff {
        writer.write_all(&0u64.to_le_bytes())?;
    } else {
        writer.write_all(&0u32.to_le_bytes())?;
    }

    Ok(())
}
