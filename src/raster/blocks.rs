//! Strip and tile block access
//!
//! Stripped and tiled images are both handled as a grid of blocks: a strip
//! is a block as wide as the image. Each block is read, decompressed,
//! un-predicted and converted to `f64` samples.

use log::{debug, trace};
use std::io::{Read, Seek, SeekFrom};

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{predictor, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::validation;

use super::sample::SampleType;

/// Block layout of an image
#[derive(Debug, Clone)]
pub struct BlockGrid {
    pub block_width: usize,
    pub block_height: usize,
    pub blocks_across: usize,
    pub offsets: Vec<u64>,
    pub byte_counts: Vec<u64>,
    pub tiled: bool,
    image_height: usize,
}

impl BlockGrid {
    /// Reads the strip or tile layout of an IFD
    pub fn from_ifd(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD,
        width: usize,
        height: usize,
    ) -> TiffResult<Self> {
        let grid = if ifd.is_tiled() {
            let block_width = tiff_reader.read_scalar(reader, ifd, tags::TILE_WIDTH)?.unwrap_or(256) as usize;
            let block_height = tiff_reader.read_scalar(reader, ifd, tags::TILE_LENGTH)?.unwrap_or(256) as usize;
            BlockGrid {
                block_width,
                block_height,
                blocks_across: width.div_ceil(block_width.max(1)),
                offsets: tiff_reader.read_tag_values(reader, ifd, tags::TILE_OFFSETS)?,
                byte_counts: tiff_reader.read_tag_values(reader, ifd, tags::TILE_BYTE_COUNTS)?,
                tiled: true,
                image_height: height,
            }
        } else {
            let rows_per_strip = match tiff_reader.read_scalar(reader, ifd, tags::ROWS_PER_STRIP)? {
                Some(rows) if rows > 0 => (rows as usize).min(height),
                _ => height,
            };
            BlockGrid {
                block_width: width,
                block_height: rows_per_strip,
                blocks_across: 1,
                offsets: tiff_reader.read_tag_values(reader, ifd, tags::STRIP_OFFSETS)?,
                byte_counts: tiff_reader.read_tag_values(reader, ifd, tags::STRIP_BYTE_COUNTS)?,
                tiled: false,
                image_height: height,
            }
        };

        if grid.block_width == 0 || grid.block_height == 0 {
            return Err(TiffError::MissingDimensions);
        }
        if grid.offsets.len() != grid.byte_counts.len() {
            return Err(TiffError::GenericError(format!(
                "{} block offsets but {} byte counts",
                grid.offsets.len(), grid.byte_counts.len()
            )));
        }

        debug!("{} layout: {}x{} blocks, {} total",
               if grid.tiled { "Tile" } else { "Strip" },
               grid.block_width, grid.block_height, grid.offsets.len());
        Ok(grid)
    }

    /// Index of the block holding pixel row/column block coordinates
    pub fn block_index(&self, block_col: usize, block_row: usize) -> usize {
        block_row * self.blocks_across + block_col
    }

    /// Rows of pixel data stored in the block at `block_row`
    ///
    /// Tiles are always full size; the last strip may be shorter.
    pub fn rows_in_block(&self, block_row: usize) -> usize {
        if self.tiled {
            self.block_height
        } else {
            let start = block_row * self.block_height;
            self.block_height.min(self.image_height.saturating_sub(start))
        }
    }
}

/// Decodes raw blocks into samples
pub struct BlockDecoder {
    compression: Box<dyn CompressionHandler>,
    predictor: u64,
    sample_type: SampleType,
    byte_order: ByteOrder,
}

impl BlockDecoder {
    pub fn new(compression_code: u64, predictor_code: u64, sample_type: SampleType, byte_order: ByteOrder) -> TiffResult<Self> {
        let compression = CompressionFactory::create_handler(compression_code)?;

        match predictor_code {
            predictor::NONE => {}
            predictor::HORIZONTAL_DIFFERENCING if !sample_type.is_float() => {}
            other => return Err(TiffError::UnsupportedPredictor(other)),
        }

        debug!("Block decoder: {} compression, predictor {}, {} samples",
               compression.name(), predictor_code, sample_type);

        Ok(BlockDecoder {
            compression,
            predictor: predictor_code,
            sample_type,
            byte_order,
        })
    }

    /// Reads and decodes block `index` with the given pixel dimensions
    pub fn read_block(
        &self,
        reader: &mut dyn SeekableReader,
        grid: &BlockGrid,
        index: usize,
        rows: usize,
        file_size: u64,
    ) -> TiffResult<Vec<f64>> {
        let (offset, byte_count) = match (grid.offsets.get(index), grid.byte_counts.get(index)) {
            (Some(&o), Some(&c)) => (o, c),
            _ => return Err(TiffError::GenericError(format!(
                "Block {} missing from a layout of {} blocks", index, grid.offsets.len()
            ))),
        };
        validation::validate_block_range(index, offset, byte_count, file_size)?;
        trace!("Reading block {} at offset {} with {} bytes", index, offset, byte_count);

        let mut raw = vec![0u8; byte_count as usize];
        reader.seek(SeekFrom::Start(offset))?;
        reader.read_exact(&mut raw)?;

        let mut data = self.compression.decompress(&raw)?;

        let sample_bytes = self.sample_type.bytes();
        let expected = grid.block_width * rows * sample_bytes;
        if data.len() < expected {
            return Err(TiffError::CorruptBlock { index, expected, actual: data.len() });
        }

        if self.predictor == predictor::HORIZONTAL_DIFFERENCING {
            self.undo_horizontal_predictor(&mut data[..expected], grid.block_width);
        }

        Ok(data[..expected]
            .chunks_exact(sample_bytes)
            .map(|chunk| self.sample_type.decode(chunk, self.byte_order))
            .collect())
    }

    /// Reverses horizontal differencing row by row, one sample at a time
    fn undo_horizontal_predictor(&self, data: &mut [u8], row_samples: usize) {
        let width = self.sample_type.bytes();
        let mask = if width == 8 { u64::MAX } else { (1u64 << (width * 8)) - 1 };
        let row_bytes = row_samples * width;

        for row in data.chunks_exact_mut(row_bytes) {
            let mut previous = self.sample_type.read_bits(row, self.byte_order);
            for i in 1..row_samples {
                let cell = &mut row[i * width..(i + 1) * width];
                let value = self.sample_type.read_bits(cell, self.byte_order).wrapping_add(previous) & mask;
                self.sample_type.write_bits(value, cell, self.byte_order);
                previous = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiff::constants::compression;
    use std::io::Cursor;

    fn strip_grid(width: usize, rows: usize, bytes: &[u8]) -> BlockGrid {
        BlockGrid {
            block_width: width,
            block_height: rows,
            blocks_across: 1,
            offsets: vec![0],
            byte_counts: vec![bytes.len() as u64],
            tiled: false,
            image_height: rows,
        }
    }

    #[test]
    fn horizontal_predictor_works_per_sample() {
        // Row of u16 [1000, 1001, 999] stored as differences [1000, 1, -1]
        let mut bytes = Vec::new();
        for v in [1000u16, 1, u16::MAX] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let grid = strip_grid(3, 1, &bytes);
        let decoder = BlockDecoder::new(
            compression::NONE,
            predictor::HORIZONTAL_DIFFERENCING,
            SampleType::U16,
            ByteOrder::LittleEndian,
        ).unwrap();

        let len = bytes.len() as u64;
        let values = decoder.read_block(&mut Cursor::new(bytes), &grid, 0, 1, len).unwrap();
        assert_eq!(values, vec![1000.0, 1001.0, 1000.0]);
    }

    #[test]
    fn short_block_is_corrupt() {
        let bytes = vec![0u8; 6];
        let grid = strip_grid(2, 2, &bytes);
        let decoder = BlockDecoder::new(compression::NONE, predictor::NONE, SampleType::U16, ByteOrder::LittleEndian).unwrap();

        match decoder.read_block(&mut Cursor::new(bytes), &grid, 0, 2, 6) {
            Err(TiffError::CorruptBlock { expected: 8, actual: 6, .. }) => {}
            other => panic!("expected CorruptBlock, got {:?}", other),
        }
    }

    #[test]
    fn float_predictor_is_rejected() {
        assert!(BlockDecoder::new(compression::NONE, predictor::HORIZONTAL_DIFFERENCING, SampleType::F32, ByteOrder::LittleEndian).is_err());
        assert!(BlockDecoder::new(compression::NONE, 3, SampleType::F32, ByteOrder::LittleEndian).is_err());
    }
}
