//! Windowed GeoTIFF reading

use log::{debug, trace};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{compression, predictor, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::geo;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::validation;

use super::blocks::{BlockDecoder, BlockGrid};
use super::sample::SampleType;
use super::window::PixelWindow;
use super::{Raster, RasterProfile};

/// Reader for the first image of a single-band GeoTIFF
pub struct RasterReader {
    path: PathBuf,
    source: BufReader<File>,
    tiff_reader: TiffReader,
    ifd: IFD,
    byte_order: ByteOrder,
    profile: RasterProfile,
    file_size: u64,
}

impl RasterReader {
    /// Opens a GeoTIFF and reads its profile
    pub fn open(path: &Path) -> TiffResult<Self> {
        let mut tiff_reader = TiffReader::new();
        let tiff = tiff_reader.load(path)?;
        let ifd = tiff.main_ifd().cloned().ok_or(TiffError::NoImage)?;
        trace!("{}", ifd);

        let mut source = BufReader::new(File::open(path)?);
        let file_size = validation::get_file_size(&mut source)?;

        let width = tiff_reader.read_scalar(&mut source, &ifd, tags::IMAGE_WIDTH)?
            .ok_or(TiffError::MissingDimensions)? as usize;
        let height = tiff_reader.read_scalar(&mut source, &ifd, tags::IMAGE_LENGTH)?
            .ok_or(TiffError::MissingDimensions)? as usize;
        if width == 0 || height == 0 {
            return Err(TiffError::MissingDimensions);
        }

        let bands = tiff_reader.read_scalar(&mut source, &ifd, tags::SAMPLES_PER_PIXEL)?.unwrap_or(1);
        if bands != 1 {
            return Err(TiffError::UnsupportedBandCount(bands));
        }

        let bits = tiff_reader.read_scalar(&mut source, &ifd, tags::BITS_PER_SAMPLE)?.unwrap_or(1) as u16;
        let format = tiff_reader.read_scalar(&mut source, &ifd, tags::SAMPLE_FORMAT)?
            .unwrap_or(sample_format::UNSIGNED as u64) as u16;
        let sample_type = SampleType::from_tags(bits, format)?;

        let georef = geo::read_georeference(&tiff_reader, &mut source, &ifd)?;

        let profile = RasterProfile {
            width,
            height,
            sample_type,
            transform: georef.transform,
            geo_keys: georef.keys,
            nodata: georef.nodata,
        };
        debug!("Opened {}: {}x{} {}, nodata {:?}",
               path.display(), width, height, sample_type, profile.nodata);

        Ok(RasterReader {
            path: path.to_path_buf(),
            source,
            byte_order: tiff.byte_order,
            tiff_reader,
            ifd,
            profile,
            file_size,
        })
    }

    pub fn profile(&self) -> &RasterProfile {
        &self.profile
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads a window of samples, row-major
    ///
    /// Pixels of the window that fall outside the raster are set to `fill`.
    /// Only the blocks overlapping the window are decoded.
    pub fn read_window(&mut self, window: &PixelWindow, fill: f64) -> TiffResult<Vec<f64>> {
        let mut out = vec![fill; window.pixel_count()];

        let (col_start, row_start, col_end, row_end) =
            match window.clip(self.profile.width, self.profile.height) {
                Some(clip) => clip,
                None => return Ok(out),
            };

        let grid = BlockGrid::from_ifd(
            &self.tiff_reader, &mut self.source, &self.ifd,
            self.profile.width, self.profile.height,
        )?;
        let compression_code = self.tiff_reader
            .read_scalar(&mut self.source, &self.ifd, tags::COMPRESSION)?
            .unwrap_or(compression::NONE);
        let predictor_code = self.tiff_reader
            .read_scalar(&mut self.source, &self.ifd, tags::PREDICTOR)?
            .unwrap_or(predictor::NONE);
        let decoder = BlockDecoder::new(compression_code, predictor_code, self.profile.sample_type, self.byte_order)?;

        let first_block_row = row_start / grid.block_height;
        let last_block_row = (row_end - 1) / grid.block_height;
        let first_block_col = col_start / grid.block_width;
        let last_block_col = (col_end - 1) / grid.block_width;

        for block_row in first_block_row..=last_block_row {
            let rows = grid.rows_in_block(block_row);
            for block_col in first_block_col..=last_block_col {
                let index = grid.block_index(block_col, block_row);
                let block = decoder.read_block(&mut self.source, &grid, index, rows, self.file_size)?;

                let block_x0 = block_col * grid.block_width;
                let block_y0 = block_row * grid.block_height;
                let y_from = row_start.max(block_y0);
                let y_to = row_end.min(block_y0 + rows);
                let x_from = col_start.max(block_x0);
                let x_to = col_end.min(block_x0 + grid.block_width);

                for y in y_from..y_to {
                    let src_row = (y - block_y0) * grid.block_width;
                    let dst_row = (y as i64 - window.row_off()) as usize * window.width();
                    for x in x_from..x_to {
                        let dst = dst_row + (x as i64 - window.col_off()) as usize;
                        out[dst] = block[src_row + (x - block_x0)];
                    }
                }
            }
        }

        Ok(out)
    }

    /// Reads the whole raster
    pub fn read_all(&mut self) -> TiffResult<Raster> {
        let window = PixelWindow::new(0, 0, self.profile.width, self.profile.height)
            .ok_or(TiffError::MissingDimensions)?;
        let data = self.read_window(&window, 0.0)?;
        Ok(Raster::new(self.profile.clone(), data))
    }
}
