use chrono::NaiveDate;
use log::info;
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveEntry, ArchiveSelector};
use crate::config::PipelineConfig;
use crate::error::{NightError, NightResult};
use crate::extractor::{ExtractionArea, RasterWindowExtractor};
use crate::pipeline::{OutputDirectory, Pipeline, PipelineReport};
use crate::raster::{RasterSummary, RasterWriter};
use crate::render::FrameRenderer;
use crate::request::{AnalysisRequest, RawRequest};
use crate::utils::logger::Logger;

/// Main interface to the nightkit library
pub struct NightKit {
    config: PipelineConfig,
    logger: Logger,
}

impl NightKit {
    /// Create a new NightKit instance
    ///
    /// The run log goes to the configured `[logging] file`, if any.
    pub fn new(config: PipelineConfig) -> NightResult<Self> {
        config.validate()?;
        let level = config.logging.level_filter()?;
        let logger = match &config.logging.file {
            Some(path) => Logger::new(path, level)
                .map_err(|e| NightError::io(format!("Failed to open log {}", path.display()), e))?,
            None => Logger::without_file(level),
        };
        Ok(NightKit { config, logger })
    }

    /// Instance with an explicit logger
    pub fn with_logger(config: PipelineConfig, logger: Logger) -> Self {
        NightKit { config, logger }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Validates a JSON request document against the archive coverage
    pub fn validate_request(&self, json: &str) -> NightResult<AnalysisRequest> {
        RawRequest::from_json_str(json)?.validate(self.config.archive.coverage()?)
    }

    /// Runs the full pipeline for a validated request
    pub fn run(&self, request: &AnalysisRequest) -> NightResult<PipelineReport> {
        Pipeline::new(&self.config, &self.logger)
            .with_progress(false)
            .extract_all(request)
    }

    /// Archive files acquired between `from` and `to`, inclusive
    pub fn select(&self, from: NaiveDate, to: NaiveDate) -> NightResult<Vec<ArchiveEntry>> {
        let archive = &self.config.archive;
        ArchiveSelector::new(&archive.directory, archive.suffix.as_str(), archive.date_offset).select(from, to)
    }

    /// Cuts `area` out of `input` and writes it to `output`
    ///
    /// # Returns
    /// Width and height of the written window in pixels
    pub fn extract(&self, input: &Path, output: &Path, area: &ExtractionArea) -> NightResult<(usize, usize)> {
        let extractor = RasterWindowExtractor::new(
            self.config.archive.ground_sample_distance_m,
            self.config.output.out_of_bounds,
            self.config.output.compression,
            &self.logger,
        );
        let raster = extractor.extract_raster(input, area)?;
        RasterWriter::new(self.config.output.compression)
            .write(output, &raster)
            .map_err(|e| NightError::tiff(output, e))?;
        info!("Extracted {}x{} window to {}", raster.width(), raster.height(), output.display());
        Ok((raster.width(), raster.height()))
    }

    /// Writes previews of the configured output directory and, if asked, the video
    pub fn render(&self, video: bool) -> NightResult<Vec<PathBuf>> {
        let output = OutputDirectory::open(&self.config.output.directory)?;
        let renderer = FrameRenderer::new(self.config.render.framerate, self.config.render.ffmpeg.as_str(), &self.logger);
        let mut written = renderer.write_previews(&output)?;
        if video {
            written.push(renderer.encode_video(&output)?);
        }
        Ok(written)
    }

    /// Size, sample type, georeferencing and nodata statistics of a GeoTIFF
    pub fn describe(&self, input: &Path) -> NightResult<RasterSummary> {
        RasterSummary::read(input).map_err(|e| NightError::tiff(input, e))
    }
}
