//! End-to-end extraction run
//!
//! A run resets the output directory, selects the archive months of the
//! request, cuts the requested area out of each, records the mean
//! intensity series, normalizes the frames against each other and finally
//! numbers them in date order. The order of these steps matters: the series
//! is taken before normalization, and relabeling relies on the month-based
//! names given at extraction.

mod output;

pub use output::{OutputDirectory, GRAPH_FILE, PREVIEW_DIR, SERIES_FILE, VIDEO_FILE};

use log::{info, warn};
use std::path::PathBuf;

use crate::archive::ArchiveSelector;
use crate::config::PipelineConfig;
use crate::error::{NightError, NightResult};
use crate::extractor::{ExtractedFrame, ExtractionArea, RasterWindowExtractor};
use crate::normalize::{CorpusNormalizer, CorpusStatistics};
use crate::relabel::SequenceRelabeler;
use crate::request::AnalysisRequest;
use crate::series::{draw_intensity_plot, IntensitySeries, IntensitySeriesBuilder};
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub output: OutputDirectory,
    /// Relabeled frames, first to last
    pub frames: Vec<PathBuf>,
    pub series: IntensitySeries,
    pub statistics: CorpusStatistics,
    pub plot_path: PathBuf,
    /// Samples drawn in the plot
    pub plot_points: usize,
    pub csv_path: PathBuf,
}

/// Drives one extraction run over a configured archive
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    logger: &'a Logger,
    show_progress: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PipelineConfig, logger: &'a Logger) -> Self {
        Pipeline {
            config,
            logger,
            show_progress: true,
        }
    }

    /// Enables or disables the console progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Runs every step for `request`
    ///
    /// On failure the output directory keeps whatever the completed steps
    /// wrote.
    pub fn extract_all(&self, request: &AnalysisRequest) -> NightResult<PipelineReport> {
        let archive = &self.config.archive;
        let output_config = &self.config.output;

        let output = OutputDirectory::reset_and_claim(&output_config.directory)?;
        self.milestone(&format!("Output directory {} reset", output.root().display()))?;

        let selector = ArchiveSelector::new(&archive.directory, archive.suffix.as_str(), archive.date_offset);
        let entries = selector.select(request.from_date, request.to_date)?;
        if entries.is_empty() {
            return Err(NightError::EmptyResult { from: request.from_date, to: request.to_date });
        }

        let extractor = RasterWindowExtractor::new(
            archive.ground_sample_distance_m,
            output_config.out_of_bounds,
            output_config.compression,
            self.logger,
        );
        let area = ExtractionArea::from_request(request);
        let progress = if self.show_progress {
            ProgressTracker::new(entries.len() as u64, "Extracting frames")
        } else {
            ProgressTracker::hidden(entries.len() as u64)
        };

        let mut frames: Vec<ExtractedFrame> = Vec::with_capacity(entries.len());
        for entry in &entries {
            let target = output.frame_path(entry.date);
            if frames.iter().any(|f| f.path == target) {
                warn!("Several archive files for {}, {} replaces the earlier one",
                      entry.date.format("%Y-%m"), entry.path.display());
                frames.retain(|f| f.path != target);
            }
            progress.set_message(&format!("{}", entry.date.format("%Y-%m")));
            match extractor.extract(&entry.path, &target, entry.date, &area) {
                Ok(frame) => frames.push(frame),
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            }
            progress.increment(1);
        }
        progress.finish();
        self.milestone(&format!("Extracted {} frames", frames.len()))?;

        let mut builder = IntensitySeriesBuilder::new();
        for frame in &frames {
            builder.add_frame(frame)?;
        }
        let series = builder.build(request.from_date, request.to_date)?;
        let csv_path = output.csv_path();
        series.write_csv(&csv_path)?;
        let plot_path = output.graph_path();
        let plot_points = draw_intensity_plot(&series, &plot_path)?;
        self.milestone(&format!("Intensity series of {} months plotted to {}", series.len(), plot_path.display()))?;

        let normalizer = CorpusNormalizer::new(output_config.compression, self.logger);
        let statistics = normalizer.run(&frames)?;

        let relabeled = SequenceRelabeler::new(output.root()).relabel()?;
        self.milestone(&format!("Relabeled {} frames in {}", relabeled.len(), output.root().display()))?;

        Ok(PipelineReport {
            output,
            frames: relabeled,
            series,
            statistics,
            plot_path,
            plot_points,
            csv_path,
        })
    }

    fn milestone(&self, message: &str) -> NightResult<()> {
        info!("{}", message);
        self.logger.log(message).map_err(NightError::run_log)
    }
}
