//! Corpus-wide z-score normalization
//!
//! One mean and one population standard deviation are computed over every
//! pixel of every frame, then each frame is rewritten as `(v - mean) / std`.
//! Frames are read one at a time; per-frame moments are merged pairwise.

use log::{debug, info};

use crate::compression::CompressionKind;
use crate::error::{NightError, NightResult};
use crate::extractor::ExtractedFrame;
use crate::raster::{Raster, RasterProfile, RasterReader, RasterWriter};
use crate::utils::logger::Logger;

/// Shared statistic of a batch of frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorpusStatistics {
    pub global_mean: f64,
    /// Population standard deviation
    pub global_std: f64,
    pub pixel_count: u64,
}

/// Running count, mean and sum of squared deviations
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: &[f64]) -> Self {
        let mut acc = Self::new();
        for &v in values {
            acc.push(v);
        }
        acc
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Combines the moments of two disjoint samples
    pub fn merge(&mut self, other: &StatsAccumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let weight = other.count as f64 / count as f64;
        self.mean += delta * weight;
        self.m2 += other.m2 + delta * delta * self.count as f64 * weight;
        self.count = count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population (ddof = 0) standard deviation
    pub fn std_dev(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.m2 / self.count as f64).sqrt()
    }

    /// Usable statistic, or `Normalization` when it is degenerate
    pub fn finish(&self) -> NightResult<CorpusStatistics> {
        if self.count == 0 {
            return Err(NightError::Normalization("no pixels to normalize".to_string()));
        }
        let stats = CorpusStatistics {
            global_mean: self.mean,
            global_std: self.std_dev(),
            pixel_count: self.count,
        };
        if !stats.global_mean.is_finite() || !stats.global_std.is_finite() {
            return Err(NightError::Normalization(format!(
                "non-finite corpus statistic (mean {}, std {})",
                stats.global_mean, stats.global_std
            )));
        }
        if stats.global_std == 0.0 {
            return Err(NightError::Normalization(format!(
                "all {} pixels equal {}, standard deviation is zero",
                stats.pixel_count, stats.global_mean
            )));
        }
        Ok(stats)
    }
}

/// Rewrites frames as z-scores of the whole batch
pub struct CorpusNormalizer<'a> {
    writer: RasterWriter,
    logger: &'a Logger,
}

impl<'a> CorpusNormalizer<'a> {
    pub fn new(compression: CompressionKind, logger: &'a Logger) -> Self {
        CorpusNormalizer {
            writer: RasterWriter::new(compression),
            logger,
        }
    }

    /// Mean and standard deviation over every pixel of every frame
    pub fn compute(&self, frames: &[ExtractedFrame]) -> NightResult<CorpusStatistics> {
        let mut total = StatsAccumulator::new();
        for frame in frames {
            let raster = read_frame(frame)?;
            let acc = StatsAccumulator::from_values(&raster.data);
            debug!("{}: {} pixels, mean {:.4}", frame.path.display(), acc.count(), acc.mean());
            total.merge(&acc);
        }
        total.finish()
    }

    /// Overwrites each frame with its z-scores under `stats`
    pub fn normalize(&self, frames: &[ExtractedFrame], stats: &CorpusStatistics) -> NightResult<()> {
        for frame in frames {
            let raster = read_frame(frame)?;
            let data = raster.data.iter()
                .map(|v| (v - stats.global_mean) / stats.global_std)
                .collect();
            let profile = RasterProfile {
                sample_type: raster.profile.sample_type.normalized(),
                ..raster.profile
            };
            self.writer.write(&frame.path, &Raster::new(profile, data))
                .map_err(|e| NightError::tiff(&frame.path, e))?;
        }
        Ok(())
    }

    /// Computes the corpus statistic and normalizes every frame with it
    ///
    /// Nothing is rewritten when the statistic is degenerate.
    pub fn run(&self, frames: &[ExtractedFrame]) -> NightResult<CorpusStatistics> {
        let stats = self.compute(frames)?;
        info!("Corpus of {} frames: mean {:.6}, std {:.6}, {} pixels",
              frames.len(), stats.global_mean, stats.global_std, stats.pixel_count);
        self.normalize(frames, &stats)?;
        self.logger.log(&format!(
            "Normalized {} frames (mean {}, std {})",
            frames.len(), stats.global_mean, stats.global_std
        )).map_err(NightError::run_log)?;
        Ok(stats)
    }
}

fn read_frame(frame: &ExtractedFrame) -> NightResult<Raster> {
    RasterReader::open(&frame.path)
        .and_then(|mut reader| reader.read_all())
        .map_err(|e| NightError::tiff(&frame.path, e))
}
