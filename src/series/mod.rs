//! Mean-intensity time series
//!
//! Built from the frames before normalization, one sample per acquisition
//! month, always in ascending date order.

mod plot;

pub use plot::{draw_intensity_plot, tick_label, PLOT_SIZE};

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::path::Path;

use crate::error::{NightError, NightResult};
use crate::extractor::ExtractedFrame;
use crate::raster::RasterReader;
use crate::tiff::errors::TiffError;

/// Mean pixel value of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensitySample {
    pub date: NaiveDate,
    pub mean_value: f64,
}

/// One CSV row
#[derive(Serialize)]
struct SeriesRow {
    date: String,
    mean: f64,
}

/// Samples sorted ascending by date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntensitySeries {
    samples: Vec<IntensitySample>,
}

impl IntensitySeries {
    pub fn samples(&self) -> &[IntensitySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Writes the series as `date,mean` rows, dates as YYYY-MM
    pub fn write_csv(&self, path: &Path) -> NightResult<()> {
        let failed = |e: csv::Error| NightError::io(format!("Failed to write series {}", path.display()), e.into());
        let mut writer = csv::Writer::from_path(path).map_err(failed)?;
        for sample in &self.samples {
            writer.serialize(SeriesRow {
                date: sample.date.format("%Y-%m").to_string(),
                mean: sample.mean_value,
            }).map_err(failed)?;
        }
        writer.flush().map_err(|e| NightError::io(format!("Failed to write series {}", path.display()), e))
    }
}

/// Collects frame means into a series
#[derive(Debug, Default)]
pub struct IntensitySeriesBuilder {
    samples: Vec<IntensitySample>,
}

impl IntensitySeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: IntensitySample) {
        self.samples.push(sample);
    }

    /// Reads a frame and records its mean pixel value
    pub fn add_frame(&mut self, frame: &ExtractedFrame) -> NightResult<()> {
        let raster = RasterReader::open(&frame.path)
            .and_then(|mut reader| reader.read_all())
            .map_err(|e| NightError::tiff(&frame.path, e))?;
        let mean_value = raster.mean()
            .ok_or_else(|| NightError::tiff(&frame.path, TiffError::MissingDimensions))?;
        debug!("{}: mean intensity {}", frame.path.display(), mean_value);
        self.push(IntensitySample { date: frame.date, mean_value });
        Ok(())
    }

    /// Sorts the samples by date
    ///
    /// `from` and `to` name the requested range in the `EmptyResult` error
    /// raised when nothing was collected.
    pub fn build(mut self, from: NaiveDate, to: NaiveDate) -> NightResult<IntensitySeries> {
        if self.samples.is_empty() {
            return Err(NightError::EmptyResult { from, to });
        }
        self.samples.sort_by_key(|s| s.date);
        Ok(IntensitySeries { samples: self.samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn month(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, m, 1).unwrap()
    }

    #[test]
    fn series_is_sorted_regardless_of_input_order() {
        let mut builder = IntensitySeriesBuilder::new();
        for (m, v) in [(5, 5.0), (1, 1.0), (3, 3.0), (2, 2.0)] {
            builder.push(IntensitySample { date: month(m), mean_value: v });
        }
        let series = builder.build(month(1), month(5)).unwrap();
        let dates: Vec<NaiveDate> = series.samples().iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![month(1), month(2), month(3), month(5)]);
    }

    #[test]
    fn empty_series_is_empty_result() {
        let err = IntensitySeriesBuilder::new().build(month(1), month(2)).unwrap_err();
        assert!(matches!(err, NightError::EmptyResult { .. }));
    }

    #[test]
    fn csv_lists_months_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intensity.csv");
        let mut builder = IntensitySeriesBuilder::new();
        builder.push(IntensitySample { date: month(2), mean_value: 2.5 });
        builder.push(IntensitySample { date: month(1), mean_value: 0.75 });
        builder.build(month(1), month(2)).unwrap().write_csv(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "date,mean\n2016-01,0.75\n2016-02,2.5\n");
    }
}
