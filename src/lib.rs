//! nightkit: nighttime-light time series from monthly GeoTIFF composites
//!
//! Cuts a ground rectangle out of every archive month in a date range,
//! plots the mean intensity over time, normalizes the frames against each
//! other and numbers them for animation.

pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod coordinate;
pub mod raster;
pub mod extractor;
pub mod archive;
pub mod normalize;
pub mod series;
pub mod relabel;
pub mod render;
pub mod request;
pub mod pipeline;
pub mod config;
pub mod error;
pub mod commands;
pub mod api;

pub use crate::api::NightKit;

pub use archive::{ArchiveEntry, ArchiveSelector, DateExtractor, FixedOffsetDateExtractor};
pub use config::PipelineConfig;
pub use coordinate::{GeoTransform, Point};
pub use error::{NightError, NightResult};
pub use extractor::{ExtractedFrame, ExtractionArea, OutOfBoundsPolicy, RasterWindowExtractor};
pub use normalize::{CorpusNormalizer, CorpusStatistics};
pub use pipeline::{OutputDirectory, Pipeline, PipelineReport};
pub use raster::{PixelWindow, Raster, RasterProfile, RasterReader, RasterSummary, RasterWriter};
pub use relabel::SequenceRelabeler;
pub use request::{AnalysisRequest, RawRequest};
pub use series::{IntensitySample, IntensitySeries, IntensitySeriesBuilder};
pub use tiff::TiffReader;
