//! Pipeline error types
//!
//! `NightError` covers everything above the TIFF codec. Codec failures are
//! wrapped together with the file they came from.

use chrono::NaiveDate;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::raster::PixelWindow;
use crate::tiff::errors::TiffError;

/// Errors raised by the extraction pipeline and its tooling
#[derive(Debug)]
pub enum NightError {
    /// Malformed or out-of-range request fields, one message per problem
    Validation(Vec<String>),
    /// Requested extent is smaller than one ground sample in some direction
    InvalidWindow {
        width_m: f64,
        height_m: f64,
        ground_sample_distance: f64,
    },
    /// Window not fully covered by the source raster
    WindowOutOfBounds {
        path: PathBuf,
        window: PixelWindow,
        width: usize,
        height: usize,
    },
    /// Degenerate corpus statistic
    Normalization(String),
    /// No archive file matched the requested range
    EmptyResult { from: NaiveDate, to: NaiveDate },
    /// Codec failure on a specific file
    Tiff { path: PathBuf, source: TiffError },
    /// Filesystem failure, with the step or file involved
    Io { context: String, source: io::Error },
    Config(String),
    Plot(String),
    ExternalTool(String),
}

impl NightError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        NightError::Io { context: context.into(), source }
    }

    /// Failure to append to the run log
    pub fn run_log(source: io::Error) -> Self {
        NightError::io("Failed to write run log", source)
    }

    pub fn tiff(path: &Path, source: TiffError) -> Self {
        NightError::Tiff { path: path.to_path_buf(), source }
    }

    /// Process exit code reported by the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            NightError::Validation(_) => 2,
            NightError::EmptyResult { .. } => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for NightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NightError::Validation(problems) => {
                write!(f, "Invalid request: {}", problems.join("; "))
            }
            NightError::InvalidWindow { width_m, height_m, ground_sample_distance }
                if width_m >= ground_sample_distance && height_m >= ground_sample_distance => write!(
                f,
                "Window of {} m x {} m is too large for a {} m pixel grid",
                width_m, height_m, ground_sample_distance
            ),
            NightError::InvalidWindow { width_m, height_m, ground_sample_distance } => write!(
                f,
                "Window of {} m x {} m is smaller than one {} m ground sample",
                width_m, height_m, ground_sample_distance
            ),
            NightError::WindowOutOfBounds { path, window, width, height } => write!(
                f,
                "Window {} exceeds the {}x{} raster {}",
                window, width, height, path.display()
            ),
            NightError::Normalization(msg) => write!(f, "Normalization failed: {}", msg),
            NightError::EmptyResult { from, to } => write!(
                f,
                "No archive images between {} and {}",
                from.format("%m-%Y"), to.format("%m-%Y")
            ),
            NightError::Tiff { path, source } => write!(f, "{}: {}", path.display(), source),
            NightError::Io { context, source } => write!(f, "{}: {}", context, source),
            NightError::Config(msg) => write!(f, "Configuration error: {}", msg),
            NightError::Plot(msg) => write!(f, "Plot rendering failed: {}", msg),
            NightError::ExternalTool(msg) => write!(f, "External tool failed: {}", msg),
        }
    }
}

impl std::error::Error for NightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NightError::Tiff { source, .. } => Some(source),
            NightError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for NightError {
    fn from(error: toml::de::Error) -> Self {
        NightError::Config(error.to_string())
    }
}

/// Result type for pipeline operations
pub type NightResult<T> = Result<T, NightError>;
