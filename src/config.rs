//! Pipeline configuration
//!
//! Loaded from a TOML file; every section and field has a default so an
//! empty file (or no file) yields the stock archive layout.

use chrono::NaiveDate;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::compression::CompressionKind;
use crate::error::{NightError, NightResult};
use crate::extractor::OutOfBoundsPolicy;
use crate::request::parse_month;
use crate::utils::logger::Logger;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub archive: ArchiveConfig,
    pub output: OutputConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

/// Location and naming convention of the source archive
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub directory: PathBuf,
    /// Filename suffix of archive rasters
    pub suffix: String,
    /// Character offset of the YYYYMM token in each filename
    pub date_offset: usize,
    /// Ground sample distance shared by every archive raster, in meters
    pub ground_sample_distance_m: f64,
    /// First month requests may cover (MM-YYYY)
    pub coverage_start: String,
    /// Last month requests may cover (MM-YYYY)
    pub coverage_end: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./night_time_images"),
            suffix: ".avg_rade9h.tif".to_string(),
            date_offset: 10,
            ground_sample_distance_m: 500.0,
            coverage_start: "01-2014".to_string(),
            coverage_end: "01-2024".to_string(),
        }
    }
}

impl ArchiveConfig {
    /// Inclusive coverage range as first-of-month dates
    pub fn coverage(&self) -> NightResult<(NaiveDate, NaiveDate)> {
        let start = parse_month(&self.coverage_start).ok_or_else(|| {
            NightError::Config(format!("coverage_start '{}' is not MM-YYYY", self.coverage_start))
        })?;
        let end = parse_month(&self.coverage_end).ok_or_else(|| {
            NightError::Config(format!("coverage_end '{}' is not MM-YYYY", self.coverage_end))
        })?;
        if end < start {
            return Err(NightError::Config(format!(
                "coverage_end {} is before coverage_start {}",
                self.coverage_end, self.coverage_start
            )));
        }
        Ok((start, end))
    }
}

/// Where and how frames are written
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub compression: CompressionKind,
    pub out_of_bounds: OutOfBoundsPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("Extracted_images"),
            compression: CompressionKind::Deflate,
            out_of_bounds: OutOfBoundsPolicy::Fail,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Video frames per second
    pub framerate: u32,
    /// ffmpeg executable, looked up on PATH when not absolute
    pub ffmpeg: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            framerate: 4,
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; console only when absent
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from("nightkit.log")),
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> NightResult<LevelFilter> {
        Logger::parse_level(&self.level)
            .ok_or_else(|| NightError::Config(format!("Unknown log level '{}'", self.level)))
    }

    /// File of the global `log` backend, `<stem>-global.<ext>` next to `file`
    pub fn global_file(&self) -> Option<PathBuf> {
        let file = self.file.as_ref()?;
        let stem = file.file_stem()?.to_string_lossy();
        let name = match file.extension() {
            Some(ext) => format!("{}-global.{}", stem, ext.to_string_lossy()),
            None => format!("{}-global", stem),
        };
        Some(file.with_file_name(name))
    }
}

impl PipelineConfig {
    /// Reads and validates a TOML configuration file
    pub fn load(path: &Path) -> NightResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| NightError::io(format!("Failed to read config {}", path.display()), e))?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates TOML configuration text
    pub fn from_toml_str(contents: &str) -> NightResult<Self> {
        let config: PipelineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the defaults
    pub fn load_or_default(path: Option<&Path>) -> NightResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> NightResult<()> {
        let gsd = self.archive.ground_sample_distance_m;
        if !(gsd.is_finite() && gsd > 0.0) {
            return Err(NightError::Config(format!(
                "ground_sample_distance_m must be positive, got {}", gsd
            )));
        }
        if self.archive.suffix.is_empty() {
            return Err(NightError::Config("archive suffix must not be empty".to_string()));
        }
        if self.render.framerate == 0 {
            return Err(NightError::Config("render framerate must be at least 1".to_string()));
        }
        self.archive.coverage()?;
        self.logging.level_filter()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.archive.ground_sample_distance_m, 500.0);
        assert_eq!(config.archive.date_offset, 10);
        assert_eq!(config.output.directory, PathBuf::from("Extracted_images"));
        assert_eq!(config.output.out_of_bounds, OutOfBoundsPolicy::Fail);
        assert_eq!(config.render.framerate, 4);
    }

    #[test]
    fn sections_override_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [archive]
            directory = "/data/viirs"
            ground_sample_distance_m = 250.0

            [output]
            compression = "zstd"
            out_of_bounds = "fill"

            [logging]
            level = "debug"
            "#,
        ).unwrap();

        assert_eq!(config.archive.directory, PathBuf::from("/data/viirs"));
        assert_eq!(config.archive.ground_sample_distance_m, 250.0);
        assert_eq!(config.archive.suffix, ".avg_rade9h.tif");
        assert_eq!(config.output.compression, CompressionKind::Zstd);
        assert_eq!(config.output.out_of_bounds, OutOfBoundsPolicy::Fill);
        assert_eq!(config.logging.level_filter().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn coverage_is_first_of_month() {
        let (start, end) = ArchiveConfig::default().coverage().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2014, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn global_log_sits_next_to_run_log() {
        let logging = LoggingConfig { file: Some(PathBuf::from("logs/nightkit.log")), level: "info".into() };
        assert_eq!(logging.global_file(), Some(PathBuf::from("logs/nightkit-global.log")));
        let console_only = LoggingConfig { file: None, level: "info".into() };
        assert_eq!(console_only.global_file(), None);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for text in [
            "[archive]\nground_sample_distance_m = 0.0",
            "[archive]\ncoverage_start = \"2014-01\"",
            "[render]\nframerate = 0",
            "[logging]\nlevel = \"loud\"",
            "[output]\ncompression = \"lzw\"",
        ] {
            match PipelineConfig::from_toml_str(text) {
                Err(NightError::Config(_)) => {}
                other => panic!("{:?} accepted: {:?}", text, other),
            }
        }
    }
}
