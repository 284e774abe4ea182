//! Output directory layout

use chrono::NaiveDate;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NightError, NightResult};

pub const GRAPH_FILE: &str = "graph.png";
pub const SERIES_FILE: &str = "intensity.csv";
pub const VIDEO_FILE: &str = "output.mp4";
pub const PREVIEW_DIR: &str = "previews";

/// Handle on the directory a run writes into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    root: PathBuf,
}

impl OutputDirectory {
    /// Deletes `root` if present and recreates it empty
    pub fn reset_and_claim(root: impl Into<PathBuf>) -> NightResult<Self> {
        let root = root.into();
        if root.exists() {
            fs::remove_dir_all(&root)
                .map_err(|e| NightError::io(format!("Failed to clear output {}", root.display()), e))?;
        }
        fs::create_dir_all(&root)
            .map_err(|e| NightError::io(format!("Failed to create output {}", root.display()), e))?;
        debug!("Claimed output directory {}", root.display());
        Ok(OutputDirectory { root })
    }

    /// Opens the output of an earlier run without touching it
    pub fn open(root: impl Into<PathBuf>) -> NightResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(NightError::io(
                format!("Output directory {}", root.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }
        Ok(OutputDirectory { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn graph_path(&self) -> PathBuf {
        self.root.join(GRAPH_FILE)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.root.join(SERIES_FILE)
    }

    pub fn video_path(&self) -> PathBuf {
        self.root.join(VIDEO_FILE)
    }

    pub fn previews_dir(&self) -> PathBuf {
        self.root.join(PREVIEW_DIR)
    }

    /// Name a frame gets before relabeling, `YYYYMM_extracted.tif`
    pub fn frame_path(&self, date: NaiveDate) -> PathBuf {
        self.root.join(format!("{}_extracted.tif", date.format("%Y%m")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Extracted_images");
        fs::create_dir_all(root.join("previews")).unwrap();
        fs::write(root.join("frame_001.tif"), b"old").unwrap();

        let output = OutputDirectory::reset_and_claim(&root).unwrap();
        assert!(output.root().is_dir());
        assert_eq!(fs::read_dir(output.root()).unwrap().count(), 0);
    }

    #[test]
    fn paths_are_fixed_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputDirectory::reset_and_claim(dir.path().join("out")).unwrap();
        let date = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap();

        assert_eq!(output.frame_path(date), output.root().join("201603_extracted.tif"));
        assert_eq!(output.graph_path().file_name().unwrap(), "graph.png");
        assert_eq!(output.video_path().file_name().unwrap(), "output.mp4");
        assert_eq!(output.previews_dir(), output.root().join("previews"));
    }

    #[test]
    fn open_requires_existing_directory() {
        assert!(OutputDirectory::open("/nonexistent/nightkit/out").is_err());
    }
}
