//! Archive scanning and date-range selection

use chrono::NaiveDate;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NightError, NightResult};

use super::date::{DateExtractor, FixedOffsetDateExtractor};

/// An archive raster with its acquisition month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: PathBuf,
    pub date: NaiveDate,
}

/// Lists archive rasters whose acquisition month falls in a range
pub struct ArchiveSelector {
    directory: PathBuf,
    suffix: String,
    date_extractor: Box<dyn DateExtractor>,
}

impl ArchiveSelector {
    /// Selector using the fixed-offset naming convention
    pub fn new(directory: impl Into<PathBuf>, suffix: impl Into<String>, date_offset: usize) -> Self {
        Self::with_extractor(directory, suffix, Box::new(FixedOffsetDateExtractor::new(date_offset)))
    }

    pub fn with_extractor(
        directory: impl Into<PathBuf>,
        suffix: impl Into<String>,
        date_extractor: Box<dyn DateExtractor>,
    ) -> Self {
        ArchiveSelector {
            directory: directory.into(),
            suffix: suffix.into(),
            date_extractor,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Every conforming archive file, sorted by date
    pub fn scan(&self) -> NightResult<Vec<ArchiveEntry>> {
        let context = || format!("Failed to list archive {}", self.directory.display());
        let mut entries = Vec::new();

        for entry in fs::read_dir(&self.directory).map_err(|e| NightError::io(context(), e))? {
            let entry = entry.map_err(|e| NightError::io(context(), e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let matches_suffix = path.file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with(&self.suffix));
            if !matches_suffix {
                continue;
            }
            match self.date_extractor.extract_date(&path) {
                Some(date) => entries.push(ArchiveEntry { path, date }),
                None => debug!("Skipping {}: no acquisition date in name", path.display()),
            }
        }

        entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.path.cmp(&b.path)));
        Ok(entries)
    }

    /// Archive files acquired between `from` and `to`, both inclusive
    pub fn select(&self, from: NaiveDate, to: NaiveDate) -> NightResult<Vec<ArchiveEntry>> {
        let selected: Vec<ArchiveEntry> = self.scan()?
            .into_iter()
            .filter(|entry| entry.date >= from && entry.date <= to)
            .collect();
        info!("Selected {} archive files from {} between {} and {}",
              selected.len(), self.directory.display(), from.format("%Y-%m"), to.format("%Y-%m"));
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const SUFFIX: &str = ".avg_rade9h.tif";

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    fn archive() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for year in 2016..=2023 {
            for month in 1..=12 {
                touch(dir.path(), &format!("SVDNB_npp_{}{:02}01-{}{:02}28_75N180W{}", year, month, year, month, SUFFIX));
            }
        }
        touch(dir.path(), &format!("SVDNB_npp_20240101-20240131_75N180W{}", SUFFIX));
        touch(dir.path(), &format!("SVDNB_npp_2016xx01_75N180W{}", SUFFIX));
        touch(dir.path(), "SVDNB_npp_20160401-20160430_75N180W.cf_cvg.tif");
        fs::create_dir(dir.path().join(format!("SVDNB_npp_20160401{}", SUFFIX))).unwrap();
        dir
    }

    fn month(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    #[test]
    fn selects_inclusive_month_range() {
        let dir = archive();
        let selector = ArchiveSelector::new(dir.path(), SUFFIX, 10);
        let selected = selector.select(month(2016, 3), month(2016, 5)).unwrap();

        let months: Vec<u32> = selected.iter().map(|e| e.date.month()).collect();
        assert_eq!(months, vec![3, 4, 5]);
        assert!(selected.iter().all(|e| e.date.year() == 2016));
        assert!(selected.iter().all(|e| e.path.to_string_lossy().ends_with(SUFFIX)));
    }

    #[test]
    fn scan_skips_nonconforming_names() {
        let dir = archive();
        let selector = ArchiveSelector::new(dir.path(), SUFFIX, 10);
        let all = selector.scan().unwrap();
        assert_eq!(all.len(), 8 * 12 + 1);
        assert_eq!(all.first().unwrap().date, month(2016, 1));
        assert_eq!(all.last().unwrap().date, month(2024, 1));
    }

    #[test]
    fn empty_range_selects_nothing() {
        let dir = archive();
        let selector = ArchiveSelector::new(dir.path(), SUFFIX, 10);
        assert!(selector.select(month(2014, 1), month(2015, 12)).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let selector = ArchiveSelector::new("/nonexistent/nightkit/archive", SUFFIX, 10);
        assert!(matches!(selector.scan(), Err(NightError::Io { .. })));
    }
}
