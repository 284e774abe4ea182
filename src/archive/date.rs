//! Acquisition dates from archive file names

use chrono::NaiveDate;
use std::path::Path;

/// Recovers the acquisition month of an archive file from its path
pub trait DateExtractor {
    /// First day of the acquisition month, or `None` when the name does not conform
    fn extract_date(&self, path: &Path) -> Option<NaiveDate>;
}

/// Reads a `YYYYMM` token at a fixed character offset of the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOffsetDateExtractor {
    offset: usize,
}

impl FixedOffsetDateExtractor {
    pub fn new(offset: usize) -> Self {
        FixedOffsetDateExtractor { offset }
    }
}

impl Default for FixedOffsetDateExtractor {
    fn default() -> Self {
        // SVDNB_npp_YYYYMMDD-...
        Self::new(10)
    }
}

impl DateExtractor for FixedOffsetDateExtractor {
    fn extract_date(&self, path: &Path) -> Option<NaiveDate> {
        let name = path.file_name()?.to_str()?;
        let token = name.get(self.offset..self.offset + 6)?;
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: i32 = token[..4].parse().ok()?;
        let month: u32 = token[4..].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_token_at_offset() {
        let extractor = FixedOffsetDateExtractor::default();
        let path = Path::new("/archive/SVDNB_npp_20160301-20160331_75N180W.avg_rade9h.tif");
        assert_eq!(extractor.extract_date(path), NaiveDate::from_ymd_opt(2016, 3, 1));
    }

    #[test]
    fn rejects_malformed_tokens() {
        let extractor = FixedOffsetDateExtractor::default();
        for name in ["SVDNB_npp_201613.avg_rade9h.tif", "SVDNB_npp_2016ab.tif", "short.tif", "SVDNB_npp_201600.tif"] {
            assert_eq!(extractor.extract_date(Path::new(name)), None, "{}", name);
        }
    }

    #[test]
    fn offset_is_configurable() {
        let extractor = FixedOffsetDateExtractor::new(0);
        assert_eq!(extractor.extract_date(Path::new("202312_frame.tif")), NaiveDate::from_ymd_opt(2023, 12, 1));
    }
}
