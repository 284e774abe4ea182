//! Archive listing for a month range

use chrono::NaiveDate;
use clap::ArgMatches;
use log::info;

use crate::archive::ArchiveSelector;
use crate::commands::command_traits::Command;
use crate::commands::{apply_overrides, required_arg};
use crate::config::PipelineConfig;
use crate::error::{NightError, NightResult};
use crate::request::parse_month;

/// Prints the archive files a run over the range would use
pub struct SelectCommand {
    from: NaiveDate,
    to: NaiveDate,
    selector: ArchiveSelector,
}

fn month_arg(args: &ArgMatches, name: &str) -> NightResult<NaiveDate> {
    parse_month(required_arg(args, name)?)
        .ok_or_else(|| NightError::Validation(vec!["Dates must be in the format MM-YYYY.".to_string()]))
}

impl SelectCommand {
    pub fn new(args: &ArgMatches, config: &PipelineConfig) -> NightResult<Self> {
        let from = month_arg(args, "from")?;
        let to = month_arg(args, "to")?;
        if to < from {
            return Err(NightError::Validation(vec!["End date cannot be before the start date.".to_string()]));
        }

        let mut config = config.clone();
        apply_overrides(&mut config, args);
        let archive = &config.archive;
        let selector = ArchiveSelector::new(&archive.directory, archive.suffix.as_str(), archive.date_offset);

        Ok(SelectCommand { from, to, selector })
    }
}

impl Command for SelectCommand {
    fn execute(&self) -> NightResult<()> {
        info!("Scanning archive {}", self.selector.directory().display());
        let entries = self.selector.select(self.from, self.to)?;
        if entries.is_empty() {
            return Err(NightError::EmptyResult { from: self.from, to: self.to });
        }
        for entry in entries {
            println!("{}  {}", entry.date.format("%Y-%m"), entry.path.display());
        }
        Ok(())
    }
}
