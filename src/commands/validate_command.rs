//! Request document check

use chrono::NaiveDate;
use clap::ArgMatches;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::config::PipelineConfig;
use crate::error::{NightError, NightResult};
use crate::request::AnalysisRequest;

/// Validates a request document and echoes the accepted form
pub struct ValidateCommand {
    request_file: PathBuf,
    coverage: (NaiveDate, NaiveDate),
}

impl ValidateCommand {
    pub fn new(args: &ArgMatches, config: &PipelineConfig) -> NightResult<Self> {
        Ok(ValidateCommand {
            request_file: PathBuf::from(required_arg(args, "request")?),
            coverage: config.archive.coverage()?,
        })
    }
}

impl Command for ValidateCommand {
    fn execute(&self) -> NightResult<()> {
        let request = AnalysisRequest::load(&self.request_file, self.coverage)?;
        let text = serde_json::to_string_pretty(&request.to_document())
            .map_err(|e| NightError::io("Failed to encode request", e.into()))?;
        println!("{}", text);
        Ok(())
    }
}
