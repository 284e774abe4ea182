//! Full pipeline run

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::{apply_overrides, required_arg};
use crate::config::PipelineConfig;
use crate::error::NightResult;
use crate::pipeline::Pipeline;
use crate::request::AnalysisRequest;
use crate::utils::logger::Logger;

/// Validates a request document and runs every pipeline step for it
pub struct RunCommand<'a> {
    request_file: PathBuf,
    config: PipelineConfig,
    logger: &'a Logger,
}

impl<'a> RunCommand<'a> {
    pub fn new(args: &ArgMatches, config: &PipelineConfig, logger: &'a Logger) -> NightResult<Self> {
        let request_file = PathBuf::from(required_arg(args, "request")?);
        let mut config = config.clone();
        apply_overrides(&mut config, args);
        info!("Run request {} against archive {}", request_file.display(), config.archive.directory.display());

        Ok(RunCommand { request_file, config, logger })
    }
}

impl<'a> Command for RunCommand<'a> {
    fn execute(&self) -> NightResult<()> {
        let coverage = self.config.archive.coverage()?;
        let request = AnalysisRequest::load(&self.request_file, coverage)?;

        let report = Pipeline::new(&self.config, self.logger).extract_all(&request)?;

        println!("Extracted {} frames into {}", report.frames.len(), report.output.root().display());
        println!("Corpus mean {:.6}, std {:.6}", report.statistics.global_mean, report.statistics.global_std);
        println!("Plot saved as: {}", report.plot_path.display());
        Ok(())
    }
}
