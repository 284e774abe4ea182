//! CLI command implementations
//!
//! This module contains the clap definition of the `nightkit` command line
//! and one Command object per subcommand.

pub mod command_traits;
pub mod describe_command;
pub mod extract_command;
pub mod render_command;
pub mod run_command;
pub mod select_command;
pub mod validate_command;

pub use command_traits::{Command, CommandFactory};
pub use describe_command::DescribeCommand;
pub use extract_command::ExtractCommand;
pub use render_command::RenderCommand;
pub use run_command::RunCommand;
pub use select_command::SelectCommand;
pub use validate_command::ValidateCommand;

use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::error::{NightError, NightResult};
use crate::utils::logger::Logger;

fn request_arg() -> Arg {
    Arg::new("request")
        .long("request")
        .short('r')
        .help("Request document (JSON)")
        .value_name("FILE")
        .required(true)
}

fn archive_arg() -> Arg {
    Arg::new("archive")
        .long("archive")
        .help("Archive directory, overrides [archive] directory")
        .value_name("DIR")
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output directory, overrides [output] directory")
        .value_name("DIR")
}

/// Command-line definition
pub fn cli() -> ClapCommand {
    ClapCommand::new("nightkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract, normalize and summarize nighttime-light GeoTIFF time series")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file (TOML)")
                .value_name("FILE")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            ClapCommand::new("run")
                .about("Run the whole pipeline for a request")
                .arg(request_arg())
                .arg(archive_arg())
                .arg(output_arg()),
        )
        .subcommand(
            ClapCommand::new("extract")
                .about("Cut one area out of one GeoTIFF")
                .arg(Arg::new("input").help("Input GeoTIFF").required(true).index(1))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output GeoTIFF")
                        .value_name("FILE")
                        .required(true),
                )
                .arg(
                    Arg::new("coordinate")
                        .long("coordinate")
                        .help("Area center in 'lon,lat' format")
                        .value_name("LON,LAT")
                        .allow_hyphen_values(true)
                        .required(true),
                )
                .arg(Arg::new("width").long("width").help("East-west extent in meters").value_name("METERS").required(true))
                .arg(Arg::new("height").long("height").help("North-south extent in meters").value_name("METERS").required(true)),
        )
        .subcommand(
            ClapCommand::new("select")
                .about("List the archive files of a month range")
                .arg(Arg::new("from").long("from").help("First month").value_name("MM-YYYY").required(true))
                .arg(Arg::new("to").long("to").help("Last month").value_name("MM-YYYY").required(true))
                .arg(archive_arg()),
        )
        .subcommand(
            ClapCommand::new("render")
                .about("Write frame previews and optionally a video")
                .arg(output_arg())
                .arg(
                    Arg::new("video")
                        .long("video")
                        .help("Also encode output.mp4 with ffmpeg")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            ClapCommand::new("validate")
                .about("Check a request document")
                .arg(request_arg()),
        )
        .subcommand(
            ClapCommand::new("describe")
                .about("Show size, georeferencing and nodata statistics of a GeoTIFF")
                .arg(Arg::new("input").help("Input GeoTIFF").required(true).index(1)),
        )
}

/// Value of a required argument
pub(crate) fn required_arg<'m>(args: &'m ArgMatches, name: &str) -> NightResult<&'m str> {
    args.try_get_one::<String>(name)
        .ok()
        .flatten()
        .map(String::as_str)
        .ok_or_else(|| NightError::Config(format!("Missing argument --{}", name)))
}

/// Applies `--archive` and `--output`, where the subcommand has them
pub(crate) fn apply_overrides(config: &mut PipelineConfig, args: &ArgMatches) {
    if let Some(dir) = args.try_get_one::<String>("archive").ok().flatten() {
        config.archive.directory = PathBuf::from(dir);
    }
    if let Some(dir) = args.try_get_one::<String>("output").ok().flatten() {
        config.output.directory = PathBuf::from(dir);
    }
}

/// Factory for creating command instances based on CLI arguments
pub struct NightkitCommandFactory;

impl NightkitCommandFactory {
    pub fn new() -> Self {
        NightkitCommandFactory
    }
}

impl Default for NightkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for NightkitCommandFactory {
    fn create_command(
        &self,
        args: &ArgMatches,
        config: &PipelineConfig,
        logger: &'a Logger,
    ) -> NightResult<Box<dyn Command + 'a>> {
        match args.subcommand() {
            Some(("run", sub)) => Ok(Box::new(RunCommand::new(sub, config, logger)?)),
            Some(("extract", sub)) => Ok(Box::new(ExtractCommand::new(sub, config, logger)?)),
            Some(("select", sub)) => Ok(Box::new(SelectCommand::new(sub, config)?)),
            Some(("render", sub)) => Ok(Box::new(RenderCommand::new(sub, config, logger)?)),
            Some(("validate", sub)) => Ok(Box::new(ValidateCommand::new(sub, config)?)),
            Some(("describe", sub)) => Ok(Box::new(DescribeCommand::new(sub)?)),
            Some((other, _)) => Err(NightError::Config(format!("Unknown command '{}'", other))),
            None => Err(NightError::Config("No command given".to_string())),
        }
    }
}
