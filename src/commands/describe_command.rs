//! GeoTIFF inspection

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::error::{NightError, NightResult};
use crate::raster::RasterSummary;

/// Prints the profile and nodata statistics of one GeoTIFF
pub struct DescribeCommand {
    input: PathBuf,
}

impl DescribeCommand {
    pub fn new(args: &ArgMatches) -> NightResult<Self> {
        Ok(DescribeCommand {
            input: PathBuf::from(required_arg(args, "input")?),
        })
    }

    pub fn summary(&self) -> NightResult<RasterSummary> {
        info!("Describing {}", self.input.display());
        RasterSummary::read(&self.input).map_err(|e| NightError::tiff(&self.input, e))
    }
}

impl Command for DescribeCommand {
    fn execute(&self) -> NightResult<()> {
        println!("{}", self.summary()?);
        Ok(())
    }
}
