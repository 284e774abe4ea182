//! Single-file window extraction

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::compression::CompressionKind;
use crate::config::PipelineConfig;
use crate::error::{NightError, NightResult};
use crate::extractor::{ExtractionArea, OutOfBoundsPolicy, RasterWindowExtractor};
use crate::raster::RasterWriter;
use crate::utils::logger::Logger;

/// Cuts one area out of one raster, outside any pipeline run
pub struct ExtractCommand<'a> {
    input_file: PathBuf,
    output_file: PathBuf,
    area: ExtractionArea,
    ground_sample_distance: f64,
    policy: OutOfBoundsPolicy,
    compression: CompressionKind,
    logger: &'a Logger,
}

/// Parses a `LON,LAT` pair
pub fn parse_coordinate(text: &str) -> NightResult<(f64, f64)> {
    let invalid = || NightError::Validation(vec![format!("Coordinate '{}' is not in LON,LAT format.", text)]);
    let (lon, lat) = text.split_once(',').ok_or_else(invalid)?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(invalid());
    }
    Ok((lon, lat))
}

fn parse_extent(args: &ArgMatches, name: &str, label: &str) -> NightResult<f64> {
    let text = required_arg(args, name)?;
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(NightError::Validation(vec![format!("{} must be a positive numerical value.", label)])),
    }
}

impl<'a> ExtractCommand<'a> {
    pub fn new(args: &ArgMatches, config: &PipelineConfig, logger: &'a Logger) -> NightResult<Self> {
        let input_file = PathBuf::from(required_arg(args, "input")?);
        let output_file = PathBuf::from(required_arg(args, "output")?);
        let (lon, lat) = parse_coordinate(required_arg(args, "coordinate")?)?;
        let width_m = parse_extent(args, "width", "Width")?;
        let height_m = parse_extent(args, "height", "Length")?;
        info!("Extract {} m x {} m around ({}, {}) from {}", width_m, height_m, lon, lat, input_file.display());

        Ok(ExtractCommand {
            input_file,
            output_file,
            area: ExtractionArea::new(lon, lat, width_m, height_m),
            ground_sample_distance: config.archive.ground_sample_distance_m,
            policy: config.output.out_of_bounds,
            compression: config.output.compression,
            logger,
        })
    }
}

impl<'a> Command for ExtractCommand<'a> {
    fn execute(&self) -> NightResult<()> {
        let extractor = RasterWindowExtractor::new(
            self.ground_sample_distance, self.policy, self.compression, self.logger,
        );
        let raster = extractor.extract_raster(&self.input_file, &self.area)?;
        RasterWriter::new(self.compression)
            .write(&self.output_file, &raster)
            .map_err(|e| NightError::tiff(&self.output_file, e))?;

        println!("Wrote {}x{} window to {}", raster.width(), raster.height(), self.output_file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_pairs() {
        assert_eq!(parse_coordinate("-88.2275, 40.1023").unwrap(), (-88.2275, 40.1023));
        assert!(parse_coordinate("40.1").is_err());
        assert!(parse_coordinate("200,10").is_err());
        assert!(matches!(parse_coordinate("a,b"), Err(NightError::Validation(_))));
    }
}
