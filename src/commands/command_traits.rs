//! Command pattern interfaces
//!
//! Each CLI subcommand is parsed into a `Command` object that owns its
//! arguments and runs independently of clap.

use crate::config::PipelineConfig;
use crate::error::NightResult;
use crate::utils::logger::Logger;

/// Represents an executable command in the application
pub trait Command {
    /// Execute the command
    fn execute(&self) -> NightResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory<'a> {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - Top-level CLI matches from clap
    /// * `config` - Loaded configuration, before command-line overrides
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A command that implements the Command trait, or an error
    fn create_command(
        &self,
        args: &clap::ArgMatches,
        config: &PipelineConfig,
        logger: &'a Logger,
    ) -> NightResult<Box<dyn Command + 'a>>;
}
