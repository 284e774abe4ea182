use log::{error, LevelFilter};
use std::path::PathBuf;
use std::process;

use nightkit::commands::{cli, CommandFactory, NightkitCommandFactory};
use nightkit::config::PipelineConfig;
use nightkit::utils::logger::Logger;

fn main() {
    let matches = cli().get_matches();

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let config = match PipelineConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        config.logging.level_filter().unwrap_or(LevelFilter::Info)
    };

    let logger = match &config.logging.file {
        Some(path) => match Logger::new(path, level) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error initializing logger: {}", e);
                process::exit(1);
            }
        },
        None => Logger::without_file(level),
    };

    if let Err(e) = Logger::init_global_logger(config.logging.global_file().as_deref(), level) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = NightkitCommandFactory::new();

    let command_result = factory.create_command(&matches, &config, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(e.exit_code());
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };
}
