//! Logger setup for the terminal client.
//!
//! The file destination writes `./brief.log` in the current working
//! directory. Terminal output goes to stderr: stdout belongs to the rendered
//! screens and to `show`, which users pipe into files.

use std::fs::File;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./brief.log";

/// Where log lines end up.
pub enum LogDestination {
    File,
    Terminal,
    /// Both the log file and the terminal.
    Both,
}

/// Installs the global logger. Safe to call once per process; a failure to
/// open the log file downgrades to the remaining destination instead of
/// aborting.
pub fn initialize(destination: LogDestination) {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        match File::create(LOG_FILE) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("could not open {LOG_FILE}: {err}; file logging disabled"),
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}
