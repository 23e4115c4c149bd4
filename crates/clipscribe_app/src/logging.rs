//! Logging initialization for the clipscribe binary.
//!
//! Logs go to the terminal and, unless disabled, to a per-run file
//! `{log_dir}/clipscribe-{timestamp}.log`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Destination for log output.
pub enum LogDestination {
    /// Write to terminal only.
    Terminal,
    /// Write to the terminal and a fresh file inside the given directory.
    Both(PathBuf),
}

/// Initialize the global logger. Returns the log file path, if one was created.
pub fn initialize(destination: LogDestination, level: LevelFilter) -> Option<PathBuf> {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    let mut log_path = None;
    if let LogDestination::Both(dir) = destination {
        if let Some((path, file_logger)) = create_file_logger(&dir, level, config) {
            loggers.push(file_logger);
            log_path = Some(path);
        }
    }

    let _ = CombinedLogger::init(loggers);
    log_path
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    dir: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<(PathBuf, Box<WriteLogger<File>>)> {
    if let Err(err) = fs::create_dir_all(dir) {
        eprintln!("Warning: Could not create log directory {:?}: {}", dir, err);
        return None;
    }
    let now = Local::now();
    let log_path = dir.join(format!("clipscribe-{}.log", now.format("%Y-%m-%dT%H-%M-%S")));
    match File::create(&log_path) {
        Ok(mut file) => {
            let _ = writeln!(file, "=== Clipscribe run log - {} ===", now.to_rfc3339());
            Some((log_path, WriteLogger::new(level, config, file)))
        }
        Err(err) => {
            eprintln!(
                "Warning: Could not create log file at {:?}: {}",
                log_path, err
            );
            None
        }
    }
}
