use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::fs;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "system.log";

fn log_file_path() -> String {
    format!("{}/{}", LOG_DIR, LOG_FILE)
}

/// Initializes the global logger once, at the start of `main`.
///
/// The level is taken from `RUST_LOG` (e.g. `RUST_LOG=debug`) and defaults to `info`.
/// Records go to stderr in color and to `logs/system.log` as plain text.
/// Events emitted through `tracing` end up here as well.
pub fn init() {
    if let Err(e) = fs::create_dir_all(LOG_DIR) {
        eprintln!("Failed to create log directory at '{}': {}", LOG_DIR, e);
    }

    let file_path = log_file_path();

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_level_filter = log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);

    let base_config = Dispatch::new()
        .level(log_level_filter)
        .level_for("tokio_util", LevelFilter::Warn)
        .level_for("mio", LevelFilter::Warn);

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let console_config = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), colors.color(record.level()), record.target(), message))
        })
        .chain(std::io::stderr());

    let mut dispatch = base_config.chain(console_config);

    match fern::log_file(&file_path) {
        Ok(file) => {
            let file_config = Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"), record.level(), record.target(), message))
                })
                .chain(file);
            dispatch = dispatch.chain(file_config);
        }
        Err(e) => eprintln!("Failed to open log file '{}': {}. Logging to console only.", file_path, e),
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to apply logger configuration: {}", e);
        return;
    }

    log::debug!("Logger initialized. Logging to console and '{}'.", file_path);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_location() {
        assert_eq!(log_file_path(), "logs/system.log");
    }
}
