//! Initialisation and configuration of the program logger.
//!
//! Messages go to the terminal (with colours where supported) and, for ordinary runs, to a pair of
//! log files in the output folder. The log level can be chosen via the settings file or the
//! `DEMETER_LOG_LEVEL` environment variable.
use anyhow::{Result, bail, ensure};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::Arguments;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The default log level for the program.
///
/// Used as a fallback if the user hasn't specified something else with the DEMETER_LOG_LEVEL
/// environment variable or the settings.toml file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The file name for the log file containing messages about the ordinary operation of the program
const LOG_INFO_FILE_NAME: &str = "demeter_info.log";

/// The file name for the log file containing warnings and error messages
const LOG_ERROR_FILE_NAME: &str = "demeter_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Parse a log level name into a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {}", unknown),
    };

    Ok(level)
}

/// Initialise the program logger using the `fern` logging library.
///
/// The log level comes from the `DEMETER_LOG_LEVEL` environment variable if set, then from
/// `log_level_from_settings`, then from [`DEFAULT_LOG_LEVEL`]. Possible values are `off`, `error`,
/// `warn`, `info`, `debug` and `trace`.
///
/// Messages up to the chosen level go to the terminal, with warnings and errors diverted to
/// stderr. If `log_file_path` is given, the same messages are also written to an info and an error
/// log file in that folder, with warnings always captured in the error file whatever the chosen
/// level.
pub fn init(log_level_from_settings: Option<&str>, log_file_path: Option<&Path>) -> Result<()> {
    let log_level = env::var("DEMETER_LOG_LEVEL").unwrap_or_else(|_| {
        log_level_from_settings
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string()
    });
    let log_level = parse_log_level(&log_level)?;

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    // Only colour output which is going to a terminal
    let use_colour_stdout = std::io::stdout().is_terminal();
    let use_colour_stderr = std::io::stderr().is_terminal();

    let mut dispatch = Dispatch::new()
        .chain(
            // Non-error messages go to stdout
            Dispatch::new()
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .format(move |out, message, record| {
                    write_log_terminal(out, message, record, use_colour_stdout, &colours);
                })
                .level(log_level)
                .chain(std::io::stdout()),
        )
        .chain(
            // Warnings and errors go to stderr
            Dispatch::new()
                .format(move |out, message, record| {
                    write_log_terminal(out, message, record, use_colour_stderr, &colours);
                })
                .level(log_level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        );

    if let Some(log_file_path) = log_file_path {
        let new_log_file = |file_name| {
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(log_file_path.join(file_name))
        };

        dispatch = dispatch
            .chain(
                // Non-error messages go to the info log file
                Dispatch::new()
                    .filter(|metadata| metadata.level() > LevelFilter::Warn)
                    .format(write_log_file)
                    .level(log_level.max(LevelFilter::Info))
                    .chain(new_log_file(LOG_INFO_FILE_NAME)?),
            )
            .chain(
                // Warnings and errors go to a separate log file
                Dispatch::new()
                    .format(write_log_file)
                    .level(LevelFilter::Warn)
                    .chain(new_log_file(LOG_ERROR_FILE_NAME)?),
            );
    }

    // Flag that the logger has been initialised and apply the configuration
    ensure!(LOGGER_INIT.set(()).is_ok(), "Logger is already initialised");
    dispatch.apply()?;

    Ok(())
}

/// Format a log line for the terminal, colouring the level if `use_colour` is set
fn write_log_terminal(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    let timestamp = Local::now().format("%H:%M:%S");
    let target = record.target();
    if use_colour {
        let level = colours.color(record.level());
        out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
    } else {
        let level = record.level();
        out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
    }
}

/// Format a log line for the log files, with a full date and no colours
fn write_log_file(out: FormatCallback, message: &Arguments, record: &Record) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let level = record.level();
    let target = record.target();
    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}
