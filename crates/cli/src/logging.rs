use std::fs::OpenOptions;
use std::io;

use devtunnel_tui_core::error::{Error, Result};
use env_logger::{Builder, Env, Target};

/// Sets up `env_logger` so records never reach the terminal the UI owns.
///
/// With a log file, records are appended to it and the filter defaults to
/// `info`. Without one, the filter defaults to `off` and anything `RUST_LOG`
/// enables is discarded.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a logger is already set.
pub fn init_logging(log_file: Option<&str>) -> Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::io_error("log".to_string(), path.to_string(), e))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(Target::Pipe(Box::new(io::sink())));
        }
    }

    builder
        .try_init()
        .map_err(|e| Error::Config(format!("could not initialize logging: {e}")))
}
