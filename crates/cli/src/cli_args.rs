//! Command-line argument parsing and validation.
//!
//! This module defines the command-line interface structure and provides
//! validation for CLI arguments using the `clap` crate.

use std::time::Duration;

use clap::Parser;
use devtunnel_tui_core::config::{DEFAULT_TICK, DEFAULT_TIMEOUT, DEFAULT_TOOL};
use devtunnel_tui_core::error::{Error, Result};

/// Command-line arguments for the `dtt` binary.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use devtunnel_tui_cli::cli_args::Args;
///
/// let args = Args::parse_from(["dtt", "--timeout-secs", "30"]);
/// assert_eq!(args.timeout().as_secs(), 30);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Name of the executable to wrap, looked up on the search path.
    #[arg(long, short = 't', default_value = DEFAULT_TOOL)]
    pub tool: String,

    /// Seconds a command may run before it is killed.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Path to a catalog YAML file replacing the built-in command catalog.
    #[arg(long, short = 'c')]
    pub catalog: Option<String>,

    /// Path to the file that stores the last dispatched command.
    ///
    /// If not provided, defaults to `~/.devtunnel-tui/last_command.yml`.
    #[arg(long, short = 'l')]
    pub last_command_path: Option<String>,

    /// Skip saving dispatched commands as the last command to replay.
    ///
    /// Prevents overwriting the last command file, retaining the existing last command.
    #[arg(long, short = 's', action)]
    pub skip_command_save: bool,

    /// Write log records to this file. Logging is off without it.
    #[arg(long)]
    pub log_file: Option<String>,

    /// Milliseconds between interface ticks.
    #[arg(long, default_value_t = DEFAULT_TICK.as_millis() as u64)]
    pub tick_ms: u64,
}

impl Args {
    /// Rejects values the interface cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero timeout, a zero tick or a blank tool name.
    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            return Err(Error::Config("tool name may not be empty".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "timeout must be at least one second".to_string(),
            ));
        }

        if self.tick_ms == 0 {
            return Err(Error::Config("tick must be at least one millisecond".to_string()));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["dtt"]);

        assert_eq!(args.tool, "devtunnel");
        assert_eq!(args.timeout(), Duration::from_secs(600));
        assert_eq!(args.tick(), Duration::from_millis(100));
        assert!(args.catalog.is_none());
        assert!(args.last_command_path.is_none());
        assert!(args.log_file.is_none());
        assert!(!args.skip_command_save);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_args_short_flags() {
        let args = Args::parse_from([
            "dtt",
            "-t",
            "mytool",
            "-c",
            "/custom/catalog.yml",
            "-l",
            "/custom/last.yml",
            "-s",
        ]);

        assert_eq!(args.tool, "mytool");
        assert_eq!(args.catalog, Some("/custom/catalog.yml".to_string()));
        assert_eq!(args.last_command_path, Some("/custom/last.yml".to_string()));
        assert!(args.skip_command_save);
    }

    #[test]
    fn test_args_long_flags() {
        let args = Args::parse_from([
            "dtt",
            "--tool",
            "mytool",
            "--timeout-secs",
            "5",
            "--catalog",
            "/custom/catalog.yml",
            "--last-command-path",
            "/custom/last.yml",
            "--skip-command-save",
            "--log-file",
            "/tmp/dtt.log",
            "--tick-ms",
            "250",
        ]);

        assert_eq!(args.timeout(), Duration::from_secs(5));
        assert_eq!(args.tick(), Duration::from_millis(250));
        assert_eq!(args.log_file, Some("/tmp/dtt.log".to_string()));
        assert!(args.skip_command_save);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let args = Args::parse_from(["dtt", "--timeout-secs", "0"]);
        assert!(matches!(args.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_tick_is_rejected() {
        let args = Args::parse_from(["dtt", "--tick-ms", "0"]);
        assert!(matches!(args.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_blank_tool_is_rejected() {
        let args = Args::parse_from(["dtt", "--tool", "  "]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_non_numeric_timeout_fails_to_parse() {
        assert!(Args::try_parse_from(["dtt", "--timeout-secs", "soon"]).is_err());
    }
}
