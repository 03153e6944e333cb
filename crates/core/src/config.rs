//! Configuration defaults and path utilities for devtunnel-tui.
//!
//! This module holds the default values used when the command line does not
//! override them, and expands shell variables like `~` in paths.

use std::time::Duration;

/// Executable wrapped by the interface
pub const DEFAULT_TOOL: &str = "devtunnel";

/// Wall-clock limit for a single command run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// How long the event loop waits for terminal input before ticking
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Default path for storing the last dispatched command
const DEFAULT_LAST_COMMAND_PATH: &str = "~/.devtunnel-tui/last_command.yml";

/// Resolves the last command file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// last command path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use devtunnel_tui_core::config::get_last_command_path;
///
/// let custom = get_last_command_path(&Some("/tmp/last.yml".to_string()));
/// assert_eq!(custom, "/tmp/last.yml");
/// ```
pub fn get_last_command_path(last_command_path_arg: &Option<String>) -> String {
    let last_command_path = match last_command_path_arg {
        Some(last_command_path) => last_command_path,
        None => DEFAULT_LAST_COMMAND_PATH,
    };

    shellexpand::tilde(last_command_path).to_string()
}

/// Expands `~` in an optional path, returning `None` when no path is given.
pub fn expand_path(path: &Option<String>) -> Option<String> {
    path.as_ref()
        .map(|path| shellexpand::tilde(path).to_string())
}

/// Renders a duration the way the timeout notice reports it.
pub fn describe_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0 => format!("{} milliseconds", duration.as_millis()),
        s if s % 60 == 0 && s >= 60 => {
            let minutes = s / 60;
            if minutes == 1 {
                "1 minute".to_string()
            } else {
                format!("{minutes} minutes")
            }
        }
        1 => "1 second".to_string(),
        s => format!("{s} seconds"),
    }
}
