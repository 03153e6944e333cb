//! Interactive command selection, argument entry and execution display.
//!
//! This module provides the terminal user interface for devtunnel-tui:
//! a categories pane, a filterable commands pane and an output pane, plus
//! the text fields used for filtering, raw commands and argument forms.
//!
//! # Structure
//!
//! - [`state`]: the state machine; every key, resize, tick and run message
//!   goes through [`state::App::update`]
//! - [`ui`]: pure rendering of the state into a [`ui::Frame`]
//! - [`terminal`]: raw mode handling and the event loop
//!
//! # User Interface
//!
//! - Arrow keys or vim-style (h/j/k/l) navigation
//! - Enter to run the selected command, opening a form for its arguments
//! - '/' to filter commands, ':' to type a raw command
//! - 'r' to rerun the last command
//! - 'q' or Ctrl-C to quit

pub mod colors;
pub mod input;
pub mod layout;
pub mod state;
pub mod terminal;
pub mod text;
pub mod types;
pub mod ui;

pub use state::{App, AppConfig};
pub use terminal::run_app;

/// Key that opens the filter field
pub const FILTER_KEY: char = '/';

/// Key that opens raw command entry
pub const RAW_COMMAND_KEY: char = ':';

/// Key that reruns the last command
pub const RERUN_KEY: char = 'r';

/// Key that toggles the help overlay
pub const HELP_KEY: char = '?';
