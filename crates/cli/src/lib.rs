//! devtunnel-tui CLI Library
//!
//! This crate provides the terminal interface for devtunnel-tui, a keyboard
//! driven front end for the `devtunnel` command-line tool. It handles argument
//! parsing, logging setup, the interactive state machine and rendering.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing and validation
//! - [`command_selection`]: State machine, renderer and terminal event loop
//! - [`logging`]: File based logging that stays out of the terminal
//!
//! # Examples
//!
//! ```bash
//! # Browse the built-in catalog
//! dtt
//!
//! # Wrap another binary with a custom catalog and a short timeout
//! dtt --tool ./devtunnel --catalog ~/tunnels.yml --timeout-secs 60
//!
//! # Keep a log while using the interface
//! dtt --log-file /tmp/dtt.log
//! ```

pub mod cli_args;
pub mod command_selection;
pub mod logging;
