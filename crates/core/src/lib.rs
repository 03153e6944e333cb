//! devtunnel-tui Core Library
//!
//! This crate provides the pieces of devtunnel-tui that do not touch the
//! terminal: the command catalog, argument vector assembly, the background
//! process runner and the small amount of state persisted between sessions.
//!
//! # Key Features
//!
//! - **Command Catalog**: Built-in `devtunnel` subcommands grouped by category,
//!   or a validated YAML catalog supplied by the operator
//! - **Argument Assembly**: Required values, split optional flags and raw input
//!   turned into argument vectors
//! - **Process Runner**: Merged output capture with a hard deadline, reported as
//!   an ordered started/finished message pair
//! - **Last Command**: The most recent argument vector kept on disk for rerun
//!
//! # Examples
//!
//! Building the argument vector for a catalog entry:
//!
//! ```
//! use devtunnel_tui_core::catalog::builtin_catalog;
//! use devtunnel_tui_core::interpolation::interpolate_command;
//!
//! let catalog = builtin_catalog();
//! let show = &catalog[0].commands[1];
//! let argv = interpolate_command("devtunnel", show, &["my-tunnel".to_string()])?;
//! assert_eq!(argv, vec!["devtunnel", "show", "my-tunnel"]);
//! # Ok::<(), devtunnel_tui_core::error::Error>(())
//! ```

pub mod catalog;
pub mod command_definitions;
pub mod config;
pub mod error;
pub mod execution;
pub mod file_handling;
pub mod interpolation;
