use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use devtunnel_tui_cli::cli_args::Args;
use devtunnel_tui_cli::command_selection::{run_app, App, AppConfig};
use devtunnel_tui_cli::logging::init_logging;
use devtunnel_tui_core::catalog::builtin_catalog;
use devtunnel_tui_core::command_definitions::Category;
use devtunnel_tui_core::error::{Error, Result};
use devtunnel_tui_core::execution::TaskRunner;
use devtunnel_tui_core::{config, file_handling};
use log::{debug, info};
use tokio::sync::mpsc;

/// How long a running child gets to be torn down on quit
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn load_catalog(args: &Args) -> Result<Vec<Category>> {
    match config::expand_path(&args.catalog) {
        Some(catalog_path) => {
            debug!("Catalog path: `{catalog_path}`");
            file_handling::get_catalog(&catalog_path)
        }
        None => Ok(builtin_catalog()),
    }
}

fn execute() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    let log_file = config::expand_path(&args.log_file);
    init_logging(log_file.as_deref())?;
    debug!("Arguments: {args:?}");

    let catalog = load_catalog(&args)?;
    let last_command_path = config::get_last_command_path(&args.last_command_path);
    debug!("Last command path: `{last_command_path}`");
    let last_command = file_handling::get_last_command(&last_command_path)?;

    if args.skip_command_save {
        info!("Skipping command save was specified. Not (over)writing last command.");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;

    let (sender, mut receiver) = mpsc::unbounded_channel();
    let runner = TaskRunner::new(runtime.handle().clone(), sender, args.timeout());
    runner.probe(&args.tool);

    let mut app = App::new(
        AppConfig {
            tool: args.tool.clone(),
            catalog,
            last_command,
            last_command_path: (!args.skip_command_save).then_some(last_command_path),
        },
        runner,
    );

    let result = run_app(&mut app, &mut receiver, args.tick());

    // Dropping in-flight tasks kills their children
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

fn main() -> ExitCode {
    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
