//! Commander CLI entry point.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use commander::cli::{Cli, CommandDispatcher, Commands};
use commander::config::Settings;
use commander::shell::is_ci;
use commander::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN, so step output stays readable
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("commander=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("commander=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Commander starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let is_interactive = match &cli.command {
        Commands::Run(args) if args.non_interactive => false,
        _ => !is_ci() && std::io::stdin().is_terminal(),
    };

    let mut ui = create_ui(is_interactive, output_mode);

    let settings = Settings::from_env().with_home(cli.home.clone());
    let dispatcher = CommandDispatcher::new(settings);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
