//! api-guardian CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use api_guardian::cli::{Cli, CommandDispatcher, EXIT_ERROR};
use api_guardian::output::should_use_colors;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `--verbose` flag sets level to INFO
/// 3. `RUST_LOG` environment variable (if set)
/// 4. Default is WARN
fn init_tracing(debug: bool, verbose: bool) {
    let filter = if debug {
        EnvFilter::new("api_guardian=debug")
    } else if verbose {
        EnvFilter::new("api_guardian=info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("api_guardian=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.verbose);

    tracing::debug!("api-guardian starting with args: {:?}", cli);

    let use_color = !cli.no_color && should_use_colors();
    let project_root = std::env::current_dir().unwrap_or_default();
    let dispatcher = CommandDispatcher::new(project_root);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let code = match dispatcher.dispatch(&cli, use_color, &mut out) {
        Ok(result) => result.exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };
    let _ = out.flush();

    ExitCode::from(code as u8)
}
