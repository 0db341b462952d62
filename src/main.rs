mod cli;
mod config;
mod engine;
mod error;
mod model;
mod orchestrator;
mod render;
mod report;
mod storage;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Log to stderr. In the TUI stderr shares the screen, so logging there is opt-in via `RUST_LOG`.
fn init_tracing(interactive: bool) {
    let from_env = EnvFilter::try_from_default_env();
    if interactive && from_env.is_err() {
        return;
    }
    let filter = from_env.unwrap_or_else(|_| EnvFilter::new("cv_analysis=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_silent = args.silent;
    let is_non_tui = !args.is_interactive();
    init_tracing(!is_non_tui);

    match cli::run(args).await {
        Ok(()) => {
            // Explicitly exit with code 0 on success, especially for non-TUI modes
            if is_non_tui {
                std::process::exit(0);
            }
            Ok(())
        }
        Err(e) => {
            if is_silent {
                println!("{}", e);
                std::process::exit(1);
            } else {
                Err(e)
            }
        }
    }
}
