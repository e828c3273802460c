//! chatline entry point.
//!
//! Binary name: `chatline`
//!
//! Parses arguments, sets up logging, loads the client config, and starts
//! the interactive chat loop.

mod cli;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatline_infra::config::{default_config_path, load_client_config};

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,chatline_cli=debug,chatline_core=debug,chatline_infra=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = load_client_config(&config_path).await;
    cli.apply_overrides(&mut config);

    cli::chat::loop_runner::run_chat_loop(config, cli.load.as_deref())
        .await
        .context("chat session failed")
}
