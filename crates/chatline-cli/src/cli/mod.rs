//! Command-line arguments for the `chatline` binary.

pub mod chat;

use std::path::PathBuf;

use clap::Parser;

use chatline_types::config::ClientConfig;

/// Chat with a streaming model service from the terminal.
#[derive(Parser, Debug)]
#[command(name = "chatline", version, about, long_about = None)]
pub struct Cli {
    /// Chat endpoint URL (overrides the config file).
    #[arg(long, env = "CHATLINE_URL")]
    pub url: Option<String>,

    /// Sampling temperature, 0.0-1.0.
    #[arg(long, value_parser = parse_temperature)]
    pub temp: Option<f64>,

    /// Maximum output tokens.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub tokens: Option<u32>,

    /// Load a saved conversation before the first prompt.
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Config file (default: ~/.chatline/config.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Suppress all log output except errors.
    #[arg(long)]
    pub quiet: bool,

    /// Detailed log output (-v for verbose, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Flags win over the config file.
    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.url {
            config.endpoint = url.clone();
        }
        if let Some(temp) = self.temp {
            config.temperature = temp;
        }
        if let Some(tokens) = self.tokens {
            config.max_tokens = tokens;
        }
    }
}

fn parse_temperature(value: &str) -> Result<f64, String> {
    let temp: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if (0.0..=1.0).contains(&temp) {
        Ok(temp)
    } else {
        Err("temperature must be between 0.0 and 1.0".to_string())
    }
}
