//! Main chat loop orchestration.
//!
//! Coordinates the session lifecycle: welcome banner, optional conversation
//! load, input capture, slash commands, and one streamed turn per message
//! with Ctrl+C cancellation.

use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use chatline_core::chat::session::{ChatSession, SessionSettings};
use chatline_core::input::{Captured, InputMode};
use chatline_infra::history_file::{default_file_name, load_history, save_history};
use chatline_infra::http::StreamClient;
use chatline_types::config::ClientConfig;
use chatline_types::error::{HistoryError, TurnError};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::ChatInput;
use super::renderer::{ChatRenderer, TerminalSink};

/// What the loop does after a slash command.
enum Flow {
    Continue,
    /// Read the next message in multi-line mode.
    MultilineNext,
    Exit,
}

/// Run the interactive chat loop until `/quit`, Ctrl+D, or end of input.
pub async fn run_chat_loop(config: ClientConfig, load: Option<&Path>) -> anyhow::Result<()> {
    let client = StreamClient::new(&config).context("failed to create HTTP client")?;
    let mut session = ChatSession::new(SessionSettings::from(&config));
    let renderer = ChatRenderer::new();
    let mut input = ChatInput::detect();

    print_welcome_banner(session.settings(), input.is_terminal());

    if let Some(path) = load {
        load_into(&mut session, path, &renderer).await;
    }

    let mut multiline_once = false;

    loop {
        let multiline = multiline_once || session.settings().multiline;
        multiline_once = false;

        let prompt = if multiline {
            println!(
                "\n{} {}",
                style("You").green().bold(),
                style("(multi-line mode)").dim()
            );
            println!(
                "{}",
                style("Type your message. When done, type 'END' on a new line or press Ctrl+D").dim()
            );
            "... ".to_string()
        } else {
            format!("{} ", style("You >").green().bold())
        };

        let captured = input
            .capture(&prompt, multiline)
            .await
            .context("failed to read input")?;

        let (text, mode) = match captured {
            Captured::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            Captured::Cancelled => {
                println!("\n  {}", style("Input cancelled").yellow());
                continue;
            }
            Captured::Empty => {
                println!("  {}", style("Empty input received").yellow());
                continue;
            }
            Captured::Text { text, mode } => (text, mode),
        };

        if text.trim().is_empty() {
            continue;
        }

        if mode == InputMode::Pasted {
            println!(
                "  {}",
                style(format!(
                    "Auto-detected multi-line paste ({} lines)",
                    text.lines().count()
                ))
                .green()
            );
        }

        // Slash commands only come from a single typed line.
        if mode == InputMode::Single {
            if let Some(cmd) = commands::parse(&text) {
                match handle_command(cmd, &mut session, &renderer).await {
                    Flow::Continue => continue,
                    Flow::MultilineNext => {
                        multiline_once = true;
                        continue;
                    }
                    Flow::Exit => {
                        println!("\n  {}", style("Session ended.").dim());
                        break;
                    }
                }
            }
        }

        println!();
        renderer.print_framed("User", console::Color::Green, &text);
        println!();

        session.add_user_message(text);
        run_turn(&client, &mut session, &renderer).await;
    }

    info!(turns = session.turn_count(), "chat session ended");
    Ok(())
}

/// Stream one response into the session history.
///
/// Turn-level failures are printed here; the session always continues.
async fn run_turn(client: &StreamClient, session: &mut ChatSession, renderer: &ChatRenderer) {
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let temperature = session.settings().temperature;
    let max_tokens = session.settings().max_tokens;
    let tool_role = session.tool_role();

    let result = {
        let mut sink = TerminalSink::new(renderer);
        client
            .consume(session.history_mut(), temperature, max_tokens, tool_role, &mut sink, &cancel)
            .await
    };
    watcher.abort();

    match result {
        Ok(outcome) => {
            session.increment_turn();
            debug!(turn = session.turn_count(), ?outcome, "turn finished");
            if outcome.cancelled {
                println!("\n  {}", style("Response stopped. Type /exit to quit.").red().bold());
            } else if outcome.received_nothing() {
                println!(
                    "  {}",
                    style("No response received from the server. Check API connectivity or server logs.").yellow()
                );
                println!("  {}", style("Run with -v to see stream diagnostics.").dim());
            }
            println!();
        }
        Err(TurnError::Network(message)) => {
            eprintln!("\n  {} Network error: {message}", style("!").red().bold());
            eprintln!("  {}", style("Type a message to retry, /exit to quit.").dim());
        }
        Err(e) => {
            eprintln!("\n  {} Error: {e}", style("!").red().bold());
        }
    }
}

async fn handle_command(cmd: ChatCommand, session: &mut ChatSession, renderer: &ChatRenderer) -> Flow {
    match cmd {
        ChatCommand::Help => commands::print_help(),
        ChatCommand::Exit => return Flow::Exit,
        ChatCommand::Multiline => {
            println!("  {}", style("Switching to multi-line input mode for next message").green());
            return Flow::MultilineNext;
        }
        ChatCommand::MultilineToggle => {
            let status = if session.toggle_multiline() { "enabled" } else { "disabled" };
            println!("  {}", style(format!("Multi-line mode {status}")).green());
        }
        ChatCommand::Debug => renderer.print_debug(session.history().all()),
        ChatCommand::Save(name) => {
            let path = name
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default_file_name(chrono::Local::now())));
            match save_history(&path, session.history()).await {
                Ok(path) => println!(
                    "  {}",
                    style(format!("Conversation saved to {}", path.display())).green()
                ),
                Err(e) => println!("  {} {e}", style("!").red().bold()),
            }
        }
        ChatCommand::Load(file) => load_into(session, Path::new(&file), renderer).await,
        ChatCommand::History => renderer.print_history(session.history().all()),
        ChatCommand::ClearHistory => {
            session.history_mut().clear();
            println!("  {}", style("Conversation history cleared").green());
        }
        ChatCommand::ClearScreen => {
            let _ = console::Term::stdout().clear_screen();
        }
        ChatCommand::Temperature(None) => {
            println!(
                "  {}",
                style(format!("Current temperature: {}", session.settings().temperature)).green()
            );
        }
        ChatCommand::Temperature(Some(value)) => match session.set_temperature(value) {
            Ok(()) => println!("  {}", style(format!("Temperature set to {value}")).green()),
            Err(e) => println!("  {}", style(e).red()),
        },
        ChatCommand::Tokens(None) => {
            println!(
                "  {}",
                style(format!("Current max tokens: {}", session.settings().max_tokens)).green()
            );
        }
        ChatCommand::Tokens(Some(value)) => match session.set_max_tokens(value) {
            Ok(()) => println!("  {}", style(format!("Max tokens set to {value}")).green()),
            Err(e) => println!("  {}", style(e).red()),
        },
        ChatCommand::Invalid(message) => println!("  {}", style(message).red()),
        ChatCommand::Unknown(name) => {
            println!(
                "  {} Unknown command: {}. Type /help for available commands.",
                style("?").yellow().bold(),
                style(name).dim()
            );
        }
    }
    Flow::Continue
}

/// Replace the session history with a saved conversation and show it. On
/// failure the current history is kept.
async fn load_into(session: &mut ChatSession, path: &Path, renderer: &ChatRenderer) {
    match load_history(path).await {
        Ok(store) => {
            let turns = store.len();
            session.history_mut().replace(store);
            println!(
                "  {}",
                style(format!("Loaded conversation from {} ({turns} turns)", path.display())).green()
            );
            renderer.print_history(session.history().all());
        }
        Err(HistoryError::NotFound(path)) => {
            println!("  {}", style(format!("File not found: {}", path.display())).red());
        }
        Err(HistoryError::Malformed(reason)) => {
            println!(
                "  {}",
                style(format!("Invalid JSON format in file: {} ({reason})", path.display())).red()
            );
        }
        Err(e) => println!("  {} {e}", style("!").red().bold()),
    }
}
