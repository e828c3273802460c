//! Slash command parsing and help text for the chat loop.
//!
//! Commands start with `/` and control input mode, history persistence,
//! and request settings.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Exit the chat session.
    Exit,
    /// Read the next message in multi-line mode.
    Multiline,
    /// Flip persistent multi-line mode.
    MultilineToggle,
    /// Dump a short listing of the raw history.
    Debug,
    /// Save the conversation; `None` picks a timestamped file name.
    Save(Option<String>),
    /// Load a conversation from a file.
    Load(String),
    /// Show the conversation history.
    History,
    /// Forget the conversation history.
    ClearHistory,
    /// Clear the terminal screen.
    ClearScreen,
    /// Show (`None`) or set the temperature.
    Temperature(Option<f64>),
    /// Show (`None`) or set the max output tokens.
    Tokens(Option<u32>),
    /// Recognized command with a bad or missing argument.
    Invalid(String),
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, char::is_whitespace).collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts
        .get(1)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/quit" | "/exit" | "/q" => ChatCommand::Exit,
        "/multiline" | "/m" => match arg.as_deref().map(str::to_lowercase).as_deref() {
            None => ChatCommand::Multiline,
            Some("toggle") => ChatCommand::MultilineToggle,
            Some(other) => ChatCommand::Invalid(format!("unknown {cmd} option: {other}")),
        },
        "/debug" => ChatCommand::Debug,
        "/save" => ChatCommand::Save(arg),
        "/load" => match arg {
            Some(file) => ChatCommand::Load(file),
            None => ChatCommand::Invalid("Please specify a file to load".to_string()),
        },
        "/history" => ChatCommand::History,
        "/clear" => ChatCommand::ClearHistory,
        "/cls" => ChatCommand::ClearScreen,
        "/temp" => match arg {
            None => ChatCommand::Temperature(None),
            Some(value) => match value.parse::<f64>() {
                Ok(temp) => ChatCommand::Temperature(Some(temp)),
                Err(_) => ChatCommand::Invalid("Invalid temperature value".to_string()),
            },
        },
        "/tokens" => match arg {
            None => ChatCommand::Tokens(None),
            Some(value) => match value.parse::<u32>() {
                Ok(tokens) => ChatCommand::Tokens(Some(tokens)),
                Err(_) => ChatCommand::Invalid("Invalid max tokens value".to_string()),
            },
        },
        other => ChatCommand::Unknown(other.to_string()),
    };

    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/quit, /exit", "Exit the program"),
        ("/multiline, /m", "Multi-line input for the next message"),
        ("/m toggle", "Toggle persistent multi-line mode"),
        ("/debug", "List raw conversation history entries"),
        ("/save [file]", "Save conversation (default: conversation_<timestamp>.json)"),
        ("/load <file>", "Load conversation from a file"),
        ("/history", "Display conversation history"),
        ("/clear", "Clear the conversation history"),
        ("/cls", "Clear the screen"),
        ("/temp [value]", "Show or set temperature (0.0-1.0)"),
        ("/tokens [n]", "Show or set max tokens"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (name, description) in rows {
        println!("  {:<18}{}", style(name).cyan(), description);
    }
    println!();
    println!("  {}", style("Input modes:").bold());
    println!("  {}", style("Pasted multi-line text is detected and sent as one message.").dim());
    println!(
        "  {}",
        style("In multi-line mode, finish with END on its own line or Ctrl+D.").dim()
    );
    println!();
    println!(
        "  {}",
        style("Ctrl+C stops the current response or cancels input, Ctrl+D exits").dim()
    );
    println!();
}
