//! Welcome banner shown when a chat session starts.

use console::style;

use chatline_core::chat::session::SessionSettings;

/// Print the welcome banner with the active endpoint and request settings.
pub fn print_welcome_banner(settings: &SessionSettings, interactive: bool) {
    println!();
    println!("  {}", style("chatline").magenta().bold());
    println!("  {}", style("Streaming chat client").dim());
    println!();
    println!("  {}  {}", style("Endpoint:").bold(), style(&settings.endpoint).dim());
    println!("  {}  {}", style("Temperature:").bold(), style(settings.temperature).dim());
    println!("  {}  {}", style("Max tokens:").bold(), style(settings.max_tokens).dim());
    println!();
    if interactive {
        println!(
            "  {}",
            style("Type /help for commands, /m for multi-line input, Ctrl+D to exit").dim()
        );
    }
    println!("  {}", style("---").dim());
    println!();
}
