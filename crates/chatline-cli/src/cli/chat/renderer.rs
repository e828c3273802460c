//! Terminal rendering for the chat loop.
//!
//! `ChatRenderer` combines `termimad` for prose and `syntect` for code block
//! highlighting, and draws role frames. `TerminalSink` is the stream
//! consumer's render port: the accumulated assistant text is re-rendered as
//! markdown on every chunk, then replaced by the framed render once the
//! segment is finalized.

use std::io::Write;
use std::time::Duration;

use console::{Color, Style, measure_text_width, style};
use crossterm::{cursor, execute, terminal};
use indicatif::{ProgressBar, ProgressStyle};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style as SyntectStyle, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

use chatline_core::format::{format_tool_result, preview};
use chatline_core::stream::sink::RenderSink;
use chatline_types::chat::{Role, Turn};
use chatline_types::error::DecodeError;

const FALLBACK_COLUMNS: u16 = 80;

/// Characters of each turn shown by `/debug`.
const DEBUG_PREVIEW_CHARS: usize = 50;

fn terminal_size() -> (usize, usize) {
    let (cols, rows) = terminal::size().unwrap_or((FALLBACK_COLUMNS, 24));
    (cols.max(20) as usize, rows as usize)
}

fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Green,
        Role::Assistant => Color::Magenta,
        Role::Tool => Color::Cyan,
        Role::System => Color::Yellow,
    }
}

fn role_title(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Assistant => "Assistant",
        Role::Tool => "Tool Result",
        Role::System => "System",
    }
}

/// Terminal rows `text` occupies when printed from column 0 at `cols`
/// columns per row.
pub fn rows_used(text: &str, cols: usize) -> usize {
    text.split('\n')
        .map(|line| measure_text_width(line).div_ceil(cols.max(1)).max(1))
        .sum()
}

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(termimad::crossterm::style::Color::Magenta);
        skin.headers[0].set_fg(termimad::crossterm::style::Color::Magenta);
        skin.headers[1].set_fg(termimad::crossterm::style::Color::Magenta);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render markdown to `width` columns, highlighting fenced code blocks.
    pub fn render_markdown(&self, markdown: &str, width: usize) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();
        let mut prose = String::new();

        for line in markdown.lines() {
            if line.trim_start().starts_with("```") {
                if in_code_block {
                    in_code_block = false;
                    output.push_str(&self.highlight_code(&code_buf, &code_lang));
                } else {
                    self.flush_prose(&mut prose, &mut output, width);
                    in_code_block = true;
                    code_lang = line.trim().trim_start_matches('`').trim().to_string();
                    code_buf.clear();
                }
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                prose.push_str(line);
                prose.push('\n');
            }
        }

        self.flush_prose(&mut prose, &mut output, width);
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    fn flush_prose(&self, prose: &mut String, output: &mut String, width: usize) {
        if prose.is_empty() {
            return;
        }
        output.push_str(&self.skin.text(prose, Some(width)).to_string());
        prose.clear();
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let theme = &self.theme_set.themes["base16-ocean.dark"];
        let mut h = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        if !lang.is_empty() {
            output.push_str(&format!("{}\n", style(format!("--- {lang} ---")).dim()));
        }

        for line in code.lines() {
            let ranges: Vec<(SyntectStyle, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("{escaped}\x1b[0m\n"));
        }

        output
    }

    /// Live view of an open assistant segment: the role heading followed by
    /// the markdown render of everything received so far.
    pub fn render_live(&self, buffer: &str, width: usize) -> String {
        let heading = style(role_title(Role::Assistant)).magenta().bold();
        format!("{heading}\n{}", self.render_markdown(buffer, width))
    }

    /// Print `markdown` inside a rounded frame titled `title`.
    pub fn print_framed(&self, title: &str, color: Color, markdown: &str) {
        let (cols, _) = terminal_size();
        let border = Style::new().fg(color);
        let inner = cols.saturating_sub(2);
        let body = self.render_markdown(markdown, inner);

        let heading = format!("╭─ {title} ");
        let fill = cols.saturating_sub(measure_text_width(&heading));
        println!("{}", border.apply_to(format!("{heading}{}", "─".repeat(fill))));
        for line in body.trim_end_matches('\n').lines() {
            println!("{} {line}", border.apply_to("│"));
        }
        println!("{}", border.apply_to(format!("╰{}", "─".repeat(cols.saturating_sub(1)))));
    }

    pub fn print_turn(&self, turn: &Turn) {
        let content = match turn.role {
            Role::Tool => format_tool_result(&turn.content),
            _ => turn.content.clone(),
        };
        self.print_framed(role_title(turn.role), role_color(turn.role), &content);
    }

    /// `/history`: every turn in its role frame.
    pub fn print_history(&self, turns: &[Turn]) {
        if turns.is_empty() {
            println!("  {}", style("No conversation history yet.").dim());
            return;
        }
        for turn in turns {
            self.print_turn(turn);
        }
    }

    /// `/debug`: index, role, and a short preview of each turn.
    pub fn print_debug(&self, turns: &[Turn]) {
        println!("  {}", style("Current conversation history:").bold());
        for (i, turn) in turns.iter().enumerate() {
            println!(
                "  [{i}] Role: {}, Content: {}",
                turn.role,
                preview(&turn.content, DEBUG_PREVIEW_CHARS)
            );
        }
    }
}

/// Render port for one streamed turn.
///
/// Shows a spinner until the first event, redraws the assistant segment
/// from its buffer while it fits on screen, and swaps it for the framed
/// render on finalization. Once the segment outgrows the screen, or a
/// decode error is printed inside it, new tokens are appended raw.
pub struct TerminalSink<'a> {
    renderer: &'a ChatRenderer,
    spinner: Option<ProgressBar>,
    /// Plain text printed for the open assistant segment, header included.
    streamed: String,
    /// The open segment is still being redrawn from its buffer.
    live: bool,
}

impl<'a> TerminalSink<'a> {
    pub fn new(renderer: &'a ChatRenderer) -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("waiting for response...");
        spinner.enable_steady_tick(Duration::from_millis(80));

        Self {
            renderer,
            spinner: Some(spinner),
            streamed: String::new(),
            live: false,
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Erase the raw streamed text. Returns false when it has scrolled
    /// past the top of the screen and cannot be reached.
    fn erase_streamed(&self) -> bool {
        let (cols, rows) = terminal_size();
        let used = rows_used(&self.streamed, cols);
        if used >= rows {
            return false;
        }

        let mut stdout = std::io::stdout();
        let moved = if used > 1 {
            execute!(stdout, cursor::MoveUp((used - 1) as u16))
        } else {
            Ok(())
        };
        moved
            .and_then(|_| {
                execute!(
                    stdout,
                    cursor::MoveToColumn(0),
                    terminal::Clear(terminal::ClearType::FromCursorDown)
                )
            })
            .is_ok()
    }
}

impl Drop for TerminalSink<'_> {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

impl RenderSink for TerminalSink<'_> {
    fn connected(&mut self) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message("receiving...");
        }
    }

    fn assistant_started(&mut self) {
        self.stop_spinner();
        self.streamed = format!("{}\n", role_title(Role::Assistant));
        self.live = true;
        print!("{}", style(&self.streamed).magenta().bold());
        let _ = std::io::stdout().flush();
    }

    fn assistant_progress(&mut self, delta: &str, buffer: &str) {
        if self.live && self.erase_streamed() {
            let frame = self.renderer.render_live(buffer, terminal_size().0);
            print!("{frame}");
            self.streamed = console::strip_ansi_codes(&frame).into_owned();
        } else {
            self.live = false;
            print!("{delta}");
            self.streamed.push_str(delta);
        }
        let _ = std::io::stdout().flush();
    }

    fn assistant_finished(&mut self, content: &str) {
        if self.erase_streamed() {
            if !content.is_empty() {
                self.renderer
                    .print_framed(role_title(Role::Assistant), role_color(Role::Assistant), content);
            }
        } else {
            println!();
            println!("{}", style("─".repeat(terminal_size().0)).magenta());
        }
        self.streamed.clear();
        self.live = false;
    }

    fn tool_result(&mut self, content: &str) {
        self.stop_spinner();
        self.renderer.print_framed(
            role_title(Role::Tool),
            role_color(Role::Tool),
            &format_tool_result(content),
        );
    }

    fn decode_error(&mut self, error: &DecodeError) {
        self.stop_spinner();
        self.live = false;
        if !self.streamed.is_empty() {
            println!();
            self.streamed.push('\n');
        }
        let line = format!(
            "  {} {}\n  {}",
            style("!").red().bold(),
            style(&error.message).red(),
            style(format!("Raw data: {}", preview(&error.line, 200))).dim()
        );
        println!("{line}");
        if !self.streamed.is_empty() {
            self.streamed.push_str(&format!("{}\n", console::strip_ansi_codes(&line)));
        }
    }
}
