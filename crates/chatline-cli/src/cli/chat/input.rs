//! Terminal and piped input for the chat loop.
//!
//! On a terminal, input goes through `rustyline_async::Readline`. The editor
//! puts the terminal in raw mode, so one is opened per capture and dropped
//! before the response streams; Ctrl+C then reaches the signal handler
//! instead of the line editor. Piped stdin is read through the core
//! `BufferedSource`.

use std::io::IsTerminal;
use std::time::Duration;

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

use chatline_core::input::{BufferedSource, Captured, LineEvent, LineSource, read_multiline, read_next};

/// Lines arriving within this window after the previous one are part of a
/// paste.
const PASTE_WINDOW: Duration = Duration::from_millis(25);

/// Line source over an interactive terminal.
pub struct ReadlineSource {
    rl: Readline,
    /// `readline()` fails with `Closed` once every writer is dropped, so
    /// the writer lives as long as the editor.
    _writer: SharedWriter,
    failure: Option<ReadlineError>,
}

impl ReadlineSource {
    pub fn new(prompt: String) -> Result<Self, ReadlineError> {
        let (rl, writer) = Readline::new(prompt)?;
        Ok(Self {
            rl,
            _writer: writer,
            failure: None,
        })
    }

    /// The editor error that ended input, if any.
    pub fn take_failure(&mut self) -> Option<ReadlineError> {
        self.failure.take()
    }
}

/// Map a readline result to a line event. An editor error ends the capture
/// like EOF but is kept in `failure` for the caller to report.
fn map_event(result: Result<ReadlineEvent, ReadlineError>, failure: &mut Option<ReadlineError>) -> LineEvent {
    match result {
        Ok(ReadlineEvent::Line(line)) => LineEvent::Line(line),
        Ok(ReadlineEvent::Eof) => LineEvent::Eof,
        Ok(ReadlineEvent::Interrupted) => LineEvent::Interrupted,
        Err(e) => {
            tracing::warn!(error = %e, "readline failed");
            *failure = Some(e);
            LineEvent::Eof
        }
    }
}

impl LineSource for ReadlineSource {
    async fn next_line(&mut self) -> LineEvent {
        let result = self.rl.readline().await;
        map_event(result, &mut self.failure)
    }

    // A trailing fragment without a newline stays in the editor until the
    // user presses Enter, so this never yields `Partial`.
    async fn ready_line(&mut self) -> Option<LineEvent> {
        let result = tokio::time::timeout(PASTE_WINDOW, self.rl.readline()).await.ok()?;
        Some(map_event(result, &mut self.failure))
    }
}

/// Where user input comes from for the whole session.
pub enum ChatInput {
    Terminal,
    Piped(BufferedSource<tokio::io::Stdin>),
}

impl ChatInput {
    /// Terminal input when stdin is a TTY, otherwise buffered piped input.
    pub fn detect() -> Self {
        if std::io::stdin().is_terminal() {
            ChatInput::Terminal
        } else {
            tracing::debug!("stdin is not a terminal, reading piped input");
            ChatInput::Piped(BufferedSource::new(tokio::io::stdin()))
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatInput::Terminal)
    }

    /// Capture one user entry. A terminal editor failure is an error, not
    /// end of input.
    pub async fn capture(&mut self, prompt: &str, multiline: bool) -> Result<Captured, ReadlineError> {
        match self {
            ChatInput::Terminal => {
                let mut source = ReadlineSource::new(prompt.to_string())?;
                let captured = capture_from(&mut source, multiline).await;
                match source.take_failure() {
                    Some(e) => Err(e),
                    None => Ok(captured),
                }
            }
            ChatInput::Piped(source) => Ok(capture_from(source, multiline).await),
        }
    }
}

async fn capture_from(source: &mut impl LineSource, multiline: bool) -> Captured {
    if multiline {
        read_multiline(source).await
    } else {
        read_next(source).await
    }
}
