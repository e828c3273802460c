//! LineSource trait and the buffered-reader implementation.

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tracing::warn;

/// One read from a line source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A complete line, terminator removed.
    Line(String),
    /// Trailing input with no line terminator.
    Partial(String),
    /// End of input (Ctrl+D or a closed pipe).
    Eof,
    /// The user cancelled (Ctrl+C).
    Interrupted,
}

/// A source of user input lines.
///
/// Uses RPITIT so implementations can hold non-`Send` terminal handles.
pub trait LineSource {
    /// Wait for the next line.
    fn next_line(&mut self) -> impl Future<Output = LineEvent>;

    /// Return the next line only if it is already available without waiting
    /// on the user. `None` means nothing is pending.
    fn ready_line(&mut self) -> impl Future<Output = Option<LineEvent>>;
}

/// Line source over any async reader, e.g. piped stdin.
///
/// "Ready" means the bytes are already sitting in the read buffer: a paste
/// or piped file arrives in one read, so everything after the first line is
/// buffered by the time the first line is returned.
pub struct BufferedSource<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> BufferedSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }

    /// A complete line already sitting in the read buffer.
    fn take_buffered_line(&mut self) -> Option<LineEvent> {
        let buffered = self.reader.buffer();
        let idx = buffered.iter().position(|b| *b == b'\n')?;
        let event = LineEvent::Line(to_text(&buffered[..idx]));
        AsyncBufRead::consume(Pin::new(&mut self.reader), idx + 1);
        Some(event)
    }

    /// Read through the next `\n`, or to end of input (`Partial`).
    async fn read_line(&mut self) -> LineEvent {
        let mut bytes = Vec::new();
        match self.reader.read_until(b'\n', &mut bytes).await {
            Ok(0) => LineEvent::Eof,
            Ok(_) => {
                if bytes.last() == Some(&b'\n') {
                    bytes.pop();
                    LineEvent::Line(to_text(&bytes))
                } else {
                    LineEvent::Partial(to_text(&bytes))
                }
            }
            Err(e) => {
                warn!(error = %e, "input read failed, treating as end of input");
                LineEvent::Eof
            }
        }
    }
}

fn to_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_suffix('\r').unwrap_or(&text).to_string()
}

impl<R: AsyncRead + Unpin> LineSource for BufferedSource<R> {
    async fn next_line(&mut self) -> LineEvent {
        self.read_line().await
    }

    async fn ready_line(&mut self) -> Option<LineEvent> {
        if let Some(line) = self.take_buffered_line() {
            return Some(line);
        }
        if self.reader.buffer().is_empty() {
            return None;
        }
        // The buffer ends mid-line; the rest of that line is already in
        // flight, so finish it rather than splitting it.
        Some(self.read_line().await)
    }
}
