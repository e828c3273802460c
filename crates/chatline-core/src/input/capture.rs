//! Single-line, paste, and multi-line input capture.

use tracing::debug;

use super::source::{LineEvent, LineSource};

/// Line that ends an explicit multi-line entry.
const MULTILINE_TERMINATOR: &str = "END";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// One typed line.
    Single,
    /// Several lines that were already waiting when the first one arrived.
    Pasted,
    /// Explicit multi-line entry ended with `END` or EOF.
    Multiline,
}

/// Result of one capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured {
    Text { text: String, mode: InputMode },
    /// Multi-line entry produced nothing but whitespace.
    Empty,
    /// The user cancelled. Distinct from an empty line.
    Cancelled,
    Eof,
}

/// Read the next user entry, folding a paste into one block.
///
/// After the first line, every line the source reports as already
/// available is drained, plus a trailing unterminated fragment, and the
/// lot is joined with `\n`. A cancel during draining discards everything.
pub async fn read_next(source: &mut impl LineSource) -> Captured {
    let first = match source.next_line().await {
        LineEvent::Line(line) | LineEvent::Partial(line) => line,
        LineEvent::Eof => return Captured::Eof,
        LineEvent::Interrupted => return Captured::Cancelled,
    };

    let mut lines = vec![first];
    while let Some(event) = source.ready_line().await {
        match event {
            LineEvent::Line(line) => lines.push(line),
            LineEvent::Partial(line) => {
                if !line.is_empty() {
                    lines.push(line);
                }
                break;
            }
            LineEvent::Eof => break,
            LineEvent::Interrupted => return Captured::Cancelled,
        }
    }

    if lines.len() > 1 {
        debug!(lines = lines.len(), "detected pasted input");
        Captured::Text {
            text: lines.join("\n"),
            mode: InputMode::Pasted,
        }
    } else {
        Captured::Text {
            text: lines.swap_remove(0),
            mode: InputMode::Single,
        }
    }
}

/// Collect lines until `END` on its own line or EOF.
pub async fn read_multiline(source: &mut impl LineSource) -> Captured {
    let mut lines = Vec::new();
    loop {
        match source.next_line().await {
            LineEvent::Line(line) | LineEvent::Partial(line) => {
                if line.trim() == MULTILINE_TERMINATOR {
                    break;
                }
                lines.push(line);
            }
            LineEvent::Eof => break,
            LineEvent::Interrupted => return Captured::Cancelled,
        }
    }

    let text = lines.join("\n").trim().to_string();
    if text.is_empty() {
        Captured::Empty
    } else {
        Captured::Text {
            text,
            mode: InputMode::Multiline,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::input::source::BufferedSource;

    /// Scripted source: `typed` events arrive one per `next_line`, `ready`
    /// events are what `ready_line` reports as already waiting.
    #[derive(Default)]
    struct Script {
        typed: VecDeque<LineEvent>,
        ready: VecDeque<LineEvent>,
    }

    impl LineSource for Script {
        async fn next_line(&mut self) -> LineEvent {
            self.typed.pop_front().unwrap_or(LineEvent::Eof)
        }

        async fn ready_line(&mut self) -> Option<LineEvent> {
            self.ready.pop_front()
        }
    }

    fn line(s: &str) -> LineEvent {
        LineEvent::Line(s.to_string())
    }

    #[tokio::test]
    async fn test_buffered_lines_are_pasted() {
        let mut source = BufferedSource::new(&b"line1\nline2\n"[..]);
        assert_eq!(
            read_next(&mut source).await,
            Captured::Text {
                text: "line1\nline2".into(),
                mode: InputMode::Pasted
            }
        );
    }

    #[tokio::test]
    async fn test_single_line_without_buffered_input() {
        let mut source = BufferedSource::new(&b"hello\n"[..]);
        assert_eq!(
            read_next(&mut source).await,
            Captured::Text {
                text: "hello".into(),
                mode: InputMode::Single
            }
        );
        assert_eq!(read_next(&mut source).await, Captured::Eof);
    }

    #[tokio::test]
    async fn test_paste_includes_trailing_partial_line() {
        let mut source = BufferedSource::new(&b"a\nb\nc"[..]);
        assert_eq!(
            read_next(&mut source).await,
            Captured::Text {
                text: "a\nb\nc".into(),
                mode: InputMode::Pasted
            }
        );
    }

    #[tokio::test]
    async fn test_paste_with_line_past_read_buffer_is_one_message() {
        let long = "b".repeat(9000);
        let input = format!("a\n{long}\nnext\n");
        let mut source = BufferedSource::new(input.as_bytes());
        assert_eq!(
            read_next(&mut source).await,
            Captured::Text {
                text: format!("a\n{long}\nnext"),
                mode: InputMode::Pasted
            }
        );
        assert_eq!(read_next(&mut source).await, Captured::Eof);
    }

    #[tokio::test]
    async fn test_cancel_during_paste_yields_no_text() {
        let mut source = Script {
            typed: VecDeque::from([line("first")]),
            ready: VecDeque::from([line("second"), LineEvent::Interrupted]),
        };
        assert_eq!(read_next(&mut source).await, Captured::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_at_prompt() {
        let mut source = Script {
            typed: VecDeque::from([LineEvent::Interrupted, line("after")]),
            ..Default::default()
        };
        assert_eq!(read_next(&mut source).await, Captured::Cancelled);
        // The loop keeps working after a cancel.
        assert!(matches!(
            read_next(&mut source).await,
            Captured::Text { mode: InputMode::Single, .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_line_is_text_not_cancel() {
        let mut source = Script {
            typed: VecDeque::from([line("")]),
            ..Default::default()
        };
        assert_eq!(
            read_next(&mut source).await,
            Captured::Text {
                text: String::new(),
                mode: InputMode::Single
            }
        );
    }

    #[tokio::test]
    async fn test_multiline_until_end_marker() {
        let mut source = BufferedSource::new(&b"fn main() {\n}\n  END \nignored\n"[..]);
        assert_eq!(
            read_multiline(&mut source).await,
            Captured::Text {
                text: "fn main() {\n}".into(),
                mode: InputMode::Multiline
            }
        );
    }

    #[tokio::test]
    async fn test_multiline_until_eof() {
        let mut source = BufferedSource::new(&b"one\ntwo"[..]);
        assert_eq!(
            read_multiline(&mut source).await,
            Captured::Text {
                text: "one\ntwo".into(),
                mode: InputMode::Multiline
            }
        );
    }

    #[tokio::test]
    async fn test_multiline_empty_and_cancel() {
        let mut empty = BufferedSource::new(&b"  \nEND\n"[..]);
        assert_eq!(read_multiline(&mut empty).await, Captured::Empty);

        let mut cancelled = Script {
            typed: VecDeque::from([line("draft"), LineEvent::Interrupted]),
            ..Default::default()
        };
        assert_eq!(read_multiline(&mut cancelled).await, Captured::Cancelled);
    }
}
