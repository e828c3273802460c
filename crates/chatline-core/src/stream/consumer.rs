//! The line-driven read loop.
//!
//! [`consume_lines`] pulls lines from any stream (the HTTP body in
//! production, an in-memory stream in tests), decodes each one, and feeds
//! the render state machine. It stops at end of stream, on the first
//! transport error, or when the cancellation token fires; in every case the
//! open segment is finalized with whatever content has accumulated.

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use chatline_types::chat::Role;
use chatline_types::error::TurnError;

use crate::history::ConversationStore;

use super::decoder::decode_line;
use super::render_state::RoleRenderState;
use super::sink::RenderSink;

/// Summary of one consumed turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    pub assistant_turns: usize,
    pub tool_turns: usize,
    pub decode_errors: usize,
    /// The read loop stopped because the token was cancelled.
    pub cancelled: bool,
    saw_assistant_content: bool,
}

impl TurnOutcome {
    /// Outcome for a turn cancelled before any of the body was read.
    pub fn cancelled_early() -> Self {
        Self {
            cancelled: true,
            ..Self::default()
        }
    }

    /// No assistant content and no tool events for the whole turn.
    pub fn received_nothing(&self) -> bool {
        !self.saw_assistant_content && self.tool_turns == 0
    }
}

/// Drive `lines` through the decoder and render state machine.
///
/// Decode failures are reported to `sink` and counted; they never end the
/// turn. A transport error ends the turn after finalizing the open segment.
pub async fn consume_lines<S>(
    lines: S,
    history: &mut ConversationStore,
    tool_role: Role,
    sink: &mut impl RenderSink,
    cancel: &CancellationToken,
) -> Result<TurnOutcome, TurnError>
where
    S: Stream<Item = Result<String, TurnError>>,
{
    let mut lines = std::pin::pin!(lines);
    let mut state = RoleRenderState::new(tool_role);
    let mut decode_errors = 0;
    let mut cancelled = false;

    let result = loop {
        // biased: a pending cancellation wins over an already-ready line.
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                cancelled = true;
                break Ok(());
            }
            next = lines.next() => next,
        };

        let line = match next {
            None => break Ok(()),
            Some(Err(e)) => break Err(e),
            Some(Ok(line)) => line,
        };

        match decode_line(&line) {
            Ok(Some(event)) => state.handle(event, history, sink),
            Ok(None) => {}
            Err(err) => {
                warn!(line = %err.line, error = %err.message, "skipping malformed stream line");
                decode_errors += 1;
                sink.decode_error(&err);
            }
        }
    };

    state.finish(history, sink);

    let outcome = TurnOutcome {
        assistant_turns: state.assistant_turns(),
        tool_turns: state.tool_turns(),
        decode_errors,
        cancelled,
        saw_assistant_content: state.saw_assistant_content(),
    };

    match result {
        Ok(()) => {
            info!(
                assistant_turns = outcome.assistant_turns,
                tool_turns = outcome.tool_turns,
                decode_errors = outcome.decode_errors,
                cancelled = outcome.cancelled,
                "stream turn complete"
            );
            Ok(outcome)
        }
        Err(e) => {
            warn!(error = %e, "stream turn aborted");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::stream;

    use chatline_types::chat::Turn;
    use chatline_types::error::DecodeError;

    use super::*;
    use crate::stream::sink::RecordingSink;

    fn lines(raw: &[&str]) -> Vec<Result<String, TurnError>> {
        raw.iter().map(|l| Ok(l.to_string())).collect()
    }

    async fn consume(raw: &[&str]) -> (ConversationStore, RecordingSink, TurnOutcome) {
        let mut history = ConversationStore::new();
        let mut sink = RecordingSink::default();
        let outcome = consume_lines(
            stream::iter(lines(raw)),
            &mut history,
            Role::Tool,
            &mut sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        (history, sink, outcome)
    }

    #[tokio::test]
    async fn test_malformed_line_is_skipped() {
        let (history, sink, outcome) = consume(&[
            r#"{"role":"assistant","type":"chunk","content":"Hi"}"#,
            "not-json",
            r#"{"role":"assistant","type":"chunk","content":" there"}"#,
        ])
        .await;
        assert_eq!(history.all(), &[Turn::assistant("Hi there")]);
        assert_eq!(sink.decode_errors(), 1);
        assert_eq!(outcome.decode_errors, 1);
        assert!(!outcome.received_nothing());
    }

    #[tokio::test]
    async fn test_keepalive_lines_are_not_errors() {
        let (history, sink, _) = consume(&[
            "",
            r#"{"role":"assistant","type":"chunk","content":"x"}"#,
            "   ",
        ])
        .await;
        assert_eq!(history.len(), 1);
        assert_eq!(sink.decode_errors(), 0);
    }

    #[tokio::test]
    async fn test_empty_stream_received_nothing() {
        let (history, _, outcome) = consume(&[]).await;
        assert!(history.is_empty());
        assert!(outcome.received_nothing());
        assert!(!outcome.cancelled);
    }

    #[test]
    fn test_cancelled_early_outcome() {
        let outcome = TurnOutcome::cancelled_early();
        assert!(outcome.cancelled);
        assert!(outcome.received_nothing());
    }

    #[tokio::test]
    async fn test_done_only_received_nothing() {
        let (history, _, outcome) = consume(&[r#"{"role":"assistant","type":"done"}"#]).await;
        assert!(history.is_empty());
        assert!(outcome.received_nothing());
    }

    #[tokio::test]
    async fn test_empty_tool_result_counts_as_response() {
        let (history, _, outcome) = consume(&[r#"{"role":"tool_call","content":""}"#]).await;
        assert_eq!(history.len(), 1);
        assert!(!outcome.received_nothing());
    }

    /// Cancels the token as soon as the buffer reaches a target value.
    struct CancelAt {
        inner: RecordingSink,
        target: &'static str,
        token: CancellationToken,
    }

    impl RenderSink for CancelAt {
        fn assistant_progress(&mut self, delta: &str, buffer: &str) {
            self.inner.assistant_progress(delta, buffer);
            if buffer == self.target {
                self.token.cancel();
            }
        }
        fn assistant_finished(&mut self, content: &str) {
            self.inner.assistant_finished(content);
        }
        fn tool_result(&mut self, content: &str) {
            self.inner.tool_result(content);
        }
        fn decode_error(&mut self, error: &DecodeError) {
            self.inner.decode_error(error);
        }
    }

    #[tokio::test]
    async fn test_cancellation_keeps_partial_content() {
        let token = CancellationToken::new();
        let mut sink = CancelAt {
            inner: RecordingSink::default(),
            target: "Hello, wor",
            token: token.clone(),
        };
        let mut history = ConversationStore::new();
        let outcome = consume_lines(
            stream::iter(lines(&[
                r#"{"role":"assistant","type":"chunk","content":"Hello, "}"#,
                r#"{"role":"assistant","type":"chunk","content":"wor"}"#,
                r#"{"role":"assistant","type":"chunk","content":"ld"}"#,
                r#"{"role":"tool_call","content":"never"}"#,
            ])),
            &mut history,
            Role::Tool,
            &mut sink,
            &token,
        )
        .await
        .unwrap();

        assert!(outcome.cancelled);
        assert_eq!(history.all(), &[Turn::assistant("Hello, wor")]);
        assert_eq!(outcome.tool_turns, 0);
    }

    #[tokio::test]
    async fn test_cancellation_while_waiting_for_next_line() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let body = stream::iter(lines(&[r#"{"role":"assistant","type":"chunk","content":"par"}"#]))
            .chain(stream::pending());
        let mut history = ConversationStore::new();
        let outcome = consume_lines(body, &mut history, Role::Tool, &mut RecordingSink::default(), &token)
            .await
            .unwrap();

        assert!(outcome.cancelled);
        assert_eq!(history.all(), &[Turn::assistant("par")]);
    }

    #[tokio::test]
    async fn test_transport_error_finalizes_then_fails() {
        let mut body = lines(&[r#"{"role":"assistant","type":"chunk","content":"half"}"#]);
        body.push(Err(TurnError::Network("connection reset".into())));
        body.push(Ok(r#"{"role":"assistant","type":"chunk","content":"lost"}"#.into()));

        let mut history = ConversationStore::new();
        let err = consume_lines(
            stream::iter(body),
            &mut history,
            Role::Tool,
            &mut RecordingSink::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(err, TurnError::Network("connection reset".into()));
        assert_eq!(history.all(), &[Turn::assistant("half")]);
    }
}
