//! RenderSink trait definition.
//!
//! The render state machine never writes to the terminal itself. It calls
//! into a `RenderSink`, which the binary implements with termimad/syntect
//! and tests implement with a recorder.

use chatline_types::error::DecodeError;

pub trait RenderSink {
    /// Response headers arrived; the body is about to be read.
    fn connected(&mut self) {}

    /// An assistant segment has started.
    fn assistant_started(&mut self) {}

    /// A chunk arrived. `delta` is the new fragment, `buffer` everything
    /// accumulated in this segment so far (including `delta`).
    fn assistant_progress(&mut self, delta: &str, buffer: &str);

    /// The assistant segment is finalized. `content` may be empty, in which
    /// case nothing was committed to history.
    fn assistant_finished(&mut self, content: &str);

    /// A complete tool result arrived.
    fn tool_result(&mut self, content: &str);

    /// A line could not be decoded; the stream continues.
    fn decode_error(&mut self, error: &DecodeError);
}

/// A sink that renders nothing.
#[derive(Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn assistant_progress(&mut self, _delta: &str, _buffer: &str) {}
    fn assistant_finished(&mut self, _content: &str) {}
    fn tool_result(&mut self, _content: &str) {}
    fn decode_error(&mut self, _error: &DecodeError) {}
}

/// Records every call. Built for tests, and for dependent crates' tests
/// through the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Connected,
    Started,
    Progress { delta: String, buffer: String },
    Finished(String),
    Tool(String),
    DecodeError(String),
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingSink {
    pub fn decode_errors(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SinkCall::DecodeError(_)))
            .count()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl RenderSink for RecordingSink {
    fn connected(&mut self) {
        self.calls.push(SinkCall::Connected);
    }

    fn assistant_started(&mut self) {
        self.calls.push(SinkCall::Started);
    }

    fn assistant_progress(&mut self, delta: &str, buffer: &str) {
        self.calls.push(SinkCall::Progress {
            delta: delta.to_string(),
            buffer: buffer.to_string(),
        });
    }

    fn assistant_finished(&mut self, content: &str) {
        self.calls.push(SinkCall::Finished(content.to_string()));
    }

    fn tool_result(&mut self, content: &str) {
        self.calls.push(SinkCall::Tool(content.to_string()));
    }

    fn decode_error(&mut self, error: &DecodeError) {
        self.calls.push(SinkCall::DecodeError(error.line.clone()));
    }
}
