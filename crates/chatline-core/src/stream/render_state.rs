//! Role-transition state machine.
//!
//! Tracks which role is currently being rendered and buffers assistant
//! chunks until the segment is finalized, either by a transition to another
//! role or by the end of the stream.
//!
//! ```text
//!   Idle / RenderingTool --Assistant(*)--> RenderingAssistant
//!   any                  --ToolResult----> RenderingTool --(commit)--> Idle
//!   RenderingAssistant   --finish()------> Idle
//! ```
//!
//! Tool segments finalize as soon as they open, so `RenderingTool` is only
//! observable from inside a transition. An assistant segment that finalizes
//! with an empty buffer commits nothing; a tool result is always committed.

use tracing::debug;

use chatline_types::chat::{Role, Turn};
use chatline_types::event::{AssistantEvent, StreamEvent};

use crate::history::ConversationStore;

use super::sink::RenderSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    RenderingAssistant,
    RenderingTool,
}

/// Per-turn render state: current role segment, its buffer, and counters
/// used to build the turn outcome.
#[derive(Debug)]
pub struct RoleRenderState {
    state: RenderState,
    buffer: String,
    tool_role: Role,
    assistant_turns: usize,
    tool_turns: usize,
    saw_assistant_content: bool,
}

impl RoleRenderState {
    /// `tool_role` is the history role tool results are committed under.
    pub fn new(tool_role: Role) -> Self {
        Self {
            state: RenderState::Idle,
            buffer: String::new(),
            tool_role,
            assistant_turns: 0,
            tool_turns: 0,
            saw_assistant_content: false,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn assistant_turns(&self) -> usize {
        self.assistant_turns
    }

    pub fn tool_turns(&self) -> usize {
        self.tool_turns
    }

    /// Whether any non-empty assistant chunk arrived during this turn.
    pub fn saw_assistant_content(&self) -> bool {
        self.saw_assistant_content
    }

    /// Feed one decoded event.
    pub fn handle(
        &mut self,
        event: StreamEvent,
        history: &mut ConversationStore,
        sink: &mut impl RenderSink,
    ) {
        match event {
            StreamEvent::Assistant(inner) => {
                if self.state != RenderState::RenderingAssistant {
                    self.finalize(history, sink);
                    self.buffer.clear();
                    self.state = RenderState::RenderingAssistant;
                    sink.assistant_started();
                }
                match inner {
                    AssistantEvent::Chunk(content) => {
                        if !content.is_empty() {
                            self.saw_assistant_content = true;
                        }
                        self.buffer.push_str(&content);
                        sink.assistant_progress(&content, &self.buffer);
                    }
                    // Finalization waits for the next transition or stream end.
                    AssistantEvent::Done | AssistantEvent::Unknown => {}
                }
            }
            StreamEvent::ToolResult(content) => {
                if self.state != RenderState::RenderingTool {
                    self.finalize(history, sink);
                    self.state = RenderState::RenderingTool;
                }
                sink.tool_result(&content);
                history.append(Turn::new(self.tool_role, content));
                self.tool_turns += 1;
                self.state = RenderState::Idle;
            }
            StreamEvent::Other { role } => {
                debug!(role = %role, "ignoring stream event with unhandled role");
            }
        }
    }

    /// Finalize whatever segment is open and return to `Idle`.
    ///
    /// Called at end of stream, on cancellation, and on errors.
    pub fn finish(&mut self, history: &mut ConversationStore, sink: &mut impl RenderSink) {
        self.finalize(history, sink);
    }

    fn finalize(&mut self, history: &mut ConversationStore, sink: &mut impl RenderSink) {
        match self.state {
            RenderState::RenderingAssistant => {
                let content = std::mem::take(&mut self.buffer);
                if !content.is_empty() {
                    history.append(Turn::assistant(content.clone()));
                    self.assistant_turns += 1;
                }
                sink.assistant_finished(&content);
            }
            // Tool segments are committed eagerly in `handle`.
            RenderState::RenderingTool | RenderState::Idle => {}
        }
        self.state = RenderState::Idle;
    }
}
