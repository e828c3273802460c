//! Stream event types decoded from the chat service's response body.
//!
//! Each body line is a loosely shaped JSON record ([`WireEvent`]). It is
//! lifted into the closed [`StreamEvent`] enum so the role-transition
//! state machine can match exhaustively instead of comparing strings.

use serde::{Deserialize, Serialize};

/// Role label the service uses for assistant text.
pub const ASSISTANT_ROLE: &str = "assistant";
/// Role label the service uses for completed tool results.
pub const TOOL_CALL_ROLE: &str = "tool_call";

/// The `type` field of a wire record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Chunk,
    Done,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One line of the response body, as sent on the wire.
///
/// Every field is optional; `null` and missing both decode to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub kind: EventKind,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// What an assistant-role record carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantEvent {
    /// An incremental fragment of the in-progress message.
    Chunk(String),
    /// The service marked the message complete.
    Done,
    /// Any other `type`; still counts as assistant activity.
    Unknown,
}

/// A typed stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Assistant(AssistantEvent),
    /// A complete tool result. Tool records are never chunked.
    ToolResult(String),
    /// Any other role label, including the empty string.
    Other { role: String },
}

impl From<WireEvent> for StreamEvent {
    fn from(wire: WireEvent) -> Self {
        match wire.role.as_str() {
            ASSISTANT_ROLE => StreamEvent::Assistant(match wire.kind {
                EventKind::Chunk => AssistantEvent::Chunk(wire.content),
                EventKind::Done => AssistantEvent::Done,
                EventKind::Unknown => AssistantEvent::Unknown,
            }),
            TOOL_CALL_ROLE => StreamEvent::ToolResult(wire.content),
            _ => StreamEvent::Other { role: wire.role },
        }
    }
}
