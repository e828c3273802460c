//! Append-only conversation history.

pub mod store;

pub use store::ConversationStore;
