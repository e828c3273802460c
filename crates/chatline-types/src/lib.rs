//! Shared domain types for chatline.
//!
//! Conversation turns, the stream event model decoded from the chat
//! service's response body, the error taxonomy, and client configuration.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
