//! Streaming consumer core for chatline.
//!
//! Everything here is network-free: the event decoder, the role render
//! state machine, the line-driven consumer loop, conversation history,
//! and input classification. Infrastructure (HTTP, files) lives in
//! `chatline-infra` and plugs in through the [`stream::sink::RenderSink`]
//! and [`input::source::LineSource`] ports.

pub mod chat;
pub mod format;
pub mod history;
pub mod input;
pub mod stream;
