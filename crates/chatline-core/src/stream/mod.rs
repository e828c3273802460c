//! Streaming response consumer.
//!
//! The response body is a sequence of newline-delimited JSON records. Lines
//! flow through three stages:
//!
//! 1. [`decoder`] -- one line to one typed [`StreamEvent`] (or a recoverable
//!    [`DecodeError`]).
//! 2. [`render_state`] -- the role-transition state machine that buffers
//!    assistant chunks and commits finalized turns to history.
//! 3. [`consumer`] -- the read loop that ties the two together and observes
//!    cancellation at line boundaries.
//!
//! Render side effects leave through the [`sink::RenderSink`] port.
//!
//! [`StreamEvent`]: chatline_types::event::StreamEvent
//! [`DecodeError`]: chatline_types::error::DecodeError

pub mod consumer;
pub mod decoder;
pub mod render_state;
pub mod sink;
