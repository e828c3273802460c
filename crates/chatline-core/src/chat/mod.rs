//! Chat session state.
//!
//! The session owns the conversation history and the user-adjustable
//! settings. It is passed explicitly to the stream consumer and the input
//! loop instead of living in globals.

pub mod session;
