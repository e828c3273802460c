//! Interactive chat experience.
//!
//! Streaming responses with a first-byte spinner, framed markdown rendering,
//! paste-aware input, and slash commands. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
