//! Infrastructure layer for chatline.
//!
//! The reqwest-backed streaming client that feeds the core consumer loop,
//! conversation file persistence, and config file loading.

pub mod config;
pub mod history_file;
pub mod http;
