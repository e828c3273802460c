//! HTTP streaming transport.
//!
//! [`client::StreamClient`] issues the POST and hands the body to the core
//! consumer loop; [`lines`] splits the raw byte stream into lines.

pub mod client;
pub mod lines;

pub use client::StreamClient;
