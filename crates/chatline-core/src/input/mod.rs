//! Interactive input classification.
//!
//! [`capture::read_next`] decides whether what the user entered was a
//! single typed line or a multi-line paste, based on whether more input was
//! already waiting once the first line arrived. The terminal or pipe behind
//! it is abstracted by [`source::LineSource`].

pub mod capture;
pub mod source;

pub use capture::{Captured, InputMode, read_multiline, read_next};
pub use source::{BufferedSource, LineEvent, LineSource};
