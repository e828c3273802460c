//! Line to event decoding.

use chatline_types::error::DecodeError;
use chatline_types::event::{StreamEvent, WireEvent};

/// Decode one body line.
///
/// Returns `Ok(None)` for blank lines (keep-alive separators). A leading
/// SSE `data:` field name and a trailing `\r` are tolerated.
pub fn decode_line(line: &str) -> Result<Option<StreamEvent>, DecodeError> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.trim().is_empty() {
        return Ok(None);
    }

    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest.trim_start(),
        None => trimmed,
    };
    if payload.trim().is_empty() {
        return Ok(None);
    }

    let wire: WireEvent = serde_json::from_str(payload).map_err(|e| DecodeError {
        line: trimmed.to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(wire.into()))
}
