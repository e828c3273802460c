//! Byte stream to line stream adapter.
//!
//! Body chunks do not respect record boundaries: a chunk may hold several
//! lines or end in the middle of one. Bytes are buffered until a `\n`
//! arrives; a final unterminated line is still yielded when the body ends.
//! Each wait for the next chunk is bounded by the idle timeout.

use std::time::Duration;

use futures_util::{Stream, StreamExt};

use chatline_types::error::TurnError;

/// Split a body byte stream into lines (terminator removed, invalid UTF-8
/// replaced).
pub fn line_stream<S, B>(
    body: S,
    idle_timeout: Duration,
) -> impl Stream<Item = Result<String, TurnError>>
where
    S: Stream<Item = Result<B, TurnError>>,
    B: AsRef<[u8]>,
{
    async_stream::try_stream! {
        let mut body = Box::pin(body);
        let mut buffer: Vec<u8> = Vec::new();
        // Bytes before `scanned` hold no newline.
        let mut scanned = 0;

        loop {
            let next = tokio::time::timeout(idle_timeout, body.next())
                .await
                .map_err(|_| {
                    TurnError::Network(format!(
                        "no data received for {}s",
                        idle_timeout.as_secs_f64()
                    ))
                })?;
            let Some(chunk) = next else { break };
            buffer.extend_from_slice(chunk?.as_ref());

            let mut start = 0;
            while let Some(offset) = buffer[scanned..].iter().position(|b| *b == b'\n') {
                let end = scanned + offset;
                let line = String::from_utf8_lossy(&buffer[start..end]).into_owned();
                start = end + 1;
                scanned = start;
                yield line;
            }
            buffer.drain(..start);
            scanned = buffer.len();
        }

        if !buffer.is_empty() {
            yield String::from_utf8_lossy(&buffer).into_owned();
        }
    }
}
