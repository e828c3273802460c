//! Streaming chat client.
//!
//! One POST per turn. The response body is newline-delimited JSON; it is
//! split into lines and handed to [`consume_lines`], which drives the render
//! state machine and commits turns to history.

use std::time::Duration;

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use chatline_core::history::ConversationStore;
use chatline_core::stream::consumer::{consume_lines, TurnOutcome};
use chatline_core::stream::sink::RenderSink;
use chatline_types::chat::{ChatRequest, Role};
use chatline_types::config::ClientConfig;
use chatline_types::error::TurnError;

use super::lines::line_stream;

pub struct StreamClient {
    client: reqwest::Client,
    endpoint: String,
    idle_timeout: Duration,
}

impl StreamClient {
    /// Build a client from config. Only the connect phase gets a reqwest
    /// timeout; a long generation is not an error as long as data keeps
    /// arriving.
    pub fn new(config: &ClientConfig) -> Result<Self, TurnError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| TurnError::Stream(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
        })
    }

    /// Send `history` and consume the streamed reply into it. Tool results
    /// are committed under `tool_role`.
    ///
    /// Cancellation before the response headers arrive returns an empty
    /// cancelled outcome; after that, partial content is kept.
    pub async fn consume(
        &self,
        history: &mut ConversationStore,
        temperature: f64,
        max_tokens: u32,
        tool_role: Role,
        sink: &mut impl RenderSink,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome, TurnError> {
        let body = ChatRequest {
            messages: history.all(),
            temperature,
            max_output_tokens: max_tokens,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            turns = body.messages.len(),
            temperature,
            max_tokens,
            "sending chat request"
        );

        let request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&body)
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("turn cancelled before response");
                return Ok(TurnOutcome::cancelled_early());
            }
            result = tokio::time::timeout(self.idle_timeout, request) => match result {
                Ok(response) => response.map_err(classify)?,
                Err(_) => {
                    return Err(TurnError::Network(format!(
                        "no response within {}s",
                        self.idle_timeout.as_secs()
                    )));
                }
            },
        };

        let status = response.status();
        if !status.is_success() {
            // The error body gets the same idle bound as a streamed reply.
            let error_body = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(%status, "turn cancelled while reading error body");
                    return Ok(TurnOutcome::cancelled_early());
                }
                result = tokio::time::timeout(self.idle_timeout, response.text()) => match result {
                    Ok(text) => text.unwrap_or_default(),
                    Err(_) => {
                        tracing::warn!(%status, "error body did not arrive in time");
                        String::new()
                    }
                },
            };
            return Err(TurnError::Stream(format!("HTTP {status}: {error_body}")));
        }

        sink.connected();

        let bytes = response.bytes_stream().map(|chunk| chunk.map_err(classify));
        let lines = line_stream(bytes, self.idle_timeout);
        consume_lines(lines, history, tool_role, sink, cancel).await
    }
}

/// Map a reqwest failure onto the turn error taxonomy.
fn classify(err: reqwest::Error) -> TurnError {
    if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
        TurnError::Network(err.to_string())
    } else {
        TurnError::Stream(err.to_string())
    }
}
