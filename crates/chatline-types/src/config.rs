//! Client configuration types for chatline.
//!
//! `ClientConfig` represents `~/.chatline/config.toml`. Every field has a
//! default so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

use crate::chat::Role;

/// How a tool result is stored in the conversation history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolResultRole {
    /// Store as a `tool` turn.
    #[default]
    Tool,
    /// Store as a `user` turn, for services that reject the `tool` role.
    User,
}

impl ToolResultRole {
    pub fn role(self) -> Role {
        match self {
            ToolResultRole::Tool => Role::Tool,
            ToolResultRole::User => Role::User,
        }
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Chat endpoint that accepts the streaming POST.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Bound on establishing the TCP/TLS connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Bound on waiting for the response headers and for each body chunk.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    #[serde(default)]
    pub tool_result_role: ToolResultRole,
}

fn default_endpoint() -> String {
    "http://localhost:5001/api/chat".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    8000
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_idle_timeout_secs() -> u64 {
    120
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            connect_timeout_secs: default_connect_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            tool_result_role: ToolResultRole::default(),
        }
    }
}
