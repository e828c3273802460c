//! Session context for one interactive run.
//!
//! Wraps the `ConversationStore` with the settings the slash commands can
//! change (temperature, token limit, persistent multi-line mode) and a turn
//! counter.

use chatline_types::chat::{Role, Turn};
use chatline_types::config::{ClientConfig, ToolResultRole};
use chatline_types::error::SettingsError;

use crate::history::ConversationStore;

/// Per-run settings. Seeded from `ClientConfig`, then adjusted by commands.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub endpoint: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Persistent multi-line input mode (`/m toggle`).
    pub multiline: bool,
    pub tool_result_role: ToolResultRole,
}

impl From<&ClientConfig> for SessionSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            multiline: false,
            tool_result_role: config.tool_result_role,
        }
    }
}

/// The session context: history plus settings.
#[derive(Debug)]
pub struct ChatSession {
    history: ConversationStore,
    settings: SessionSettings,
    /// Completed request/response exchanges.
    turn_count: u32,
}

impl ChatSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            history: ConversationStore::new(),
            settings,
            turn_count: 0,
        }
    }

    pub fn history(&self) -> &ConversationStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ConversationStore {
        &mut self.history
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// History role tool results are committed under.
    pub fn tool_role(&self) -> Role {
        self.settings.tool_result_role.role()
    }

    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.history.append(Turn::user(text));
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn increment_turn(&mut self) {
        self.turn_count += 1;
    }

    /// Set the sampling temperature. Values outside `0.0..=1.0` are
    /// rejected and leave the current value unchanged.
    pub fn set_temperature(&mut self, temperature: f64) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&temperature) {
            return Err(SettingsError::TemperatureOutOfRange(temperature));
        }
        self.settings.temperature = temperature;
        Ok(())
    }

    pub fn set_max_tokens(&mut self, max_tokens: u32) -> Result<(), SettingsError> {
        if max_tokens == 0 {
            return Err(SettingsError::ZeroMaxTokens);
        }
        self.settings.max_tokens = max_tokens;
        Ok(())
    }

    /// Flip persistent multi-line mode; returns the new state.
    pub fn toggle_multiline(&mut self) -> bool {
        self.settings.multiline = !self.settings.multiline;
        self.settings.multiline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> ChatSession {
        ChatSession::new(SessionSettings::from(&ClientConfig::default()))
    }

    #[test]
    fn test_new_session() {
        let session = test_session();
        assert!(session.history().is_empty());
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.settings().temperature, 0.7);
        assert_eq!(session.tool_role(), Role::Tool);
    }

    #[test]
    fn test_add_user_message() {
        let mut session = test_session();
        session.add_user_message("hello");
        assert_eq!(session.history().all(), &[Turn::user("hello")]);
    }

    #[test]
    fn test_set_temperature_bounds() {
        let mut session = test_session();
        assert!(session.set_temperature(0.0).is_ok());
        assert!(session.set_temperature(1.0).is_ok());
        assert_eq!(
            session.set_temperature(1.5),
            Err(SettingsError::TemperatureOutOfRange(1.5))
        );
        assert_eq!(session.settings().temperature, 1.0);
        assert!(session.set_temperature(f64::NAN).is_err());
    }

    #[test]
    fn test_set_max_tokens() {
        let mut session = test_session();
        assert!(session.set_max_tokens(2048).is_ok());
        assert_eq!(session.settings().max_tokens, 2048);
        assert_eq!(session.set_max_tokens(0), Err(SettingsError::ZeroMaxTokens));
        assert_eq!(session.settings().max_tokens, 2048);
    }

    #[test]
    fn test_toggle_multiline() {
        let mut session = test_session();
        assert!(session.toggle_multiline());
        assert!(!session.toggle_multiline());
    }

    #[test]
    fn test_tool_role_follows_settings() {
        let config = ClientConfig {
            tool_result_role: ToolResultRole::User,
            ..ClientConfig::default()
        };
        let session = ChatSession::new(SessionSettings::from(&config));
        assert_eq!(session.tool_role(), Role::User);
    }
}
