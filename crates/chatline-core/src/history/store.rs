//! Ordered record of conversation turns.
//!
//! Turns are only ever appended; the whole history can be cleared or
//! replaced (on load), but an individual turn is never edited in place.
//! Serialization is a pretty-printed JSON array of `{role, content}`.

use chatline_types::chat::{Role, Turn};
use chatline_types::error::HistoryError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.append(Turn::new(role, content));
    }

    /// All turns in insertion order.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Swap in a whole history, e.g. one loaded from disk.
    pub fn replace(&mut self, other: ConversationStore) {
        self.turns = other.turns;
    }

    /// Encode as a JSON array with stable two-space indentation.
    pub fn serialize(&self) -> Result<Vec<u8>, HistoryError> {
        serde_json::to_vec_pretty(&self.turns).map_err(|e| HistoryError::Encode(e.to_string()))
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, HistoryError> {
        let turns: Vec<Turn> =
            serde_json::from_slice(bytes).map_err(|e| HistoryError::Malformed(e.to_string()))?;
        Ok(Self { turns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConversationStore {
        let mut store = ConversationStore::new();
        store.push(Role::System, "be terse");
        store.push(Role::User, "hi\nthere");
        store.push(Role::Assistant, "hello \"quoted\" ✓");
        store.push(Role::Tool, "");
        store
    }

    #[test]
    fn test_append_preserves_order() {
        let store = sample();
        let roles: Vec<Role> = store.all().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::Tool]);
        assert_eq!(store.all()[3].content, "");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let store = sample();
        let restored = ConversationStore::deserialize(&store.serialize().unwrap()).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn test_empty_roundtrip() {
        let store = ConversationStore::new();
        assert_eq!(ConversationStore::deserialize(&store.serialize().unwrap()).unwrap(), store);
    }

    #[test]
    fn test_serialize_uses_two_space_indent() {
        let mut store = ConversationStore::new();
        store.push(Role::User, "hi");
        let text = String::from_utf8(store.serialize().unwrap()).unwrap();
        assert_eq!(text, "[\n  {\n    \"role\": \"user\",\n    \"content\": \"hi\"\n  }\n]");
    }

    #[test]
    fn test_deserialize_malformed() {
        let err = ConversationStore::deserialize(b"{not json").unwrap_err();
        assert!(matches!(err, HistoryError::Malformed(_)));
    }

    #[test]
    fn test_deserialize_rejects_unknown_role() {
        let err = ConversationStore::deserialize(br#"[{"role":"tool_call","content":"x"}]"#)
            .unwrap_err();
        assert!(matches!(err, HistoryError::Malformed(_)));
    }

    #[test]
    fn test_clear_and_replace() {
        let mut store = sample();
        store.clear();
        assert!(store.is_empty());
        store.replace(sample());
        assert_eq!(store.len(), 4);
    }
}
