//! Conversation files on disk.
//!
//! `/save` writes the current history as a pretty JSON array, `/load`
//! reads one back. Without a file name, `/save` picks a timestamped one.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use chatline_core::history::ConversationStore;
use chatline_types::error::HistoryError;

/// `conversation_YYYYMMDD_HHMMSS.json` for the given instant.
pub fn default_file_name(now: DateTime<Local>) -> String {
    format!("conversation_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Write `history` to `path`. Returns the path written.
pub async fn save_history(path: &Path, history: &ConversationStore) -> Result<PathBuf, HistoryError> {
    let bytes = history.serialize()?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| HistoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(path = %path.display(), turns = history.len(), "conversation saved");
    Ok(path.to_path_buf())
}

/// Read a conversation from `path`.
///
/// The caller's history is untouched on error; the decoded store is only
/// returned on success.
pub async fn load_history(path: &Path) -> Result<ConversationStore, HistoryError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(HistoryError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(HistoryError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let store = ConversationStore::deserialize(&bytes)?;
    tracing::info!(path = %path.display(), turns = store.len(), "conversation loaded");
    Ok(store)
}
