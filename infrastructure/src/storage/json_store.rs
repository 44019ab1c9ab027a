//! JSON file conversation store.
//!
//! Layout: `<data_dir>/conversations/<id>.json`, pretty-printed. Writes go
//! to a temporary sibling first and are renamed into place.

use async_trait::async_trait;
use council_domain::{Conversation, ConversationRepository, ConversationSummary, RepositoryError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Conversation repository backed by JSON files
#[derive(Debug, Clone)]
pub struct JsonConversationStore {
    dir: PathBuf,
}

impl JsonConversationStore {
    /// Store conversations under `<data_dir>/conversations`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join("conversations"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids become file names, so only a conservative character set is accepted
    fn path_for(&self, id: &str) -> Result<PathBuf, RepositoryError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

fn storage_error(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

#[async_trait]
impl ConversationRepository for JsonConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        let path = self.path_for(&conversation.id)?;
        fs::create_dir_all(&self.dir).await.map_err(storage_error)?;

        let json = serde_json::to_string_pretty(conversation).map_err(storage_error)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(storage_error)?;
        fs::rename(&tmp, &path).await.map_err(storage_error)?;

        debug!("Saved conversation {} to {}", conversation.id, path.display());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Conversation, RepositoryError> {
        let path = self.path_for(id)?;
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound(id.to_string()));
            }
            Err(e) => return Err(storage_error(e)),
        };

        serde_json::from_str(&content).map_err(|e| RepositoryError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(e)),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(storage_error)? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable conversation {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<Conversation>(&content) {
                Ok(conversation) => summaries.push(conversation.summary()),
                Err(e) => warn!("Skipping corrupt conversation {}: {}", path.display(), e),
            }
        }

        // RFC 3339 timestamps in one offset sort lexicographically
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}
