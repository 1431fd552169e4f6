use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persist::{OutputDir, PersistError};

const SNAPSHOT_FILENAME: &str = "saved-session.json";

/// Full copy of a session, taken on demand. Not a live reference: saving
/// again replaces the record wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub chapters: Vec<SnapshotChapter>,
    pub translated_chapters: Vec<SnapshotTranslation>,
    pub selected_language: String,
    /// Unix millis at save time.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotChapter {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotTranslation {
    pub id: String,
    pub content: String,
}

/// Stores the single named session record under a directory. Loading never
/// fails loudly: a missing or malformed record reads as "no saved session".
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: OutputDir,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: OutputDir::new(dir),
        }
    }

    pub fn record_path(&self) -> PathBuf {
        self.dir.path().join(SNAPSHOT_FILENAME)
    }

    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<PathBuf, PersistError> {
        let content = serde_json::to_vec_pretty(snapshot)?;
        self.dir.write(SNAPSHOT_FILENAME, &content)
    }

    pub fn load(&self) -> Option<SessionSnapshot> {
        let path = self.record_path();
        let content = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                log::warn!("Failed to read saved session from {:?}: {}", path, err);
                return None;
            }
        };
        parse_snapshot(&content, &path)
    }
}

fn parse_snapshot(content: &[u8], path: &Path) -> Option<SessionSnapshot> {
    match serde_json::from_slice(content) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            log::warn!("Failed to parse saved session from {:?}: {}", path, err);
            None
        }
    }
}
