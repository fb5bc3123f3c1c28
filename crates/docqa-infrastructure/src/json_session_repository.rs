//! JSON file-backed session snapshot repository.

use crate::dto::ChatSessionDto;
use crate::paths::DocqaPaths;
use crate::storage::AtomicJsonFile;
use docqa_core::error::Result;
use docqa_core::session::{ChatSession, SessionSnapshotRepository};
use std::path::{Path, PathBuf};

/// Persists the session list as `chat_sessions.json` in a data directory.
pub struct JsonSessionRepository {
    file: AtomicJsonFile<Vec<ChatSessionDto>>,
}

impl JsonSessionRepository {
    /// Creates a repository rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicJsonFile::new(DocqaPaths::sessions_file_in(data_dir)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl SessionSnapshotRepository for JsonSessionRepository {
    fn load(&self) -> Result<Option<Vec<ChatSession>>> {
        let Some(dtos) = self.file.load()? else {
            return Ok(None);
        };
        let sessions = dtos
            .into_iter()
            .map(ChatSession::try_from)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            "[JsonSessionRepository] loaded {} sessions from {}",
            sessions.len(),
            self.path().display()
        );
        Ok(Some(sessions))
    }

    fn save(&self, sessions: &[ChatSession]) -> Result<()> {
        let dtos: Vec<ChatSessionDto> = sessions.iter().map(ChatSessionDto::from).collect();
        self.file.save(&dtos)?;
        Ok(())
    }
}
