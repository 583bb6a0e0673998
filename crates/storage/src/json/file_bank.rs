use async_trait::async_trait;
use civique_core::model::{Level, QuestionRecord, Theme};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{bank_path, parse_bank};
use crate::repository::{QuestionBankSource, StorageError};

/// Reads bank files from a local data directory.
#[derive(Debug, Clone)]
pub struct FileQuestionBank {
    root: PathBuf,
}

impl FileQuestionBank {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, level: Level, theme: Theme) -> PathBuf {
        self.root.join(bank_path(level, theme))
    }
}

#[async_trait]
impl QuestionBankSource for FileQuestionBank {
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    async fn load_theme(
        &self,
        level: Level,
        theme: Theme,
    ) -> Result<Vec<QuestionRecord>, StorageError> {
        let path = self.path_for(level, theme);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(path.display().to_string())
            } else {
                StorageError::Connection(format!("{}: {e}", path.display()))
            }
        })?;

        let records = parse_bank(&content, theme)?;
        tracing::debug!(records.count = records.len(), "loaded bank file");
        Ok(records)
    }
}
