use async_trait::async_trait;
use civique_core::model::{Level, QuestionError, QuestionRecord, Theme};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by question bank adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("question bank not found: {0}")]
    NotFound(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Malformed(#[from] QuestionError),
}

/// Source of question records, addressable by `(level, theme)`.
#[async_trait]
pub trait QuestionBankSource: Send + Sync {
    /// Load every record of one theme.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be fetched or parsed.
    async fn load_theme(&self, level: Level, theme: Theme)
    -> Result<Vec<QuestionRecord>, StorageError>;

    /// Load and merge several themes into one candidate pool.
    ///
    /// Themes are merged in the given order; a record whose id was already
    /// seen is dropped. Any failing theme fails the whole pool.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` hit while loading.
    async fn load_pool(
        &self,
        level: Level,
        themes: &[Theme],
    ) -> Result<Vec<QuestionRecord>, StorageError> {
        let mut pool = Vec::new();
        let mut seen = HashSet::new();
        for theme in themes {
            for record in self.load_theme(level, *theme).await? {
                if seen.insert(record.id().clone()) {
                    pool.push(record);
                } else {
                    tracing::debug!(%level, %theme, id = %record.id(), "dropping duplicate question id");
                }
            }
        }
        Ok(pool)
    }
}

/// Simple in-memory bank for tests and demos.
///
/// A `(level, theme)` pair that was never inserted is reported as not found,
/// like a missing bank file.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    themes: Arc<Mutex<HashMap<(Level, Theme), Vec<QuestionRecord>>>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self {
            themes: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Replace the records of one theme.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_theme(
        &self,
        level: Level,
        theme: Theme,
        records: Vec<QuestionRecord>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .themes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((level, theme), records);
        Ok(())
    }

    #[must_use]
    pub fn with_theme(self, level: Level, theme: Theme, records: Vec<QuestionRecord>) -> Self {
        if let Ok(mut guard) = self.themes.lock() {
            guard.insert((level, theme), records);
        }
        self
    }
}

#[async_trait]
impl QuestionBankSource for InMemoryQuestionBank {
    async fn load_theme(
        &self,
        level: Level,
        theme: Theme,
    ) -> Result<Vec<QuestionRecord>, StorageError> {
        let guard = self
            .themes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(&(level, theme))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("{level}/{theme}")))
    }
}
