use async_trait::async_trait;
use civique_core::model::{Level, QuestionRecord, Theme};
use url::Url;

use super::{bank_path, parse_bank};
use crate::repository::{QuestionBankSource, StorageError};

/// Fetches bank files from a static web server.
#[derive(Debug, Clone)]
pub struct HttpQuestionBank {
    base: Url,
    client: reqwest::Client,
}

impl HttpQuestionBank {
    /// Build a bank rooted at `base` (e.g. `https://example.org/data/`).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if `base` is not a valid URL.
    pub fn new(base: &str) -> Result<Self, StorageError> {
        // Without the trailing slash `join` would replace the last segment.
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized)
            .map_err(|e| StorageError::Connection(format!("invalid base URL {base}: {e}")))?;
        Ok(Self {
            base,
            client: reqwest::Client::new(),
        })
    }

    /// URL of the bank file for one level and theme.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the URL cannot be built.
    pub fn url_for(&self, level: Level, theme: Theme) -> Result<Url, StorageError> {
        self.base
            .join(&bank_path(level, theme))
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl QuestionBankSource for HttpQuestionBank {
    #[tracing::instrument(skip(self), fields(base = %self.base))]
    async fn load_theme(
        &self,
        level: Level,
        theme: Theme,
    ) -> Result<Vec<QuestionRecord>, StorageError> {
        let url = self.url_for(level, theme)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(StorageError::Connection(format!("HTTP {status} for {url}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        parse_bank(&body, theme)
    }
}
