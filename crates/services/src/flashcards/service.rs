use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

use civique_core::model::{Level, Theme};
use storage::QuestionBankSource;

use super::deck::FlashcardDeck;
use crate::error::SessionError;

/// Loads flashcard decks for one level and theme.
#[derive(Clone)]
pub struct FlashcardService {
    source: Arc<dyn QuestionBankSource>,
    seed: Option<u64>,
}

impl FlashcardService {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionBankSource>) -> Self {
        Self { source, seed: None }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// New RNG for phrasing draws and shuffles.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Build a deck over the whole theme, in bank order.
    ///
    /// An empty theme yields an empty deck.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DataUnavailable` if the bank cannot be loaded.
    #[tracing::instrument(skip_all, fields(level = %level, theme = %theme))]
    pub async fn load_deck(&self, level: Level, theme: Theme) -> Result<FlashcardDeck, SessionError> {
        let records = self.source.load_theme(level, theme).await.inspect_err(|err| {
            tracing::warn!(error = %err, "flashcard bank unavailable");
        })?;
        let deck = FlashcardDeck::from_records(&records, &mut self.rng());
        tracing::info!(cards = deck.len(), "flashcard deck loaded");
        Ok(deck)
    }
}
