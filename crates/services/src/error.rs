//! Shared error types for the services crate.

use thiserror::Error;

use civique_core::model::QuestionId;
use storage::StorageError;

/// Reasons an input event was refused by a session.
///
/// A refused event never changes session state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransitionError {
    #[error("session has not started")]
    NotStarted,
    #[error("session already started")]
    AlreadyStarted,
    #[error("session already finished")]
    Finished,
    #[error("current question already answered")]
    AlreadyAnswered,
    #[error("current question has no answer yet")]
    NotAnswered,
    #[error("no option at position {0}")]
    InvalidOption(usize),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question bank unavailable: {0}")]
    DataUnavailable(#[from] StorageError),
    #[error("no questions available for session")]
    Empty,
    #[error("question {id} has {distractors} distractors, at least 3 are needed")]
    MalformedRecord { id: QuestionId, distractors: usize },
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
}

impl SessionError {
    /// Message shown to the user when a session cannot start.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::DataUnavailable(_) | SessionError::MalformedRecord { .. } => {
                "Erreur lors du chargement des questions. Veuillez réessayer."
            }
            SessionError::Empty => "Aucune question disponible pour cette sélection.",
            SessionError::InvalidTransition(_) => "Action impossible pour le moment.",
        }
    }
}
