use thiserror::Error;

use crate::model::ids::QuestionId;

/// Number of options shown for every multiple-choice question.
pub const OPTION_COUNT: usize = 4;

/// Number of distractors drawn for every multiple-choice question.
pub const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has no phrasing")]
    NoPhrasing { id: QuestionId },

    #[error("question {id} has no correct answer")]
    NoCorrectAnswer { id: QuestionId },

    #[error("question {id} contains a blank text")]
    BlankText { id: QuestionId },
}

/// A question as published in a bank file.
///
/// Holds every equivalent phrasing of the same question, one or more
/// interchangeable correct answers and a pool of distractors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    id: QuestionId,
    theme: String,
    phrasings: Vec<String>,
    correct_answers: Vec<String>,
    wrong_answers: Vec<String>,
}

impl QuestionRecord {
    /// Build a record, checking the structural invariants.
    ///
    /// The distractor count is not checked here; assembling options is what
    /// needs three of them.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if there is no phrasing, no correct answer, or a
    /// blank text anywhere.
    pub fn new(
        id: QuestionId,
        theme: impl Into<String>,
        phrasings: Vec<String>,
        correct_answers: Vec<String>,
        wrong_answers: Vec<String>,
    ) -> Result<Self, QuestionError> {
        if phrasings.is_empty() {
            return Err(QuestionError::NoPhrasing { id });
        }
        if correct_answers.is_empty() {
            return Err(QuestionError::NoCorrectAnswer { id });
        }
        let blank = phrasings
            .iter()
            .chain(&correct_answers)
            .chain(&wrong_answers)
            .any(|text| text.trim().is_empty());
        if blank {
            return Err(QuestionError::BlankText { id });
        }

        Ok(Self {
            id,
            theme: theme.into(),
            phrasings,
            correct_answers,
            wrong_answers,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Equivalent phrasings; never empty.
    #[must_use]
    pub fn phrasings(&self) -> &[String] {
        &self.phrasings
    }

    /// Acceptable correct answers; never empty.
    #[must_use]
    pub fn correct_answers(&self) -> &[String] {
        &self.correct_answers
    }

    /// The canonical answer, used where a single answer is shown (flashcards).
    #[must_use]
    pub fn primary_answer(&self) -> &str {
        &self.correct_answers[0]
    }

    #[must_use]
    pub fn has_alternative_answers(&self) -> bool {
        self.correct_answers.len() > 1
    }

    #[must_use]
    pub fn wrong_answers(&self) -> &[String] {
        &self.wrong_answers
    }

    /// True when enough distractors exist to assemble a full option set.
    #[must_use]
    pub fn can_assemble_options(&self) -> bool {
        self.wrong_answers.len() >= DISTRACTOR_COUNT
    }
}
