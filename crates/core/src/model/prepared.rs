use std::fmt;

use crate::model::ids::QuestionId;
use crate::model::question::OPTION_COUNT;

const LETTERS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

/// Position of an option inside a prepared question (0..4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionIndex(u8);

impl OptionIndex {
    /// Returns `None` when `value` is not a valid option position.
    #[must_use]
    pub fn new(value: usize) -> Option<Self> {
        if value < OPTION_COUNT {
            u8::try_from(value).ok().map(Self)
        } else {
            None
        }
    }

    /// Parses an option letter (`A`-`D`, any case).
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        let upper = letter.to_ascii_uppercase();
        LETTERS
            .iter()
            .position(|candidate| *candidate == upper)
            .and_then(Self::new)
    }

    #[must_use]
    pub fn value(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn letter(self) -> char {
        LETTERS[self.value()]
    }

    /// All option positions in display order.
    #[must_use]
    pub fn all() -> [OptionIndex; OPTION_COUNT] {
        [Self(0), Self(1), Self(2), Self(3)]
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A question instance fixed for the lifetime of a session.
///
/// One phrasing was chosen and the four options were shuffled once; the
/// correct text is read back from `options`, so it always sits at
/// `correct_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuestion {
    id: QuestionId,
    theme: String,
    question: String,
    options: [String; OPTION_COUNT],
    correct_index: OptionIndex,
    all_correct_answers: Vec<String>,
}

impl PreparedQuestion {
    #[must_use]
    pub fn new(
        id: QuestionId,
        theme: impl Into<String>,
        question: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_index: OptionIndex,
        all_correct_answers: Vec<String>,
    ) -> Self {
        Self {
            id,
            theme: theme.into(),
            question: question.into(),
            options,
            correct_index,
            all_correct_answers,
        }
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// The phrasing chosen for this session.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: OptionIndex) -> &str {
        &self.options[index.value()]
    }

    #[must_use]
    pub fn correct_index(&self) -> OptionIndex {
        self.correct_index
    }

    #[must_use]
    pub fn correct_answer_text(&self) -> &str {
        self.option(self.correct_index)
    }

    /// Every accepted phrasing of the answer, kept for reference.
    #[must_use]
    pub fn all_correct_answers(&self) -> &[String] {
        &self.all_correct_answers
    }

    #[must_use]
    pub fn is_correct(&self, answer: Option<OptionIndex>) -> bool {
        answer == Some(self.correct_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PreparedQuestion {
        PreparedQuestion::new(
            QuestionId::from(1),
            "Géographie",
            "Capitale de la France ?",
            [
                "Lyon".to_string(),
                "Paris".to_string(),
                "Nice".to_string(),
                "Lille".to_string(),
            ],
            OptionIndex::new(1).unwrap(),
            vec!["Paris".to_string()],
        )
    }

    #[test]
    fn option_index_bounds_and_letters() {
        assert!(OptionIndex::new(4).is_none());
        assert_eq!(OptionIndex::new(3).unwrap().letter(), 'D');
        assert_eq!(OptionIndex::from_letter('b'), OptionIndex::new(1));
        assert!(OptionIndex::from_letter('e').is_none());
    }

    #[test]
    fn correct_text_is_read_from_options() {
        let q = sample();
        assert_eq!(q.correct_answer_text(), "Paris");
        assert!(q.is_correct(OptionIndex::new(1)));
        assert!(!q.is_correct(OptionIndex::new(0)));
        assert!(!q.is_correct(None));
    }
}
