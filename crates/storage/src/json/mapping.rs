use civique_core::model::{QuestionId, QuestionRecord, Theme};
use serde::Deserialize;

use crate::repository::StorageError;

#[derive(Debug, Deserialize)]
struct BankFile {
    // A file without the key is an empty bank.
    #[serde(default)]
    questions: Vec<RecordRow>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordRow {
    id: RawId,
    #[serde(default)]
    theme: Option<String>,
    questions: Vec<String>,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    correct_answers: Option<Vec<String>>,
    #[serde(default)]
    wrong_answers: Vec<String>,
}

impl RecordRow {
    fn into_record(self, file_theme: Theme) -> Result<QuestionRecord, StorageError> {
        let id = match self.id {
            RawId::Number(n) => QuestionId::from(n),
            RawId::Text(s) => QuestionId::new(s),
        };
        // Banks with several accepted answers list them all; the others carry one.
        let correct_answers = match self.correct_answers {
            Some(answers) if !answers.is_empty() => answers,
            _ => self.correct_answer.into_iter().collect(),
        };
        let theme = self
            .theme
            .filter(|theme| !theme.trim().is_empty())
            .unwrap_or_else(|| file_theme.label().to_string());

        Ok(QuestionRecord::new(
            id,
            theme,
            self.questions,
            correct_answers,
            self.wrong_answers,
        )?)
    }
}

/// Parse one bank file.
///
/// `theme` labels records that do not carry their own theme.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for invalid JSON and
/// `StorageError::Malformed` for records that break `QuestionRecord` rules.
pub fn parse_bank(content: &str, theme: Theme) -> Result<Vec<QuestionRecord>, StorageError> {
    let file: BankFile =
        serde_json::from_str(content).map_err(|e| StorageError::Serialization(e.to_string()))?;
    file.questions
        .into_iter()
        .map(|row| row.into_record(theme))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use civique_core::model::QuestionError;

    #[test]
    fn single_answer_format() {
        let json = r#"{
            "questions": [{
                "id": 7,
                "theme": "Histoire",
                "questions": ["En quelle année ?", "Quelle année ?"],
                "correctAnswer": "1789",
                "wrongAnswers": ["1790", "1815", "1848", "1870"]
            }]
        }"#;
        let records = parse_bank(json, Theme::Histoire).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id().as_str(), "7");
        assert_eq!(record.correct_answers(), ["1789".to_string()]);
        assert_eq!(record.phrasings().len(), 2);
        assert_eq!(record.wrong_answers().len(), 4);
    }

    #[test]
    fn multi_answer_format_wins_over_single() {
        let json = r#"{
            "questions": [{
                "id": "pv-1",
                "questions": ["Devise ?"],
                "correctAnswer": "ignored",
                "correctAnswers": ["Liberté, Égalité, Fraternité", "Liberté Égalité Fraternité"],
                "wrongAnswers": ["a", "b", "c"]
            }]
        }"#;
        let records = parse_bank(json, Theme::PrincipesValeurs).unwrap();
        let record = &records[0];
        assert_eq!(record.correct_answers().len(), 2);
        assert!(record.has_alternative_answers());
        assert_eq!(record.theme(), "Principes et Valeurs");
    }

    #[test]
    fn missing_questions_key_is_empty_bank() {
        assert!(parse_bank("{}", Theme::Histoire).unwrap().is_empty());
    }

    #[test]
    fn record_without_answer_is_malformed() {
        let json = r#"{ "questions": [{ "id": 1, "questions": ["?"], "wrongAnswers": ["a", "b", "c"] }] }"#;
        let err = parse_bank(json, Theme::Histoire).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Malformed(QuestionError::NoCorrectAnswer { .. })
        ));
    }

    #[test]
    fn invalid_json_is_serialization_error() {
        let err = parse_bank("{ not json", Theme::Histoire).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
