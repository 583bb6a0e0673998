//! Pure scoring of a finished (or expired) session.

use crate::model::{ExamSettings, OptionIndex, PreparedQuestion};

/// How a single question ended up in the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// No option was chosen before the session ended.
    Unanswered,
}

impl AnswerOutcome {
    #[must_use]
    pub fn of(question: &PreparedQuestion, answer: Option<OptionIndex>) -> Self {
        match answer {
            None => AnswerOutcome::Unanswered,
            Some(index) if index == question.correct_index() => AnswerOutcome::Correct,
            Some(_) => AnswerOutcome::Incorrect,
        }
    }

    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, AnswerOutcome::Correct)
    }
}

/// An option as shown in the results (letter plus text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChosenOption {
    pub index: OptionIndex,
    pub text: String,
}

impl ChosenOption {
    fn from_question(question: &PreparedQuestion, index: OptionIndex) -> Self {
        Self {
            index,
            text: question.option(index).to_string(),
        }
    }
}

/// Per-question line of the results breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    /// 1-based position in the session.
    pub number: usize,
    pub theme: String,
    pub question: String,
    pub outcome: AnswerOutcome,
    pub selected: Option<ChosenOption>,
    pub correct: ChosenOption,
}

/// Aggregate score and pass/fail verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: u32,
    pub total: u32,
    pub pass_mark: u32,
    pub passed: bool,
    /// `round(score / total * 100)`, 0 for an empty session.
    pub percentage: u32,
    /// Correct answers still needed to pass; 0 when passed.
    pub missing: u32,
}

impl ScoreReport {
    #[must_use]
    pub fn compute(
        questions: &[PreparedQuestion],
        answers: &[Option<OptionIndex>],
        exam: &ExamSettings,
    ) -> Self {
        let score = count_correct(questions, answers);
        let total = u32::try_from(questions.len()).unwrap_or(u32::MAX);
        Self::from_counts(score, total, exam)
    }

    #[must_use]
    pub fn from_counts(score: u32, total: u32, exam: &ExamSettings) -> Self {
        let score = score.min(total);
        let pass_mark = exam.pass_mark(total);
        let passed = score >= pass_mark;
        Self {
            score,
            total,
            pass_mark,
            passed,
            percentage: percentage(score, total),
            missing: pass_mark.saturating_sub(score),
        }
    }
}

/// Number of slots whose answer matches the correct option.
///
/// Unanswered slots and slots beyond either slice never count.
#[must_use]
pub fn count_correct(questions: &[PreparedQuestion], answers: &[Option<OptionIndex>]) -> u32 {
    let correct = questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| question.is_correct(**answer))
        .count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}

#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(score) / f64::from(total) * 100.0).round() as u32
}

/// Builds the results breakdown, one line per prepared question.
#[must_use]
pub fn review_answers(
    questions: &[PreparedQuestion],
    answers: &[Option<OptionIndex>],
) -> Vec<QuestionReview> {
    questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let answer = answers.get(i).copied().flatten();
            QuestionReview {
                number: i + 1,
                theme: question.theme().to_string(),
                question: question.question().to_string(),
                outcome: AnswerOutcome::of(question, answer),
                selected: answer.map(|index| ChosenOption::from_question(question, index)),
                correct: ChosenOption::from_question(question, question.correct_index()),
            }
        })
        .collect()
}
