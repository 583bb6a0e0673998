use chrono::{DateTime, Utc};

use civique_core::model::{ExamSettings, OptionIndex, PreparedQuestion};
use civique_core::scoring::{QuestionReview, ScoreReport, review_answers};
use civique_core::time::format_time_taken;

/// How a session reached `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The last question was answered and the user advanced.
    Completed,
    /// The countdown reached zero.
    TimeExpired,
}

/// Everything the results screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResults {
    pub report: ScoreReport,
    pub breakdown: Vec<QuestionReview>,
    pub ended_by: SessionEnd,
    /// Only for timed sessions.
    pub time_taken_secs: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl QuizResults {
    pub(crate) fn build(
        questions: &[PreparedQuestion],
        answers: &[Option<OptionIndex>],
        exam: &ExamSettings,
        ended_by: SessionEnd,
        time_taken_secs: Option<u32>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            report: ScoreReport::compute(questions, answers, exam),
            breakdown: review_answers(questions, answers),
            ended_by,
            time_taken_secs,
            started_at,
            completed_at,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.report.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.report.total
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.report.passed
    }

    #[must_use]
    pub fn time_taken_display(&self) -> Option<String> {
        self.time_taken_secs.map(format_time_taken)
    }
}
