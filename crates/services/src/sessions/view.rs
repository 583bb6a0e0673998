use civique_core::model::{Level, OPTION_COUNT, OptionIndex, QuizConfig, QuizMode, SessionId};

use super::progress::SessionProgress;
use super::results::QuizResults;
use super::timer::TimerView;
use crate::error::SessionError;

/// What the display shows right after an option is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFeedback {
    /// Feedback on: the correct option is highlighted, a wrong pick is marked.
    Revealed {
        selected: OptionIndex,
        correct: OptionIndex,
    },
    /// Feedback off (simulation): only the pick is marked.
    Selected { selected: OptionIndex },
}

impl SelectionFeedback {
    #[must_use]
    pub fn selected(&self) -> OptionIndex {
        match self {
            SelectionFeedback::Revealed { selected, .. } | SelectionFeedback::Selected { selected } => {
                *selected
            }
        }
    }

    /// `None` when correctness is withheld.
    #[must_use]
    pub fn is_correct(&self) -> Option<bool> {
        match self {
            SelectionFeedback::Revealed { selected, correct } => Some(selected == correct),
            SelectionFeedback::Selected { .. } => None,
        }
    }
}

/// Rules box shown before a session starts.
///
/// Presentation-agnostic: labels come from the catalog, wording is up to the
/// display.
#[derive(Debug, Clone, PartialEq)]
pub struct StartScreen {
    pub level: Level,
    pub description: &'static str,
    /// Records in the level's full bank.
    pub bank_size: u32,
    pub mode: QuizMode,
    pub theme_labels: String,
    pub question_count: u32,
    /// `Some(minutes)` for timed sessions.
    pub time_minutes: Option<u32>,
    /// `(pass_score, question_count)` in simulation mode.
    pub pass_rule: Option<(u32, u32)>,
    pub show_feedback: bool,
}

impl StartScreen {
    #[must_use]
    pub fn from_config(config: &QuizConfig) -> Self {
        let exam = config.exam();
        Self {
            level: config.level(),
            description: config.level().description(),
            bank_size: config.level().bank_size(),
            mode: config.mode(),
            theme_labels: config.themes().label(),
            question_count: config.requested_count(),
            time_minutes: config.timed().then(|| config.time_minutes()),
            pass_rule: matches!(config.mode(), QuizMode::Simulation)
                .then(|| (exam.pass_score(), exam.question_count())),
            show_feedback: config.show_feedback(),
        }
    }
}

/// The current question as displayed.
///
/// Built from session state only, so rendering twice yields the same screen.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionScreen {
    pub session_id: SessionId,
    pub progress: SessionProgress,
    pub theme: String,
    pub question: String,
    pub options: [String; OPTION_COUNT],
    pub is_last: bool,
    /// Set once the current question has been answered.
    pub feedback: Option<SelectionFeedback>,
}

impl QuestionScreen {
    /// 1-based number for the `Question i/n` counter.
    #[must_use]
    pub fn number(&self) -> usize {
        self.progress.index + 1
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.progress.total
    }

    /// Advancing is allowed once an answer is recorded.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.feedback.is_some()
    }
}

/// Rendering contract between the engine and whatever draws the screens.
///
/// Implementations only draw; every decision is taken by the engine.
pub trait DisplaySurface {
    fn render_start(&mut self, screen: &StartScreen);
    fn render_question(&mut self, screen: &QuestionScreen);
    fn render_selection(&mut self, feedback: &SelectionFeedback);
    fn render_timer(&mut self, timer: &TimerView);
    fn render_results(&mut self, results: &QuizResults);
    fn render_error(&mut self, error: &SessionError);
}
