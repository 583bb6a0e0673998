use crate::model::catalog::{Level, ThemeFilter};
use crate::model::exam::ExamSettings;

/// Flavour of a multiple-choice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizMode {
    /// Practice quiz; correctness is shown after each answer by default.
    #[default]
    Quiz,
    /// Mock exam; results surface only at the end.
    Simulation,
}

impl QuizMode {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            QuizMode::Quiz => "Quiz",
            QuizMode::Simulation => "Simulation d'examen",
        }
    }

    #[must_use]
    pub const fn default_show_feedback(self) -> bool {
        matches!(self, QuizMode::Quiz)
    }
}

/// Per-session options chosen on the start screen.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    level: Level,
    themes: ThemeFilter,
    question_count: Option<u32>,
    timed: bool,
    time_minutes: u32,
    mode: QuizMode,
    show_feedback: bool,
    auto_start: bool,
    exam: ExamSettings,
}

impl QuizConfig {
    /// Timed practice quiz over every theme, sized like the official exam.
    #[must_use]
    pub fn quiz(level: Level, exam: ExamSettings) -> Self {
        Self {
            level,
            themes: ThemeFilter::All,
            question_count: None,
            timed: true,
            time_minutes: exam.time_minutes(),
            mode: QuizMode::Quiz,
            show_feedback: QuizMode::Quiz.default_show_feedback(),
            auto_start: false,
            exam,
        }
    }

    /// Mock exam: timed, full length, no per-question feedback.
    #[must_use]
    pub fn simulation(level: Level, exam: ExamSettings) -> Self {
        Self {
            mode: QuizMode::Simulation,
            show_feedback: QuizMode::Simulation.default_show_feedback(),
            ..Self::quiz(level, exam)
        }
    }

    #[must_use]
    pub fn with_themes(mut self, themes: ThemeFilter) -> Self {
        self.themes = themes;
        self
    }

    /// `None` or `Some(0)` falls back to the exam question count.
    #[must_use]
    pub fn with_question_count(mut self, count: Option<u32>) -> Self {
        self.question_count = count.filter(|count| *count > 0);
        self
    }

    #[must_use]
    pub fn with_timed(mut self, timed: bool) -> Self {
        self.timed = timed;
        self
    }

    /// Zero keeps the current budget.
    #[must_use]
    pub fn with_time_minutes(mut self, minutes: u32) -> Self {
        if minutes > 0 {
            self.time_minutes = minutes;
        }
        self
    }

    #[must_use]
    pub fn with_show_feedback(mut self, show_feedback: bool) -> Self {
        self.show_feedback = show_feedback;
        self
    }

    #[must_use]
    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn themes(&self) -> &ThemeFilter {
        &self.themes
    }

    /// Number of questions requested for the session.
    #[must_use]
    pub fn requested_count(&self) -> u32 {
        self.question_count
            .unwrap_or_else(|| self.exam.question_count())
    }

    #[must_use]
    pub fn timed(&self) -> bool {
        self.timed
    }

    #[must_use]
    pub fn time_minutes(&self) -> u32 {
        self.time_minutes
    }

    #[must_use]
    pub fn time_budget_secs(&self) -> u32 {
        self.time_minutes.saturating_mul(60)
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn show_feedback(&self) -> bool {
        self.show_feedback
    }

    #[must_use]
    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    #[must_use]
    pub fn exam(&self) -> &ExamSettings {
        &self.exam
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Theme;

    #[test]
    fn simulation_hides_feedback_and_keeps_exam_size() {
        let config = QuizConfig::simulation(Level::Csp, ExamSettings::official());
        assert!(!config.show_feedback());
        assert!(config.timed());
        assert_eq!(config.requested_count(), 40);
        assert_eq!(config.time_budget_secs(), 45 * 60);
    }

    #[test]
    fn builder_overrides_apply() {
        let config = QuizConfig::quiz(Level::Cr, ExamSettings::official())
            .with_themes(ThemeFilter::only([Theme::Histoire]).unwrap())
            .with_question_count(Some(10))
            .with_time_minutes(0)
            .with_timed(false);
        assert!(config.show_feedback());
        assert_eq!(config.requested_count(), 10);
        assert_eq!(config.time_minutes(), 45);
        assert!(!config.timed());
        assert_eq!(config.themes().themes(), vec![Theme::Histoire]);
    }

    #[test]
    fn zero_count_falls_back_to_exam_size() {
        let config =
            QuizConfig::quiz(Level::Nat, ExamSettings::official()).with_question_count(Some(0));
        assert_eq!(config.requested_count(), 40);
    }
}
