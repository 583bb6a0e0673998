use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ExamSettingsError {
    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("time budget must be > 0 minutes")]
    InvalidTimeMinutes,

    #[error("pass threshold must be in (0, 1], got {0}")]
    InvalidPassThreshold(f64),

    #[error("pass score ({pass_score}) must be between 1 and the question count ({question_count})")]
    InvalidPassScore { pass_score: u32, question_count: u32 },
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Exam-wide configuration shared by every session.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamSettings {
    question_count: u32,
    time_minutes: u32,
    pass_threshold: f64,
    pass_score: u32,
    low_time_warning_secs: u32,
}

impl ExamSettings {
    /// Official exam format:
    /// - 40 questions
    /// - 45 minutes
    /// - 80% to pass, i.e. 32 of 40
    /// - low-time warning in the last 5 minutes
    #[must_use]
    pub fn official() -> Self {
        Self {
            question_count: 40,
            time_minutes: 45,
            pass_threshold: 0.8,
            pass_score: 32,
            low_time_warning_secs: 300,
        }
    }

    /// Creates custom exam settings.
    ///
    /// # Errors
    ///
    /// Returns `ExamSettingsError` if a count is zero, the threshold is out of
    /// range, or the pass score does not fit the question count.
    pub fn new(
        question_count: u32,
        time_minutes: u32,
        pass_threshold: f64,
        pass_score: u32,
        low_time_warning_secs: u32,
    ) -> Result<Self, ExamSettingsError> {
        if question_count == 0 {
            return Err(ExamSettingsError::InvalidQuestionCount);
        }
        if time_minutes == 0 {
            return Err(ExamSettingsError::InvalidTimeMinutes);
        }
        if !pass_threshold.is_finite() || pass_threshold <= 0.0 || pass_threshold > 1.0 {
            return Err(ExamSettingsError::InvalidPassThreshold(pass_threshold));
        }
        if pass_score == 0 || pass_score > question_count {
            return Err(ExamSettingsError::InvalidPassScore {
                pass_score,
                question_count,
            });
        }

        Ok(Self {
            question_count,
            time_minutes,
            pass_threshold,
            pass_score,
            low_time_warning_secs,
        })
    }

    /// Questions in a full exam.
    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn time_minutes(&self) -> u32 {
        self.time_minutes
    }

    #[must_use]
    pub fn pass_threshold(&self) -> f64 {
        self.pass_threshold
    }

    /// Exact pass mark for a full-length exam.
    #[must_use]
    pub fn pass_score(&self) -> u32 {
        self.pass_score
    }

    #[must_use]
    pub fn low_time_warning_secs(&self) -> u32 {
        self.low_time_warning_secs
    }

    /// Pass mark for a session of `total` questions.
    ///
    /// A full-length session uses the exact configured score; any other length
    /// uses `ceil(total * threshold)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pass_mark(&self, total: u32) -> u32 {
        if total == self.question_count {
            return self.pass_score;
        }
        let scaled = (f64::from(total) * self.pass_threshold).ceil();
        if scaled <= 0.0 {
            return 0;
        }
        scaled as u32
    }
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self::official()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn official_settings_match_the_exam() {
        let settings = ExamSettings::official();
        assert_eq!(settings.question_count(), 40);
        assert_eq!(settings.time_minutes(), 45);
        assert_eq!(settings.pass_score(), 32);
        assert_eq!(settings.low_time_warning_secs(), 300);
    }

    #[test]
    fn full_exam_uses_exact_pass_score() {
        let settings = ExamSettings::official();
        assert_eq!(settings.pass_mark(40), 32);
    }

    #[test]
    fn shorter_session_rounds_threshold_up() {
        let settings = ExamSettings::official();
        assert_eq!(settings.pass_mark(10), 8);
        assert_eq!(settings.pass_mark(7), 6);
        assert_eq!(settings.pass_mark(1), 1);
        assert_eq!(settings.pass_mark(0), 0);
    }

    #[test]
    fn new_rejects_invalid_values() {
        assert_eq!(
            ExamSettings::new(0, 45, 0.8, 32, 300).unwrap_err(),
            ExamSettingsError::InvalidQuestionCount
        );
        assert_eq!(
            ExamSettings::new(40, 0, 0.8, 32, 300).unwrap_err(),
            ExamSettingsError::InvalidTimeMinutes
        );
        assert!(matches!(
            ExamSettings::new(40, 45, 1.5, 32, 300),
            Err(ExamSettingsError::InvalidPassThreshold(_))
        ));
        assert!(matches!(
            ExamSettings::new(40, 45, 0.8, 41, 300),
            Err(ExamSettingsError::InvalidPassScore { .. })
        ));
    }
}
