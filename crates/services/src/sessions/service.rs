use chrono::{DateTime, Utc};
use std::fmt;

use civique_core::model::{OptionIndex, PreparedQuestion, QuizConfig, SessionId};

use super::progress::SessionProgress;
use super::results::{QuizResults, SessionEnd};
use super::timer::{Countdown, CountdownTick, TimerView};
use super::view::{QuestionScreen, SelectionFeedback};
use crate::error::{SessionError, TransitionError};

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Finished,
}

/// Outcome of a successful `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at this 0-based index.
    Next(usize),
    Finished,
}

/// Outcome of delivering a timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick for another session, an untimed session, or one not in progress.
    Ignored,
    Running(TimerView),
    /// This tick ended the session.
    Expired,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One multiple-choice session over a fixed list of prepared questions.
///
/// `NotStarted → InProgress → Finished`. Each question takes exactly one
/// answer; advancing needs that answer; a finished session never changes
/// again. Refused events return `TransitionError` and leave the state
/// untouched.
pub struct QuizSession {
    id: SessionId,
    config: QuizConfig,
    questions: Vec<PreparedQuestion>,
    requested: usize,
    current: usize,
    answers: Vec<Option<OptionIndex>>,
    countdown: Option<Countdown>,
    status: SessionStatus,
    started_at: Option<DateTime<Utc>>,
    results: Option<QuizResults>,
}

impl QuizSession {
    /// Create a session that has not started yet.
    ///
    /// `requested` is how many questions were asked for; the prepared list
    /// may be shorter when the pool was small.
    #[must_use]
    pub fn new(config: QuizConfig, questions: Vec<PreparedQuestion>, requested: usize) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            id: SessionId::generate(),
            config,
            questions,
            requested,
            current: 0,
            answers,
            countdown: None,
            status: SessionStatus::NotStarted,
            started_at: None,
            results: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn questions(&self) -> &[PreparedQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<OptionIndex>] {
        &self.answers
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Questions asked for; larger than `total` when the pool was short.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&PreparedQuestion> {
        match self.status {
            SessionStatus::InProgress => self.questions.get(self.current),
            _ => None,
        }
    }

    #[must_use]
    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }

    /// Remaining seconds for timed sessions.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.countdown.as_ref().map(Countdown::remaining_secs)
    }

    #[must_use]
    pub fn timer_view(&self) -> Option<TimerView> {
        self.countdown.as_ref().map(Countdown::view)
    }

    /// True while ticks can still change this session.
    #[must_use]
    pub fn needs_ticks(&self) -> bool {
        self.status == SessionStatus::InProgress
            && self.countdown.as_ref().is_some_and(Countdown::is_running)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.questions.len(),
            answered: self.answers.iter().filter(|a| a.is_some()).count(),
            index: self.current,
            is_complete: self.is_finished(),
        }
    }

    /// Begin the session: cursor to the first question, answers cleared,
    /// countdown loaded with the full budget when timed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when there is no question, or
    /// `TransitionError::AlreadyStarted` unless the session is `NotStarted`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.status != SessionStatus::NotStarted {
            return Err(TransitionError::AlreadyStarted.into());
        }
        if self.questions.is_empty() {
            return Err(SessionError::Empty);
        }

        self.current = 0;
        self.answers = vec![None; self.questions.len()];
        self.countdown = self.config.timed().then(|| {
            Countdown::new(
                self.config.time_budget_secs(),
                self.config.exam().low_time_warning_secs(),
            )
        });
        self.results = None;
        self.started_at = Some(now);
        self.status = SessionStatus::InProgress;
        Ok(())
    }

    /// Record the answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if the session is not in progress, the
    /// index is not an option, or the question was already answered.
    pub fn select_option(&mut self, index: usize) -> Result<SelectionFeedback, SessionError> {
        self.ensure_in_progress()?;
        let option = OptionIndex::new(index).ok_or(TransitionError::InvalidOption(index))?;
        let slot = &mut self.answers[self.current];
        if slot.is_some() {
            return Err(TransitionError::AlreadyAnswered.into());
        }
        *slot = Some(option);

        let correct = self.questions[self.current].correct_index();
        Ok(self.feedback(option, correct))
    }

    /// Move past the answered current question, finishing after the last one.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if the session is not in progress or the
    /// current question has no answer.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, SessionError> {
        self.ensure_in_progress()?;
        if self.answers[self.current].is_none() {
            return Err(TransitionError::NotAnswered.into());
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Ok(Advance::Next(self.current))
        } else {
            self.finish(SessionEnd::Completed, now);
            Ok(Advance::Finished)
        }
    }

    /// Deliver one elapsed second.
    pub fn tick(&mut self, session: SessionId, now: DateTime<Utc>) -> TickOutcome {
        if session != self.id || self.status != SessionStatus::InProgress {
            return TickOutcome::Ignored;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return TickOutcome::Ignored;
        };

        match countdown.tick() {
            CountdownTick::Running { .. } => TickOutcome::Running(countdown.view()),
            CountdownTick::Expired => {
                self.finish(SessionEnd::TimeExpired, now);
                TickOutcome::Expired
            }
            CountdownTick::Stopped => TickOutcome::Ignored,
        }
    }

    /// Screen for the current question; `None` unless in progress.
    #[must_use]
    pub fn question_screen(&self) -> Option<QuestionScreen> {
        let question = self.current_question()?;
        let feedback = self.answers[self.current]
            .map(|selected| self.feedback(selected, question.correct_index()));
        Some(QuestionScreen {
            session_id: self.id,
            progress: self.progress(),
            theme: question.theme().to_string(),
            question: question.question().to_string(),
            options: question.options().clone(),
            is_last: self.current + 1 == self.questions.len(),
            feedback,
        })
    }

    fn feedback(&self, selected: OptionIndex, correct: OptionIndex) -> SelectionFeedback {
        if self.config.show_feedback() {
            SelectionFeedback::Revealed { selected, correct }
        } else {
            SelectionFeedback::Selected { selected }
        }
    }

    fn ensure_in_progress(&self) -> Result<(), TransitionError> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            SessionStatus::NotStarted => Err(TransitionError::NotStarted),
            SessionStatus::Finished => Err(TransitionError::Finished),
        }
    }

    fn finish(&mut self, ended_by: SessionEnd, now: DateTime<Utc>) {
        let time_taken_secs = self.countdown.as_mut().map(|countdown| {
            countdown.stop();
            countdown.elapsed_secs()
        });
        self.status = SessionStatus::Finished;
        self.results = Some(QuizResults::build(
            &self.questions,
            &self.answers,
            self.config.exam(),
            ended_by,
            time_taken_secs,
            self.started_at.unwrap_or(now),
            now,
        ));
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("remaining_secs", &self.remaining_secs())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
