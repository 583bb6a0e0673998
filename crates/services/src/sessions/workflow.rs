use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

use civique_core::model::{QuizConfig, SessionId};
use storage::QuestionBankSource;

use super::plan::sample_questions;
use super::prepare::prepare_all;
use super::service::{Advance, QuizSession, TickOutcome};
use super::timer::TimerView;
use super::view::{DisplaySurface, SelectionFeedback, StartScreen};
use crate::Clock;
use crate::error::{SessionError, TransitionError};

/// Input events the host forwards to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    Start,
    /// Option position, 0-based.
    Select(usize),
    Advance,
    Restart,
    Tick(SessionId),
}

/// Drives one quiz configuration: loads the pool, builds sessions and keeps
/// the display in sync with session state.
///
/// At most one session exists at a time. Starting or restarting discards the
/// previous one.
pub struct QuizEngine<D> {
    config: QuizConfig,
    source: Arc<dyn QuestionBankSource>,
    surface: D,
    rng: StdRng,
    clock: Clock,
    session: Option<QuizSession>,
}

impl<D: DisplaySurface> QuizEngine<D> {
    #[must_use]
    pub fn new(config: QuizConfig, source: Arc<dyn QuestionBankSource>, surface: D) -> Self {
        Self {
            config,
            source,
            surface,
            rng: StdRng::from_rng(&mut rand::rng()),
            clock: Clock::default(),
            session: None,
        }
    }

    /// Reproducible sampling and shuffling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    /// Show the start screen, or start right away when `auto_start` is set.
    ///
    /// # Errors
    ///
    /// Same as [`QuizEngine::start_session`].
    pub async fn init(&mut self) -> Result<(), SessionError> {
        if self.config.auto_start() {
            self.start_session().await
        } else {
            self.show_start();
            Ok(())
        }
    }

    pub fn show_start(&mut self) {
        self.surface
            .render_start(&StartScreen::from_config(&self.config));
    }

    /// Load the pool, sample and prepare questions, then start a new session.
    ///
    /// Any previous session is dropped first. On failure no session exists
    /// and the error is rendered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DataUnavailable` when the pool cannot be
    /// loaded, `SessionError::Empty` when it has no question, or
    /// `SessionError::MalformedRecord` for a record lacking distractors.
    pub async fn start_session(&mut self) -> Result<(), SessionError> {
        self.session = None;
        match self.build_session().await {
            Ok(session) => {
                tracing::info!(
                    session = %session.id(),
                    level = %self.config.level(),
                    questions = session.total(),
                    timed = self.config.timed(),
                    "quiz session started"
                );
                // Timer first so the question header can show the full budget.
                if let Some(timer) = session.timer_view() {
                    self.surface.render_timer(&timer);
                }
                if let Some(screen) = session.question_screen() {
                    self.surface.render_question(&screen);
                }
                self.session = Some(session);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "quiz session could not start");
                self.surface.render_error(&err);
                Err(err)
            }
        }
    }

    async fn build_session(&mut self) -> Result<QuizSession, SessionError> {
        let level = self.config.level();
        let themes = self.config.themes().themes();
        let pool = self.source.load_pool(level, &themes).await?;

        let requested = self.config.requested_count() as usize;
        let plan = sample_questions(pool, requested, &mut self.rng);
        if plan.is_capped() {
            tracing::warn!(
                requested,
                available = plan.available,
                "question pool smaller than requested count"
            );
        }

        let questions = prepare_all(&plan.records, &mut self.rng)?;
        let mut session = QuizSession::new(self.config.clone(), questions, requested);
        session.start(self.clock.now())?;
        Ok(session)
    }

    /// Record an answer for the current question and render the feedback.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotStarted` without a session, or the
    /// refused transition.
    pub fn select_option(&mut self, index: usize) -> Result<SelectionFeedback, SessionError> {
        let session = self.session.as_mut().ok_or(TransitionError::NotStarted)?;
        let feedback = session.select_option(index).inspect_err(log_refused)?;
        self.surface.render_selection(&feedback);
        Ok(feedback)
    }

    /// Go to the next question, or to the results after the last one.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotStarted` without a session, or the
    /// refused transition.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(TransitionError::NotStarted)?;
        let step = session.advance(now).inspect_err(log_refused)?;
        match step {
            Advance::Next(_) => {
                if let Some(screen) = session.question_screen() {
                    self.surface.render_question(&screen);
                }
            }
            Advance::Finished => {
                if let Some(results) = session.results() {
                    tracing::info!(
                        session = %session.id(),
                        score = results.score(),
                        total = results.total(),
                        passed = results.passed(),
                        "quiz session completed"
                    );
                    self.surface.render_results(results);
                }
            }
        }
        Ok(step)
    }

    /// Deliver one timer tick addressed to `session_id`.
    ///
    /// Ticks for a session that no longer exists are ignored.
    pub fn tick(&mut self, session_id: SessionId) -> TickOutcome {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Ignored;
        };
        let outcome = session.tick(session_id, now);
        match outcome {
            TickOutcome::Running(timer) => self.surface.render_timer(&timer),
            TickOutcome::Expired => {
                if let Some(results) = session.results() {
                    tracing::info!(
                        session = %session.id(),
                        score = results.score(),
                        total = results.total(),
                        "quiz session ended by timer"
                    );
                    self.surface.render_results(results);
                }
            }
            TickOutcome::Ignored => {
                tracing::trace!(session = %session_id, "stale tick ignored");
            }
        }
        outcome
    }

    /// Drop the current session and go back to the start screen.
    pub fn restart(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(session = %session.id(), "quiz session discarded");
        }
        self.show_start();
    }

    /// Redraw the current screen from session state.
    pub fn rerender(&mut self) {
        let Some(session) = self.session.as_ref() else {
            self.show_start();
            return;
        };
        if let Some(results) = session.results() {
            self.surface.render_results(results);
            return;
        }
        if let Some(timer) = session.timer_view() {
            self.surface.render_timer(&timer);
        }
        if let Some(screen) = session.question_screen() {
            self.surface.render_question(&screen);
        }
    }

    #[must_use]
    pub fn remaining_time(&self) -> Option<TimerView> {
        self.session.as_ref().and_then(QuizSession::timer_view)
    }

    /// Id the host should address ticks to, while a countdown is running.
    #[must_use]
    pub fn active_timer(&self) -> Option<SessionId> {
        self.session
            .as_ref()
            .filter(|session| session.needs_ticks())
            .map(QuizSession::id)
    }

    /// Dispatch a host event.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation. Ticks and restarts
    /// never fail.
    pub async fn handle(&mut self, event: QuizEvent) -> Result<(), SessionError> {
        match event {
            QuizEvent::Start => self.start_session().await,
            QuizEvent::Select(index) => self.select_option(index).map(|_| ()),
            QuizEvent::Advance => self.advance().map(|_| ()),
            QuizEvent::Restart => {
                self.restart();
                Ok(())
            }
            QuizEvent::Tick(session_id) => {
                self.tick(session_id);
                Ok(())
            }
        }
    }
}

fn log_refused(err: &SessionError) {
    tracing::debug!(error = %err, "event refused");
}
