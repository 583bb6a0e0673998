mod plan;
mod prepare;
mod progress;
mod results;
mod service;
mod timer;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{SessionError, TransitionError};
pub use plan::{SessionPlan, sample_questions};
pub use prepare::{prepare_all, prepare_question};
pub use progress::SessionProgress;
pub use results::{QuizResults, SessionEnd};
pub use service::{Advance, QuizSession, SessionStatus, TickOutcome};
pub use timer::{Countdown, CountdownTick, TimerView};
pub use view::{DisplaySurface, QuestionScreen, SelectionFeedback, StartScreen};
pub use workflow::{QuizEngine, QuizEvent};
