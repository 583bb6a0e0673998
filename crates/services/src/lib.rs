#![forbid(unsafe_code)]

pub mod error;
pub mod flashcards;
pub mod sessions;

pub use civique_core::Clock;

pub use error::{SessionError, TransitionError};
pub use flashcards::{Flashcard, FlashcardDeck, FlashcardFace, FlashcardService, FlashcardView};
pub use sessions::{
    Advance, DisplaySurface, QuestionScreen, QuizEngine, QuizEvent, QuizResults, QuizSession,
    SelectionFeedback, SessionEnd, SessionProgress, SessionStatus, StartScreen, TickOutcome,
    TimerView,
};
