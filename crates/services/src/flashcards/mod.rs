mod deck;
mod service;

pub use deck::{Flashcard, FlashcardDeck, FlashcardFace, FlashcardView};
pub use service::FlashcardService;
