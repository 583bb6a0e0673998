use rand::Rng;
use rand::seq::SliceRandom;

use civique_core::model::{QuestionId, QuestionRecord};

/// One study card: a single phrasing on the front, the primary answer on
/// the back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub id: QuestionId,
    pub theme: String,
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    /// Build a card from a record, drawing one of its phrasings.
    pub fn from_record<R: Rng + ?Sized>(record: &QuestionRecord, rng: &mut R) -> Self {
        let phrasings = record.phrasings();
        let question = phrasings[rng.random_range(0..phrasings.len())].clone();
        Self {
            id: record.id().clone(),
            theme: record.theme().to_string(),
            question,
            answer: record.primary_answer().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashcardFace {
    #[default]
    Question,
    Answer,
}

/// Snapshot of the deck for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardView {
    /// `None` for an empty deck.
    pub card: Option<Flashcard>,
    pub face: FlashcardFace,
    pub index: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl FlashcardView {
    /// `Carte i / n`, `Carte 0 / 0` when empty.
    #[must_use]
    pub fn progress_label(&self) -> String {
        let position = if self.total == 0 { 0 } else { self.index + 1 };
        format!("Carte {position} / {}", self.total)
    }
}

/// Cursor over a whole theme, in file order until shuffled.
///
/// Navigation is bounded: `next` on the last card and `prev` on the first
/// are no-ops. Moving always shows the question face.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    index: usize,
    face: FlashcardFace,
}

impl FlashcardDeck {
    #[must_use]
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            index: 0,
            face: FlashcardFace::Question,
        }
    }

    pub fn from_records<R: Rng + ?Sized>(records: &[QuestionRecord], rng: &mut R) -> Self {
        let cards = records
            .iter()
            .map(|record| Flashcard::from_record(record, rng))
            .collect();
        Self::new(cards)
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn face(&self) -> FlashcardFace {
        self.face
    }

    #[must_use]
    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    pub fn flip(&mut self) {
        if self.is_empty() {
            return;
        }
        self.face = match self.face {
            FlashcardFace::Question => FlashcardFace::Answer,
            FlashcardFace::Answer => FlashcardFace::Question,
        };
    }

    /// Returns `false` when already on the last card.
    pub fn next(&mut self) -> bool {
        if self.index + 1 >= self.cards.len() {
            return false;
        }
        self.index += 1;
        self.face = FlashcardFace::Question;
        true
    }

    /// Returns `false` when already on the first card.
    pub fn prev(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.face = FlashcardFace::Question;
        true
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.as_mut_slice().shuffle(rng);
        self.index = 0;
        self.face = FlashcardFace::Question;
    }

    #[must_use]
    pub fn view(&self) -> FlashcardView {
        FlashcardView {
            card: self.current().cloned(),
            face: self.face,
            index: self.index,
            total: self.cards.len(),
            has_prev: self.index > 0,
            has_next: self.index + 1 < self.cards.len(),
        }
    }
}
