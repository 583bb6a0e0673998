use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use civique_core::model::QuestionRecord;

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub records: Vec<QuestionRecord>,
    pub requested: usize,
    /// Distinct candidates that were available before sampling.
    pub available: usize,
}

impl SessionPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the pool was smaller than the requested count.
    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.available < self.requested
    }
}

/// Uniform selection without replacement.
///
/// Repeated ids keep their first occurrence. The remaining candidates are
/// shuffled (Fisher–Yates) and the first `min(requested, available)` kept.
pub fn sample_questions<R: Rng + ?Sized>(
    pool: impl IntoIterator<Item = QuestionRecord>,
    requested: usize,
    rng: &mut R,
) -> SessionPlan {
    let mut seen = HashSet::new();
    let mut candidates: Vec<QuestionRecord> = pool
        .into_iter()
        .filter(|record| seen.insert(record.id().clone()))
        .collect();
    let available = candidates.len();

    candidates.as_mut_slice().shuffle(rng);
    candidates.truncate(requested);

    SessionPlan {
        records: candidates,
        requested,
        available,
    }
}
