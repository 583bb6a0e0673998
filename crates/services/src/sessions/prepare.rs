use rand::Rng;
use rand::seq::SliceRandom;

use civique_core::model::{
    DISTRACTOR_COUNT, OPTION_COUNT, OptionIndex, PreparedQuestion, QuestionRecord,
};

use crate::error::SessionError;

/// Turn a record into a fixed question instance.
///
/// Picks one phrasing and one correct answer, draws three distinct
/// distractors, then shuffles the four options.
///
/// # Errors
///
/// Returns `SessionError::MalformedRecord` if the record has fewer than three
/// distractors.
pub fn prepare_question<R: Rng + ?Sized>(
    record: &QuestionRecord,
    rng: &mut R,
) -> Result<PreparedQuestion, SessionError> {
    let malformed = || SessionError::MalformedRecord {
        id: record.id().clone(),
        distractors: record.wrong_answers().len(),
    };
    if !record.can_assemble_options() {
        return Err(malformed());
    }

    let phrasings = record.phrasings();
    let question = &phrasings[rng.random_range(0..phrasings.len())];
    let answers = record.correct_answers();
    let correct = &answers[rng.random_range(0..answers.len())];

    let mut distractors: Vec<&String> = record.wrong_answers().iter().collect();
    distractors.as_mut_slice().shuffle(rng);

    // Track the correct slot by flag, not by text, so a distractor equal to
    // the answer cannot move the index.
    let mut slots: Vec<(bool, String)> = Vec::with_capacity(OPTION_COUNT);
    slots.push((true, correct.clone()));
    slots.extend(
        distractors
            .into_iter()
            .take(DISTRACTOR_COUNT)
            .map(|text| (false, text.clone())),
    );
    slots.as_mut_slice().shuffle(rng);

    let correct_index = slots
        .iter()
        .position(|(is_correct, _)| *is_correct)
        .and_then(OptionIndex::new)
        .ok_or_else(malformed)?;
    let options: [String; OPTION_COUNT] = slots
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|_| malformed())?;

    Ok(PreparedQuestion::new(
        record.id().clone(),
        record.theme(),
        question.clone(),
        options,
        correct_index,
        answers.to_vec(),
    ))
}

/// Prepare every sampled record, failing on the first malformed one.
///
/// # Errors
///
/// Returns `SessionError::MalformedRecord` for the first record that cannot
/// be assembled.
pub fn prepare_all<R: Rng + ?Sized>(
    records: &[QuestionRecord],
    rng: &mut R,
) -> Result<Vec<PreparedQuestion>, SessionError> {
    records
        .iter()
        .map(|record| prepare_question(record, rng))
        .collect()
}
