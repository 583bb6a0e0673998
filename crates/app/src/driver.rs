//! Event loops that serialize terminal input and timer ticks.

use std::error::Error;
use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use civique_core::model::{OptionIndex, SessionId};
use services::{FlashcardDeck, FlashcardService, QuizEngine, QuizEvent, QuizSession, SessionStatus};

use crate::terminal::TerminalSurface;

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Option(usize),
    Confirm,
    Restart,
    Next,
    Prev,
    Shuffle,
    Help,
    Quit,
    Unknown,
}

pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Confirm;
    }
    let mut chars = trimmed.chars();
    let (Some(first), None) = (chars.next(), chars.next()) else {
        return match trimmed.to_lowercase().as_str() {
            "quit" | "exit" => Input::Quit,
            "help" => Input::Help,
            _ => Input::Unknown,
        };
    };
    if let Some(index) = OptionIndex::from_letter(first) {
        return Input::Option(index.value());
    }
    if let Some(digit) = first.to_digit(10).filter(|d| (1..=4).contains(d)) {
        return Input::Option(digit as usize - 1);
    }
    match first.to_ascii_lowercase() {
        'r' => Input::Restart,
        'n' => Input::Next,
        'p' => Input::Prev,
        'm' => Input::Shuffle,
        'h' | '?' => Input::Help,
        'q' => Input::Quit,
        _ => Input::Unknown,
    }
}

/// Map input to an engine event given the current session state.
pub fn quiz_event(input: Input, session: Option<&QuizSession>) -> Option<QuizEvent> {
    let status = session.map(QuizSession::status);
    match (input, status) {
        (Input::Restart, _) => Some(QuizEvent::Restart),
        (Input::Confirm, None | Some(SessionStatus::NotStarted)) => Some(QuizEvent::Start),
        (Input::Confirm | Input::Next, Some(SessionStatus::InProgress)) => Some(QuizEvent::Advance),
        (Input::Confirm, Some(SessionStatus::Finished)) => Some(QuizEvent::Restart),
        (Input::Option(index), Some(SessionStatus::InProgress)) => Some(QuizEvent::Select(index)),
        _ => None,
    }
}

/// One-second ticker bound to the session it was created for.
struct Ticker {
    session: SessionId,
    interval: Interval,
}

impl Ticker {
    fn new(session: SessionId) -> Self {
        let period = Duration::from_secs(1);
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { session, interval }
    }
}

/// Keep a ticker only while the engine has a running countdown.
fn sync_ticker(ticker: &mut Option<Ticker>, active: Option<SessionId>) {
    match (ticker.as_ref().map(|t| t.session), active) {
        (current, Some(id)) if current == Some(id) => {}
        (_, Some(id)) => *ticker = Some(Ticker::new(id)),
        (_, None) => *ticker = None,
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) -> SessionId {
    match ticker {
        Some(ticker) => {
            ticker.interval.tick().await;
            ticker.session
        }
        None => std::future::pending().await,
    }
}

/// Run a quiz until the user quits or input ends.
///
/// # Errors
///
/// Returns an error when reading input or writing output fails.
pub async fn run_quiz<W, R>(
    engine: &mut QuizEngine<TerminalSurface<W>>,
    input: R,
) -> Result<(), Box<dyn Error>>
where
    W: Write,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut ticker: Option<Ticker> = None;

    // A failed start is already on screen; the user can retry with Entrée.
    if let Err(err) = engine.init().await {
        tracing::debug!(error = %err, "initial start failed");
    }

    loop {
        if let Some(err) = engine.surface_mut().take_error() {
            return Err(err.into());
        }
        sync_ticker(&mut ticker, engine.active_timer());

        tokio::select! {
            session = next_tick(&mut ticker) => {
                engine.tick(session);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = parse_input(&line);
                match input {
                    Input::Quit => break,
                    Input::Help => engine.surface_mut().render_help(),
                    _ => match quiz_event(input, engine.session()) {
                        Some(event) => {
                            if let Err(err) = engine.handle(event).await {
                                tracing::debug!(error = %err, ?event, "event not applied");
                            }
                        }
                        None => engine.rerender(),
                    },
                }
            }
        }
    }
    Ok(())
}

/// Browse a flashcard deck until the user quits or input ends.
///
/// # Errors
///
/// Returns an error when reading input or writing output fails.
pub async fn run_flashcards<W, R>(
    surface: &mut TerminalSurface<W>,
    service: &FlashcardService,
    mut deck: FlashcardDeck,
    input: R,
) -> Result<(), Box<dyn Error>>
where
    W: Write,
    R: AsyncBufRead + Unpin,
{
    let mut rng = service.rng();
    let mut lines = input.lines();
    surface.render_flashcard(&deck.view());

    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Quit => break,
            Input::Confirm => deck.flip(),
            Input::Next => {
                deck.next();
            }
            Input::Prev => {
                deck.prev();
            }
            Input::Shuffle => deck.shuffle(&mut rng),
            _ => {}
        }
        surface.render_flashcard(&deck.view());
        if let Some(err) = surface.take_error() {
            return Err(err.into());
        }
    }
    Ok(())
}
