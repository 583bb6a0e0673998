use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use civique_core::model::{
    ExamSettings, Level, QuestionId, QuestionRecord, QuizConfig, SessionId, Theme, ThemeFilter,
};
use civique_core::scoring::AnswerOutcome;
use civique_core::time::fixed_clock;
use services::{
    Advance, DisplaySurface, QuestionScreen, QuizEngine, QuizEvent, QuizResults,
    SelectionFeedback, SessionEnd, SessionError, StartScreen, TickOutcome, TimerView,
    TransitionError,
};
use storage::{InMemoryQuestionBank, QuestionBankSource, StorageError};

#[derive(Debug, Clone, PartialEq)]
enum Rendered {
    Start(StartScreen),
    Question(QuestionScreen),
    Selection(SelectionFeedback),
    Timer(TimerView),
    Results(QuizResults),
    Error(String),
}

#[derive(Default)]
struct RecordingSurface {
    frames: Vec<Rendered>,
}

impl RecordingSurface {
    fn last(&self) -> Option<&Rendered> {
        self.frames.last()
    }

    fn last_question(&self) -> Option<&QuestionScreen> {
        self.frames.iter().rev().find_map(|frame| match frame {
            Rendered::Question(screen) => Some(screen),
            _ => None,
        })
    }
}

impl DisplaySurface for RecordingSurface {
    fn render_start(&mut self, screen: &StartScreen) {
        self.frames.push(Rendered::Start(screen.clone()));
    }

    fn render_question(&mut self, screen: &QuestionScreen) {
        self.frames.push(Rendered::Question(screen.clone()));
    }

    fn render_selection(&mut self, feedback: &SelectionFeedback) {
        self.frames.push(Rendered::Selection(*feedback));
    }

    fn render_timer(&mut self, timer: &TimerView) {
        self.frames.push(Rendered::Timer(*timer));
    }

    fn render_results(&mut self, results: &QuizResults) {
        self.frames.push(Rendered::Results(results.clone()));
    }

    fn render_error(&mut self, error: &SessionError) {
        self.frames.push(Rendered::Error(error.user_message().to_string()));
    }
}

struct OfflineBank;

#[async_trait]
impl QuestionBankSource for OfflineBank {
    async fn load_theme(
        &self,
        _level: Level,
        _theme: Theme,
    ) -> Result<Vec<QuestionRecord>, StorageError> {
        Err(StorageError::Connection("network unreachable".into()))
    }
}

fn record(id: u64, theme: Theme) -> QuestionRecord {
    QuestionRecord::new(
        QuestionId::from(id),
        theme.label(),
        vec![format!("Question {id} ?"), format!("Variante {id} ?")],
        vec![format!("Bonne {id}")],
        vec![
            format!("Faux {id}-1"),
            format!("Faux {id}-2"),
            format!("Faux {id}-3"),
            format!("Faux {id}-4"),
        ],
    )
    .unwrap()
}

/// `count` records spread round-robin over every theme.
fn bank(level: Level, count: u64) -> InMemoryQuestionBank {
    let themes = Theme::all();
    let mut bank = InMemoryQuestionBank::new();
    for (slot, theme) in themes.iter().enumerate() {
        let records = (0..count)
            .filter(|id| *id as usize % themes.len() == slot)
            .map(|id| record(id, *theme))
            .collect();
        bank = bank.with_theme(level, *theme, records);
    }
    bank
}

fn engine(config: QuizConfig, source: Arc<dyn QuestionBankSource>) -> QuizEngine<RecordingSurface> {
    QuizEngine::new(config, source, RecordingSurface::default())
        .with_seed(42)
        .with_clock(fixed_clock())
}

/// Pick the correct option of the current question, or a wrong one.
fn answer_current(engine: &mut QuizEngine<RecordingSurface>, correctly: bool) {
    let session = engine.session().unwrap();
    let correct = session.current_question().unwrap().correct_index().value();
    let pick = if correctly { correct } else { (correct + 1) % 4 };
    engine.select_option(pick).unwrap();
}

#[tokio::test]
async fn forty_distinct_questions_from_full_bank() {
    let config = QuizConfig::quiz(Level::Csp, ExamSettings::official());
    let mut engine = engine(config, Arc::new(bank(Level::Csp, 192)));
    engine.start_session().await.unwrap();

    let session = engine.session().unwrap();
    assert_eq!(session.total(), 40);
    let ids: HashSet<_> = session.questions().iter().map(|q| q.id().clone()).collect();
    assert_eq!(ids.len(), 40);
    for question in session.questions() {
        let distinct: HashSet<_> = question.options().iter().collect();
        assert_eq!(distinct.len(), 4);
        assert!(question.correct_answer_text().starts_with("Bonne"));
    }
    assert_eq!(session.remaining_secs(), Some(45 * 60));
}

#[tokio::test]
async fn small_pool_caps_the_session() {
    let config = QuizConfig::quiz(Level::Cr, ExamSettings::official())
        .with_themes(ThemeFilter::only(vec![Theme::Histoire]).unwrap());
    let source = InMemoryQuestionBank::new().with_theme(
        Level::Cr,
        Theme::Histoire,
        (1..=12).map(|id| record(id, Theme::Histoire)).collect(),
    );
    let mut engine = engine(config, Arc::new(source));
    engine.start_session().await.unwrap();

    let session = engine.session().unwrap();
    assert_eq!(session.total(), 12);
    assert_eq!(session.requested(), 40);
}

#[tokio::test]
async fn full_run_scores_and_passes_at_exact_mark() {
    let config = QuizConfig::simulation(Level::Nat, ExamSettings::official());
    let mut engine = engine(config, Arc::new(bank(Level::Nat, 280)));
    engine.init().await.unwrap();
    assert!(matches!(engine.surface().last(), Some(Rendered::Start(_))));

    engine.handle(QuizEvent::Start).await.unwrap();
    for i in 0..40 {
        answer_current(&mut engine, i < 32);
        let step = engine.advance().unwrap();
        assert_eq!(step == Advance::Finished, i == 39);
    }

    let Some(Rendered::Results(results)) = engine.surface().last() else {
        panic!("expected results screen");
    };
    assert_eq!(results.score(), 32);
    assert!(results.passed());
    assert_eq!(results.report.pass_mark, 32);
    assert_eq!(results.report.percentage, 80);
    assert_eq!(results.ended_by, SessionEnd::Completed);
    assert_eq!(results.breakdown.len(), 40);
    assert_eq!(engine.active_timer(), None);
}

#[tokio::test]
async fn simulation_never_reveals_correctness() {
    let config = QuizConfig::simulation(Level::Csp, ExamSettings::official());
    let mut engine = engine(config, Arc::new(bank(Level::Csp, 60)));
    engine.start_session().await.unwrap();

    let feedback = engine.select_option(2).unwrap();
    assert!(matches!(feedback, SelectionFeedback::Selected { .. }));
    assert_eq!(feedback.is_correct(), None);
}

#[tokio::test]
async fn timer_expiry_counts_unanswered_questions() {
    let exam = ExamSettings::new(3, 1, 0.8, 2, 30).unwrap();
    let config = QuizConfig::quiz(Level::Csp, exam);
    let mut engine = engine(config, Arc::new(bank(Level::Csp, 20)));
    engine.start_session().await.unwrap();

    answer_current(&mut engine, true);
    engine.advance().unwrap();

    let id = engine.active_timer().unwrap();
    for _ in 0..59 {
        assert!(matches!(engine.tick(id), TickOutcome::Running(_)));
    }
    assert!(engine.remaining_time().unwrap().warning);
    assert_eq!(engine.tick(id), TickOutcome::Expired);
    assert_eq!(engine.active_timer(), None);

    let Some(Rendered::Results(results)) = engine.surface().last() else {
        panic!("expected results screen");
    };
    assert_eq!(results.ended_by, SessionEnd::TimeExpired);
    assert_eq!(results.score(), 1);
    assert_eq!(results.total(), 3);
    assert!(!results.passed());
    assert_eq!(results.report.missing, 1);
    assert_eq!(results.breakdown[1].outcome, AnswerOutcome::Unanswered);
    assert_eq!(results.time_taken_display().as_deref(), Some("1min 00s"));
}

#[tokio::test]
async fn stale_tick_after_restart_is_ignored() {
    let config = QuizConfig::quiz(Level::Csp, ExamSettings::official());
    let mut engine = engine(config, Arc::new(bank(Level::Csp, 60)));
    engine.start_session().await.unwrap();
    let old = engine.active_timer().unwrap();

    engine.handle(QuizEvent::Restart).await.unwrap();
    assert!(engine.session().is_none());
    assert!(matches!(engine.surface().last(), Some(Rendered::Start(_))));

    engine.start_session().await.unwrap();
    let before = engine.remaining_time();
    assert_eq!(engine.tick(old), TickOutcome::Ignored);
    assert_eq!(engine.remaining_time(), before);
    assert_ne!(engine.active_timer(), Some(old));

    assert_eq!(engine.tick(SessionId::generate()), TickOutcome::Ignored);
}

#[tokio::test]
async fn unavailable_bank_renders_error_without_session() {
    let config = QuizConfig::quiz(Level::Csp, ExamSettings::official()).with_auto_start(true);
    let mut engine = engine(config, Arc::new(OfflineBank));

    let err = engine.init().await.unwrap_err();
    assert!(matches!(err, SessionError::DataUnavailable(_)));
    assert!(engine.session().is_none());
    assert_eq!(
        engine.surface().last(),
        Some(&Rendered::Error(
            "Erreur lors du chargement des questions. Veuillez réessayer.".to_string()
        ))
    );
}

#[tokio::test]
async fn empty_pool_is_reported() {
    let config = QuizConfig::quiz(Level::Cr, ExamSettings::official())
        .with_themes(ThemeFilter::only(vec![Theme::Institutions]).unwrap());
    let source = InMemoryQuestionBank::new().with_theme(Level::Cr, Theme::Institutions, vec![]);
    let mut engine = engine(config, Arc::new(source));

    let err = engine.start_session().await.unwrap_err();
    assert!(matches!(err, SessionError::Empty));
    assert!(engine.session().is_none());
}

#[tokio::test]
async fn refused_events_leave_screen_unchanged() {
    let config = QuizConfig::quiz(Level::Csp, ExamSettings::official());
    let mut engine = engine(config, Arc::new(bank(Level::Csp, 60)));
    engine.start_session().await.unwrap();
    let frames = engine.surface().frames.len();

    assert!(engine.advance().is_err());
    assert!(engine.select_option(7).is_err());
    assert_eq!(engine.surface().frames.len(), frames);

    engine.select_option(0).unwrap();
    assert!(engine.select_option(1).is_err());
    assert_eq!(engine.session().unwrap().answers()[0].unwrap().value(), 0);
}

#[tokio::test]
async fn rerender_is_idempotent() {
    let config = QuizConfig::quiz(Level::Csp, ExamSettings::official()).with_timed(false);
    let mut engine = engine(config, Arc::new(bank(Level::Csp, 60)));
    engine.start_session().await.unwrap();
    answer_current(&mut engine, false);

    engine.rerender();
    let first = engine.surface().last_question().cloned().unwrap();
    engine.rerender();
    let second = engine.surface().last_question().cloned().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.feedback.and_then(|f| f.is_correct()), Some(false));
    assert_eq!(engine.active_timer(), None);
}

#[tokio::test]
async fn same_seed_same_session() {
    let config = QuizConfig::quiz(Level::Csp, ExamSettings::official());
    let source: Arc<dyn QuestionBankSource> = Arc::new(bank(Level::Csp, 192));

    let mut a = engine(config.clone(), Arc::clone(&source));
    let mut b = engine(config, source);
    a.start_session().await.unwrap();
    b.start_session().await.unwrap();

    assert_eq!(
        a.session().unwrap().questions(),
        b.session().unwrap().questions()
    );
}

#[tokio::test]
async fn events_without_session_are_refused_transitions() {
    let config = QuizConfig::quiz(Level::Csp, ExamSettings::official());
    let mut engine = engine(config, Arc::new(bank(Level::Csp, 60)));

    let advance = engine.advance().unwrap_err();
    assert!(matches!(
        advance,
        SessionError::InvalidTransition(TransitionError::NotStarted)
    ));
    assert_eq!(advance.user_message(), "Action impossible pour le moment.");
    assert!(matches!(
        engine.select_option(0),
        Err(SessionError::InvalidTransition(TransitionError::NotStarted))
    ));
    assert!(engine.surface().frames.is_empty());
}

#[tokio::test]
async fn record_short_of_distractors_blocks_the_session() {
    let config = QuizConfig::quiz(Level::Csp, ExamSettings::official())
        .with_themes(ThemeFilter::only(vec![Theme::Histoire]).unwrap());
    let short = QuestionRecord::new(
        QuestionId::from(99),
        Theme::Histoire.label(),
        vec!["Question 99 ?".to_string()],
        vec!["Bonne 99".to_string()],
        vec!["Faux 1".to_string(), "Faux 2".to_string()],
    )
    .unwrap();
    let source = InMemoryQuestionBank::new().with_theme(
        Level::Csp,
        Theme::Histoire,
        vec![record(1, Theme::Histoire), short],
    );
    let mut engine = engine(config, Arc::new(source));

    let err = engine.start_session().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::MalformedRecord { ref id, distractors: 2 } if id.as_str() == "99"
    ));
    assert!(engine.session().is_none());
    assert_eq!(
        engine.surface().last(),
        Some(&Rendered::Error(
            "Erreur lors du chargement des questions. Veuillez réessayer.".to_string()
        ))
    );
}

#[tokio::test]
async fn timer_is_rendered_before_first_question() {
    let config = QuizConfig::quiz(Level::Csp, ExamSettings::official());
    let mut engine = engine(config, Arc::new(bank(Level::Csp, 60)));
    engine.start_session().await.unwrap();

    let frames = &engine.surface().frames;
    assert_eq!(frames.len(), 2);
    assert!(matches!(
        frames[0],
        Rendered::Timer(TimerView {
            remaining_secs: 2700,
            warning: false
        })
    ));
    assert!(matches!(frames[1], Rendered::Question(_)));
}
