use std::fmt;
use std::sync::Arc;

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use civique_core::model::{ExamSettings, Level, QuizConfig, Theme, ThemeFilter};
use services::{FlashcardService, QuizEngine};
use storage::{FileQuestionBank, HttpQuestionBank, QuestionBankSource};

mod driver;
mod settings;
mod terminal;

use settings::load_settings;
use terminal::TerminalSurface;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLevel { raw: String },
    InvalidTheme { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    FlashcardTheme,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLevel { raw } => {
                write!(f, "invalid --level value: {raw} (expected csp, cr or nat)")
            }
            ArgsError::InvalidTheme { raw } => write!(f, "invalid --theme value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::FlashcardTheme => write!(f, "flashcards need exactly one --theme"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(raw: String, flag: &'static str) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  civique [quiz]     [--level <csp|cr|nat>] [--theme <slug>]... [--count <n>]");
    eprintln!("                     [--minutes <n> | --untimed] [--feedback | --no-feedback]");
    eprintln!("  civique exam       [--level <csp|cr|nat>] [--theme <slug>]...");
    eprintln!("  civique flashcards  --level <csp|cr|nat>   --theme <slug>");
    eprintln!();
    eprintln!("Common flags:");
    eprintln!("  --data <dir|url>   question banks (default from civique.toml, else ./data)");
    eprintln!("  --seed <u64>       reproducible question order");
    eprintln!();
    eprintln!("Themes: {}", Theme::all().map(Theme::slug).join(", "));
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CIVIQUE__EXAM__QUESTION_COUNT, CIVIQUE__EXAM__TIME_MINUTES, CIVIQUE__DATA__SOURCE, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Exam,
    Flashcards,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "exam" => Some(Self::Exam),
            "flashcards" => Some(Self::Flashcards),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct Args {
    level: Option<Level>,
    themes: Vec<Theme>,
    count: Option<u32>,
    minutes: Option<u32>,
    untimed: bool,
    feedback: Option<bool>,
    data: Option<String>,
    seed: Option<u64>,
    help: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--level" => {
                    let value = require_value(args, "--level")?;
                    parsed.level = Some(
                        value
                            .parse()
                            .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() })?,
                    );
                }
                "--theme" => {
                    let value = require_value(args, "--theme")?;
                    for slug in value.split(',').filter(|s| !s.trim().is_empty()) {
                        let theme: Theme = slug.parse().map_err(|_| ArgsError::InvalidTheme {
                            raw: slug.to_string(),
                        })?;
                        parsed.themes.push(theme);
                    }
                }
                "--count" => {
                    parsed.count = Some(parse_number(require_value(args, "--count")?, "--count")?);
                }
                "--minutes" => {
                    parsed.minutes =
                        Some(parse_number(require_value(args, "--minutes")?, "--minutes")?);
                }
                "--untimed" => parsed.untimed = true,
                "--feedback" => parsed.feedback = Some(true),
                "--no-feedback" => parsed.feedback = Some(false),
                "--data" => parsed.data = Some(require_value(args, "--data")?),
                "--seed" => {
                    parsed.seed = Some(parse_number(require_value(args, "--seed")?, "--seed")?);
                }
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    /// Fill the level and themes left unset on the command line.
    fn with_defaults(mut self, level: Level, themes: &[Theme]) -> Self {
        self.level.get_or_insert(level);
        if self.themes.is_empty() {
            self.themes.extend_from_slice(themes);
        }
        self
    }

    fn level(&self) -> Level {
        self.level.unwrap_or_default()
    }

    fn theme_filter(&self) -> ThemeFilter {
        ThemeFilter::only(self.themes.iter().copied()).unwrap_or_default()
    }

    fn quiz_config(&self, cmd: Command, exam: ExamSettings) -> QuizConfig {
        let base = match cmd {
            Command::Exam => QuizConfig::simulation(self.level(), exam),
            Command::Quiz | Command::Flashcards => QuizConfig::quiz(self.level(), exam),
        };
        let mut config = base
            .with_themes(self.theme_filter())
            .with_question_count(self.count)
            .with_time_minutes(self.minutes.unwrap_or(0));
        if self.untimed {
            config = config.with_timed(false);
        }
        if let Some(feedback) = self.feedback {
            config = config.with_show_feedback(feedback);
        }
        config
    }

    fn flashcard_theme(&self) -> Result<Theme, ArgsError> {
        match self.themes.as_slice() {
            [theme] => Ok(*theme),
            _ => Err(ArgsError::FlashcardTheme),
        }
    }
}

fn question_source(raw: &str) -> Result<Arc<dyn QuestionBankSource>, storage::StorageError> {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        Ok(Arc::new(HttpQuestionBank::new(raw)?))
    } else {
        Ok(Arc::new(FileQuestionBank::new(raw)))
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app=info,services=info,storage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: a practice quiz when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some(first) if first.starts_with('-') => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with('-') {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if parsed.help {
        print_usage();
        return Ok(());
    }

    let settings = load_settings()?;
    tracing::debug!(?settings, "settings loaded");
    let parsed = parsed.with_defaults(settings.default_level, &settings.default_themes);
    let data = parsed.data.as_deref().unwrap_or(&settings.data_source);
    let source = question_source(data)?;
    tracing::info!(source = data, ?cmd, level = %parsed.level(), "starting");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut surface = TerminalSurface::new(std::io::stdout());

    match cmd {
        Command::Quiz | Command::Exam => {
            let config = parsed.quiz_config(cmd, settings.exam);
            let mut engine = QuizEngine::new(config, source, surface);
            if let Some(seed) = parsed.seed {
                engine = engine.with_seed(seed);
            }
            engine.surface_mut().render_help();
            driver::run_quiz(&mut engine, stdin).await
        }
        Command::Flashcards => {
            let theme = parsed.flashcard_theme().map_err(|e| {
                eprintln!("{e}");
                e
            })?;
            let mut service = FlashcardService::new(source);
            if let Some(seed) = parsed.seed {
                service = service.with_seed(seed);
            }
            match service.load_deck(parsed.level(), theme).await {
                Ok(deck) => {
                    surface.render_deck_header(parsed.level(), theme);
                    driver::run_flashcards(&mut surface, &service, deck, stdin).await
                }
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    Err(err.into())
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(&mut args.iter().map(ToString::to_string))
    }

    #[test]
    fn defaults_to_csp_all_themes() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.level(), Level::Csp);
        assert_eq!(args.theme_filter(), ThemeFilter::All);
        let config = args.quiz_config(Command::Quiz, ExamSettings::official());
        assert_eq!(config.requested_count(), 40);
        assert!(config.timed());
        assert!(config.show_feedback());
    }

    #[test]
    fn settings_defaults_fill_unset_flags() {
        let args = parse(&[]).unwrap().with_defaults(Level::Nat, &[Theme::Histoire]);
        assert_eq!(args.level(), Level::Nat);
        assert_eq!(args.flashcard_theme().unwrap(), Theme::Histoire);

        let args = parse(&["--level", "cr", "--theme", "institutions"])
            .unwrap()
            .with_defaults(Level::Nat, &[Theme::Histoire]);
        assert_eq!(args.level(), Level::Cr);
        assert_eq!(args.themes, vec![Theme::Institutions]);
    }

    #[test]
    fn themes_accept_repeats_and_commas() {
        let args = parse(&["--theme", "histoire,institutions", "--theme", "vie-societe"]).unwrap();
        assert_eq!(
            args.themes,
            vec![Theme::Histoire, Theme::Institutions, Theme::VieSociete]
        );
    }

    #[test]
    fn exam_hides_feedback_unless_asked() {
        let args = parse(&["--level", "NAT"]).unwrap();
        let config = args.quiz_config(Command::Exam, ExamSettings::official());
        assert_eq!(config.level(), Level::Nat);
        assert!(!config.show_feedback());

        let args = parse(&["--feedback", "--untimed", "--count", "10"]).unwrap();
        let config = args.quiz_config(Command::Exam, ExamSettings::official());
        assert!(config.show_feedback());
        assert!(!config.timed());
        assert_eq!(config.requested_count(), 10);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            parse(&["--level", "b2"]),
            Err(ArgsError::InvalidLevel { .. })
        ));
        assert!(matches!(
            parse(&["--theme", "cuisine"]),
            Err(ArgsError::InvalidTheme { .. })
        ));
        assert!(matches!(
            parse(&["--count", "beaucoup"]),
            Err(ArgsError::InvalidNumber { flag: "--count", .. })
        ));
        assert!(matches!(
            parse(&["--seed"]),
            Err(ArgsError::MissingValue { flag: "--seed" })
        ));
        assert!(matches!(parse(&["--verbose"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn flashcards_need_one_theme() {
        assert!(parse(&[]).unwrap().flashcard_theme().is_err());
        let args = parse(&["--theme", "histoire"]).unwrap();
        assert_eq!(args.flashcard_theme().unwrap(), Theme::Histoire);
    }

    #[test]
    fn data_source_picks_adapter_by_scheme() {
        assert!(question_source("https://example.org/data").is_ok());
        assert!(question_source("./data").is_ok());
    }
}
