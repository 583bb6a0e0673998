use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use civique_core::model::{ExamSettings, ExamSettingsError, Level, Theme};

/// Default location of the question banks.
pub const DEFAULT_DATA_SOURCE: &str = "data";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error(transparent)]
    Exam(#[from] ExamSettingsError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExamConfig {
    pub question_count: u32,
    pub time_minutes: u32,
    pub pass_threshold: f64,
    pub pass_score: u32,
    pub low_time_warning_secs: u32,
}

impl ExamConfig {
    /// # Errors
    ///
    /// Returns `ExamSettingsError` when the values are out of range.
    pub fn validate(&self) -> Result<ExamSettings, ExamSettingsError> {
        ExamSettings::new(
            self.question_count,
            self.time_minutes,
            self.pass_threshold,
            self.pass_score,
            self.low_time_warning_secs,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory or `http(s)://` base URL.
    pub source: String,
}

/// Selection used when the command line names no level or theme.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub level: Level,
    pub themes: Vec<Theme>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub exam: ExamConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Settings after validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub exam: ExamSettings,
    pub data_source: String,
    pub default_level: Level,
    pub default_themes: Vec<Theme>,
}

/// Load `civique.toml` (optional) and `CIVIQUE__*` variables over the
/// official exam defaults.
///
/// # Errors
///
/// Returns `SettingsError` if a source cannot be read or the exam values are
/// invalid.
pub fn load_settings() -> Result<Settings, SettingsError> {
    let builder = with_defaults(Config::builder())?
        .add_source(File::with_name("civique").required(false))
        .add_source(
            Environment::with_prefix("CIVIQUE")
                .separator("__")
                .try_parsing(true),
        );
    resolve(builder.build()?)
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, SettingsError> {
    let official = ExamSettings::official();
    Ok(builder
        .set_default("exam.question_count", i64::from(official.question_count()))?
        .set_default("exam.time_minutes", i64::from(official.time_minutes()))?
        .set_default("exam.pass_threshold", official.pass_threshold())?
        .set_default("exam.pass_score", i64::from(official.pass_score()))?
        .set_default(
            "exam.low_time_warning_secs",
            i64::from(official.low_time_warning_secs()),
        )?
        .set_default("data.source", DEFAULT_DATA_SOURCE)?)
}

fn resolve(config: Config) -> Result<Settings, SettingsError> {
    let raw: AppSettings = config.try_deserialize()?;
    let exam = raw.exam.validate()?;
    Ok(Settings {
        exam,
        data_source: raw.data.source,
        default_level: raw.defaults.level,
        default_themes: raw.defaults.themes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, SettingsError> {
        let builder = with_defaults(Config::builder())?
            .add_source(File::from_str(toml, FileFormat::Toml));
        resolve(builder.build()?)
    }

    #[test]
    fn defaults_are_the_official_exam() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.exam, ExamSettings::official());
        assert_eq!(settings.data_source, DEFAULT_DATA_SOURCE);
        assert_eq!(settings.default_level, Level::Csp);
        assert!(settings.default_themes.is_empty());
    }

    #[test]
    fn defaults_section_names_level_and_themes() {
        let settings =
            from_toml("[defaults]\nlevel = \"nat\"\nthemes = [\"histoire\", \"vie-societe\"]\n")
                .unwrap();
        assert_eq!(settings.default_level, Level::Nat);
        assert_eq!(settings.default_themes, vec![Theme::Histoire, Theme::VieSociete]);
    }

    #[test]
    fn unknown_default_level_is_a_load_error() {
        let err = from_toml("[defaults]\nlevel = \"b2\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::Load(_)));
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = from_toml(
            "[exam]\nquestion_count = 20\npass_score = 16\n\n[data]\nsource = \"https://example.org/data\"\n",
        )
        .unwrap();
        assert_eq!(settings.exam.question_count(), 20);
        assert_eq!(settings.exam.pass_score(), 16);
        assert_eq!(settings.exam.time_minutes(), 45);
        assert_eq!(settings.data_source, "https://example.org/data");
    }

    #[test]
    fn invalid_exam_values_are_rejected() {
        let err = from_toml("[exam]\npass_score = 41\n").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Exam(ExamSettingsError::InvalidPassScore { .. })
        ));
    }
}
