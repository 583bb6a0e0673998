mod catalog;
mod exam;
mod ids;
mod prepared;
mod question;
mod session;

pub use catalog::{CatalogError, Level, Theme, ThemeFilter};
pub use exam::{ExamSettings, ExamSettingsError};
pub use ids::{QuestionId, SessionId};
pub use prepared::{OptionIndex, PreparedQuestion};
pub use question::{DISTRACTOR_COUNT, OPTION_COUNT, QuestionError, QuestionRecord};
pub use session::{QuizConfig, QuizMode};
