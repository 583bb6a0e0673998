//! Adapters reading the published JSON bank files.
//!
//! Layout: `<root>/<level>/<theme>.json`, one file per level and theme.

mod file_bank;
mod http_bank;
mod mapping;

pub use file_bank::FileQuestionBank;
pub use http_bank::HttpQuestionBank;
pub use mapping::parse_bank;

use civique_core::model::{Level, Theme};

/// Relative path of a bank file inside the data root.
#[must_use]
pub fn bank_path(level: Level, theme: Theme) -> String {
    format!("{}/{}", level.slug(), theme.file_name())
}
