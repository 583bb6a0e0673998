#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{FileQuestionBank, HttpQuestionBank};
pub use repository::{InMemoryQuestionBank, QuestionBankSource, StorageError};
