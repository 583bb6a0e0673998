use thiserror::Error;

use crate::model::{CatalogError, ExamSettingsError, QuestionError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    ExamSettings(#[from] ExamSettingsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_layer_errors_transparently() {
        let err: Error = "b2".parse::<crate::model::Level>().unwrap_err().into();
        assert!(matches!(err, Error::Catalog(CatalogError::UnknownLevel(_))));
        assert_eq!(err.to_string(), "unknown level: b2");
    }
}
