use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Every page was empty or whitespace-only.
    #[error("the document contains no extractable text")]
    EmptyDocument,

    #[error("page extraction failed: {0}")]
    Extraction(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("answer generation timed out after {0:?}")]
    AnswerTimeout(Duration),

    #[error("answer generation failed: {0}")]
    Generation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
