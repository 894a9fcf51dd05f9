use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by locale registration and message loading.
///
/// A missing message key or a missing template argument is never an error:
/// lookups degrade to the raw key and unknown placeholders stay in the output.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("the locale code `{0}` is invalid")]
    InvalidLocaleCode(String),

    #[error("the locale `{0}` was not found")]
    LocaleNotFound(String),

    #[error("the locale file {} is invalid: {reason}", path.display())]
    InvalidLocaleFile { path: PathBuf, reason: String },

    #[error("unexpected value: {0}")]
    UnexpectedValue(String),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, I18nError>;
