use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse Rust source: {0}")]
    Parse(#[from] syn::Error),

    #[error("failed to parse edit plan {path}: {message}")]
    PlanParse { path: PathBuf, message: String },

    #[error("invalid pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
}

impl Error {
    pub(crate) fn pattern(pattern: impl Into<String>, message: impl ToString) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
