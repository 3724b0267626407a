use thiserror::Error;

/// Canonical result for core and the layers above it.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the operators themselves.
///
/// Only the "exactly one element required" operators can fail; `FirstOrDefault`,
/// `Any` and `All` report absence through their return value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeqError {
    #[error("no element satisfied the predicate ({scanned} elements scanned)")]
    NoMatch { scanned: usize },

    #[error("sequence contains no elements")]
    Empty,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Evaluation error: {0}")]
    Eval(String),

    #[error(transparent)]
    Seq(#[from] SeqError),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Input(e.to_string())
    }
}
