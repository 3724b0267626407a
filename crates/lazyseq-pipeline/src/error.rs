use thiserror::Error;

#[derive(Debug, Error)]
pub enum DslError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cannot read pipeline '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid expression '{expr}': {reason}")]
    Expr { expr: String, reason: String },

    #[error("invalid pipeline: {0}")]
    Structure(String),
}

impl DslError {
    pub(crate) fn expr(expr: &str, reason: impl Into<String>) -> Self {
        DslError::Expr {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<DslError> for lazyseq_core::Error {
    fn from(e: DslError) -> Self {
        lazyseq_core::Error::Config(e.to_string())
    }
}
