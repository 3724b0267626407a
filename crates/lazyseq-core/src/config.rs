//! Run configuration for the pipeline and CLI layers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// `tracing-subscriber` filter directive (e.g. `warn`, `lazyseq_operators=trace`).
    pub log_filter: String,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Reject inputs with more elements than this. `None` means unbounded.
    pub max_input: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            log_filter: "warn".to_string(),
            pretty: false,
            max_input: None,
        }
    }
}

impl RunConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LAZYSEQ_LOG`: log filter directive
    /// - `LAZYSEQ_PRETTY`: `1`/`true` to pretty-print output
    /// - `LAZYSEQ_MAX_INPUT`: maximum number of input elements
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RunConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = lookup("LAZYSEQ_LOG") {
            if !s.trim().is_empty() {
                cfg.log_filter = s;
            }
        }

        if let Some(s) = lookup("LAZYSEQ_PRETTY") {
            cfg.pretty = matches!(s.trim(), "1" | "true" | "yes");
        }

        if let Some(s) = lookup("LAZYSEQ_MAX_INPUT") {
            if let Ok(v) = s.trim().parse::<usize>() {
                cfg.max_input = Some(v);
            }
        }

        cfg
    }

    /// Check an input length against `max_input`.
    pub fn check_input_len(&self, len: usize) -> crate::Result<()> {
        match self.max_input {
            Some(max) if len > max => Err(crate::Error::Config(format!(
                "input has {len} elements, limit is {max}"
            ))),
            _ => Ok(()),
        }
    }
}
