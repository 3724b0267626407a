#![forbid(unsafe_code)]
//! lazyseq-core: shared types for the lazyseq operator library.
//!
//! - `error`: the `SeqError` raised by operators and the crate-level `Error`.
//! - `value`: a tagged scalar union plus the `InstanceOf` capability used by
//!   type filtering.
//! - `group`: the materialized key/elements pair produced by grouping.
//! - `config`: run configuration for the pipeline/CLI layers.
//!
//! Nothing here iterates; the operators live in `lazyseq-operators`.

pub mod config;
pub mod error;
pub mod group;
pub mod prelude;
pub mod value;

pub use error::{Error, Result, SeqError};
pub use group::Group;
pub use value::{InstanceOf, Value, ValueKind};
