#![forbid(unsafe_code)]
//! lazyseq-pipeline: linear pipelines of lazyseq operators over `Value`s.
//!
//! Design:
//! - A tiny YAML DSL (`dsl::yaml`) names one operator per step; its callbacks
//!   are written in a small `x OP literal` expression language (`expr`).
//! - Parsing validates the whole pipeline up front: expressions, value kinds,
//!   and that terminal steps come last.
//! - `eval::run` chains the steps as boxed `SequenceExt` adapters, so the
//!   deferred-execution behavior of each operator is preserved end to end.

pub mod dsl;
pub mod error;
pub mod eval;
pub mod expr;
pub mod input;

pub use dsl::{load_pipeline, parse_yaml_pipeline, CompiledStep, ParsedPipeline, PipelineConfig};
pub use error::DslError;
pub use eval::{run, Output};
pub use expr::{KeyExpr, Predicate};
pub use input::decode_input;
