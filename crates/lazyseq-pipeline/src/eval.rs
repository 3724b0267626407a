//! Runs a parsed pipeline over an in-memory list of values.
//!
//! Steps are chained as boxed `SequenceExt` adapters, so nothing is pulled
//! until the last step asks for it; buffering steps materialize on that
//! first pull exactly as the operators do when used directly.

use serde::Serialize;

use lazyseq_core::prelude::{Group, Result, Value, ValueKind};
use lazyseq_operators::SequenceExt;

use crate::dsl::{CompiledStep, ParsedPipeline};

type Values<'a> = Box<dyn Iterator<Item = Value> + 'a>;

/// Result of a pipeline run, shaped by its last step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Sequence(Vec<Value>),
    Groups(Vec<Group<Value, Value>>),
    Element(Value),
    Flag(bool),
}

impl Output {
    /// Render as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let out = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        out.map_err(|e| lazyseq_core::Error::Eval(e.to_string()))
    }
}

fn keep_kind<'a>(seq: Values<'a>, kind: ValueKind) -> Values<'a> {
    match kind {
        ValueKind::Null => Box::new(seq.of_type::<()>().select(|()| Value::Null)),
        ValueKind::Bool => Box::new(seq.of_type::<bool>().select(Value::Bool)),
        ValueKind::Int => Box::new(seq.of_type::<i64>().select(Value::Int)),
        ValueKind::Float => Box::new(seq.of_type::<f64>().select(Value::Float)),
        ValueKind::Str => Box::new(seq.of_type::<String>().select(Value::Str)),
    }
}

fn finish(step: &CompiledStep, seq: Values<'_>) -> Result<Output> {
    Ok(match step {
        CompiledStep::GroupBy(key) => Output::Groups(seq.group_by_key(|v| key.key_of(v)).collect()),
        CompiledStep::First(Some(p)) => Output::Element(seq.first_matching(|v| p.eval(v))?),
        CompiledStep::First(None) => Output::Element(seq.first_element()?),
        CompiledStep::FirstOrDefault(Some(p)) => {
            Output::Element(seq.first_or_default(|v| p.eval(v)))
        }
        CompiledStep::FirstOrDefault(None) => Output::Element(seq.first_or_default(|_| true)),
        CompiledStep::Any(Some(p)) => Output::Flag(seq.any_matching(|v| p.eval(v))),
        CompiledStep::Any(None) => Output::Flag(seq.any_element()),
        CompiledStep::All(p) => Output::Flag(seq.all_matching(|v| p.eval(v))),
        other => {
            return Err(lazyseq_core::Error::Eval(format!(
                "'{}' does not end a pipeline",
                other.kind().name()
            )))
        }
    })
}

/// Evaluate `pipeline` over `input`.
pub fn run(pipeline: &ParsedPipeline, input: Vec<Value>) -> Result<Output> {
    tracing::debug!(steps = pipeline.steps.len(), input = input.len(), "running pipeline");

    let mut seq: Values<'_> = Box::new(input.into_iter());
    for step in &pipeline.steps {
        seq = match step {
            CompiledStep::Where(p) => Box::new(seq.where_matching(move |v| p.eval(v))),
            CompiledStep::Select(e) => Box::new(seq.select(move |v| e.key_of(&v))),
            CompiledStep::OfType(kind) => keep_kind(seq, *kind),
            CompiledStep::Distinct => Box::new(seq.distinct()),
            CompiledStep::OrderBy { key, descending: false } => {
                Box::new(seq.order_by(move |v| key.key_of(v)))
            }
            CompiledStep::OrderBy { key, descending: true } => {
                Box::new(seq.order_by_descending(move |v| key.key_of(v)))
            }
            terminal => return finish(terminal, seq),
        };
    }

    let out: Vec<Value> = seq.collect();
    tracing::debug!(output = out.len(), "pipeline finished");
    Ok(Output::Sequence(out))
}
