//! YAML description of a *linear* operator pipeline.
//!
//! Example:
//! ```yaml
//! config:
//!   pretty: true
//! steps:
//!   - op: where
//!     expr: "x > 10"
//!   - op: select
//!     expr: "x * 2"
//!   - op: order_by
//!     key: identity
//!     descending: true
//!   - op: first
//!     expr: "x > 80"
//! ```
//!
//! `first`, `first_or_default`, `any`, `all` and `group_by` end a pipeline;
//! nothing may follow them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use lazyseq_core::ValueKind;
use lazyseq_operators::{OpKind, OpPlan};

use crate::error::DslError;
use crate::expr::{KeyExpr, Predicate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub config: Option<PipelineConfig>,
    pub steps: Vec<Step>,
}

/// One step as written in YAML, before its expressions are parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Step {
    Where {
        expr: String,
    },
    Select {
        expr: String,
    },
    OfType {
        kind: String,
    },
    Distinct,
    OrderBy {
        #[serde(default = "identity_key")]
        key: String,
        #[serde(default)]
        descending: bool,
    },
    GroupBy {
        #[serde(default = "identity_key")]
        key: String,
    },
    First {
        #[serde(default)]
        expr: Option<String>,
    },
    FirstOrDefault {
        #[serde(default)]
        expr: Option<String>,
    },
    Any {
        #[serde(default)]
        expr: Option<String>,
    },
    All {
        expr: String,
    },
}

fn identity_key() -> String {
    "identity".to_string()
}

/// Optional `config:` block; every field overrides the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub pretty: Option<bool>,
    pub max_input: Option<usize>,
    pub log: Option<String>,
}

/// A step with its expressions parsed and ready to run.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledStep {
    Where(Predicate),
    Select(KeyExpr),
    OfType(ValueKind),
    Distinct,
    OrderBy { key: KeyExpr, descending: bool },
    GroupBy(KeyExpr),
    First(Option<Predicate>),
    FirstOrDefault(Option<Predicate>),
    Any(Option<Predicate>),
    All(Predicate),
}

impl CompiledStep {
    pub fn kind(&self) -> OpKind {
        match self {
            CompiledStep::Where(_) => OpKind::Where,
            CompiledStep::Select(_) => OpKind::Select,
            CompiledStep::OfType(_) => OpKind::OfType,
            CompiledStep::Distinct => OpKind::Distinct,
            CompiledStep::OrderBy { descending: false, .. } => OpKind::OrderBy,
            CompiledStep::OrderBy { descending: true, .. } => OpKind::OrderByDescending,
            CompiledStep::GroupBy(_) => OpKind::GroupBy,
            CompiledStep::First(_) => OpKind::First,
            CompiledStep::FirstOrDefault(_) => OpKind::FirstOrDefault,
            CompiledStep::Any(_) => OpKind::Any,
            CompiledStep::All(_) => OpKind::All,
        }
    }

    /// Whether this step ends the pipeline.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CompiledStep::GroupBy(_)
                | CompiledStep::First(_)
                | CompiledStep::FirstOrDefault(_)
                | CompiledStep::Any(_)
                | CompiledStep::All(_)
        )
    }

    pub fn plan(&self) -> OpPlan {
        let plan = self.kind().plan();
        match self {
            CompiledStep::Where(p) | CompiledStep::All(p) => plan.with_detail(p.to_string()),
            CompiledStep::First(Some(p))
            | CompiledStep::FirstOrDefault(Some(p))
            | CompiledStep::Any(Some(p)) => plan.with_detail(p.to_string()),
            CompiledStep::Select(e) => plan.with_detail(e.to_string()),
            CompiledStep::OfType(kind) => plan.with_detail(kind.to_string()),
            CompiledStep::OrderBy { key, .. } | CompiledStep::GroupBy(key) => {
                plan.with_detail(format!("key = {key}"))
            }
            CompiledStep::Distinct
            | CompiledStep::First(None)
            | CompiledStep::FirstOrDefault(None)
            | CompiledStep::Any(None) => plan,
        }
    }
}

fn compile_step(step: &Step) -> Result<CompiledStep, DslError> {
    let optional = |expr: &Option<String>| expr.as_deref().map(Predicate::parse).transpose();
    Ok(match step {
        Step::Where { expr } => CompiledStep::Where(Predicate::parse(expr)?),
        Step::Select { expr } => CompiledStep::Select(KeyExpr::parse(expr)?),
        Step::OfType { kind } => CompiledStep::OfType(
            kind.parse::<ValueKind>()
                .map_err(|reason| DslError::expr(kind, reason))?,
        ),
        Step::Distinct => CompiledStep::Distinct,
        Step::OrderBy { key, descending } => CompiledStep::OrderBy {
            key: KeyExpr::parse(key)?,
            descending: *descending,
        },
        Step::GroupBy { key } => CompiledStep::GroupBy(KeyExpr::parse(key)?),
        Step::First { expr } => CompiledStep::First(optional(expr)?),
        Step::FirstOrDefault { expr } => CompiledStep::FirstOrDefault(optional(expr)?),
        Step::Any { expr } => CompiledStep::Any(optional(expr)?),
        Step::All { expr } => CompiledStep::All(Predicate::parse(expr)?),
    })
}

#[derive(Debug, Clone)]
pub struct ParsedPipeline {
    pub steps: Vec<CompiledStep>,
    pub config: PipelineConfig,
}

impl ParsedPipeline {
    /// One plan entry per step, in order.
    pub fn explain(&self) -> Vec<OpPlan> {
        self.steps.iter().map(CompiledStep::plan).collect()
    }

    /// Whether the pipeline can run over an unbounded source.
    pub fn is_streaming(&self) -> bool {
        self.steps
            .iter()
            .all(|s| s.kind().evaluation().supports_unbounded())
    }
}

/// Parse and validate a pipeline from YAML text.
pub fn parse_yaml_pipeline(yaml_src: &str) -> Result<ParsedPipeline, DslError> {
    let doc: Pipeline = serde_yaml::from_str(yaml_src)?;
    if doc.steps.is_empty() {
        return Err(DslError::Structure("empty pipeline".into()));
    }

    let mut steps = Vec::with_capacity(doc.steps.len());
    for (idx, step) in doc.steps.iter().enumerate() {
        if let Some(prev) = steps.last().filter(|s: &&CompiledStep| s.is_terminal()) {
            return Err(DslError::Structure(format!(
                "step {idx} follows terminal step '{}'",
                prev.kind().name()
            )));
        }
        steps.push(compile_step(step)?);
    }

    Ok(ParsedPipeline {
        steps,
        config: doc.config.unwrap_or_default(),
    })
}

/// Read a pipeline file and parse it.
pub fn load_pipeline(path: &Path) -> Result<ParsedPipeline, DslError> {
    let src = std::fs::read_to_string(path).map_err(|source| DslError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_yaml_pipeline(&src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyseq_operators::Evaluation;

    #[test]
    fn parses_linear_pipeline() {
        let yaml = r#"
steps:
  - op: where
    expr: "x > 10"
  - op: select
    expr: "x * 2"
  - op: distinct
  - op: order_by
    descending: true
"#;
        let parsed = parse_yaml_pipeline(yaml).unwrap();
        let kinds: Vec<OpKind> = parsed.steps.iter().map(CompiledStep::kind).collect();
        assert_eq!(
            kinds,
            vec![
                OpKind::Where,
                OpKind::Select,
                OpKind::Distinct,
                OpKind::OrderByDescending
            ]
        );
        assert_eq!(parsed.config, PipelineConfig::default());
        assert!(!parsed.is_streaming());
    }

    #[test]
    fn config_block() {
        let yaml = r#"
config:
  pretty: true
  max_input: 100
steps:
  - op: any
"#;
        let parsed = parse_yaml_pipeline(yaml).unwrap();
        assert_eq!(parsed.config.pretty, Some(true));
        assert_eq!(parsed.config.max_input, Some(100));
        assert_eq!(parsed.config.log, None);
        assert_eq!(parsed.steps, vec![CompiledStep::Any(None)]);
    }

    #[test]
    fn rejects_empty_pipeline() {
        let err = parse_yaml_pipeline("steps: []").unwrap_err();
        assert!(matches!(err, DslError::Structure(_)));
    }

    #[test]
    fn rejects_steps_after_terminal() {
        let yaml = r#"
steps:
  - op: first
  - op: where
    expr: "x > 1"
"#;
        let err = parse_yaml_pipeline(yaml).unwrap_err();
        assert!(err.to_string().contains("follows terminal step 'first'"), "{err}");

        let yaml = r#"
steps:
  - op: group_by
    key: "x % 2"
  - op: distinct
"#;
        assert!(parse_yaml_pipeline(yaml).is_err());
    }

    #[test]
    fn rejects_unknown_ops_and_bad_exprs() {
        assert!(matches!(
            parse_yaml_pipeline("steps:\n  - op: reverse\n").unwrap_err(),
            DslError::Yaml(_)
        ));
        assert!(matches!(
            parse_yaml_pipeline("steps:\n  - op: where\n    expr: \"y > 1\"\n").unwrap_err(),
            DslError::Expr { .. }
        ));
        assert!(matches!(
            parse_yaml_pipeline("steps:\n  - op: of_type\n    kind: tuple\n").unwrap_err(),
            DslError::Expr { .. }
        ));
    }

    #[test]
    fn explain_reports_evaluation_modes() {
        let yaml = r#"
steps:
  - op: of_type
    kind: integer
  - op: distinct
  - op: group_by
    key: "x % 3"
"#;
        let plans = parse_yaml_pipeline(yaml).unwrap().explain();
        let modes: Vec<Evaluation> = plans.iter().map(|p| p.evaluation).collect();
        assert_eq!(
            modes,
            vec![Evaluation::Streaming, Evaluation::Retaining, Evaluation::Buffering]
        );
        assert_eq!(plans[0].detail.as_deref(), Some("int"));
        assert_eq!(plans[2].detail.as_deref(), Some("key = x % 3"));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, "steps:\n  - op: all\n    expr: \"x < 7\"\n").unwrap();
        let parsed = load_pipeline(&path).unwrap();
        assert_eq!(parsed.steps.len(), 1);

        let missing = load_pipeline(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, DslError::Io { .. }));
    }
}
