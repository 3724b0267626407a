//! Operator planning surfaces: `Evaluation` and `OpPlan`.
//!
//! These describe how an operator consumes its source; they carry no data and
//! exist so pipelines can explain themselves before running.

use serde::{Deserialize, Serialize};

/// How an operator pulls from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// One upstream pull per downstream pull at most; nothing retained.
    Streaming,
    /// Lazy output, but keeps state that grows with the distinct inputs seen.
    Retaining,
    /// Consumes the whole source on the first pull before yielding anything.
    Buffering,
    /// Produces a single value; stops pulling as soon as the answer is known.
    Terminal,
}

impl Evaluation {
    /// Whether the operator can sit on an infinite source.
    pub fn supports_unbounded(self) -> bool {
        !matches!(self, Evaluation::Buffering)
    }
}

/// Every operator the library provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Where,
    Select,
    OfType,
    First,
    FirstOrDefault,
    GroupBy,
    OrderBy,
    OrderByDescending,
    Distinct,
    Any,
    All,
}

impl OpKind {
    /// Stable operator name.
    pub fn name(self) -> &'static str {
        match self {
            OpKind::Where => "where",
            OpKind::Select => "select",
            OpKind::OfType => "of_type",
            OpKind::First => "first",
            OpKind::FirstOrDefault => "first_or_default",
            OpKind::GroupBy => "group_by",
            OpKind::OrderBy => "order_by",
            OpKind::OrderByDescending => "order_by_descending",
            OpKind::Distinct => "distinct",
            OpKind::Any => "any",
            OpKind::All => "all",
        }
    }

    pub fn evaluation(self) -> Evaluation {
        match self {
            OpKind::Where | OpKind::Select | OpKind::OfType => Evaluation::Streaming,
            OpKind::Distinct => Evaluation::Retaining,
            OpKind::GroupBy | OpKind::OrderBy | OpKind::OrderByDescending => {
                Evaluation::Buffering
            }
            OpKind::First | OpKind::FirstOrDefault | OpKind::Any | OpKind::All => {
                Evaluation::Terminal
            }
        }
    }

    pub fn plan(self) -> OpPlan {
        OpPlan::new(self)
    }
}

/// Operator plan: name and evaluation mode, plus a free-form detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpPlan {
    pub kind: OpKind,
    pub name: String,
    pub evaluation: Evaluation,

    /// Optional description of the callbacks (e.g. the parsed predicate).
    pub detail: Option<String>,
}

impl OpPlan {
    pub fn new(kind: OpKind) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            evaluation: kind.evaluation(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffering_ops_reject_unbounded_sources() {
        for kind in [OpKind::GroupBy, OpKind::OrderBy, OpKind::OrderByDescending] {
            assert!(!kind.evaluation().supports_unbounded(), "{kind:?}");
        }
        for kind in [OpKind::Where, OpKind::Select, OpKind::Distinct, OpKind::Any] {
            assert!(kind.evaluation().supports_unbounded(), "{kind:?}");
        }
    }

    #[test]
    fn plan_carries_name_and_detail() {
        let plan = OpKind::FirstOrDefault.plan().with_detail("x > 1000");
        assert_eq!(plan.name, "first_or_default");
        assert_eq!(plan.evaluation, Evaluation::Terminal);
        assert_eq!(plan.detail.as_deref(), Some("x > 1000"));
    }
}
