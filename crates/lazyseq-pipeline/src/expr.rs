//! Tiny expression language for pipeline callbacks.
//!
//! Every expression is written against the element placeholder `x`:
//! - predicates: `x OP literal`, OP in `== != < <= > >=`
//! - arithmetic: `x OP literal`, OP in `+ - * / %`
//! - projections (select and key selectors): `identity` (or `x`), `kind`,
//!   or an arithmetic expression
//!
//! Literals: `null`, `true`/`false`, integers, floats, quoted or bare strings.

use std::cmp::Ordering;
use std::fmt;

use lazyseq_core::Value;

use crate::error::DslError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    // Two-char operators first so `<=` is not read as `<`.
    const ALL: [(&'static str, CmpOp); 6] = [
        ("==", CmpOp::Eq),
        ("!=", CmpOp::Ne),
        ("<=", CmpOp::Le),
        (">=", CmpOp::Ge),
        ("<", CmpOp::Lt),
        (">", CmpOp::Gt),
    ];

    fn symbol(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(s, _)| *s)
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl ArithOp {
    const ALL: [(char, ArithOp); 5] = [
        ('+', ArithOp::Add),
        ('-', ArithOp::Sub),
        ('*', ArithOp::Mul),
        ('/', ArithOp::Div),
        ('%', ArithOp::Rem),
    ];

    fn symbol(self) -> char {
        Self::ALL
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(c, _)| *c)
            .unwrap_or('?')
    }
}

/// `x OP literal` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub op: CmpOp,
    pub literal: Value,
}

/// `x OP literal` arithmetic over numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Arith {
    pub op: ArithOp,
    pub literal: Value,
}

/// Projection used by `select` and as the key selector of `order_by` / `group_by`.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyExpr {
    Identity,
    Kind,
    Arith(Arith),
}

/// Strip the `x` placeholder and return what follows it.
fn after_placeholder(expr: &str) -> Result<&str, DslError> {
    let rest = expr
        .trim()
        .strip_prefix('x')
        .ok_or_else(|| DslError::expr(expr, "expression must start with 'x'"))?;
    if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
        return Err(DslError::expr(expr, "the only variable is 'x'"));
    }
    Ok(rest.trim_start())
}

/// Parse a literal like `80`, `2.5`, `true`, `null`, `'apple'` or `apple`.
pub fn parse_literal(text: &str) -> Result<Value, DslError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DslError::expr(text, "missing literal"));
    }
    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return Ok(Value::Str(text[1..text.len() - 1].to_string()));
        }
    }
    Ok(match text {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(i) = text.parse::<i64>() {
                Value::Int(i)
            } else if let Ok(f) = text.parse::<f64>() {
                Value::Float(f)
            } else {
                Value::Str(text.to_string())
            }
        }
    })
}

impl Predicate {
    pub fn parse(expr: &str) -> Result<Self, DslError> {
        let rest = after_placeholder(expr)?;
        for (symbol, op) in CmpOp::ALL {
            if let Some(lit) = rest.strip_prefix(symbol) {
                let literal = parse_literal(lit).map_err(|_| DslError::expr(expr, "missing literal"))?;
                return Ok(Self { op, literal });
            }
        }
        Err(DslError::expr(
            expr,
            "expected one of == != < <= > >= after 'x'",
        ))
    }

    /// Evaluate against one element.
    ///
    /// Nulls only compare equal to null. Ints and floats compare numerically;
    /// other mixed kinds are unequal and unordered.
    pub fn eval(&self, value: &Value) -> bool {
        match compare(value, &self.literal) {
            Some(ord) => match self.op {
                CmpOp::Eq => ord == Ordering::Equal,
                CmpOp::Ne => ord != Ordering::Equal,
                CmpOp::Lt => ord == Ordering::Less,
                CmpOp::Le => ord != Ordering::Greater,
                CmpOp::Gt => ord == Ordering::Greater,
                CmpOp::Ge => ord != Ordering::Less,
            },
            None => self.op == CmpOp::Ne,
        }
    }
}

fn compare(value: &Value, literal: &Value) -> Option<Ordering> {
    use Value::*;
    match (value, literal) {
        (Null, Null) => Some(Ordering::Equal),
        (Null, _) | (_, Null) => None,
        (Bool(a), Bool(b)) => Some(a.cmp(b)),
        (Int(a), Int(b)) => Some(a.cmp(b)),
        (Str(a), Str(b)) => Some(a.cmp(b)),
        _ => match (value.as_f64(), literal.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    }
}

impl Arith {
    pub fn parse(expr: &str) -> Result<Self, DslError> {
        let rest = after_placeholder(expr)?;
        let mut chars = rest.chars();
        let symbol = chars
            .next()
            .ok_or_else(|| DslError::expr(expr, "expected an operator after 'x'"))?;
        let op = ArithOp::ALL
            .iter()
            .find(|(c, _)| *c == symbol)
            .map(|(_, op)| *op)
            .ok_or_else(|| DslError::expr(expr, "expected one of + - * / % after 'x'"))?;

        let literal = parse_literal(chars.as_str())?;
        match (&literal, op) {
            (Value::Int(0), ArithOp::Div | ArithOp::Rem) => {
                Err(DslError::expr(expr, "division by zero"))
            }
            (Value::Float(f), ArithOp::Div | ArithOp::Rem) if *f == 0.0 => {
                Err(DslError::expr(expr, "division by zero"))
            }
            (Value::Int(_) | Value::Float(_), _) => Ok(Self { op, literal }),
            _ => Err(DslError::expr(expr, "arithmetic needs a numeric literal")),
        }
    }

    /// Apply to one element.
    ///
    /// Non-numeric elements and integer overflow produce `null`. Integer `/`
    /// truncates; `%` is Euclidean so results are never negative.
    pub fn apply(&self, value: &Value) -> Value {
        match (value, &self.literal) {
            (Value::Int(a), Value::Int(b)) => {
                let out = match self.op {
                    ArithOp::Add => a.checked_add(*b),
                    ArithOp::Sub => a.checked_sub(*b),
                    ArithOp::Mul => a.checked_mul(*b),
                    ArithOp::Div => a.checked_div(*b),
                    ArithOp::Rem => a.checked_rem_euclid(*b),
                };
                out.map(Value::Int).unwrap_or(Value::Null)
            }
            _ => match (value.as_f64(), self.literal.as_f64()) {
                (Some(a), Some(b)) => Value::Float(match self.op {
                    ArithOp::Add => a + b,
                    ArithOp::Sub => a - b,
                    ArithOp::Mul => a * b,
                    ArithOp::Div => a / b,
                    ArithOp::Rem => a.rem_euclid(b),
                }),
                _ => Value::Null,
            },
        }
    }
}

impl KeyExpr {
    pub fn parse(expr: &str) -> Result<Self, DslError> {
        match expr.trim() {
            "identity" | "x" => Ok(KeyExpr::Identity),
            "kind" => Ok(KeyExpr::Kind),
            _ => Arith::parse(expr).map(KeyExpr::Arith),
        }
    }

    pub fn key_of(&self, value: &Value) -> Value {
        match self {
            KeyExpr::Identity => value.clone(),
            KeyExpr::Kind => Value::Str(value.kind().to_string()),
            KeyExpr::Arith(arith) => arith.apply(value),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x {} {}", self.op.symbol(), self.literal)
    }
}

impl fmt::Display for Arith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x {} {}", self.op.symbol(), self.literal)
    }
}

impl fmt::Display for KeyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyExpr::Identity => f.write_str("identity"),
            KeyExpr::Kind => f.write_str("kind"),
            KeyExpr::Arith(a) => a.fmt(f),
        }
    }
}
