//! JSON input decoding.

use lazyseq_core::prelude::{Error, Result, RunConfig, Value};

/// Decode a JSON array of scalars and enforce `cfg.max_input`.
///
/// Nested arrays and objects are rejected; they have no `Value` form. So are
/// integers above `i64::MAX`, which would otherwise decode as lossy floats.
pub fn decode_input(src: &str, cfg: &RunConfig) -> Result<Vec<Value>> {
    let trimmed = src.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if !trimmed.starts_with('[') {
        return Err(Error::Input("expected a JSON array of scalars".into()));
    }
    let raw: Vec<serde_json::Value> = serde_json::from_str(trimmed)?;
    cfg.check_input_len(raw.len())?;
    if let Some(n) = raw.iter().find_map(unsigned_overflow) {
        return Err(Error::Input(format!(
            "integer {n} is outside the signed 64-bit range"
        )));
    }
    let values = raw
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<Value>, _>>()?;
    tracing::debug!(elements = values.len(), "decoded input");
    Ok(values)
}

fn unsigned_overflow(value: &serde_json::Value) -> Option<&serde_json::Number> {
    match value {
        serde_json::Value::Number(n) if n.is_u64() && n.as_i64().is_none() => Some(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mixed_scalars() {
        let values = decode_input(r#"[1, 2.5, "a", true, null]"#, &RunConfig::default()).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::from("a"),
                Value::Bool(true),
                Value::Null
            ]
        );
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(decode_input("  \n", &RunConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_arrays_and_nesting() {
        let cfg = RunConfig::default();
        assert!(matches!(decode_input("42", &cfg), Err(Error::Input(_))));
        assert!(matches!(decode_input("[[1]]", &cfg), Err(Error::Input(_))));
        assert!(matches!(decode_input(r#"[{"a": 1}]"#, &cfg), Err(Error::Input(_))));
    }

    #[test]
    fn rejects_integers_beyond_i64() {
        let cfg = RunConfig::default();
        let err = decode_input("[1, 18446744073709551615]", &cfg).unwrap_err();
        assert!(matches!(err, Error::Input(ref msg) if msg.contains("18446744073709551615")));
        assert_eq!(
            decode_input("[9223372036854775807]", &cfg).unwrap(),
            vec![Value::Int(i64::MAX)]
        );
    }

    #[test]
    fn enforces_max_input() {
        let cfg = RunConfig {
            max_input: Some(2),
            ..RunConfig::default()
        };
        assert!(decode_input("[1, 2]", &cfg).is_ok());
        assert!(matches!(decode_input("[1, 2, 3]", &cfg), Err(Error::Config(_))));
    }
}
