//! Tolerant serde deserializers for scraped API documents.
//!
//! The remote API serializes 64-bit ids and permission bitmasks as JSON
//! strings, while scraped dumps occasionally carry numbers where strings are
//! expected (and vice versa), or booleans as `"true"`/`"false"`. These
//! helpers coerce any scalar to the target type, falling back to the zero
//! value rather than failing the whole record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|i| i.max(0) as u64))
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Deserialize a u64 from a number or string, defaulting to 0.
pub fn u64_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_u64(&value).unwrap_or(0))
}

/// Deserialize an optional u64 from a number, string, or null.
///
/// Unparseable values become `None`, never an error.
pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_u64(&value))
}

/// Deserialize an i64 from a number or string, defaulting to 0.
pub fn i64_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value).unwrap_or(0))
}

/// Deserialize a bool from a bool or a `"true"`/`"false"` string, defaulting
/// to false.
pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::u64_or_zero")]
        id: u64,
        #[serde(default, deserialize_with = "super::opt_u64")]
        parent: Option<u64>,
        #[serde(default, deserialize_with = "super::i64_or_zero")]
        position: i64,
        #[serde(default, deserialize_with = "super::bool_or_false")]
        hoist: bool,
    }

    #[test]
    fn test_u64_from_string() {
        let p: Probe = serde_json::from_str(r#"{"id": "123456789012345678"}"#).unwrap();
        assert_eq!(p.id, 123456789012345678);
    }

    #[test]
    fn test_u64_from_number() {
        let p: Probe = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(p.id, 42);
    }

    #[test]
    fn test_u64_garbage_defaults_to_zero() {
        let p: Probe = serde_json::from_str(r#"{"id": "not a number"}"#).unwrap();
        assert_eq!(p.id, 0);
    }

    #[test]
    fn test_opt_u64_null_is_none() {
        let p: Probe = serde_json::from_str(r#"{"parent": null}"#).unwrap();
        assert_eq!(p.parent, None);
        let p: Probe = serde_json::from_str(r#"{"parent": "99"}"#).unwrap();
        assert_eq!(p.parent, Some(99));
    }

    #[test]
    fn test_i64_from_float() {
        let p: Probe = serde_json::from_str(r#"{"position": 3.0}"#).unwrap();
        assert_eq!(p.position, 3);
    }

    #[test]
    fn test_bool_from_string() {
        let p: Probe = serde_json::from_str(r#"{"hoist": "True"}"#).unwrap();
        assert!(p.hoist);
        let p: Probe = serde_json::from_str(r#"{"hoist": "no"}"#).unwrap();
        assert!(!p.hoist);
    }
}
