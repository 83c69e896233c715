//! Scalar values embedded into SQL text or read back from rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scalar value.
///
/// Values are rendered into SQL as literals (see [`Value::to_sql_literal`]);
/// there is no parameter binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            Value::Bool(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Render this value as a SQL literal.
    ///
    /// Text is wrapped in single quotes verbatim (no escaping), `Null` is the
    /// bare token `null`. SQL has no NaN or infinity literal, so non-finite
    /// floats render as `null` too.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => if *v { "1" } else { "0" }.to_string(),
            Value::Int(v) => v.to_string(),
            Value::UInt(v) => v.to_string(),
            Value::Float(v) if !v.is_finite() => "null".to_string(),
            Value::Float(v) => v.to_string(),
            Value::Text(s) => format!("'{s}'"),
            Value::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::Int(v) => serde_json::Value::from(*v),
            Value::UInt(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Value::from(*v),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => serde_json::Value::from(b.clone()),
        }
    }

    /// Convert a JSON scalar. Arrays and objects are not scalars and yield `None`.
    pub(crate) fn from_json_scalar(v: &serde_json::Value) -> Option<Self> {
        match v {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_u64().map(Value::UInt))
                .or_else(|| n.as_f64().map(Value::Float)),
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

/// Plain rendering without quotes; `Null` renders as an empty string.
///
/// This is the form used for map keys in [`crate::KeyedMap`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{}", i64::from(*v)),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_int!(Int: i8, i16, i32, i64, u8, u16, u32);
impl_from_int!(UInt: u64);
impl_from_int!(Float: f32, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals() {
        assert_eq!(Value::Null.to_sql_literal(), "null");
        assert_eq!(Value::from("zs").to_sql_literal(), "'zs'");
        assert_eq!(Value::from(8).to_sql_literal(), "8");
        assert_eq!(Value::from(2.5).to_sql_literal(), "2.5");
        assert_eq!(Value::from(true).to_sql_literal(), "1");
        assert_eq!(Value::from(None::<i32>).to_sql_literal(), "null");
        assert_eq!(Value::from(vec![0xAB_u8, 0x01]).to_sql_literal(), "X'AB01'");
    }

    #[test]
    fn non_finite_floats_render_as_null() {
        assert_eq!(Value::from(f64::NAN).to_sql_literal(), "null");
        assert_eq!(Value::from(f64::INFINITY).to_sql_literal(), "null");
        assert_eq!(Value::from(f32::NEG_INFINITY).to_sql_literal(), "null");
        assert_eq!(Value::from(-0.5).to_sql_literal(), "-0.5");
    }

    #[test]
    fn text_is_not_escaped() {
        assert_eq!(Value::from("it's").to_sql_literal(), "'it's'");
    }

    #[test]
    fn display_is_unquoted() {
        assert_eq!(Value::from("a").to_string(), "a");
        assert_eq!(Value::from(1_i64).to_string(), "1");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn json_scalars() {
        assert_eq!(
            Value::from_json_scalar(&serde_json::json!(8)),
            Some(Value::Int(8))
        );
        assert_eq!(
            Value::from_json_scalar(&serde_json::json!("x")),
            Some(Value::Text("x".into()))
        );
        assert_eq!(Value::from_json_scalar(&serde_json::json!([1])), None);
    }
}
