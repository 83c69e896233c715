//! WHERE input shapes and their normalization into SQL fragments.
//!
//! Every shape normalizes to one fragment of the form
//! `` `column` OPERATOR literal ``; the mapping form joins its per-column
//! fragments with ` AND `.
//!
//! # Example
//! ```ignore
//! use chaindb::{Cond, Where};
//!
//! Where::map([
//!     ("level", Cond::op(">", 8)),
//!     ("mobile", Cond::null()),
//!     ("gender", Cond::eq("m")),
//! ]);
//! Where::equals("gender", "m");
//! Where::compare("level", ">", 8);
//! Where::is_null("delete_time");
//! ```

use crate::error::{DbError, DbResult};
use crate::value::Value;

/// Per-column condition in the mapping form.
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    /// `column = value`, or `column IS null` when the value is `Null`.
    Value(Value),
    /// `column <op> value`
    Pair(String, Value),
}

impl Cond {
    pub fn eq(value: impl Into<Value>) -> Self {
        Cond::Value(value.into())
    }

    pub fn op(operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Cond::Pair(operator.into(), value.into())
    }

    pub fn null() -> Self {
        Cond::Value(Value::Null)
    }

    fn operator_and_value(&self) -> (&str, &Value) {
        match self {
            Cond::Value(v @ Value::Null) => ("IS", v),
            Cond::Value(v) => ("=", v),
            Cond::Pair(op, v) => (op.as_str(), v),
        }
    }
}

impl From<Value> for Cond {
    fn from(v: Value) -> Self {
        Cond::Value(v)
    }
}

/// One `where` invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    /// Column → condition entries, in caller order.
    ByMap(Vec<(String, Cond)>),
    /// `column = value` (`IS null` when the value is `Null`).
    Equals(String, Value),
    /// `column <operator> value`
    Compare(String, String, Value),
    /// `column IS null`
    IsNull(String),
}

impl Where {
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Cond)>,
    {
        Where::ByMap(entries.into_iter().map(|(k, c)| (k.into(), c)).collect())
    }

    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Where::Equals(column.into(), value.into())
    }

    pub fn compare(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Where::Compare(column.into(), operator.into(), value.into())
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Where::IsNull(column.into())
    }

    /// Two-argument positional form: `(column, arg)`.
    ///
    /// A `Null` argument, or the text `IS` in any case, means `IS null`;
    /// anything else is an implicit equality.
    pub fn pair(column: impl Into<String>, arg: impl Into<Value>) -> Self {
        let column = column.into();
        match arg.into() {
            Value::Null => Where::IsNull(column),
            Value::Text(op) if op.eq_ignore_ascii_case("IS") => Where::IsNull(column),
            v => Where::Equals(column, v),
        }
    }

    /// Mapping form from a JSON object.
    ///
    /// Scalar values map to [`Cond::Value`]; a `[op, value]` array maps to
    /// [`Cond::Pair`]. An array without a second element is rejected with
    /// "where format invalid".
    pub fn from_json(object: &serde_json::Value) -> DbResult<Self> {
        let serde_json::Value::Object(map) = object else {
            return Err(DbError::usage("where format invalid: expected an object"));
        };

        let mut entries = Vec::with_capacity(map.len());
        for (column, raw) in map {
            let cond = match raw {
                serde_json::Value::Array(items) => {
                    let (Some(op), Some(val)) = (items.first(), items.get(1)) else {
                        return Err(DbError::usage(format!(
                            "where format invalid for column '{column}'"
                        )));
                    };
                    let op = match op {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    let val = Value::from_json_scalar(val).ok_or_else(|| {
                        DbError::usage(format!("where format invalid for column '{column}'"))
                    })?;
                    Cond::Pair(op, val)
                }
                scalar => Cond::Value(Value::from_json_scalar(scalar).ok_or_else(|| {
                    DbError::usage(format!("where format invalid for column '{column}'"))
                })?),
            };
            entries.push((column.clone(), cond));
        }
        Ok(Where::ByMap(entries))
    }

    /// Render this invocation into a single fragment.
    pub fn to_fragment(&self) -> String {
        match self {
            Where::ByMap(entries) => entries
                .iter()
                .map(|(column, cond)| {
                    let (op, val) = cond.operator_and_value();
                    render(column, op, val)
                })
                .collect::<Vec<_>>()
                .join(" AND "),
            Where::Equals(column, Value::Null) | Where::IsNull(column) => {
                render(column, "IS", &Value::Null)
            }
            Where::Equals(column, val) => render(column, "=", val),
            Where::Compare(column, op, val) => render(column, op, val),
        }
    }
}

fn render(column: &str, operator: &str, value: &Value) -> String {
    format!("`{column}` {operator} {}", value.to_sql_literal())
}
