//! Ordered column/value rows and keyed result maps.

use crate::error::{DbError, DbResult};
use crate::value::Value;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// An ordered mapping from column name to value.
///
/// Rows are returned by queries and accepted as `insert` / `update`
/// payloads. Setting a column that already exists replaces its value in
/// place, so column order is the order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column (builder style).
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column, replacing an existing value with the same name.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.position(&column) {
            Some(idx) => self.values[idx] = value,
            None => {
                self.columns.push(column);
                self.values.push(value);
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).map(|idx| &self.values[idx])
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Keep only the listed columns, in this row's column order.
    pub fn retain_columns(&self, keep: &[&str]) -> Row {
        self.iter()
            .filter(|(col, _)| keep.contains(col))
            .map(|(col, val)| (col.to_string(), val.clone()))
            .collect()
    }

    /// Deserialize this row into `T` through its JSON object form.
    pub fn decode<T: DeserializeOwned>(&self) -> DbResult<T> {
        let object: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(col, val)| (col.to_string(), val.to_json()))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| DbError::decode("*", e.to_string()))
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (col, val) in self.iter() {
            map.serialize_entry(col, val)?;
        }
        map.end()
    }
}

/// Build a [`Row`] from `column => value` pairs.
///
/// ```ignore
/// let row = chaindb::row! { "name" => "zs", "age" => 20 };
/// ```
#[macro_export]
macro_rules! row {
    () => { $crate::Row::new() };
    ($($col:expr => $val:expr),+ $(,)?) => {{
        let mut row = $crate::Row::new();
        $( row.insert($col, $val); )+
        row
    }};
}

/// A map keyed by the plain text of a key column, preserving first-seen key
/// order. Inserting an existing key overwrites its value (last row wins).
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for KeyedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> KeyedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.entries[idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Serialize> Serialize for KeyedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
