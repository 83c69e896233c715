//! Statement builder: accumulated table/fields/where/order/limit state and
//! its rendering into SQL text.
//!
//! Rendering is pure. `build_sql` can be called any number of times and
//! returns the same text as long as no further chain calls happen.
//!
//! ## Design
//!
//! - Fields, WHERE fragments and ORDER BY items are ordered sets: merging the
//!   same fragment twice is a no-op, first occurrence keeps its position.
//! - Errors from chain calls (empty table name, malformed where input) are
//!   deferred and reported by the next render.
//! - Safe defaults: UPDATE and DELETE require at least one WHERE fragment.

use crate::condition::Where;
use crate::error::{DbError, DbResult};
use crate::merge::{Delimiter, Fragments};
use crate::row::Row;

/// LIMIT clause state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// `LIMIT count`
    Count(u64),
    /// `LIMIT offset, count`
    Range(u64, u64),
}

impl Limit {
    fn render(self) -> String {
        match self {
            Limit::Count(n) => n.to_string(),
            Limit::Range(offset, count) => format!("{offset}, {count}"),
        }
    }
}

/// Accumulated statement state for one builder chain.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    table: String,
    prefix: String,
    fields: Fragments,
    wheres: Fragments,
    orders: Fragments,
    limit: Option<Limit>,
    build_error: Option<String>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder whose [`Builder::name`] prepends `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    // ==================== Chain calls ====================

    /// Set the fully qualified table name.
    pub fn table(mut self, name: &str) -> Self {
        self.set_table(name.to_string());
        self
    }

    /// Set the table from a logical name, prepending the configured prefix.
    pub fn name(mut self, name: &str) -> Self {
        if name.is_empty() {
            self.set_table(String::new());
        } else {
            self.set_table(format!("{}{name}", self.prefix));
        }
        self
    }

    /// Merge a comma-separated field list.
    pub fn field(mut self, fields: &str) -> Self {
        self.fields.merge(fields, Delimiter::Comma);
        self
    }

    /// Merge one WHERE invocation.
    pub fn and_where(mut self, cond: Where) -> Self {
        self.wheres.merge(&cond.to_fragment(), Delimiter::And);
        self
    }

    /// `` `column` = value ``. A null value or the text `IS` gives `IS null`.
    pub fn where_eq(self, column: &str, value: impl Into<crate::Value>) -> Self {
        self.and_where(Where::pair(column, value))
    }

    /// `` `column` <operator> value ``
    pub fn where_op(self, column: &str, operator: &str, value: impl Into<crate::Value>) -> Self {
        self.and_where(Where::compare(column, operator, value))
    }

    /// `` `column` IS null ``
    pub fn where_null(self, column: &str) -> Self {
        self.and_where(Where::is_null(column))
    }

    /// Merge a JSON-object mapping-form WHERE. Malformed input is reported by
    /// the next render.
    pub fn where_json(self, object: &serde_json::Value) -> Self {
        match Where::from_json(object) {
            Ok(cond) => self.and_where(cond),
            Err(e) => self.fail(e),
        }
    }

    /// Merge an ORDER BY item (`"id desc"` or just `"id"`).
    pub fn order(mut self, item: &str) -> Self {
        self.orders.merge(item, Delimiter::Comma);
        self
    }

    /// Merge an ORDER BY item from a column and direction.
    pub fn order_by(self, column: &str, direction: &str) -> Self {
        self.order(&format!("{column} {direction}"))
    }

    /// `LIMIT count`
    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(Limit::Count(count));
        self
    }

    /// `LIMIT start, length`
    pub fn limit_range(mut self, start: u64, length: u64) -> Self {
        self.limit = Some(Limit::Range(start, length));
        self
    }

    // ==================== Accessors ====================

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &Fragments {
        &self.fields
    }

    pub fn wheres(&self) -> &Fragments {
        &self.wheres
    }

    pub fn orders(&self) -> &Fragments {
        &self.orders
    }

    pub fn current_limit(&self) -> Option<Limit> {
        self.limit
    }

    pub fn has_where(&self) -> bool {
        !self.wheres.is_empty()
    }

    pub(crate) fn merge_fields(&mut self, fields: &str) {
        self.fields.merge(fields, Delimiter::Comma);
    }

    // ==================== Rendering ====================

    /// Render the SELECT statement with the accumulated LIMIT.
    ///
    /// SELECT statements put two spaces between `WHERE` and its first
    /// condition (``... FROM t WHERE  `a` = 1``); callers comparing rendered
    /// text rely on that exact shape.
    pub fn build_sql(&self) -> DbResult<String> {
        self.render_select(self.limit)
    }

    /// Render the SELECT statement with an explicit LIMIT override.
    pub fn render_select(&self, limit: Option<Limit>) -> DbResult<String> {
        self.validate()?;

        let fields = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(Delimiter::Comma)
        };

        let mut sql = format!("SELECT {fields} FROM {}", self.table);
        if !self.wheres.is_empty() {
            sql.push_str(" WHERE  ");
            sql.push_str(&self.wheres.join(Delimiter::And));
        }
        if !self.orders.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.orders.join(Delimiter::Comma));
        }
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ");
            sql.push_str(&limit.render());
        }
        Ok(sql)
    }

    /// Render one `INSERT INTO` statement for a single row.
    pub fn render_insert(&self, row: &Row) -> DbResult<String> {
        self.validate()?;
        if row.is_empty() {
            return Err(DbError::usage("insert row has no columns"));
        }

        let mut cols = Vec::with_capacity(row.len());
        let mut vals = Vec::with_capacity(row.len());
        for (col, val) in row.iter() {
            cols.push(format!("`{col}`"));
            vals.push(val.to_sql_literal());
        }
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            cols.join(", "),
            vals.join(", ")
        ))
    }

    /// Render the `UPDATE` statement. Requires a WHERE fragment.
    pub fn render_update(&self, data: &Row) -> DbResult<String> {
        self.validate()?;
        if !self.has_where() {
            return Err(DbError::usage("update condition cannot be empty"));
        }
        if data.is_empty() {
            return Err(DbError::usage("update data cannot be empty"));
        }

        let set = data
            .iter()
            .map(|(col, val)| format!("`{col}` = {}", val.to_sql_literal()))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!(
            "UPDATE {} SET {set} WHERE {}",
            self.table,
            self.wheres.join(Delimiter::And)
        ))
    }

    /// Render the `DELETE` statement. Requires a WHERE fragment.
    pub fn render_delete(&self) -> DbResult<String> {
        self.validate()?;
        if !self.has_where() {
            return Err(DbError::usage("delete condition cannot be empty"));
        }
        Ok(format!(
            "DELETE FROM {} WHERE {}",
            self.table,
            self.wheres.join(Delimiter::And)
        ))
    }

    fn validate(&self) -> DbResult<()> {
        if let Some(err) = &self.build_error {
            return Err(DbError::Usage(err.clone()));
        }
        if self.table.is_empty() {
            return Err(DbError::usage("No tables used"));
        }
        Ok(())
    }

    fn set_table(&mut self, table: String) {
        if table.is_empty() {
            self.record_error("table name cannot be empty".to_string());
        }
        self.table = table;
    }

    fn fail(mut self, err: DbError) -> Self {
        let message = match err {
            DbError::Usage(m) => m,
            other => other.to_string(),
        };
        self.record_error(message);
        self
    }

    fn record_error(&mut self, message: String) {
        if self.build_error.is_none() {
            self.build_error = Some(message);
        }
    }
}

#[cfg(test)]
mod tests;
