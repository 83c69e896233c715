//! Builder chains bound to a session, and the terminal calls that run them.

use crate::builder::{Builder, Limit};
use crate::condition::Where;
use crate::connection::Connection;
use crate::error::{DbError, DbResult};
use crate::row::{KeyedMap, Row};
use crate::session::Session;
use crate::trace::log_sql;
use crate::value::Value;
use serde::de::DeserializeOwned;

/// Anything accepted as `insert` data: one row or a sequence of rows.
pub trait IntoRows {
    fn into_rows(self) -> Vec<Row>;
}

impl IntoRows for Row {
    fn into_rows(self) -> Vec<Row> {
        vec![self]
    }
}

impl IntoRows for Vec<Row> {
    fn into_rows(self) -> Vec<Row> {
        self
    }
}

impl IntoRows for &[Row] {
    fn into_rows(self) -> Vec<Row> {
        self.to_vec()
    }
}

impl<const N: usize> IntoRows for [Row; N] {
    fn into_rows(self) -> Vec<Row> {
        self.into()
    }
}

/// Shaped result of [`Query::column`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnResult {
    /// One field, no key: that field's value from every row.
    Values(Vec<Value>),
    /// Several fields, no key: the rows as returned.
    Rows(Vec<Row>),
    /// One field with a key: key → value.
    Map(KeyedMap<Value>),
    /// Several fields with a key: key → the requested fields of that row.
    Nested(KeyedMap<Row>),
}

/// A builder chain bound to a [`Session`].
///
/// Chain calls consume and return the query. Terminal calls take `&mut self`
/// and leave the accumulated state in place, so reusing a query for another
/// terminal call compounds its fields and conditions.
pub struct Query<'s, C: Connection> {
    session: &'s Session<C>,
    builder: Builder,
}

impl<'s, C: Connection> Query<'s, C> {
    pub fn new(session: &'s Session<C>) -> Self {
        Self {
            session,
            builder: Builder::with_prefix(session.config().prefix.clone()),
        }
    }

    // ==================== Chain calls ====================

    pub fn table(mut self, name: &str) -> Self {
        self.builder = self.builder.table(name);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.builder = self.builder.name(name);
        self
    }

    pub fn field(mut self, fields: &str) -> Self {
        self.builder = self.builder.field(fields);
        self
    }

    pub fn and_where(mut self, cond: Where) -> Self {
        self.builder = self.builder.and_where(cond);
        self
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.builder = self.builder.where_eq(column, value);
        self
    }

    pub fn where_op(mut self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.builder = self.builder.where_op(column, operator, value);
        self
    }

    pub fn where_null(mut self, column: &str) -> Self {
        self.builder = self.builder.where_null(column);
        self
    }

    pub fn where_json(mut self, object: &serde_json::Value) -> Self {
        self.builder = self.builder.where_json(object);
        self
    }

    pub fn order(mut self, item: &str) -> Self {
        self.builder = self.builder.order(item);
        self
    }

    pub fn order_by(mut self, column: &str, direction: &str) -> Self {
        self.builder = self.builder.order_by(column, direction);
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.builder = self.builder.limit(count);
        self
    }

    pub fn limit_range(mut self, start: u64, length: u64) -> Self {
        self.builder = self.builder.limit_range(start, length);
        self
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    /// Render the SELECT statement without running it.
    pub fn build_sql(&self) -> DbResult<String> {
        self.builder.build_sql()
    }

    // ==================== Terminal calls ====================

    /// Run the SELECT and return every row.
    pub async fn select(&mut self) -> DbResult<Vec<Row>> {
        let sql = self.builder.build_sql()?;
        self.fetch(&sql).await
    }

    /// [`Query::select`] with each row deserialized into `T`.
    pub async fn select_as<T: DeserializeOwned>(&mut self) -> DbResult<Vec<T>> {
        self.select().await?.iter().map(|row| row.decode()).collect()
    }

    /// Run the SELECT with `LIMIT 1` and return the row, if any.
    pub async fn find(&mut self) -> DbResult<Option<Row>> {
        let sql = self.builder.render_select(Some(Limit::Count(1)))?;
        Ok(self.fetch(&sql).await?.into_iter().next())
    }

    /// [`Query::find`] with the row deserialized into `T`.
    pub async fn find_as<T: DeserializeOwned>(&mut self) -> DbResult<Option<T>> {
        self.find().await?.map(|row| row.decode()).transpose()
    }

    /// Fetch one field of the first row.
    ///
    /// When no fields were selected, the field list becomes `field`. A missing
    /// row or column yields `None`; a SQL `NULL` yields `Some(Value::Null)`.
    pub async fn value(&mut self, field: &str) -> DbResult<Option<Value>> {
        let field = field.trim();
        if self.builder.fields().is_empty() {
            self.builder.merge_fields(field);
        }
        let row = self.find().await?;
        Ok(row.and_then(|r| r.get(field).cloned()))
    }

    /// Fetch one or more fields from every row, optionally keyed by `key`.
    ///
    /// `fields` is a single column or a comma-separated list. When no fields
    /// were selected, the field list becomes `fields`; `key` is always added.
    /// Returns `None` when the query yields no rows. With a key, a repeated
    /// key keeps its first position and takes the last row's value.
    pub async fn column(
        &mut self,
        fields: &str,
        key: Option<&str>,
    ) -> DbResult<Option<ColumnResult>> {
        let fields = fields.trim_matches(',');
        let key = key.filter(|k| !k.is_empty());

        if self.builder.fields().is_empty() {
            self.builder.merge_fields(fields);
        }
        if let Some(key) = key {
            self.builder.merge_fields(key);
        }

        let rows = self.select().await?;
        if rows.is_empty() {
            return Ok(None);
        }

        let requested: Vec<&str> = fields.split(',').map(str::trim).collect();
        let single = match requested.as_slice() {
            [only] => Some(*only),
            _ => None,
        };

        let shaped = match (key, single) {
            (Some(key), Some(field)) => {
                let mut map = KeyedMap::new();
                for row in &rows {
                    map.insert(key_of(row, key), row.get(field).cloned().unwrap_or_default());
                }
                ColumnResult::Map(map)
            }
            (Some(key), None) => {
                let mut map = KeyedMap::new();
                for row in &rows {
                    map.insert(key_of(row, key), row.retain_columns(&requested));
                }
                ColumnResult::Nested(map)
            }
            (None, Some(field)) => ColumnResult::Values(
                rows.iter()
                    .map(|row| row.get(field).cloned().unwrap_or_default())
                    .collect(),
            ),
            (None, None) => ColumnResult::Rows(rows),
        };
        Ok(Some(shaped))
    }

    /// Fetch one page. Pages are 1-indexed: page `p` covers rows
    /// `(p - 1) * page_size` through `p * page_size - 1`.
    pub async fn paginate(&mut self, page_size: u64, page: u64) -> DbResult<Vec<Row>> {
        if page_size == 0 || page == 0 {
            return Err(DbError::usage(format!(
                "paginate requires a positive page size and page, \
                 got page_size={page_size} page={page}"
            )));
        }
        let Some(offset) = page_size.checked_mul(page - 1) else {
            return Err(DbError::usage(format!(
                "paginate offset overflows, got page_size={page_size} page={page}"
            )));
        };
        let sql = self
            .builder
            .render_select(Some(Limit::Range(offset, page_size)))?;
        self.fetch(&sql).await
    }

    /// Insert one row or a sequence of rows, one statement per row.
    ///
    /// Returns the number of rows inserted. A failure stops the loop and is
    /// returned as-is; rows inserted before it stay inserted unless the
    /// caller wraps the call in a transaction.
    pub async fn insert(&mut self, data: impl IntoRows) -> DbResult<u64> {
        let statements = self.insert_statements(data)?;
        let conn = self.session.connect().await?;

        let mut count = 0;
        for sql in &statements {
            log_sql(sql);
            if let Err(e) = conn.execute(sql).await {
                if count > 0 {
                    tracing::warn!(
                        table = self.builder.table_name(),
                        inserted = count,
                        remaining = statements.len() as u64 - count,
                        "insert batch stopped after partial completion"
                    );
                }
                return Err(e);
            }
            count += 1;
        }
        Ok(count)
    }

    /// Insert like [`Query::insert`] and return the identity value generated
    /// for the last row. The table needs an integer auto-increment key.
    pub async fn insert_get_id(&mut self, data: impl IntoRows) -> DbResult<u64> {
        let statements = self.insert_statements(data)?;
        if statements.is_empty() {
            return Err(DbError::usage("insert_get_id requires at least one row"));
        }
        let conn = self.session.connect().await?;
        for sql in &statements {
            log_sql(sql);
            conn.execute(sql).await?;
        }
        conn.last_insert_id().await
    }

    /// Update matching rows and return the affected-row count.
    pub async fn update(&mut self, data: &Row) -> DbResult<u64> {
        let sql = self.builder.render_update(data)?;
        self.exec(&sql).await
    }

    /// Delete matching rows and return the affected-row count.
    pub async fn delete(&mut self) -> DbResult<u64> {
        let sql = self.builder.render_delete()?;
        self.exec(&sql).await
    }

    fn insert_statements(&self, data: impl IntoRows) -> DbResult<Vec<String>> {
        data.into_rows()
            .iter()
            .map(|row| self.builder.render_insert(row))
            .collect()
    }

    async fn fetch(&self, sql: &str) -> DbResult<Vec<Row>> {
        let conn = self.session.connect().await?;
        log_sql(sql);
        conn.query(sql).await
    }

    async fn exec(&self, sql: &str) -> DbResult<u64> {
        let conn = self.session.connect().await?;
        log_sql(sql);
        conn.execute(sql).await
    }
}

fn key_of(row: &Row, key: &str) -> String {
    row.get(key).map(ToString::to_string).unwrap_or_default()
}
