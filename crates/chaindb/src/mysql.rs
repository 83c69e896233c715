//! MySQL connection over sqlx.
//!
//! Statements go over the text protocol (`sqlx::raw_sql`), matching the
//! literal-embedding builder: there is nothing to bind.

use crate::config::DbConfig;
use crate::connection::Connection;
use crate::error::{DbError, DbResult};
use crate::row::Row;
use crate::value::Value;
use sqlx::mysql::{MySqlConnectOptions, MySqlRow};
use sqlx::{Column, ConnectOptions, Executor as _, Row as _, TypeInfo, ValueRef};
use std::num::{ParseFloatError, ParseIntError};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// A single MySQL connection.
///
/// The driver connection sits behind an async mutex so that one statement
/// runs at a time. Ordering of statements across tasks (including which
/// statements fall inside a transaction) is up to the caller.
pub struct MySqlConnection {
    inner: Mutex<sqlx::MySqlConnection>,
    last_insert_id: AtomicU64,
}

impl std::fmt::Debug for MySqlConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConnection")
            .field("last_insert_id", &self.last_insert_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl MySqlConnection {
    pub fn from_sqlx(conn: sqlx::MySqlConnection) -> Self {
        Self {
            inner: Mutex::new(conn),
            last_insert_id: AtomicU64::new(0),
        }
    }

    fn connect_options(config: &DbConfig) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database)
            .charset(&config.charset)
    }
}

impl Connection for MySqlConnection {
    async fn connect(config: &DbConfig) -> DbResult<Self> {
        config.validate()?;
        let conn = Self::connect_options(config)
            .connect()
            .await
            .map_err(|e| {
                tracing::error!(
                    host = %config.host,
                    port = config.port,
                    database = %config.database,
                    error = %e,
                    "database connection failed"
                );
                DbError::Connection("database connection failure".to_string())
            })?;
        tracing::info!(host = %config.host, database = %config.database, "database connected");
        Ok(Self::from_sqlx(conn))
    }

    async fn query(&self, sql: &str) -> DbResult<Vec<Row>> {
        let mut conn = self.inner.lock().await;
        let conn: &mut sqlx::MySqlConnection = &mut conn;
        let rows = conn.fetch_all(sqlx::raw_sql(sql)).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, sql: &str) -> DbResult<u64> {
        let mut conn = self.inner.lock().await;
        let conn: &mut sqlx::MySqlConnection = &mut conn;
        let result = conn.execute(sqlx::raw_sql(sql)).await?;
        // 0 when the statement generated no identity value.
        self.last_insert_id.store(result.last_insert_id(), Ordering::SeqCst);
        Ok(result.rows_affected())
    }

    async fn last_insert_id(&self) -> DbResult<u64> {
        Ok(self.last_insert_id.load(Ordering::SeqCst))
    }

    async fn begin(&self) -> DbResult<()> {
        self.execute("START TRANSACTION").await.map(|_| ())
    }

    async fn commit(&self) -> DbResult<()> {
        self.execute("COMMIT").await.map(|_| ())
    }

    async fn rollback(&self) -> DbResult<()> {
        self.execute("ROLLBACK").await.map(|_| ())
    }
}

fn decode_row(row: &MySqlRow) -> DbResult<Row> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let raw = row
            .try_get_raw(idx)
            .map_err(|e| DbError::decode(name, e.to_string()))?;
        if raw.is_null() {
            out.insert(name, Value::Null);
            continue;
        }
        let type_name = raw.type_info().name().to_ascii_uppercase();
        out.insert(name, decode_value(row, idx, name, &type_name)?);
    }
    Ok(out)
}

fn decode_value(row: &MySqlRow, idx: usize, name: &str, type_name: &str) -> DbResult<Value> {
    let decode_err = |e: sqlx::Error| DbError::decode(name, e.to_string());

    if is_binary(type_name) {
        let bytes: Vec<u8> = row.try_get_unchecked(idx).map_err(decode_err)?;
        return Ok(Value::Bytes(bytes));
    }

    // Text protocol: every non-binary value arrives as its textual form.
    let text: String = row.try_get_unchecked(idx).map_err(decode_err)?;
    parse_text(type_name, text).map_err(|e| DbError::decode(name, format!("{type_name}: {e}")))
}

/// Map the textual form of a non-NULL, non-binary column to a [`Value`].
fn parse_text(type_name: &str, text: String) -> Result<Value, String> {
    let value = match type_name {
        "BOOLEAN" => Value::Bool(text != "0"),
        t if is_integer(t) && t.ends_with("UNSIGNED") => {
            Value::UInt(text.parse().map_err(|e: ParseIntError| e.to_string())?)
        }
        t if is_integer(t) => Value::Int(text.parse().map_err(|e: ParseIntError| e.to_string())?),
        "FLOAT" | "DOUBLE" => {
            Value::Float(text.parse().map_err(|e: ParseFloatError| e.to_string())?)
        }
        _ => Value::Text(text),
    };
    Ok(value)
}

fn is_integer(type_name: &str) -> bool {
    ["TINYINT", "SMALLINT", "MEDIUMINT", "INT", "BIGINT", "YEAR"]
        .iter()
        .any(|t| type_name == *t || type_name.strip_prefix(t) == Some(" UNSIGNED"))
}

fn is_binary(type_name: &str) -> bool {
    matches!(
        type_name,
        "BINARY"
            | "VARBINARY"
            | "TINYBLOB"
            | "BLOB"
            | "MEDIUMBLOB"
            | "LONGBLOB"
            | "BIT"
            | "GEOMETRY"
    )
}
