//! Caller-owned session: configuration plus one lazily opened connection.

use crate::config::DbConfig;
use crate::connection::Connection;
use crate::error::{DbError, DbResult};
use crate::query::Query;
use crate::row::Row;
use crate::trace::log_sql;
use std::path::Path;
use tokio::sync::OnceCell;

/// One configuration and one shared connection.
///
/// The connection is opened on the first statement (or by an explicit
/// [`Session::connect`]) and reused for the life of the session. Every
/// builder chain started from a session runs on that same connection, so a
/// transaction opened with [`Session::start_trans`] covers all of them until
/// it is committed or rolled back.
///
/// # Example
///
/// ```ignore
/// use chaindb::{DbConfig, Session, Where};
///
/// let db = Session::new(DbConfig::new().database("test").prefix("tb_"));
///
/// let rows = db
///     .name("box")
///     .field("id,box_name name")
///     .where_op("level", ">", 8)
///     .order("id desc")
///     .select()
///     .await?;
/// ```
#[cfg(feature = "mysql")]
pub struct Session<C: Connection = crate::mysql::MySqlConnection> {
    config: DbConfig,
    conn: OnceCell<C>,
}

#[cfg(not(feature = "mysql"))]
pub struct Session<C: Connection> {
    config: DbConfig,
    conn: OnceCell<C>,
}

impl<C: Connection> Session<C> {
    /// Create a session; the connection is opened on first use.
    pub fn new(config: DbConfig) -> Self {
        Self {
            config,
            conn: OnceCell::new(),
        }
    }

    /// Create a session from a TOML config file.
    ///
    /// A missing file is scaffolded with a template and reported as
    /// [`crate::DbError::NotConfigured`].
    pub fn from_config_file(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(DbConfig::load(path)?))
    }

    /// Create a session around an already open connection.
    pub fn with_connection(config: DbConfig, conn: C) -> Self {
        Self {
            config,
            conn: OnceCell::new_with(Some(conn)),
        }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.conn.initialized()
    }

    /// Open the connection now if it is not open yet, and return it.
    pub async fn connect(&self) -> DbResult<&C> {
        self.conn
            .get_or_try_init(|| C::connect(&self.config))
            .await
    }

    /// Start a chain on a fully qualified table name.
    pub fn table(&self, name: &str) -> Query<'_, C> {
        Query::new(self).table(name)
    }

    /// Start a chain on a logical table name (prefix applied).
    pub fn name(&self, name: &str) -> Query<'_, C> {
        Query::new(self).name(name)
    }

    /// Run caller-supplied SQL as-is and return its rows.
    pub async fn query(&self, sql: &str) -> DbResult<Vec<Row>> {
        let conn = self.connect().await?;
        log_sql(sql);
        conn.query(sql).await
    }

    /// Begin a transaction on the shared connection.
    pub async fn start_trans(&self) -> DbResult<()> {
        tracing::debug!(target: "chaindb.sql", "START TRANSACTION");
        self.connect().await?.begin().await
    }

    pub async fn commit(&self) -> DbResult<()> {
        tracing::debug!(target: "chaindb.sql", "COMMIT");
        self.connect().await?.commit().await
    }

    pub async fn rollback(&self) -> DbResult<()> {
        tracing::debug!(target: "chaindb.sql", "ROLLBACK");
        self.connect().await?.rollback().await
    }
}

#[doc(hidden)]
pub fn log_rollback_failure(err: &DbError) {
    tracing::error!(error = %err, "transaction rollback failed");
}

/// Runs the given block inside a transaction on a [`Session`].
///
/// - Begins with `start_trans()`.
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)`; a failed rollback is logged and the block's
///   error is returned.
///
/// The block must evaluate to `chaindb::DbResult<T>`.
///
/// # Example
///
/// ```ignore
/// let inserted = chaindb::transaction!(db, {
///     db.name("test").insert(rows).await?;
///     db.name("test").insert(row! { "id" => 1, "name" => "dup" }).await
/// })?;
/// ```
#[macro_export]
macro_rules! transaction {
    ($session:expr, $body:block) => {{
        let __chaindb_session = &$session;
        match __chaindb_session.start_trans().await {
            Err(e) => Err(e),
            Ok(()) => {
                let __chaindb_result = async { $body }.await;
                match __chaindb_result {
                    Ok(value) => __chaindb_session.commit().await.map(|()| value),
                    Err(error) => {
                        if let Err(rollback_err) = __chaindb_session.rollback().await {
                            $crate::session::log_rollback_failure(&rollback_err);
                        }
                        Err(error)
                    }
                }
            }
        }
    }};
}
