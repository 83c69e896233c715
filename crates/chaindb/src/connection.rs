//! The narrow interface the executor drives.

use crate::config::DbConfig;
use crate::error::DbResult;
use crate::row::Row;
use std::future::Future;

/// A single database connection.
///
/// Statements arrive as complete SQL text (literals already embedded), so the
/// interface has no parameter binding. Transactions are connection-scoped:
/// after [`Connection::begin`] every statement on this connection belongs to
/// the transaction until [`Connection::commit`] or [`Connection::rollback`].
///
/// Implementations are shared by reference. Callers that use one connection
/// from several tasks must order their statements themselves; an
/// implementation only guarantees that a single statement is not interleaved
/// with another.
pub trait Connection: Send + Sync {
    /// Open a connection from configuration.
    fn connect(config: &DbConfig) -> impl Future<Output = DbResult<Self>> + Send
    where
        Self: Sized;

    /// Run a statement that returns rows.
    fn query(&self, sql: &str) -> impl Future<Output = DbResult<Vec<Row>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(&self, sql: &str) -> impl Future<Output = DbResult<u64>> + Send;

    /// Identity value generated by the most recent statement run through
    /// [`Connection::execute`], or 0 when that statement generated none.
    fn last_insert_id(&self) -> impl Future<Output = DbResult<u64>> + Send;

    fn begin(&self) -> impl Future<Output = DbResult<()>> + Send;

    fn commit(&self) -> impl Future<Output = DbResult<()>> + Send;

    fn rollback(&self) -> impl Future<Output = DbResult<()>> + Send;
}
