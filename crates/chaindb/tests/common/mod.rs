//! In-memory `Connection` that records every statement and replays scripted
//! query results.

#![allow(dead_code)]

use chaindb::{Connection, DbConfig, DbError, DbResult, Row, Session};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Default)]
pub struct MemoryConnection {
    statements: Mutex<Vec<String>>,
    results: Mutex<VecDeque<Vec<Row>>>,
    fail_execute_at: Mutex<Option<usize>>,
    executes: AtomicUsize,
    affected: AtomicU64,
    next_id: AtomicU64,
    last_id: AtomicU64,
}

impl MemoryConnection {
    pub fn new() -> Self {
        let conn = Self::default();
        conn.affected.store(1, Ordering::SeqCst);
        conn.next_id.store(1, Ordering::SeqCst);
        conn
    }

    /// Queue the rows returned by the next `query` call.
    pub fn push_result(&self, rows: Vec<Row>) {
        self.results.lock().unwrap().push_back(rows);
    }

    /// Make the `n`-th `execute` call (0-based) fail.
    pub fn fail_execute_at(&self, n: usize) {
        *self.fail_execute_at.lock().unwrap() = Some(n);
    }

    pub fn set_affected(&self, n: u64) {
        self.affected.store(n, Ordering::SeqCst);
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub fn last_statement(&self) -> Option<String> {
        self.statements.lock().unwrap().last().cloned()
    }

    fn record(&self, sql: &str) {
        self.statements.lock().unwrap().push(sql.to_string());
    }
}

impl Connection for MemoryConnection {
    async fn connect(_config: &DbConfig) -> DbResult<Self> {
        Ok(Self::new())
    }

    async fn query(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.record(sql);
        Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn execute(&self, sql: &str) -> DbResult<u64> {
        self.record(sql);
        let n = self.executes.fetch_add(1, Ordering::SeqCst);
        if *self.fail_execute_at.lock().unwrap() == Some(n) {
            return Err(DbError::Execution {
                message: "Duplicate entry '1' for key 'PRIMARY'".to_string(),
                driver_code: Some("23000".to_string()),
                sql_code: Some("1062".to_string()),
                sql_message: Some("Duplicate entry '1' for key 'PRIMARY'".to_string()),
            });
        }
        let id = if sql.starts_with("INSERT") {
            self.next_id.fetch_add(1, Ordering::SeqCst)
        } else {
            0
        };
        self.last_id.store(id, Ordering::SeqCst);
        Ok(self.affected.load(Ordering::SeqCst))
    }

    async fn last_insert_id(&self) -> DbResult<u64> {
        Ok(self.last_id.load(Ordering::SeqCst))
    }

    async fn begin(&self) -> DbResult<()> {
        self.record("START TRANSACTION");
        Ok(())
    }

    async fn commit(&self) -> DbResult<()> {
        self.record("COMMIT");
        Ok(())
    }

    async fn rollback(&self) -> DbResult<()> {
        self.record("ROLLBACK");
        Ok(())
    }
}

pub fn session() -> Session<MemoryConnection> {
    Session::with_connection(DbConfig::new().prefix("tb_"), MemoryConnection::new())
}

pub async fn conn(db: &Session<MemoryConnection>) -> &MemoryConnection {
    db.connect().await.unwrap()
}
