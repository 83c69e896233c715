//! SQL logging through `tracing`.
//!
//! Statements are emitted at `DEBUG` under the `chaindb.sql` target before
//! they reach the connection.

/// Longest SQL text (in bytes) written to a log event.
pub const MAX_LOGGED_SQL: usize = 200;

/// The kind of statement being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    /// Detect the statement kind from its leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        let head = sql
            .trim_start()
            .split_whitespace()
            .next()
            .unwrap_or_default();
        if head.eq_ignore_ascii_case("SELECT") {
            StatementKind::Select
        } else if head.eq_ignore_ascii_case("INSERT") {
            StatementKind::Insert
        } else if head.eq_ignore_ascii_case("UPDATE") {
            StatementKind::Update
        } else if head.eq_ignore_ascii_case("DELETE") {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Other => "other",
        }
    }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

pub(crate) fn log_sql(sql: &str) {
    let kind = StatementKind::from_sql(sql);
    if sql.len() > MAX_LOGGED_SQL {
        tracing::debug!(
            target: "chaindb.sql",
            kind = kind.as_str(),
            "{}...",
            truncate_sql_bytes(sql, MAX_LOGGED_SQL)
        );
    } else {
        tracing::debug!(target: "chaindb.sql", kind = kind.as_str(), "{sql}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_detection() {
        assert_eq!(StatementKind::from_sql("SELECT * FROM t"), StatementKind::Select);
        assert_eq!(StatementKind::from_sql("  insert into t"), StatementKind::Insert);
        assert_eq!(StatementKind::from_sql("UPDATE t SET"), StatementKind::Update);
        assert_eq!(StatementKind::from_sql("delete from t"), StatementKind::Delete);
        assert_eq!(StatementKind::from_sql("SHOW TABLES"), StatementKind::Other);
        assert_eq!(StatementKind::from_sql(""), StatementKind::Other);
    }

    #[test]
    fn truncation_respects_char_boundary() {
        let sql = "SELECT '男'";
        // '男' is three bytes starting at index 8
        assert_eq!(truncate_sql_bytes(sql, 9), "SELECT '");
        assert_eq!(truncate_sql_bytes(sql, 100), sql);
    }
}
