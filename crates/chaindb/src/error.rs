//! Error types for chaindb

use thiserror::Error;

/// Result type alias for chaindb operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// No database configuration is available
    #[error("database is not configured: {0}")]
    NotConfigured(String),

    /// Configuration exists but cannot be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Builder misuse (no table, no WHERE for update/delete, malformed where input)
    #[error("Usage error: {0}")]
    Usage(String),

    /// The rendered SQL failed at the connection
    #[error("Execution error: {message}")]
    Execution {
        message: String,
        /// SQLSTATE reported by the driver (e.g. `23000`)
        driver_code: Option<String>,
        /// Numeric server error code (e.g. `1062`)
        sql_code: Option<String>,
        /// Server-side error message
        sql_message: Option<String>,
    },

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl DbError {
    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create an execution error that carries only a message
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            driver_code: None,
            sql_code: None,
            sql_message: None,
        }
    }

    /// Check if this is a usage error
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Check if this is a not-configured error
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured(_))
    }

    /// SQLSTATE of an execution error, if any.
    pub fn driver_code(&self) -> Option<&str> {
        match self {
            Self::Execution { driver_code, .. } => driver_code.as_deref(),
            _ => None,
        }
    }

    /// Server error code of an execution error, if any.
    pub fn sql_code(&self) -> Option<&str> {
        match self {
            Self::Execution { sql_code, .. } => sql_code.as_deref(),
            _ => None,
        }
    }

    /// Server error message of an execution error, if any.
    pub fn sql_message(&self) -> Option<&str> {
        match self {
            Self::Execution { sql_message, .. } => sql_message.as_deref(),
            _ => None,
        }
    }

    /// Translate a sqlx error into an execution error.
    #[cfg(feature = "mysql")]
    pub fn from_driver(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let sql_code = db_err
                .try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
                .map(|e| e.number().to_string());
            return Self::Execution {
                message: err.to_string(),
                driver_code: db_err.code().map(|c| c.into_owned()),
                sql_code,
                sql_message: Some(db_err.message().to_string()),
            };
        }
        Self::execution(err.to_string())
    }
}

#[cfg(feature = "mysql")]
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        Self::from_driver(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_accessors() {
        let err = DbError::Execution {
            message: "duplicate entry".to_string(),
            driver_code: Some("23000".to_string()),
            sql_code: Some("1062".to_string()),
            sql_message: Some("Duplicate entry '1' for key 'PRIMARY'".to_string()),
        };
        assert_eq!(err.driver_code(), Some("23000"));
        assert_eq!(err.sql_code(), Some("1062"));
        assert_eq!(err.sql_message(), Some("Duplicate entry '1' for key 'PRIMARY'"));
        assert_eq!(err.to_string(), "Execution error: duplicate entry");
    }

    #[test]
    fn usage_error_has_no_driver_codes() {
        let err = DbError::usage("No tables used");
        assert!(err.is_usage());
        assert_eq!(err.driver_code(), None);
        assert_eq!(err.to_string(), "Usage error: No tables used");
    }

    #[cfg(feature = "mysql")]
    mod driver {
        use super::*;
        use sqlx::error::{DatabaseError, ErrorKind};
        use std::borrow::Cow;
        use std::error::Error as StdError;

        const DUPLICATE: &str = "Duplicate entry '1' for key 'PRIMARY'";

        #[derive(Debug)]
        struct UniqueViolation;

        impl std::fmt::Display for UniqueViolation {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(DUPLICATE)
            }
        }

        impl StdError for UniqueViolation {}

        impl DatabaseError for UniqueViolation {
            fn message(&self) -> &str {
                DUPLICATE
            }

            fn code(&self) -> Option<Cow<'_, str>> {
                Some(Cow::Borrowed("23000"))
            }

            fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
                self
            }

            fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
                self
            }

            fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
                self
            }

            fn kind(&self) -> ErrorKind {
                ErrorKind::UniqueViolation
            }
        }

        #[test]
        fn database_error_keeps_state_and_message() {
            let err = DbError::from(sqlx::Error::Database(Box::new(UniqueViolation)));
            assert_eq!(err.driver_code(), Some("23000"));
            assert_eq!(err.sql_message(), Some(DUPLICATE));
            // The server error number is only known for MySQL's own error type.
            assert_eq!(err.sql_code(), None);
            assert!(err.to_string().contains(DUPLICATE));
        }

        #[test]
        fn other_driver_errors_carry_only_a_message() {
            let err = DbError::from_driver(sqlx::Error::RowNotFound);
            assert!(matches!(err, DbError::Execution { .. }));
            assert_eq!(err.driver_code(), None);
            assert_eq!(err.sql_code(), None);
            assert_eq!(err.sql_message(), None);
        }
    }
}
