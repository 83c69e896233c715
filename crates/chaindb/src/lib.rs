//! # chaindb
//!
//! A chainable SQL query builder with a thin execution layer for MySQL.
//!
//! ## Features
//!
//! - **Chained building**: table, fields, where, order and limit accumulate
//!   across calls; repeated fragments are merged, never duplicated
//! - **Inspectable SQL**: `build_sql()` renders the SELECT without touching the
//!   connection
//! - **Shaped results**: rows, a single row, a single value, a column array, a
//!   keyed map or a page
//! - **Safe defaults**: UPDATE and DELETE refuse to run without a WHERE
//! - **Explicit session**: one caller-owned configuration and lazily opened
//!   connection; transactions are connection-scoped
//!
//! Values are embedded into the SQL text as literals (strings single-quoted
//! verbatim, `null` bare). There is no parameter binding and no escaping, so
//! never pass untrusted input as a value or a column name.
//!
//! ## Example
//!
//! ```ignore
//! use chaindb::{row, Cond, DbConfig, Session, Value, Where};
//!
//! let db = Session::new(DbConfig::load("database.toml")?);
//!
//! // SELECT id,box_name name FROM tb_box WHERE  `level` > 8 AND `mobile` IS null ORDER BY id desc
//! let rows = db
//!     .name("box")
//!     .field("id,box_name name")
//!     .and_where(Where::map([("level", Cond::op(">", 8)), ("mobile", Cond::null())]))
//!     .order("id desc")
//!     .select()
//!     .await?;
//!
//! // INSERT, one statement per row
//! let n = db
//!     .name("test")
//!     .insert(vec![row! { "name" => "zs" }, row! { "name" => "ls" }])
//!     .await?;
//!
//! // UPDATE / DELETE need a condition
//! db.name("test").where_op("id", "<>", 1).update(&row! { "age" => 21 }).await?;
//! db.name("test").where_eq("id", 4).delete().await?;
//! ```

pub mod builder;
pub mod condition;
pub mod config;
pub mod connection;
pub mod error;
pub mod merge;
pub mod query;
pub mod row;
pub mod session;
pub mod trace;
pub mod value;

#[cfg(feature = "mysql")]
pub mod mysql;

pub use builder::{Builder, Limit};
pub use condition::{Cond, Where};
pub use config::DbConfig;
pub use connection::Connection;
pub use error::{DbError, DbResult};
pub use merge::{Delimiter, Fragments, merge_str};
pub use query::{ColumnResult, IntoRows, Query};
pub use row::{KeyedMap, Row};
pub use session::Session;
pub use trace::StatementKind;
pub use value::Value;

#[cfg(feature = "mysql")]
pub use mysql::MySqlConnection;
