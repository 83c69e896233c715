//! Database configuration.
//!
//! A config file is TOML:
//!
//! ```toml
//! type = "mysql"
//! host = "127.0.0.1"
//! database = "test"
//! username = "root"
//! password = "root"
//! port = 3306
//! charset = "utf8"
//! prefix = "tb_"
//! ```
//!
//! Missing keys fall back to [`DbConfig::default`].

use crate::error::{DbError, DbResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

const TEMPLATE: &str = r#"
# Database type (only "mysql" is supported)
type = "mysql"
# Server address
host = "127.0.0.1"
# Database name
database = "test"
# Username
username = "root"
# Password
password = "root"
# Port
port = 3306
# Connection charset
charset = "utf8"
# Table prefix applied by `name(...)`
prefix = ""
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub host: String,
    pub database: String,
    pub username: String,
    pub password: String,
    pub port: u16,
    pub charset: String,
    pub prefix: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            kind: "mysql".to_string(),
            host: "127.0.0.1".to_string(),
            database: "test".to_string(),
            username: "root".to_string(),
            password: "root".to_string(),
            port: 3306,
            charset: "utf8".to_string(),
            prefix: String::new(),
        }
    }
}

impl DbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> DbResult<Self> {
        toml::from_str(raw).map_err(|e| DbError::Config(format!("failed to parse config: {e}")))
    }

    /// Load configuration from a TOML file.
    ///
    /// When the file does not exist a commented template is written there and
    /// [`DbError::NotConfigured`] is returned, so the caller fails fast and
    /// has a file to fill in.
    pub fn load(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            write_template(path)?;
            tracing::warn!(path = %path.display(), "database config missing; template written");
            return Err(DbError::NotConfigured(format!(
                "fill in {} and retry",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path).map_err(|e| {
            DbError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Build configuration from `DB_*` environment variables.
    ///
    /// `DB_DATABASE` is required; every other key falls back to its default.
    pub fn from_env() -> DbResult<Self> {
        let database = std::env::var("DB_DATABASE")
            .map_err(|_| DbError::NotConfigured("DB_DATABASE is not set".to_string()))?;

        let mut config = Self::default().database(database);
        if let Ok(v) = std::env::var("DB_TYPE") {
            config.kind = v;
        }
        if let Ok(v) = std::env::var("DB_HOST") {
            config.host = v;
        }
        if let Ok(v) = std::env::var("DB_USERNAME") {
            config.username = v;
        }
        if let Ok(v) = std::env::var("DB_PASSWORD") {
            config.password = v;
        }
        if let Ok(v) = std::env::var("DB_PORT") {
            config.port = v
                .parse()
                .map_err(|e| DbError::Config(format!("invalid DB_PORT '{v}': {e}")))?;
        }
        if let Ok(v) = std::env::var("DB_CHARSET") {
            config.charset = v;
        }
        if let Ok(v) = std::env::var("DB_PREFIX") {
            config.prefix = v;
        }
        Ok(config)
    }

    /// Reject configurations no driver can serve.
    pub fn validate(&self) -> DbResult<()> {
        if !self.kind.eq_ignore_ascii_case("mysql") {
            return Err(DbError::Config(format!(
                "unsupported database type '{}'",
                self.kind
            )));
        }
        if self.database.is_empty() {
            return Err(DbError::Config("database name cannot be empty".to_string()));
        }
        Ok(())
    }
}

fn write_template(path: &Path) -> DbResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::Config(format!("failed to create directory {}: {e}", parent.display()))
            })?;
        }
    }
    std::fs::write(path, TEMPLATE.trim_start_matches('\n')).map_err(|e| {
        DbError::Config(format!("failed to write config template {}: {e}", path.display()))
    })
}
