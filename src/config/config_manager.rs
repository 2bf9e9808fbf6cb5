// ==========================================
// Proposal Desk - configuration manager
// ==========================================
// Responsibility: load, query and override settings
// Storage: config_kv table (key-value + scope)
// Missing or malformed values fall back to the defaults below
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::importer::row_classifier::BlankRowPolicy;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Build from a shared connection; PRAGMAs and schema are re-applied (idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
            crate::db::init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Read a value of the global scope
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![ConfigScope::Global.scope_id(), key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write a value of the global scope (upsert)
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![ConfigScope::Global.scope_id(), key, value],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Parse a numeric setting, warning and falling back on garbage
    fn get_parsed_or_default<T: std::str::FromStr>(&self, key: &str, default: T) -> RepositoryResult<T> {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => Ok(raw.trim().parse::<T>().unwrap_or_else(|_| {
                warn!(config_key = key, value = %raw, "Invalid config value, using default");
                default
            })),
        }
    }

    // ===== audit / app =====

    pub fn get_audit_model(&self) -> RepositoryResult<String> {
        self.get_config_or_default(config_keys::AUDIT_MODEL, defaults::AUDIT_MODEL)
    }

    pub fn get_locale(&self) -> RepositoryResult<String> {
        self.get_config_or_default(config_keys::APP_LOCALE, defaults::APP_LOCALE)
    }
}

// ==========================================
// ImportConfigReader implementation
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_blank_row_policy(&self) -> RepositoryResult<BlankRowPolicy> {
        let value = self.get_config_or_default(
            config_keys::IMPORT_BLANK_ROW_POLICY,
            BlankRowPolicy::default().as_str(),
        )?;
        Ok(value.parse().unwrap_or_else(|e: String| {
            warn!(error = %e, "Invalid blank row policy, using default");
            BlankRowPolicy::default()
        }))
    }

    async fn get_reminder_days(&self) -> RepositoryResult<u32> {
        self.get_parsed_or_default(config_keys::IMPORT_REMINDER_DAYS, defaults::REMINDER_DAYS)
    }

    async fn get_return_offset_days(&self) -> RepositoryResult<i64> {
        self.get_parsed_or_default(
            config_keys::IMPORT_RETURN_OFFSET_DAYS,
            defaults::RETURN_OFFSET_DAYS,
        )
    }

    async fn get_sheet_keyword(&self) -> RepositoryResult<String> {
        self.get_config_or_default(config_keys::IMPORT_SHEET_KEYWORD, defaults::SHEET_KEYWORD)
    }
}

// ==========================================
// ConfigScope
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigScope {
    Global,
    Praca { praca_id: String },
}

impl ConfigScope {
    pub fn scope_id(&self) -> String {
        match self {
            ConfigScope::Global => "global".to_string(),
            ConfigScope::Praca { praca_id } => format!("praca/{}", praca_id),
        }
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    // import
    pub const IMPORT_BLANK_ROW_POLICY: &str = "import.blank_row_policy";
    pub const IMPORT_REMINDER_DAYS: &str = "import.reminder_days";
    pub const IMPORT_RETURN_OFFSET_DAYS: &str = "import.return_offset_days";
    pub const IMPORT_SHEET_KEYWORD: &str = "import.sheet_keyword";

    // audit
    pub const AUDIT_MODEL: &str = "audit.model";

    // app
    pub const APP_LOCALE: &str = "app.locale";
}

pub mod defaults {
    pub const REMINDER_DAYS: u32 = 3;
    pub const RETURN_OFFSET_DAYS: i64 = 1;
    pub const SHEET_KEYWORD: &str = "evento";
    pub const AUDIT_MODEL: &str = "gemini-3-flash-preview";
    pub const APP_LOCALE: &str = "pt-BR";
}
