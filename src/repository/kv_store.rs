// ==========================================
// Proposal Desk - key-value document store
// ==========================================
// Table: kv_store(namespace, key, value_json, updated_at)
// Responsibility: JSON documents per namespace, insertion order kept
// Red line: no business rules here
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct KvStore {
    conn: Arc<Mutex<Connection>>,
}

impl KvStore {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection; the schema is created if missing
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let store = Self { conn };
        init_schema(&*store.get_conn()?)?;
        Ok(store)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// All documents of a namespace, in insertion order
    pub fn list<T: DeserializeOwned>(&self, namespace: &str) -> RepositoryResult<Vec<T>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT value_json FROM kv_store WHERE namespace = ?1 ORDER BY rowid")?;
        let raw = stmt
            .query_map([namespace], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        raw.iter()
            .map(|json| serde_json::from_str(json).map_err(RepositoryError::from))
            .collect()
    }

    pub fn get<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> RepositoryResult<Option<T>> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value_json FROM kv_store WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|json| serde_json::from_str(&json).map_err(RepositoryError::from))
            .transpose()
    }

    pub fn contains(&self, namespace: &str, key: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM kv_store WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
                |_row| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn count(&self, namespace: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM kv_store WHERE namespace = ?1",
            [namespace],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Insert or replace; an existing key keeps its position
    pub fn put<T: Serialize>(&self, namespace: &str, key: &str, value: &T) -> RepositoryResult<()> {
        let json = serde_json::to_string(value)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO kv_store (namespace, key, value_json, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(namespace, key) DO UPDATE SET
                value_json = excluded.value_json,
                updated_at = excluded.updated_at
            "#,
            params![namespace, key, json],
        )?;
        Ok(())
    }

    /// Insert a batch in one transaction; any existing key aborts the whole batch
    pub fn insert_all<T: Serialize>(
        &self,
        namespace: &str,
        entries: &[(String, T)],
    ) -> RepositoryResult<usize> {
        let encoded = entries
            .iter()
            .map(|(key, value)| -> RepositoryResult<(String, String)> {
                Ok((key.clone(), serde_json::to_string(value)?))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO kv_store (namespace, key, value_json, updated_at) \
                 VALUES (?1, ?2, ?3, datetime('now'))",
            )?;
            for (key, json) in &encoded {
                stmt.execute(params![namespace, key, json]).map_err(|e| match e {
                    rusqlite::Error::SqliteFailure(_, Some(ref msg)) if msg.contains("UNIQUE") => {
                        RepositoryError::DuplicateKey {
                            namespace: namespace.to_string(),
                            key: key.to_string(),
                        }
                    }
                    other => RepositoryError::from(other),
                })?;
            }
        }

        // dropping tx without commit rolls back
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(encoded.len())
    }

    /// Returns whether a document was removed
    pub fn delete(&self, namespace: &str, key: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM kv_store WHERE namespace = ?1 AND key = ?2",
            params![namespace, key],
        )?;
        Ok(affected > 0)
    }
}
