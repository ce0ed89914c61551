//! SQLite connection handling
//!
//! A single `Connection` behind an async mutex. Each acquired session holds
//! the lock for its whole request and runs inside one transaction that is
//! rolled back on drop unless it was committed.

use crate::config::SqliteConfig;
use crate::error::{SqliteError, SqliteResult};
use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};
use warden_core::{ConnectionProvider, EngineConnection, EngineError, EngineReply, RowSet, Value};
use warden_query::BindParam;

/// Shared SQLite database handing out one session at a time
#[derive(Clone)]
pub struct SqlitePool {
    conn: Arc<Mutex<Connection>>,
    config: SqliteConfig,
}

impl SqlitePool {
    /// Open the database described by `config`
    pub fn new(config: SqliteConfig) -> SqliteResult<Self> {
        info!(path = ?config.path, "Opening SQLite database");

        let conn = if config.is_memory() {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SqliteError::Connection(format!("Failed to create directory: {}", e))
                })?;
            }
            Connection::open(&config.path)?
        };

        configure_pragmas(&conn, &config)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    /// Create an in-memory database for testing
    pub fn memory() -> SqliteResult<Self> {
        Self::new(SqliteConfig::memory())
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Execute a closure with the connection, outside any session
    pub async fn with_connection<F, T>(&self, f: F) -> SqliteResult<T>
    where
        F: FnOnce(&Connection) -> SqliteResult<T>,
    {
        let conn = self.conn.lock().await;
        f(&conn)
    }

    /// Open a session: lock the connection and begin a transaction
    pub async fn session(&self) -> SqliteResult<SqliteSession> {
        let conn = Arc::clone(&self.conn).lock_owned().await;
        conn.execute_batch("BEGIN")
            .map_err(|e| SqliteError::Transaction(e.to_string()))?;
        debug!("Opened SQLite session");
        Ok(SqliteSession { conn })
    }
}

#[async_trait]
impl ConnectionProvider for SqlitePool {
    async fn acquire(&self) -> Result<Box<dyn EngineConnection>, EngineError> {
        let session = self.session().await?;
        Ok(Box::new(session))
    }
}

/// Exclusive use of the database for one request
pub struct SqliteSession {
    conn: OwnedMutexGuard<Connection>,
}

impl SqliteSession {
    fn run(&self, sql: &str, binds: &[BindParam]) -> SqliteResult<EngineReply> {
        let mut stmt = self.conn.prepare(sql)?;

        for bind in binds {
            if let Some(index) = stmt.parameter_index(&bind.placeholder())? {
                stmt.raw_bind_parameter(index, &bind.value)?;
            }
        }

        if stmt.column_count() == 0 {
            let affected = stmt.raw_execute()?;
            return Ok(EngineReply::Done {
                rows_affected: affected as u64,
            });
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut rows = Vec::new();
        let mut cursor = stmt.raw_query();
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                values.push(to_value(row.get_ref(index)?));
            }
            rows.push(values);
        }

        Ok(EngineReply::Rows(RowSet { columns, rows }))
    }
}

#[async_trait]
impl EngineConnection for SqliteSession {
    async fn execute(
        &mut self,
        sql: &str,
        binds: &[BindParam],
    ) -> Result<EngineReply, EngineError> {
        Ok(self.run(sql, binds)?)
    }

    async fn commit(&mut self) -> Result<(), EngineError> {
        if self.conn.is_autocommit() {
            debug!("No open transaction to commit");
            return Ok(());
        }
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| SqliteError::Transaction(e.to_string()))?;
        Ok(())
    }

    async fn server_version(&mut self) -> Result<Option<String>, EngineError> {
        let version: String = self
            .conn
            .query_row("SELECT sqlite_version()", [], |row| row.get(0))
            .map_err(SqliteError::from)?;
        Ok(Some(version))
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        if self.conn.is_autocommit() {
            return;
        }
        match self.conn.execute_batch("ROLLBACK") {
            Ok(()) => debug!("Rolled back uncommitted session work"),
            Err(e) => warn!(error = %e, "Rollback on session release failed"),
        }
    }
}

fn configure_pragmas(conn: &Connection, config: &SqliteConfig) -> SqliteResult<()> {
    debug!("Configuring SQLite pragmas");

    if config.wal_mode && !config.is_memory() {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    }

    if config.foreign_keys {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    }

    conn.execute_batch(&format!(
        "PRAGMA busy_timeout = {};",
        config.busy_timeout_ms
    ))?;

    Ok(())
}

/// Map a SQLite cell onto a core value; text that is not UTF-8 is left as
/// bytes for the normaliser
fn to_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Integer(n),
        ValueRef::Real(x) => Value::Float(x),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Bytes(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn memory_pool_answers_queries() {
        let pool = SqlitePool::memory().expect("Failed to create memory pool");
        let result = pool
            .with_connection(|conn| Ok(conn.query_row("SELECT 1 + 1", [], |row| row.get::<_, i64>(0))?))
            .await
            .unwrap();
        assert_eq!(result, 2);
    }

    #[tokio::test]
    async fn file_pool_uses_wal() {
        let dir = TempDir::new().unwrap();
        let pool = SqlitePool::new(SqliteConfig::new(dir.path().join("nested/warden.db"))).unwrap();
        let mode: String = pool
            .with_connection(|conn| Ok(conn.query_row("PRAGMA journal_mode;", [], |row| row.get(0))?))
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn select_returns_rows_with_column_names() {
        let pool = SqlitePool::memory().unwrap();
        let mut session = pool.session().await.unwrap();
        let reply = session
            .execute("SELECT 1 AS N, 'x' AS Label, NULL AS \"nothing\", x'00ff' AS raw", &[])
            .await
            .unwrap();

        match reply {
            EngineReply::Rows(set) => {
                assert_eq!(set.columns, vec!["N", "Label", "nothing", "raw"]);
                assert_eq!(
                    set.rows,
                    vec![vec![
                        Value::Integer(1),
                        Value::Text("x".into()),
                        Value::Null,
                        Value::Bytes(vec![0x00, 0xFF]),
                    ]]
                );
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn named_binds_are_applied() {
        let pool = SqlitePool::memory().unwrap();
        let mut session = pool.session().await.unwrap();
        let binds = vec![BindParam {
            name: "Who".into(),
            value: "scott".into(),
        }];
        let reply = session
            .execute("SELECT upper(:Who) AS who", &binds)
            .await
            .unwrap();
        match reply {
            EngineReply::Rows(set) => assert_eq!(set.rows[0][0], Value::Text("SCOTT".into())),
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dropped_session_rolls_back() {
        let pool = SqlitePool::memory().unwrap();
        pool.with_connection(|conn| Ok(conn.execute_batch("CREATE TABLE t (n INTEGER)")?))
            .await
            .unwrap();

        {
            let mut session = pool.session().await.unwrap();
            session.execute("INSERT INTO t VALUES (1)", &[]).await.unwrap();
        }

        let count: i64 = pool
            .with_connection(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))?))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn syntax_errors_are_statement_errors() {
        let pool = SqlitePool::memory().unwrap();
        let mut session = pool.session().await.unwrap();
        let err = session.execute("BAD SQL", &[]).await.unwrap_err();
        match err {
            EngineError::Statement(message) => assert!(message.contains("BAD"), "{message}"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
