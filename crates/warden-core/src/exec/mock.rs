//! Recording connection provider for unit tests

use super::{ConnectionProvider, EngineConnection, EngineError, EngineReply, RowSet};
use crate::value::Value;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use warden_query::BindParam;

#[derive(Debug, Clone, Default)]
pub(crate) struct MockLog {
    pub executed: Vec<(String, Vec<BindParam>)>,
    pub commits: usize,
    pub acquired: usize,
    pub released: usize,
}

/// Statements containing `BAD` fail; `SELECT`s return one row with column
/// `N`; anything else affects one row.
#[derive(Clone, Default)]
pub(crate) struct MockProvider {
    pub log: Arc<Mutex<MockLog>>,
    pub version: Option<String>,
    pub fail_acquire: bool,
    pub fail_commit: bool,
}

impl MockProvider {
    pub fn with_version(version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            ..Self::default()
        }
    }

    pub fn log(&self) -> MockLog {
        self.log.lock().clone()
    }
}

#[async_trait]
impl ConnectionProvider for MockProvider {
    async fn acquire(&self) -> Result<Box<dyn EngineConnection>, EngineError> {
        if self.fail_acquire {
            return Err(EngineError::Connection("listener refused the connection".into()));
        }
        self.log.lock().acquired += 1;
        Ok(Box::new(MockConnection {
            log: Arc::clone(&self.log),
            version: self.version.clone(),
            fail_commit: self.fail_commit,
        }))
    }
}

struct MockConnection {
    log: Arc<Mutex<MockLog>>,
    version: Option<String>,
    fail_commit: bool,
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.log.lock().released += 1;
    }
}

#[async_trait]
impl EngineConnection for MockConnection {
    async fn execute(
        &mut self,
        sql: &str,
        binds: &[BindParam],
    ) -> Result<EngineReply, EngineError> {
        self.log.lock().executed.push((sql.to_string(), binds.to_vec()));

        let upper = sql.to_uppercase();
        if upper.contains("BAD") {
            return Err(EngineError::Statement(format!(
                "ORA-00900: invalid SQL statement near \"{sql}\""
            )));
        }
        if upper.trim_start().starts_with("SELECT") {
            return Ok(EngineReply::Rows(RowSet {
                columns: vec!["N".into()],
                rows: vec![vec![Value::Integer(1)]],
            }));
        }
        Ok(EngineReply::Done { rows_affected: 1 })
    }

    async fn commit(&mut self) -> Result<(), EngineError> {
        if self.fail_commit {
            return Err(EngineError::Transaction("ORA-02091: transaction rolled back".into()));
        }
        self.log.lock().commits += 1;
        Ok(())
    }

    async fn server_version(&mut self) -> Result<Option<String>, EngineError> {
        Ok(self.version.clone())
    }
}
