//! Statement batch execution

use super::{
    ConnectionProvider, EngineConnection, EngineReply, ExecutionError, Grid, StatementOutcome,
    StatementResult,
};
use tracing::{debug, error, info, warn};
use warden_config::ExecutionConfig;
use warden_query::{
    referenced_binds, substitute_with, DirectiveSet, ScriptSplitter, Sigil, Statement, VariableMap,
};

/// Runs scripts statement by statement over one connection
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    splitter: ScriptSplitter,
    success_message: String,
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new(&ExecutionConfig::default())
    }
}

impl ExecutionEngine {
    pub fn new(config: &ExecutionConfig) -> Self {
        Self {
            splitter: ScriptSplitter::new(DirectiveSet::new(&config.directive_keywords)),
            success_message: config.success_message.clone(),
        }
    }

    /// Statements `text` would run as, directives removed
    pub fn split(&self, text: &str) -> Vec<Statement> {
        self.splitter.split(text)
    }

    /// Acquire a connection from `provider` and run `text` on it.
    ///
    /// The connection is dropped, and so released, before this returns on
    /// every path.
    pub async fn execute(
        &self,
        provider: &dyn ConnectionProvider,
        text: &str,
        binds: Option<&VariableMap>,
        auto_commit: bool,
    ) -> Result<Vec<StatementResult>, ExecutionError> {
        let mut conn = provider.acquire().await.map_err(|e| {
            error!(error = %e, "Failed to acquire connection");
            ExecutionError::Connection(e)
        })?;

        self.execute_on(&mut *conn, text, binds, auto_commit).await
    }

    /// Run `text` on an already open connection.
    ///
    /// With `binds`, each statement first has `$name` placeholders inlined
    /// and is then bound natively with the variables it references as
    /// `:name`. With `auto_commit`, the whole batch is committed once after
    /// the last statement, whether or not individual statements failed.
    pub async fn execute_on(
        &self,
        conn: &mut dyn EngineConnection,
        text: &str,
        binds: Option<&VariableMap>,
        auto_commit: bool,
    ) -> Result<Vec<StatementResult>, ExecutionError> {
        let statements = self.splitter.split(text);
        let total = statements.len();
        let mut results = Vec::with_capacity(total);

        for (ordinal, statement) in statements.into_iter().enumerate() {
            let line = statement.line;
            let (sql, params) = match binds {
                Some(vars) => {
                    let sql = substitute_with(&statement.text, vars, &[Sigil::Dollar]);
                    let params = referenced_binds(&sql, vars);
                    (sql, params)
                }
                None => (statement.text, Vec::new()),
            };

            debug!(
                statement = ordinal + 1,
                total,
                line,
                binds = params.len(),
                "Executing statement"
            );

            let outcome = match conn.execute(&sql, &params).await {
                Ok(EngineReply::Rows(set)) => StatementOutcome::Grid {
                    data: Grid::from(set),
                },
                Ok(EngineReply::Done { rows_affected }) => StatementOutcome::Message {
                    text: self.success_message.clone(),
                    rows_affected,
                },
                Err(e) => {
                    warn!(statement = ordinal + 1, line, error = %e, "Statement failed");
                    StatementOutcome::Error {
                        message: e.to_string(),
                    }
                }
            };

            results.push(StatementResult { outcome, sql, line });
        }

        if auto_commit {
            conn.commit().await.map_err(|e| {
                error!(error = %e, "Commit failed");
                ExecutionError::Commit(e)
            })?;
            info!(statements = total, "Committed batch");
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::mock::MockProvider;
    use crate::exec::EngineError;

    fn vars(pairs: &[(&str, &str)]) -> VariableMap {
        pairs.iter().copied().collect()
    }

    #[tokio::test]
    async fn failing_statement_does_not_abort_batch() {
        let provider = MockProvider::default();
        let results = ExecutionEngine::default()
            .execute(&provider, "SELECT 1 FROM x; BAD SQL; UPDATE t SET a = 1;", None, false)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].grid().is_some());
        assert!(results[1].error_message().unwrap().contains("BAD"));
        assert_eq!(results[1].sql, "BAD SQL");
        assert!(matches!(
            results[2].outcome,
            StatementOutcome::Message { rows_affected: 1, .. }
        ));
    }

    #[tokio::test]
    async fn every_statement_failing_still_yields_one_result_each() {
        let provider = MockProvider::default();
        let results = ExecutionEngine::default()
            .execute(&provider, "BAD 1; BAD 2; BAD 3; BAD 4;", None, true)
            .await
            .unwrap();

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(StatementResult::is_error));
        assert_eq!(provider.log().commits, 1);
    }

    #[tokio::test]
    async fn statements_starting_with_a_literal_are_sent_whole() {
        let provider = MockProvider::default();
        let results = ExecutionEngine::default()
            .execute(&provider, "SELECT 1 FROM x; 'oops'; 'BAD' || x;", None, false)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        let sql: Vec<&str> = results.iter().map(|r| r.sql.as_str()).collect();
        assert_eq!(sql, vec!["SELECT 1 FROM x", "'oops'", "'BAD' || x"]);
        assert!(results[2].is_error());
        assert_eq!(provider.log().executed.len(), 3);
    }

    #[tokio::test]
    async fn without_auto_commit_nothing_is_committed() {
        let provider = MockProvider::default();
        ExecutionEngine::default()
            .execute(&provider, "INSERT INTO t VALUES (1); BAD;", None, false)
            .await
            .unwrap();

        let log = provider.log();
        assert_eq!(log.commits, 0);
        assert_eq!(log.acquired, 1);
        assert_eq!(log.released, 1);
    }

    #[tokio::test]
    async fn auto_commit_commits_once_per_batch() {
        let provider = MockProvider::default();
        ExecutionEngine::default()
            .execute(
                &provider,
                "INSERT INTO t VALUES (1);\nINSERT INTO t VALUES (2);\nINSERT INTO t VALUES (3);",
                None,
                true,
            )
            .await
            .unwrap();

        assert_eq!(provider.log().commits, 1);
    }

    #[tokio::test]
    async fn dollar_variables_are_inlined_and_colon_variables_bound() {
        let provider = MockProvider::default();
        let binds = vars(&[("OWNER", "HR"), ("sid", "42"), ("unused", "x")]);
        let results = ExecutionEngine::default()
            .execute(
                &provider,
                "SELECT * FROM dba_tables WHERE owner = '$owner';\nSELECT * FROM v$session WHERE sid = :SID;",
                Some(&binds),
                false,
            )
            .await
            .unwrap();

        assert_eq!(results[0].sql, "SELECT * FROM dba_tables WHERE owner = 'HR'");
        assert_eq!(results[1].sql, "SELECT * FROM v$session WHERE sid = :SID");

        let log = provider.log();
        assert!(log.executed[0].1.is_empty());
        assert_eq!(log.executed[1].1.len(), 1);
        assert_eq!(log.executed[1].1[0].name, "SID");
        assert_eq!(log.executed[1].1[0].value, "42");
    }

    #[tokio::test]
    async fn directives_never_reach_the_connection() {
        let provider = MockProvider::default();
        let results = ExecutionEngine::default()
            .execute(
                &provider,
                "SET LINESIZE 200\nCOLUMN sid FORMAT 9999\nSELECT sid FROM v$session;\nPROMPT done\n",
                None,
                false,
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(provider.log().executed.len(), 1);
    }

    #[tokio::test]
    async fn connection_failure_is_request_level() {
        let provider = MockProvider {
            fail_acquire: true,
            ..MockProvider::default()
        };
        let err = ExecutionEngine::default()
            .execute(&provider, "SELECT 1 FROM dual;", None, true)
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::Connection(EngineError::Connection(_))));
        assert!(provider.log().executed.is_empty());
    }

    #[tokio::test]
    async fn commit_failure_is_request_level_and_releases_connection() {
        let provider = MockProvider {
            fail_commit: true,
            ..MockProvider::default()
        };
        let err = ExecutionEngine::default()
            .execute(&provider, "INSERT INTO t VALUES (1);", None, true)
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::Commit(_)));
        assert_eq!(provider.log().released, 1);
    }

    #[tokio::test]
    async fn grid_columns_are_lower_cased() {
        let provider = MockProvider::default();
        let results = ExecutionEngine::default()
            .execute(&provider, "SELECT 1 AS N FROM dual", None, false)
            .await
            .unwrap();

        let grid = results[0].grid().unwrap();
        assert_eq!(grid.columns, vec!["n"]);
    }
}
