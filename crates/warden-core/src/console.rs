//! Request-level entry point
//!
//! [`Console`] ties the pieces together for one execution request: pick the
//! script for the engine's version, fill in variables, run it over a single
//! connection and hand back per-statement results.

use crate::exec::{ConnectionProvider, ExecutionEngine, ExecutionError, StatementResult};
use crate::script::{Access, ScriptIdentifier, ScriptResolver, ScriptStore};
use crate::sessions::{self, RelationshipEntry, SessionRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use warden_config::WardenConfig;
use warden_query::{substitute, VariableMap};

/// Where a request's script text comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptSource {
    /// A script in the store, resolved for the engine's version
    Identifier(String),
    /// Script text supplied directly by the caller
    Raw(String),
}

/// One execution request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub script: ScriptSource,
    /// Engine version used to pick the script tier; asked from the server
    /// when absent
    #[serde(default)]
    pub engine_version: Option<String>,
    #[serde(default)]
    pub variables: VariableMap,
    #[serde(default)]
    pub auto_commit: bool,
}

impl ExecutionRequest {
    pub fn identifier(identifier: impl Into<String>) -> Self {
        Self::new(ScriptSource::Identifier(identifier.into()))
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(ScriptSource::Raw(sql.into()))
    }

    fn new(script: ScriptSource) -> Self {
        Self {
            script,
            engine_version: None,
            variables: VariableMap::new(),
            auto_commit: false,
        }
    }

    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = Some(version.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.variables.insert(name, value);
        self
    }

    pub fn with_variables(mut self, variables: VariableMap) -> Self {
        self.variables = variables;
        self
    }

    pub fn auto_commit(mut self, auto_commit: bool) -> Self {
        self.auto_commit = auto_commit;
        self
    }
}

pub struct Console {
    resolver: ScriptResolver,
    store: ScriptStore,
    engine: ExecutionEngine,
    provider: Arc<dyn ConnectionProvider>,
}

impl Console {
    pub fn new(config: &WardenConfig, provider: Arc<dyn ConnectionProvider>) -> Self {
        Self {
            resolver: ScriptResolver::from_config(config),
            store: ScriptStore::new(&config.scripts),
            engine: ExecutionEngine::new(&config.execution),
            provider,
        }
    }

    pub fn resolver(&self) -> &ScriptResolver {
        &self.resolver
    }

    pub fn store(&self) -> &ScriptStore {
        &self.store
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    /// Run a request on behalf of an outside caller
    pub async fn execute(
        &self,
        request: ExecutionRequest,
    ) -> Result<Vec<StatementResult>, ExecutionError> {
        self.execute_as(request, Access::User).await
    }

    /// Run a request with the given access level.
    ///
    /// Store scripts have every placeholder form substituted inline and run
    /// without binds. Raw text runs with the variables as binds. Either way a
    /// single connection serves the whole request.
    pub async fn execute_as(
        &self,
        request: ExecutionRequest,
        access: Access,
    ) -> Result<Vec<StatementResult>, ExecutionError> {
        if let ScriptSource::Identifier(identifier) = &request.script {
            let id = ScriptIdentifier::parse(identifier)?;
            self.resolver.check_access(&id, access)?;
        }

        let mut conn = self.provider.acquire().await.map_err(|e| {
            error!(error = %e, "Failed to acquire connection");
            ExecutionError::Connection(e)
        })?;

        match request.script {
            ScriptSource::Identifier(identifier) => {
                let version = match request.engine_version {
                    Some(version) => Some(version),
                    None => conn.server_version().await.unwrap_or_else(|e| {
                        warn!(error = %e, "Could not read server version, assuming legacy tier");
                        None
                    }),
                };

                let script = self.resolver.load(&identifier, version.as_deref(), access)?;
                info!(
                    identifier = %script.identifier,
                    tier = %script.tier,
                    path = %script.path.display(),
                    "Running stored script"
                );

                let text = substitute(&script.text, &request.variables);
                self.engine
                    .execute_on(&mut *conn, &text, None, request.auto_commit)
                    .await
            }
            ScriptSource::Raw(sql) => {
                self.engine
                    .execute_on(&mut *conn, &sql, Some(&request.variables), request.auto_commit)
                    .await
            }
        }
    }

    /// Blocking chains for a session snapshot, optionally for one node
    pub fn blocking_graph(
        &self,
        records: &[SessionRecord],
        node_id: Option<i64>,
    ) -> Vec<RelationshipEntry> {
        sessions::blocking_graph(records, node_id)
    }
}
