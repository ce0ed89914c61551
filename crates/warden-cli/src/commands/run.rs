use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use warden_config::WardenConfig;
use warden_core::{Console, ExecutionRequest};
use warden_query::VariableMap;
use warden_sqlite::{SqliteConfig, SqlitePool};

use crate::cli::OutputFormat;
use crate::output;

pub struct RunArgs {
    pub identifier: Option<String>,
    pub sql: Option<String>,
    pub variables: Vec<(String, String)>,
    pub commit: bool,
    pub engine_version: Option<String>,
    pub format: OutputFormat,
}

pub async fn execute(config: &WardenConfig, db: &Path, args: RunArgs) -> Result<()> {
    let pool = SqlitePool::new(SqliteConfig::new(db))
        .with_context(|| format!("Failed to open database {}", db.display()))?;
    let console = Console::new(config, Arc::new(pool));

    let mut request = match (args.identifier, args.sql) {
        (Some(identifier), _) => ExecutionRequest::identifier(identifier),
        (None, Some(sql)) => ExecutionRequest::raw(sql),
        (None, None) => bail!("Nothing to run: give a script identifier or --sql"),
    };
    if let Some(version) = args.engine_version {
        request = request.with_engine_version(version);
    }
    let variables: VariableMap = args.variables.into_iter().collect();
    debug!(variables = variables.len(), commit = args.commit, "Running request");
    let request = request.with_variables(variables).auto_commit(args.commit);

    let results = console.execute(request).await?;
    println!("{}", output::format_results(&results, args.format)?);

    let failed = results.iter().filter(|r| r.is_error()).count();
    if failed > 0 {
        bail!("{} of {} statements failed", failed, results.len());
    }
    Ok(())
}
