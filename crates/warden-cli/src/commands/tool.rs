use anyhow::{bail, Result};
use warden_config::WardenConfig;
use warden_core::{Access, ExecutionRegistry, ExecutionStatus, ScriptResolver, ToolCommand, ToolKind};

use crate::cli::OutputFormat;
use crate::output;

pub async fn execute(
    config: &WardenConfig,
    tool: &str,
    identifier: &str,
    connect: &str,
    engine_version: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let kind: ToolKind = tool.parse()?;
    let resolver = ScriptResolver::from_config(config);
    let script = resolver.resolve(identifier, engine_version, Access::User)?;

    let command = ToolCommand::for_script(&kind, connect, &script, &config.tools);
    let registry = ExecutionRegistry::from_config(&config.tools);
    let record = registry.run(command).await?;
    println!("{}", output::format_execution(&record, format)?);

    match record.status {
        ExecutionStatus::Finished => Ok(()),
        ExecutionStatus::TimedOut => bail!(
            "{} timed out after {}s",
            record.tool,
            config.tools.timeout_seconds
        ),
        _ => bail!("{} failed", record.tool),
    }
}
