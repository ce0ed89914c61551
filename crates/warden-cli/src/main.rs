use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use warden_cli::{
    cli::{Cli, Commands},
    commands, config,
};
use warden_config::WardenConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load(cli.config.clone(), cli.scripts_root.clone())?;
    init_logging(&cli, &config);

    match cli.command {
        Commands::Resolve {
            identifier,
            engine_version,
        } => commands::resolve::execute(&config, &identifier, engine_version.as_deref()),

        Commands::Run {
            identifier,
            sql,
            db,
            variables,
            commit,
            engine_version,
            format,
        } => {
            let args = commands::run::RunArgs {
                identifier,
                sql,
                variables,
                commit,
                engine_version,
                format,
            };
            commands::run::execute(&config, &db, args).await
        }

        Commands::Scripts(command) => commands::scripts::execute(&config, command),

        Commands::Blocking {
            input,
            node,
            format,
        } => commands::blocking::execute(&input, node, format),

        Commands::Tool {
            tool,
            identifier,
            connect,
            engine_version,
            format,
        } => {
            commands::tool::execute(
                &config,
                &tool,
                &identifier,
                &connect,
                engine_version.as_deref(),
                format,
            )
            .await
        }
    }
}

/// Command line level first, then `RUST_LOG`, then the config file
fn init_logging(cli: &Cli, config: &WardenConfig) {
    let filter = match cli.requested_level() {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
