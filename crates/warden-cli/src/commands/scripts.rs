use anyhow::Result;
use warden_config::WardenConfig;
use warden_core::ScriptStore;

use crate::cli::ScriptsCommands;

pub fn execute(config: &WardenConfig, command: ScriptsCommands) -> Result<()> {
    let store = ScriptStore::new(&config.scripts);
    let identifiers = match command {
        ScriptsCommands::List => store.list()?,
        ScriptsCommands::Search { needle } => store.search(&needle)?,
    };

    for identifier in identifiers {
        println!("{identifier}");
    }
    Ok(())
}
