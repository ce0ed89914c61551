use anyhow::Result;
use warden_config::WardenConfig;
use warden_core::{Access, ScriptResolver};

pub fn execute(config: &WardenConfig, identifier: &str, engine_version: Option<&str>) -> Result<()> {
    let resolver = ScriptResolver::from_config(config);
    let path = resolver.resolve(identifier, engine_version, Access::User)?;
    println!("{}", path.display());
    Ok(())
}
