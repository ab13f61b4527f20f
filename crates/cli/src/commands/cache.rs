use lesspress_config::Config;
use lesspress_hooks::LessPlugin;

pub fn clear(config: &Config) -> eyre::Result<()> {
    LessPlugin::from_config(config).clear_cache()?;
    tracing::info!("Metadata cache cleared");
    println!("Cache cleared");
    Ok(())
}
