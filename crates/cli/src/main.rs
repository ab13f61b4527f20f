use clap::Parser;
use lesspress_config::ConfigLoader;
use std::path::PathBuf;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "lesspress")]
#[command(about = "Keep template stylesheets compiled from their LESS sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to lesspress.json in the site root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing templates/
    #[arg(long, global = true)]
    site_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    lesspress_utils::tracing::init().map_err(|e| eyre::eyre!(e))?;

    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config {
        loader = loader.config_path(path);
    }
    if let Some(root) = cli.site_root {
        loader = loader.site_root(root);
    }
    let config = loader.load()?;

    cli.command.execute(&config)
}
