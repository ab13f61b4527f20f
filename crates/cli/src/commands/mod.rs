use clap::Subcommand;
use lesspress_config::Config;
use std::path::PathBuf;

pub mod cache;
pub mod render;
pub mod status;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the render hooks for one page and print the resulting body
    Render {
        /// Template rendering the page
        #[arg(short, long)]
        template: String,

        /// Render as the administrator application, which the build ignores
        #[arg(long)]
        admin: bool,

        /// HTML body to run through the hooks (defaults to an empty page)
        #[arg(long)]
        body: Option<PathBuf>,
    },

    /// Show whether a template's stylesheet needs rebuilding
    Status {
        #[arg(short, long)]
        template: String,
    },

    /// Forget the recorded metadata so the next render recompiles
    ClearCache,
}

impl Commands {
    pub fn execute(self, config: &Config) -> eyre::Result<()> {
        match self {
            Commands::Render {
                template,
                admin,
                body,
            } => render::execute(config, &template, admin, body.as_deref()),
            Commands::Status { template } => status::execute(config, &template),
            Commands::ClearCache => cache::clear(config),
        }
    }
}
