//! Configuration loader for lesspress
//!
//! Resolves the config file, applies `LESSPRESS_*` environment overrides and
//! fills in site defaults.

use crate::config::{
    default_cache_dir, normalize_base_uri, parse_flag, Config, PluginParams, SiteSettings,
};
use lesspress_core::{
    constants::{
        CONFIG_FILENAME, LESSPRESS_COMPILE_VAR, LESSPRESS_CONFIG_VAR, LESSPRESS_FORCE_VAR,
        LESSPRESS_LESSC_VAR, LESSPRESS_SOURCEMAP_VAR, LESSPRESS_TEMPLATES_VAR,
        LESSPRESS_UNCOMPRESSED_VAR,
    },
    CompileMode, Error, Result,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// On-disk shape of `lesspress.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    site_root: Option<PathBuf>,
    base_uri: Option<String>,
    cache_dir: Option<PathBuf>,
    lessc: Option<PathBuf>,
    params: PluginParams,
}

/// Builds a [`Config`] from file, environment and explicit overrides
pub struct ConfigLoader {
    /// Explicit config file, wins over discovery
    config_path: Option<PathBuf>,
    /// Explicit site root, wins over the file's `site_root`
    site_root: Option<PathBuf>,
    /// Whether `LESSPRESS_*` variables are consulted
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            site_root: None,
            use_env: true,
        }
    }

    /// Load from this file instead of discovering one
    pub fn config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Set the site root
    pub fn site_root(mut self, dir: PathBuf) -> Self {
        self.site_root = Some(dir);
        self
    }

    /// Enable or disable environment overrides
    pub fn use_env(mut self, enabled: bool) -> Self {
        self.use_env = enabled;
        self
    }

    /// Load the configuration
    pub fn load(self) -> Result<Config> {
        if self.use_env {
            self.load_with(|name| std::env::var(name).ok())
        } else {
            self.load_with(|_| None)
        }
    }

    fn load_with<F>(self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::file_system(".", "determine working directory", e))?;

        let config_path = self
            .config_path
            .clone()
            .or_else(|| lookup(LESSPRESS_CONFIG_VAR).map(PathBuf::from))
            .or_else(|| {
                let base = self.site_root.as_deref().unwrap_or(&cwd);
                let candidate = base.join(CONFIG_FILENAME);
                candidate.is_file().then_some(candidate)
            });

        let (file, file_dir) = match &config_path {
            Some(path) => (read_config_file(path)?, path.parent().map(Path::to_path_buf)),
            None => {
                debug!("No {CONFIG_FILENAME} found, using defaults");
                (ConfigFile::default(), None)
            }
        };

        let anchor = file_dir.clone().unwrap_or_else(|| cwd.clone());
        let site_root = match (self.site_root, file.site_root) {
            (Some(explicit), _) => explicit,
            (None, Some(from_file)) => anchor.join(from_file),
            (None, None) => anchor.clone(),
        };

        let mut site = SiteSettings::new(site_root);
        if let Some(uri) = file.base_uri {
            site.base_uri = normalize_base_uri(&uri);
        }
        site.cache_dir = file
            .cache_dir
            .map(|dir| anchor.join(dir))
            .unwrap_or_else(default_cache_dir);
        site.lessc = file.lessc.map(|program| resolve_program(&anchor, program));

        let mut config = Config {
            params: file.params,
            site,
        };
        apply_env_overrides(&mut config, lookup)?;

        trace!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

/// A program given with a directory part is taken relative to the config
/// file; a bare name is left for the `PATH` lookup
fn resolve_program(anchor: &Path, program: PathBuf) -> PathBuf {
    if program.is_relative() && program.components().count() > 1 {
        anchor.join(program)
    } else {
        program
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    debug!("Reading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::file_system(path, "read config file", e))?;
    serde_json::from_str(&content).map_err(|e| Error::Json {
        message: format!("Failed to parse config file {}", path.display()),
        source: e,
    })
}

fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(templates) = lookup(LESSPRESS_TEMPLATES_VAR) {
        config.params.templates = templates
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(mode) = lookup(LESSPRESS_COMPILE_VAR) {
        config.params.compile = mode.parse::<CompileMode>()?;
    }

    let flags: [(&str, &mut bool); 3] = [
        (LESSPRESS_FORCE_VAR, &mut config.params.force),
        (LESSPRESS_SOURCEMAP_VAR, &mut config.params.generate_sourcemap),
        (LESSPRESS_UNCOMPRESSED_VAR, &mut config.params.generate_uncompressed),
    ];
    for (var, slot) in flags {
        if let Some(value) = lookup(var) {
            *slot = parse_flag(&value).ok_or_else(|| {
                Error::configuration(format!("{var} must be a boolean, got '{value}'"))
            })?;
        }
    }

    if let Some(lessc) = lookup(LESSPRESS_LESSC_VAR) {
        config.site.lessc = Some(PathBuf::from(lessc));
    }

    Ok(())
}
