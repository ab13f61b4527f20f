//! Plugin configuration for lesspress
//!
//! `Config` is the immutable result of loading: the plugin parameters that
//! become a [`BuildConfig`] for every render, plus the site settings that tell
//! the build where templates, the cache and the compiler live.

use lesspress_core::{BuildConfig, CompileMode, DEFAULT_BASE_URI};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Parameters as the site administrator sets them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginParams {
    /// Templates the build applies to
    pub templates: Vec<String>,

    /// `server` (default) or `client`
    pub compile: CompileMode,

    /// Skip the staleness check and always recompile
    #[serde(deserialize_with = "flexible_bool")]
    pub force: bool,

    /// Emit and track `template.css.map`
    #[serde(deserialize_with = "flexible_bool")]
    pub generate_sourcemap: bool,

    /// Also emit unminified `template.css`
    #[serde(deserialize_with = "flexible_bool")]
    pub generate_uncompressed: bool,
}

impl Default for PluginParams {
    fn default() -> Self {
        Self {
            templates: Vec::new(),
            compile: CompileMode::Server,
            force: false,
            generate_sourcemap: true,
            generate_uncompressed: false,
        }
    }
}

impl PluginParams {
    #[must_use]
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            template_allow_list: self.templates.iter().cloned().collect(),
            compile_mode: self.compile,
            force: self.force,
            generate_sourcemap: self.generate_sourcemap,
            generate_uncompressed: self.generate_uncompressed,
        }
    }
}

/// Where things live on this site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    /// Directory containing `templates/`
    pub site_root: PathBuf,

    /// Public URL prefix of the site, always ending in `/`
    pub base_uri: String,

    /// Root of the metadata cache
    pub cache_dir: PathBuf,

    /// Explicit compiler binary, looked up on `PATH` when unset
    pub lessc: Option<PathBuf>,
}

impl SiteSettings {
    pub fn new(site_root: impl Into<PathBuf>) -> Self {
        Self {
            site_root: site_root.into(),
            base_uri: DEFAULT_BASE_URI.to_string(),
            cache_dir: default_cache_dir(),
            lessc: None,
        }
    }
}

/// Loaded configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub params: PluginParams,
    pub site: SiteSettings,
}

impl Config {
    #[must_use]
    pub fn build_config(&self) -> BuildConfig {
        self.params.build_config()
    }
}

/// `<platform cache dir>/lesspress`, falling back to `~/.cache/lesspress`
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join("lesspress")
}

/// Ensure a base URI ends with exactly one `/`
pub fn normalize_base_uri(uri: &str) -> String {
    let trimmed = uri.trim().trim_end_matches('/');
    format!("{trimmed}/")
}

/// Parse the boolean spellings admin forms tend to store
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(i) => Ok(i != 0),
        Flag::Text(s) => parse_flag(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid boolean flag '{s}'"))),
    }
}
