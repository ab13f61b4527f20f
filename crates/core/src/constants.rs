/// Constants used throughout the lesspress codebase
// Template layout, relative to `<site_root>/templates/<template>`
pub const LESS_FILE: &str = "less/template.less";
pub const CSS_FILE_UNCOMPRESSED: &str = "css/template.css";
pub const CSS_FILE_COMPRESSED: &str = "css/template.min.css";
pub const CSS_FILE_SOURCEMAP: &str = "css/template.css.map";
pub const TEMPLATES_DIR: &str = "templates";

// Browser-side compiler shipped with the plugin media
pub const CLIENT_COMPILER_SCRIPT: &str = "media/plg_system_jless/js/less.min.js";

// Metadata cache
pub const CACHE_GROUP: &str = "jless";
pub const CACHE_KEY: &str = "file.metadata";

// Configuration
pub const CONFIG_FILENAME: &str = "lesspress.json";
pub const DEFAULT_BASE_URI: &str = "/";
pub const LESSC_BINARY: &str = "lessc";

// Environment variable names
pub const LESSPRESS_CONFIG_VAR: &str = "LESSPRESS_CONFIG";
pub const LESSPRESS_TEMPLATES_VAR: &str = "LESSPRESS_TEMPLATES";
pub const LESSPRESS_COMPILE_VAR: &str = "LESSPRESS_COMPILE";
pub const LESSPRESS_FORCE_VAR: &str = "LESSPRESS_FORCE";
pub const LESSPRESS_SOURCEMAP_VAR: &str = "LESSPRESS_GENERATE_SOURCEMAP";
pub const LESSPRESS_UNCOMPRESSED_VAR: &str = "LESSPRESS_GENERATE_UNCOMPRESSED";
pub const LESSPRESS_LESSC_VAR: &str = "LESSPRESS_LESSC";
