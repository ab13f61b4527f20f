//! Configuration for lesspress
//!
//! Plugin parameters (which templates, which compile mode, which artifacts)
//! and the site settings the build needs to find its files.

pub mod config;
pub mod loader;

pub use config::*;
pub use loader::ConfigLoader;
