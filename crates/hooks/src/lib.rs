//! Render hooks for lesspress
//!
//! This crate connects the incremental LESS build to a page render:
//! - `on_before_render` builds (or cleans up) the active template's stylesheet
//! - `on_after_render` marks LESS stylesheet links for the browser compiler
//! - build failures become user-visible messages instead of failed renders

pub mod context;
pub mod plugin;
pub mod rewrite;

pub use context::*;
pub use plugin::*;
pub use rewrite::*;
