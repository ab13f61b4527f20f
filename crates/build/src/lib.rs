//! Incremental LESS build for lesspress
//!
//! - [`staleness`] decides, without side effects, whether the published CSS
//!   still reflects the sources recorded after the last compile.
//! - [`compiler`] is the seam to the external LESS compiler, with
//!   [`lessc::LesscCompiler`] as the production adapter.
//! - [`publisher`] writes or deletes individual artifacts atomically.
//! - [`orchestrator`] ties them together for one render.

pub mod compiler;
pub mod layout;
pub mod lessc;
pub mod orchestrator;
pub mod publisher;
pub mod staleness;

pub use compiler::{CompileOptions, CompileOutput, LessCompiler, SourceMapOptions};
pub use layout::{SiteLayout, TemplateLayout};
pub use lessc::LesscCompiler;
pub use orchestrator::{BuildOrchestrator, BuildOutcome};
pub use publisher::{ArtifactPublisher, PublishAction};
pub use staleness::{assess, is_stale, Staleness};
