//! Core domain types, errors, and constants for `lesspress`.
//!
//! ## Key Components
//!
//! - **`errors`**: the primary `Error` enum and `Result` alias shared by every
//!   crate in the workspace.
//! - **`types`**: build configuration and the metadata snapshot recorded after
//!   each successful compile.
//! - **`constants`**: template file layout, cache keys and environment
//!   variable names.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::*,
};
