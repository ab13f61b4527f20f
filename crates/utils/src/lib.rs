//! Shared utilities for lesspress
//!
//! This crate provides the file system capability used by the build pipeline,
//! atomic writes for artifacts and cache entries, and tracing setup.

pub mod atomic_file;
pub mod file_stat;
pub mod fs;
pub mod tracing;

pub use atomic_file::*;
pub use file_stat::*;
pub use fs::*;
