//! Cache layer for lesspress
//!
//! A small pluggable key/value [`CacheStore`] (directory backed or in
//! memory) and the [`MetadataStore`] that keeps the snapshot of files read by
//! the last successful compile under a fixed key.

pub mod metadata;
pub mod store;

pub use metadata::*;
pub use store::*;
