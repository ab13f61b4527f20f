//! Decides whether the published stylesheet must be rebuilt.
//!
//! Pure: the snapshot, the source map's presence and a probe for current file
//! facts are all passed in, so the rules can be exercised without touching a
//! disk.

use lesspress_core::{BuildConfig, FileStat, MetadataSnapshot};
use std::fmt;
use std::path::{Path, PathBuf};

/// Verdict of [`assess`], naming the first rule that fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// Nothing recorded: never compiled, or the cache was cleared
    NoSnapshot,
    /// A source map exists but maps are disabled
    StraySourceMap,
    /// Maps are enabled but none exists
    MissingSourceMap,
    /// A tracked source file disappeared
    SourceMissing(PathBuf),
    /// A tracked source file has a different size or mtime
    SourceChanged(PathBuf),
    Fresh,
}

impl Staleness {
    pub fn is_stale(&self) -> bool {
        !matches!(self, Staleness::Fresh)
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staleness::NoSnapshot => write!(f, "no metadata recorded"),
            Staleness::StraySourceMap => write!(f, "source map present but disabled"),
            Staleness::MissingSourceMap => write!(f, "source map enabled but missing"),
            Staleness::SourceMissing(path) => write!(f, "{} was removed", path.display()),
            Staleness::SourceChanged(path) => write!(f, "{} changed", path.display()),
            Staleness::Fresh => write!(f, "up to date"),
        }
    }
}

/// Apply the staleness rules in order, stopping at the first that fires.
///
/// Every tracked file is checked, imports included, so touching only an
/// imported file is enough to make the build stale.
pub fn assess<F>(
    snapshot: Option<&MetadataSnapshot>,
    sourcemap_exists: bool,
    config: &BuildConfig,
    mut probe: F,
) -> Staleness
where
    F: FnMut(&Path) -> Option<FileStat>,
{
    let Some(snapshot) = snapshot else {
        return Staleness::NoSnapshot;
    };

    if sourcemap_exists && !config.generate_sourcemap {
        return Staleness::StraySourceMap;
    }
    if !sourcemap_exists && config.generate_sourcemap {
        return Staleness::MissingSourceMap;
    }

    for (path, record) in snapshot.iter() {
        match probe(path) {
            None => return Staleness::SourceMissing(path.to_path_buf()),
            Some(stat) if !record.matches(&stat) => {
                return Staleness::SourceChanged(path.to_path_buf())
            }
            Some(_) => {}
        }
    }

    Staleness::Fresh
}

pub fn is_stale<F>(
    snapshot: Option<&MetadataSnapshot>,
    sourcemap_exists: bool,
    config: &BuildConfig,
    probe: F,
) -> bool
where
    F: FnMut(&Path) -> Option<FileStat>,
{
    assess(snapshot, sourcemap_exists, config, probe).is_stale()
}
