use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::{Error, Result};

/// Size and modification time of a file at the moment it was probed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    pub size: u64,
    /// Seconds since the Unix epoch
    pub modified: i64,
}

/// One file that took part in the last successful compile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFileRecord {
    pub path: PathBuf,
    #[serde(rename = "filesize")]
    pub filesize_bytes: u64,
    #[serde(rename = "modified")]
    pub modified_at_epoch: i64,
}

impl SourceFileRecord {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, stat: FileStat) -> Self {
        Self {
            path: path.into(),
            filesize_bytes: stat.size,
            modified_at_epoch: stat.modified,
        }
    }

    /// Whether the probed state still matches what was recorded
    #[must_use]
    pub fn matches(&self, stat: &FileStat) -> bool {
        self.filesize_bytes == stat.size && self.modified_at_epoch == stat.modified
    }
}

/// Every file read by the last successful compile, in the order the compiler
/// reported them.
///
/// A snapshot is only ever built whole from a compile result and replaces the
/// previous one; it is never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SourceFileRecord>", into = "Vec<SourceFileRecord>")]
pub struct MetadataSnapshot {
    files: IndexMap<PathBuf, SourceFileRecord>,
}

impl MetadataSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file. A path reported twice keeps its first position.
    pub fn record(&mut self, record: SourceFileRecord) {
        self.files.insert(record.path.clone(), record);
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&SourceFileRecord> {
        self.files.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &SourceFileRecord)> {
        self.files.iter().map(|(path, record)| (path.as_path(), record))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl From<Vec<SourceFileRecord>> for MetadataSnapshot {
    fn from(records: Vec<SourceFileRecord>) -> Self {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.record(record);
        }
        snapshot
    }
}

impl From<MetadataSnapshot> for Vec<SourceFileRecord> {
    fn from(snapshot: MetadataSnapshot) -> Self {
        snapshot.files.into_values().collect()
    }
}

impl FromIterator<SourceFileRecord> for MetadataSnapshot {
    fn from_iter<I: IntoIterator<Item = SourceFileRecord>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for record in iter {
            snapshot.record(record);
        }
        snapshot
    }
}

/// Where the stylesheet gets compiled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileMode {
    /// Compile on the server and publish CSS artifacts
    #[default]
    #[serde(alias = "gpeasy", alias = "less.php")]
    Server,
    /// Ship the raw LESS source and let the browser compile it
    #[serde(alias = "less.js")]
    Client,
}

impl fmt::Display for CompileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileMode::Server => write!(f, "server"),
            CompileMode::Client => write!(f, "client"),
        }
    }
}

impl FromStr for CompileMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" | "gpeasy" | "less.php" => Ok(CompileMode::Server),
            "client" | "less.js" => Ok(CompileMode::Client),
            other => Err(Error::configuration(format!(
                "unknown compile mode '{other}', expected 'server' or 'client'"
            ))),
        }
    }
}

/// Per-invocation build settings. The build pipeline only ever reads these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub template_allow_list: BTreeSet<String>,
    pub compile_mode: CompileMode,
    pub force: bool,
    pub generate_sourcemap: bool,
    pub generate_uncompressed: bool,
}

impl BuildConfig {
    /// Returns the template name when it is one the build applies to
    #[must_use]
    pub fn active_template<'a>(&self, template: Option<&'a str>) -> Option<&'a str> {
        template.filter(|name| self.template_allow_list.contains(*name))
    }
}

/// The files a server-side build publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    CompressedCss,
    UncompressedCss,
    SourceMap,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::CompressedCss => write!(f, "compressed css"),
            ArtifactKind::UncompressedCss => write!(f, "uncompressed css"),
            ArtifactKind::SourceMap => write!(f, "source map"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(size: u64, modified: i64) -> FileStat {
        FileStat { size, modified }
    }

    #[test]
    fn test_snapshot_keeps_compiler_order() {
        let snapshot: MetadataSnapshot = vec![
            SourceFileRecord::new("/t/less/template.less", stat(10, 1)),
            SourceFileRecord::new("/t/less/vars.less", stat(20, 2)),
            SourceFileRecord::new("/t/less/mixins.less", stat(30, 3)),
        ]
        .into();

        let paths: Vec<_> = snapshot.iter().map(|(p, _)| p.to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/t/less/template.less"),
                PathBuf::from("/t/less/vars.less"),
                PathBuf::from("/t/less/mixins.less"),
            ]
        );
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot: MetadataSnapshot =
            vec![SourceFileRecord::new("/t/less/template.less", stat(14, 1700000000))].into();

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(
            json,
            r#"[{"path":"/t/less/template.less","filesize":14,"modified":1700000000}]"#
        );

        let back: MetadataSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_record_matches() {
        let record = SourceFileRecord::new("/a.less", stat(5, 100));
        assert!(record.matches(&stat(5, 100)));
        assert!(!record.matches(&stat(6, 100)));
        assert!(!record.matches(&stat(5, 101)));
    }

    #[test]
    fn test_compile_mode_parsing() {
        assert_eq!("server".parse::<CompileMode>().unwrap(), CompileMode::Server);
        assert_eq!("gpeasy".parse::<CompileMode>().unwrap(), CompileMode::Server);
        assert_eq!("Client".parse::<CompileMode>().unwrap(), CompileMode::Client);
        assert_eq!("less.js".parse::<CompileMode>().unwrap(), CompileMode::Client);
        assert!("browser".parse::<CompileMode>().is_err());

        let mode: CompileMode = serde_json::from_str(r#""less.js""#).unwrap();
        assert_eq!(mode, CompileMode::Client);
        assert_eq!(serde_json::to_string(&CompileMode::Server).unwrap(), r#""server""#);
    }

    #[test]
    fn test_active_template() {
        let config = BuildConfig {
            template_allow_list: ["protostar".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(config.active_template(Some("protostar")), Some("protostar"));
        assert_eq!(config.active_template(Some("beez3")), None);
        assert_eq!(config.active_template(None), None);
    }
}
