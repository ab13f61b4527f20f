use lesspress_core::Result;
use std::path::{Path, PathBuf};

/// Where and how the compiler should describe the source map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMapOptions {
    /// Final location of the map next to the compressed CSS
    pub write_to: PathBuf,
    /// URL the CSS references in its `sourceMappingURL` comment
    pub public_url: String,
    /// Prefix stripped from source paths recorded in the map
    pub base_path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub compress: bool,
    pub sourcemap: Option<SourceMapOptions>,
}

impl CompileOptions {
    pub fn compressed() -> Self {
        Self {
            compress: true,
            sourcemap: None,
        }
    }

    pub fn with_sourcemap(mut self, sourcemap: SourceMapOptions) -> Self {
        self.sourcemap = Some(sourcemap);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOutput {
    pub css: String,
    /// Map content when one was requested. The adapter never writes it to
    /// `SourceMapOptions::write_to` itself.
    pub source_map: Option<String>,
    /// Entry file first, then every import the compiler read
    pub files_read: Vec<PathBuf>,
}

/// A LESS to CSS compiler.
///
/// Implementations must report every file they consumed, and must return an
/// error for syntax errors or unreadable imports instead of panicking.
pub trait LessCompiler: Send + Sync {
    fn compile(&self, entry: &Path, base_uri: &str, options: &CompileOptions)
        -> Result<CompileOutput>;
}
