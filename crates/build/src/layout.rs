use lesspress_core::{
    ArtifactKind, CLIENT_COMPILER_SCRIPT, CSS_FILE_COMPRESSED, CSS_FILE_SOURCEMAP,
    CSS_FILE_UNCOMPRESSED, LESS_FILE, TEMPLATES_DIR,
};
use std::path::{Path, PathBuf};

/// Site root on disk plus its public URL prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub site_root: PathBuf,
    /// Always ends in `/`
    pub base_uri: String,
}

impl SiteLayout {
    pub fn new(site_root: impl Into<PathBuf>, base_uri: impl Into<String>) -> Self {
        let mut base_uri = base_uri.into();
        if !base_uri.ends_with('/') {
            base_uri.push('/');
        }
        Self {
            site_root: site_root.into(),
            base_uri,
        }
    }

    pub fn template(&self, name: &str) -> TemplateLayout {
        TemplateLayout {
            site_root: self.site_root.clone(),
            base_uri: self.base_uri.clone(),
            template: name.to_string(),
        }
    }

    /// URL of the browser-side compiler script
    pub fn client_compiler_url(&self) -> String {
        format!("{}{CLIENT_COMPILER_SCRIPT}", self.base_uri)
    }
}

/// Source and artifact locations of one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLayout {
    site_root: PathBuf,
    base_uri: String,
    template: String,
}

impl TemplateLayout {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// `<site_root>/templates/<template>`
    pub fn asset_root(&self) -> PathBuf {
        self.site_root.join(TEMPLATES_DIR).join(&self.template)
    }

    pub fn less_file(&self) -> PathBuf {
        self.asset_root().join(LESS_FILE)
    }

    pub fn artifact(&self, kind: ArtifactKind) -> PathBuf {
        self.asset_root().join(relative_artifact(kind))
    }

    pub fn compressed_css(&self) -> PathBuf {
        self.artifact(ArtifactKind::CompressedCss)
    }

    pub fn uncompressed_css(&self) -> PathBuf {
        self.artifact(ArtifactKind::UncompressedCss)
    }

    pub fn source_map(&self) -> PathBuf {
        self.artifact(ArtifactKind::SourceMap)
    }

    pub fn source_map_url(&self) -> String {
        self.url(CSS_FILE_SOURCEMAP)
    }

    pub fn less_url(&self) -> String {
        self.url(LESS_FILE)
    }

    fn url(&self, relative: &str) -> String {
        format!(
            "{}{TEMPLATES_DIR}/{}/{relative}",
            self.base_uri, self.template
        )
    }
}

fn relative_artifact(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::CompressedCss => CSS_FILE_COMPRESSED,
        ArtifactKind::UncompressedCss => CSS_FILE_UNCOMPRESSED,
        ArtifactKind::SourceMap => CSS_FILE_SOURCEMAP,
    }
}
