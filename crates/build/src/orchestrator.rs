use crate::compiler::{CompileOptions, CompileOutput, LessCompiler, SourceMapOptions};
use crate::layout::{SiteLayout, TemplateLayout};
use crate::publisher::{ArtifactPublisher, PublishAction};
use crate::staleness::{assess, Staleness};
use lesspress_cache::MetadataStore;
use lesspress_core::{
    ArtifactKind, BuildConfig, CompileMode, Error, MetadataSnapshot, Result, SourceFileRecord,
};
use lesspress_utils::FileSystem;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result of one [`BuildOrchestrator::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The active template is not one the build applies to
    Skipped,
    /// Client-side mode: server artifacts were cleaned up, nothing compiled
    ClientSide { layout: TemplateLayout, removed: usize },
    /// Sources, configuration and artifacts all agree
    UpToDate,
    /// A compile ran and its artifacts were published
    Compiled { reason: String, files_tracked: usize },
}

/// Runs the incremental build for one render.
///
/// Every effect goes through the injected capabilities, so the same control
/// flow runs against the real disk or against in-memory fakes.
pub struct BuildOrchestrator<'a> {
    fs: &'a dyn FileSystem,
    store: &'a dyn MetadataStore,
    compiler: &'a dyn LessCompiler,
    site: SiteLayout,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        store: &'a dyn MetadataStore,
        compiler: &'a dyn LessCompiler,
        site: SiteLayout,
    ) -> Self {
        Self {
            fs,
            store,
            compiler,
            site,
        }
    }

    pub fn site(&self) -> &SiteLayout {
        &self.site
    }

    /// Bring the template's published stylesheet in line with its sources
    /// and `config`.
    ///
    /// On a compile error nothing has been written yet: the previous
    /// artifacts and snapshot stay exactly as they were.
    ///
    /// Publishing clears the stored snapshot before the first artifact write
    /// and stores the new one after the last. A concurrent reader in between
    /// sees no snapshot at all, not the old one, and recompiles. An I/O error
    /// mid-publish leaves it that way, so the next run rebuilds.
    pub fn run(&self, config: &BuildConfig, template: Option<&str>) -> Result<BuildOutcome> {
        let Some(template) = config.active_template(template) else {
            debug!("Template {:?} is not configured for LESS builds", template);
            return Ok(BuildOutcome::Skipped);
        };
        let layout = self.site.template(template);

        match config.compile_mode {
            CompileMode::Client => {
                let removed = self.remove_server_artifacts(&layout)?;
                Ok(BuildOutcome::ClientSide { layout, removed })
            }
            CompileMode::Server => self.build_server_side(config, &layout),
        }
    }

    /// Staleness verdict for a template, without building anything
    pub fn status(&self, config: &BuildConfig, template: &str) -> Result<Staleness> {
        let layout = self.site.template(template);
        let snapshot = self.store.load()?;
        Ok(self.assess(config, &layout, snapshot.as_ref()))
    }

    fn assess(
        &self,
        config: &BuildConfig,
        layout: &TemplateLayout,
        snapshot: Option<&MetadataSnapshot>,
    ) -> Staleness {
        let sourcemap_exists = self.fs.exists(&layout.source_map());
        assess(snapshot, sourcemap_exists, config, |path| self.fs.stat(path))
    }

    fn build_server_side(&self, config: &BuildConfig, layout: &TemplateLayout) -> Result<BuildOutcome> {
        let snapshot = self.store.load()?;
        let verdict = self.assess(config, layout, snapshot.as_ref());
        let compressed_missing = !self.fs.exists(&layout.compressed_css());

        let reason = if verdict.is_stale() {
            verdict.to_string()
        } else if compressed_missing {
            format!("{} is missing", layout.compressed_css().display())
        } else if config.force {
            "forced".to_string()
        } else {
            debug!("Stylesheet for {} is up to date", layout.template());
            return Ok(BuildOutcome::UpToDate);
        };

        info!(template = layout.template(), %reason, "Compiling LESS");
        let files_tracked = self.compile_and_publish(config, layout)?;
        Ok(BuildOutcome::Compiled {
            reason,
            files_tracked,
        })
    }

    fn compile_and_publish(&self, config: &BuildConfig, layout: &TemplateLayout) -> Result<usize> {
        let entry = layout.less_file();

        let mut options = CompileOptions::compressed();
        if config.generate_sourcemap {
            options = options.with_sourcemap(SourceMapOptions {
                write_to: layout.source_map(),
                public_url: layout.source_map_url(),
                base_path: layout.site_root().to_path_buf(),
            });
        }
        let compressed = self.compiler.compile(&entry, layout.base_uri(), &options)?;

        let source_map = match (config.generate_sourcemap, compressed.source_map.as_deref()) {
            (true, None) => {
                return Err(Error::compile(
                    &entry,
                    "compiler did not return the requested source map",
                ))
            }
            (true, Some(map)) => Some(map),
            (false, _) => None,
        };

        // Same validated entry file, only without compression
        let uncompressed = if config.generate_uncompressed {
            Some(
                self.compiler
                    .compile(&entry, layout.base_uri(), &CompileOptions::default())?,
            )
        } else {
            None
        };

        let snapshot = self.snapshot_of(&entry, &compressed)?;

        // Artifacts change from here on. Dropping the old snapshot first means
        // a publish cut short by an I/O error is retried on the next render.
        self.store.clear()?;

        let publisher = ArtifactPublisher::new(self.fs);
        publisher.write_or_delete(&layout.compressed_css(), Some(&compressed.css))?;
        publisher.write_or_delete(&layout.source_map(), source_map)?;
        publisher.write_or_delete(
            &layout.uncompressed_css(),
            uncompressed.as_ref().map(|output| output.css.as_str()),
        )?;

        self.store.store(&snapshot)?;
        Ok(snapshot.len())
    }

    /// Fresh records for every file the compiler read, entry first
    fn snapshot_of(&self, entry: &Path, output: &CompileOutput) -> Result<MetadataSnapshot> {
        let mut paths: Vec<PathBuf> = Vec::with_capacity(output.files_read.len() + 1);
        if !output.files_read.iter().any(|p| p == entry) {
            paths.push(entry.to_path_buf());
        }
        paths.extend(output.files_read.iter().cloned());

        paths
            .into_iter()
            .map(|path| {
                let stat = self.fs.stat(&path).ok_or_else(|| {
                    Error::file_system(
                        &path,
                        "stat compiled source",
                        io::Error::new(io::ErrorKind::NotFound, "file vanished after compile"),
                    )
                })?;
                Ok::<_, Error>(SourceFileRecord::new(path, stat))
            })
            .collect()
    }

    /// Client-side mode serves the raw LESS; anything the server built
    /// earlier would be stale
    fn remove_server_artifacts(&self, layout: &TemplateLayout) -> Result<usize> {
        let publisher = ArtifactPublisher::new(self.fs);
        let mut removed = 0;
        for kind in [
            ArtifactKind::UncompressedCss,
            ArtifactKind::CompressedCss,
            ArtifactKind::SourceMap,
        ] {
            if publisher.write_or_delete(&layout.artifact(kind), None)? == PublishAction::Deleted {
                removed += 1;
            }
        }
        if removed > 0 {
            info!("Removed {removed} server-built artifacts for {}", layout.template());
        }
        Ok(removed)
    }
}
