use crate::context::{Application, MessageLevel, RenderContext};
use crate::rewrite::mark_less_stylesheet;
use lesspress_build::{BuildOrchestrator, BuildOutcome, LessCompiler, LesscCompiler, SiteLayout, Staleness};
use lesspress_cache::{CachedMetadataStore, DirectoryCache, MetadataStore};
use lesspress_config::Config;
use lesspress_core::{
    BuildConfig, CompileMode, MetadataSnapshot, Result, CACHE_GROUP, LESSC_BINARY,
};
use lesspress_utils::{FileSystem, OsFileSystem};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Keeps the active template's stylesheet current across page renders.
///
/// Holds the loaded configuration and the capabilities the build runs
/// against; one instance serves any number of renders.
pub struct LessPlugin {
    config: BuildConfig,
    site: SiteLayout,
    fs: Arc<dyn FileSystem>,
    store: Arc<dyn MetadataStore>,
    compiler: Arc<dyn LessCompiler>,
}

impl LessPlugin {
    pub fn new(
        config: BuildConfig,
        site: SiteLayout,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn MetadataStore>,
        compiler: Arc<dyn LessCompiler>,
    ) -> Self {
        Self {
            config,
            site,
            fs,
            store,
            compiler,
        }
    }

    /// Wire the plugin to the real disk, the directory cache and `lessc`.
    ///
    /// A missing compiler is not an error here: client-side mode never needs
    /// one, and server-side mode reports it on the first compile.
    pub fn from_config(config: &Config) -> Self {
        let compiler = LesscCompiler::locate(config.site.lessc.as_deref()).unwrap_or_else(|e| {
            debug!("Falling back to `{LESSC_BINARY}`: {e}");
            LesscCompiler::new(LESSC_BINARY)
        });
        let store =
            CachedMetadataStore::new(DirectoryCache::new(&config.site.cache_dir, CACHE_GROUP));

        Self::new(
            config.build_config(),
            SiteLayout::new(config.site.site_root.clone(), config.site.base_uri.clone()),
            Arc::new(OsFileSystem),
            Arc::new(store),
            Arc::new(compiler),
        )
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn site(&self) -> &SiteLayout {
        &self.site
    }

    fn orchestrator(&self) -> BuildOrchestrator<'_> {
        BuildOrchestrator::new(
            self.fs.as_ref(),
            self.store.as_ref(),
            self.compiler.as_ref(),
            self.site.clone(),
        )
    }

    /// Build the template's stylesheet before the page is rendered.
    ///
    /// Only front-end renders are handled. In client-side mode the raw LESS
    /// and the browser compiler are queued on the document instead. A failed
    /// build is logged and queued as an error message; the render goes on
    /// with whatever artifacts were published before.
    pub fn on_before_render(&self, ctx: &mut RenderContext) {
        if ctx.application != Application::Site {
            return;
        }

        if self.config.compile_mode == CompileMode::Client {
            if let Some(template) = self.config.active_template(ctx.template.as_deref()) {
                let layout = self.site.template(template);
                ctx.document.add_stylesheet(layout.less_url());
                ctx.document.add_script(self.site.client_compiler_url());
            }
        }

        match self.orchestrator().run(&self.config, ctx.template.as_deref()) {
            Ok(BuildOutcome::Compiled {
                reason,
                files_tracked,
            }) => {
                info!(%reason, files_tracked, "Stylesheet rebuilt");
            }
            Ok(BuildOutcome::ClientSide { layout, removed }) => {
                debug!(
                    template = layout.template(),
                    removed, "Serving LESS to the browser compiler"
                );
            }
            Ok(outcome) => debug!(?outcome, "No stylesheet build needed"),
            Err(e) => {
                warn!("LESS build failed: {e}");
                ctx.messages.enqueue(MessageLevel::Error, e.to_string());
            }
        }
    }

    /// Mark the LESS stylesheet link for the browser compiler once the body
    /// has been rendered. Only applies in client-side mode.
    pub fn on_after_render(&self, ctx: &mut RenderContext) {
        if ctx.application != Application::Site || self.config.compile_mode != CompileMode::Client {
            return;
        }
        if let Cow::Owned(body) = mark_less_stylesheet(&ctx.body) {
            ctx.body = body;
        }
    }

    /// Current staleness of `template`, without building
    pub fn status(&self, template: &str) -> Result<Staleness> {
        self.orchestrator().status(&self.config, template)
    }

    /// Files recorded by the last successful compile
    pub fn snapshot(&self) -> Result<Option<MetadataSnapshot>> {
        self.store.load()
    }

    /// Forget the recorded snapshot so the next server-side render recompiles
    pub fn clear_cache(&self) -> Result<()> {
        self.store.clear()
    }
}
