//! Request rendering pipeline.
//!
//! For every request: resolve the URL, load the site metadata, load the style
//! template, read the document, convert it to HTML, sanitize it and render the
//! template. The first failing step ends the request.

use std::collections::HashSet;
use std::sync::Arc;

use mdoc_meta::MetaData;
use mdoc_renderer::{MarkdownRenderer, Sanitizer};
use mdoc_storage::{ReadContext, Reader, StorageErrorKind};

use crate::error::ServerError;
use crate::site_path::{SiteLayout, SitePath};
use crate::templates::{PageContext, StyleBundles};

/// Turns request paths into rendered pages.
pub(crate) struct RenderPipeline {
    reader: Arc<dyn Reader>,
    schemes: HashSet<String>,
    default_scheme: String,
    layout: SiteLayout,
    bundles: StyleBundles,
    renderer: MarkdownRenderer,
    sanitizer: Arc<dyn Sanitizer>,
}

impl RenderPipeline {
    pub(crate) fn new(
        reader: Arc<dyn Reader>,
        schemes: HashSet<String>,
        default_scheme: String,
        layout: SiteLayout,
        bundles: StyleBundles,
        renderer: MarkdownRenderer,
        sanitizer: Arc<dyn Sanitizer>,
    ) -> Self {
        Self {
            reader,
            schemes,
            default_scheme,
            layout,
            bundles,
            renderer,
            sanitizer,
        }
    }

    /// Render the page addressed by `url_path`.
    pub(crate) async fn render(
        &self,
        ctx: &ReadContext,
        url_path: &str,
    ) -> Result<String, ServerError> {
        let site = SitePath::parse(
            url_path,
            &self.layout,
            |s| self.schemes.contains(s),
            &self.default_scheme,
        )?;

        let meta = self.load_metadata(ctx, &site).await?;
        let style = meta.effective_style(&self.layout.default_style);
        let template = self.bundles.load(style).await?;

        let location = site.content_location(&self.layout);
        tracing::debug!(location = %location, "Reading document");
        let markdown = self
            .reader
            .read(ctx, &location)
            .await
            .map_err(|source| ServerError::Content {
                location: location.to_string(),
                source,
            })?;

        let rendered = self.renderer.render_bytes(&markdown);
        let html = self.sanitizer.sanitize(rendered.html);

        self.bundles.render(
            style,
            &template,
            PageContext {
                meta: &meta,
                home: &site.home,
                markdown: html,
                title: rendered.title,
            },
        )
    }

    /// Read and decode the metadata file of `site`.
    ///
    /// The site directory is tried first; the marker directory is only read
    /// when the first file does not exist.
    async fn load_metadata(
        &self,
        ctx: &ReadContext,
        site: &SitePath,
    ) -> Result<MetaData, ServerError> {
        let [primary, fallback] = site.meta_locations(&self.layout);
        tracing::debug!(location = %primary, "Loading metadata");
        let (location, read) = match self.reader.read(ctx, &primary).await {
            Err(err) if err.kind() == StorageErrorKind::NotFound => {
                tracing::debug!(location = %fallback, "Loading metadata from marker directory");
                let read = self.reader.read(ctx, &fallback).await;
                (fallback, read)
            }
            read => (primary, read),
        };
        let bytes = read.map_err(|source| ServerError::Metadata {
            location: location.to_string(),
            source,
        })?;
        MetaData::from_yaml(&bytes, &self.layout.extension).map_err(|source| {
            ServerError::MetaDecode {
                location: location.to_string(),
                source,
            }
        })
    }

    pub(crate) fn bundles(&self) -> &StyleBundles {
        &self.bundles
    }
}
