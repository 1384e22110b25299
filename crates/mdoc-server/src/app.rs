//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::Html;
use mdoc_storage::ReadContext;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::error::ServerError;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// Asset routes are matched first; every other path goes to the page handler.
pub(crate) fn create_router(
    state: Arc<AppState>,
    assets: Router<Arc<AppState>>,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .merge(assets)
        .fallback(render_page)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    request_timeout,
                ))
                .layer(security::no_sniff())
                .layer(security::deny_framing()),
        )
        .with_state(state)
}

/// Render the page addressed by the request path.
async fn render_page(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Html<String>, ServerError> {
    let ctx = ReadContext::new();
    // Dropping the handler future (client gone, timeout) cancels backend reads.
    let _cancel_on_drop = ctx.drop_guard();

    tracing::info!(path = uri.path(), "Rendering page");
    let html = state.pipeline.render(&ctx, uri.path()).await?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use mdoc_renderer::{MarkdownRenderer, PassThrough};
    use mdoc_storage::{
        Location, MockReader, MultiReader, Reader, ReaderRegistry, StorageError,
    };
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::assets::{AssetConfig, AssetMode, asset_router};
    use crate::pipeline::RenderPipeline;
    use crate::site_path::SiteLayout;
    use crate::templates::StyleBundles;

    struct TestApp {
        _styles: TempDir,
        local: Arc<MockReader>,
        router: Router,
    }

    async fn test_app(local: MockReader) -> TestApp {
        let local = Arc::new(local);
        let (styles, router) =
            build_router(Arc::clone(&local) as Arc<dyn Reader>, Duration::from_secs(5)).await;
        TestApp {
            _styles: styles,
            local,
            router,
        }
    }

    async fn build_router(local: Arc<dyn Reader>, timeout: Duration) -> (TempDir, Router) {
        let styles = TempDir::new().unwrap();
        fs::create_dir_all(styles.path().join("base")).unwrap();
        fs::write(
            styles.path().join("base/base.jinja"),
            "<title>{{ title }}</title><h1>{{ meta.name }}</h1><main>{{ markdown }}</main>",
        )
        .unwrap();
        fs::write(styles.path().join("base/base.css"), "main{}").unwrap();

        let mut registry = ReaderRegistry::new();
        registry.register("local", local).unwrap();
        let reader = MultiReader::new(registry);
        let schemes = reader.schemes();
        let pipeline = RenderPipeline::new(
            Arc::new(reader),
            schemes,
            "local".to_owned(),
            SiteLayout::default(),
            StyleBundles::new(styles.path().to_path_buf()),
            MarkdownRenderer::new().with_title_extraction(),
            Arc::new(PassThrough),
        );
        let assets = asset_router(&AssetConfig {
            dir: styles.path().to_path_buf(),
            url_prefix: "styles".to_owned(),
            extensions: vec!["css".to_owned()],
            mode: AssetMode::Cached,
        })
        .await
        .unwrap();

        let router = create_router(Arc::new(AppState { pipeline }), assets, timeout);
        (styles, router)
    }

    /// Reader whose reads never complete.
    struct Stalled;

    #[async_trait]
    impl Reader for Stalled {
        async fn read(
            &self,
            _ctx: &ReadContext,
            _location: &Location,
        ) -> Result<Vec<u8>, StorageError> {
            std::future::pending().await
        }
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn site() -> MockReader {
        MockReader::new()
            .with_content("site/meta", "name: Docs\nstyle: \"\"\n")
            .with_content("site/mdoc/index.mdoc", "# Home\n\nWelcome to **docs**.")
            .with_content("site/mdoc/page.mdoc", "# Page\n\nA page.")
    }

    #[tokio::test]
    async fn test_index_renders_with_default_style() {
        let app = test_app(site()).await;

        let (status, body) = get(app.router, "/site/mdoc/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            "<title>Home</title><h1>Docs</h1><main><h1>Home</h1>\n\
             <p>Welcome to <strong>docs</strong>.</p>\n</main>"
        );
        assert_eq!(app.local.calls(), 2);
    }

    #[tokio::test]
    async fn test_metadata_in_marker_directory_is_used() {
        let local = MockReader::new()
            .with_content("site/mdoc/meta", "name: Inner\n")
            .with_content("site/mdoc/index.mdoc", "# Home");
        let app = test_app(local).await;

        let (status, body) = get(app.router, "/site/mdoc/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Inner</h1>"), "{body}");
    }

    #[tokio::test]
    async fn test_slow_backend_times_out_as_server_error() {
        let (_styles, router) = build_router(Arc::new(Stalled), Duration::from_millis(50)).await;

        let (status, _) = get(router, "/site/mdoc/").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_page_renders_directly() {
        let app = test_app(site()).await;

        let (status, body) = get(app.router, "/site/mdoc/page.mdoc").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<p>A page.</p>"));
        assert!(!body.contains("Welcome"));
    }

    #[tokio::test]
    async fn test_explicit_local_scheme_in_url() {
        let app = test_app(site()).await;

        let (status, body) = get(app.router, "/local/site/mdoc/page.mdoc").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<p>A page.</p>"));
    }

    #[tokio::test]
    async fn test_missing_page_names_path() {
        let app = test_app(site()).await;

        let (status, body) = get(app.router, "/site/mdoc/missing.mdoc").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("/local/site/mdoc/missing.mdoc"), "{body}");
    }

    #[tokio::test]
    async fn test_marker_count_is_not_acceptable() {
        for uri in ["/site/page.mdoc", "/a/mdoc/b/mdoc/page.mdoc"] {
            let app = test_app(site()).await;

            let (status, _) = get(app.router, uri).await;

            assert_eq!(status, StatusCode::NOT_ACCEPTABLE, "uri {uri}");
            assert_eq!(app.local.calls(), 0, "uri {uri}");
        }
    }

    #[tokio::test]
    async fn test_unsupported_suffix_is_not_acceptable() {
        let app = test_app(site()).await;

        let (status, body) = get(app.router, "/site/mdoc/notes.txt").await;

        assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
        assert!(body.contains("don't know how to handle"));
        assert_eq!(app.local.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_metadata_is_server_error() {
        let app = test_app(MockReader::new()).await;

        let (status, body) = get(app.router, "/site/mdoc/").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("metadata"));
    }

    #[tokio::test]
    async fn test_error_body_is_plain_text() {
        let app = test_app(site()).await;

        let response = app
            .router
            .oneshot(
                Request::get("/site/mdoc/notes.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_security_headers() {
        let app = test_app(site()).await;

        let response = app
            .router
            .oneshot(Request::get("/site/mdoc/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    }

    #[tokio::test]
    async fn test_assets_take_precedence_over_pages() {
        let app = test_app(site()).await;

        let (status, body) = get(app.router, "/styles/base/base.css").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "main{}");
        assert_eq!(app.local.calls(), 0);
    }
}
