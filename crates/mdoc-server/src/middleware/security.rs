//! Hardening headers added to every response, pages and assets alike.

use axum::http::HeaderValue;
use axum::http::header::{HeaderName, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use tower_http::set_header::SetResponseHeaderLayer;

fn always(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

/// `X-Content-Type-Options: nosniff`.
pub(crate) fn no_sniff() -> SetResponseHeaderLayer<HeaderValue> {
    always(X_CONTENT_TYPE_OPTIONS, "nosniff")
}

/// `X-Frame-Options: DENY`.
pub(crate) fn deny_framing() -> SetResponseHeaderLayer<HeaderValue> {
    always(X_FRAME_OPTIONS, "DENY")
}
