//! API request span helpers.

use tracing::Span;

/// Start a span for one API round trip.
///
/// `http.status_code` is declared empty and filled in by
/// [`record_status`] once a response arrives.
pub fn start_request_span(method: &str, endpoint: &str) -> Span {
    tracing::info_span!(
        "box.request",
        "http.method" = method,
        "box.endpoint" = endpoint,
        "http.status_code" = tracing::field::Empty,
    )
}

/// Record the response status on the given span.
pub fn record_status(span: &Span, status: u16) {
    span.record("http.status_code", status);
}
