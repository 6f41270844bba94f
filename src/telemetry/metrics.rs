//! Metric instrument factories for box-v2.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"box-v2"` meter. With no
//! provider registered they are no-ops.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for box-v2 instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("box-v2")
}

/// Counter: API requests sent.
/// Labels: `endpoint`, `result` ("ok" | "api_error" | "transport_error" |
/// "decode_error" | "auth_error" | "unauthorized" | "cancelled").
pub fn api_requests() -> Counter<u64> {
    meter()
        .u64_counter("box.api.requests")
        .with_description("Number of Box API requests")
        .build()
}

/// Histogram: request round-trip duration in milliseconds.
/// Labels: `endpoint`.
pub fn api_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("box.api.duration_ms")
        .with_description("Box API request duration in milliseconds")
        .with_unit("ms")
        .build()
}

/// Counter: events received from the events endpoint.
/// Labels: `filter`.
pub fn events_received() -> Counter<u64> {
    meter()
        .u64_counter("box.events.received")
        .with_description("Number of events received from the events stream")
        .build()
}
