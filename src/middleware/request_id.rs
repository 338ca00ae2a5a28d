use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram},
};
use std::time::Instant;
use uuid::Uuid;

use crate::logging::{create_counter, create_histogram};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_COUNTER: Lazy<Counter<u64>> =
    Lazy::new(|| create_counter("http_requests_total", "Requests handled, by method and status"));

static REQUEST_DURATION: Lazy<Histogram<f64>> = Lazy::new(|| {
    create_histogram(
        "http_request_duration_seconds",
        "Request latency, by method and status",
    )
});

/// Tags each request with a fresh id.
///
/// The id is stored in the request extensions for downstream middleware and echoed in
/// the `x-request-id` response header.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().to_string();
    let started = Instant::now();

    request.extensions_mut().insert(request_id);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %request.uri(),
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let attributes = [
        KeyValue::new("method", method),
        KeyValue::new("status", i64::from(response.status().as_u16())),
    ];
    REQUEST_COUNTER.add(1, &attributes);
    REQUEST_DURATION.record(started.elapsed().as_secs_f64(), &attributes);

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

/// Extract request ID from request extensions
pub fn get_request_id(request: &Request) -> Option<Uuid> {
    request.extensions().get::<Uuid>().copied()
}
