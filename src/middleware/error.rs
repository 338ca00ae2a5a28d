use axum::{extract::Request, middleware::Next, response::Response};

use crate::middleware::request_id::get_request_id;

/// Logs every failed request with its request id.
///
/// Server errors already carry their detail in the log line written when the error was
/// rendered; this adds the request context that ties them together.
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let request_id = get_request_id(&request).map(|id| id.to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            status = %status,
            method = %method,
            uri = %uri,
            request_id = ?request_id,
            "Request failed"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            status = %status,
            method = %method,
            uri = %uri,
            request_id = ?request_id,
            "Request rejected"
        );
    }

    response
}
