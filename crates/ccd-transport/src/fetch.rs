//! Deadline-bounded request execution.

use std::time::Duration;

use crate::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// How long any request may take before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(4000);

/// Sends `request` through `transport`, giving up after `timeout`.
///
/// The in-flight send future is dropped when the deadline passes, which
/// aborts the underlying request. The returned future therefore resolves
/// exactly once: either with the transport's outcome or with
/// [`TransportError::Timeout`].
pub async fn fetch_with_timeout<T: HttpTransport>(
    transport: &T,
    request: HttpRequest,
    timeout: Duration,
) -> Result<HttpResponse, TransportError> {
    let method = request.method;
    let url = request.url.clone();

    match tokio::time::timeout(timeout, transport.send(request)).await {
        Ok(Ok(response)) => {
            tracing::debug!(%method, %url, status = response.status, "response received");
            Ok(response)
        }
        Ok(Err(e)) => {
            tracing::debug!(%method, %url, error = %e, "request failed");
            Err(e)
        }
        Err(_) => {
            tracing::debug!(
                %method,
                %url,
                timeout_ms = timeout.as_millis() as u64,
                "request timed out"
            );
            Err(TransportError::Timeout(timeout))
        }
    }
}
