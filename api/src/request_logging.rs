use poem::{Endpoint, IntoResponse, Middleware, Request, Response};
use std::time::Instant;

/// Middleware that logs every request with method, path, status, and duration.
pub struct RequestLogging;

impl<E: Endpoint> Middleware<E> for RequestLogging {
    type Output = RequestLoggingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        RequestLoggingEndpoint { inner: ep }
    }
}

pub struct RequestLoggingEndpoint<E> {
    inner: E,
}

impl<E: Endpoint> Endpoint for RequestLoggingEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> poem::Result<Self::Output> {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        match self.inner.call(req).await {
            Ok(resp) => {
                let resp = resp.into_response();
                let status = resp.status();
                let duration_ms = start.elapsed().as_millis();
                if status.is_client_error() || status.is_server_error() {
                    tracing::warn!(%method, %path, status = status.as_u16(), duration_ms, "request failed");
                } else {
                    tracing::info!(%method, %path, status = status.as_u16(), duration_ms, "request completed");
                }
                Ok(resp)
            }
            Err(err) => {
                let duration_ms = start.elapsed().as_millis();
                tracing::warn!(
                    %method,
                    %path,
                    status = err.status().as_u16(),
                    duration_ms,
                    error = %err,
                    "request error"
                );
                Err(err)
            }
        }
    }
}
