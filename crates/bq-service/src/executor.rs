use serde::de::DeserializeOwned;

use crate::transport::{ApiRequest, Transport};

/// Executes single remote calls through a [`Transport`], always handing it
/// the configured retry budget.
#[derive(Debug, Clone)]
pub struct RequestExecutor<T> {
    transport: T,
    max_retries: u32,
}

impl<T: Transport> RequestExecutor<T> {
    pub const fn new(transport: T, max_retries: u32) -> Self {
        Self {
            transport,
            max_retries,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    async fn send(&self, request: &ApiRequest) -> crate::Result<bytes::Bytes> {
        trace!(
            message = "executing request",
            method = %request.method,
            path = %request.display_path(),
            query = ?request.query,
            body = ?request.body.as_deref().map(String::from_utf8_lossy),
        );

        let bytes = self.transport.send(request, self.max_retries).await?;

        trace!(
            message = "received response",
            path = %request.display_path(),
            body = %String::from_utf8_lossy(&bytes),
        );

        Ok(bytes)
    }

    /// Executes the request, decoding the response body as `R`.
    pub async fn execute<R>(&self, request: ApiRequest) -> crate::Result<R>
    where
        R: DeserializeOwned,
    {
        let bytes = self.send(&request).await?;
        serde_json::from_slice(&bytes).map_err(crate::Error::from)
    }

    /// Executes a request whose response carries no body worth decoding.
    pub async fn execute_empty(&self, request: ApiRequest) -> crate::Result<()> {
        self.send(&request).await.map(|_| ())
    }
}
