use std::fmt;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::executor::RequestExecutor;
use crate::transport::Transport;
use crate::transport::rest::RestTransport;

/// Entry point for every table, row and query operation.
///
/// Cheap to clone; clones share the same transport and clock.
pub struct BigQueryService<T = RestTransport, C = SystemClock> {
    inner: Arc<Inner<T, C>>,
}

struct Inner<T, C> {
    executor: RequestExecutor<T>,
    clock: C,
}

impl<T, C> Clone for BigQueryService<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug, C: fmt::Debug> fmt::Debug for BigQueryService<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigQueryService")
            .field("executor", &self.inner.executor)
            .field("clock", &self.inner.clock)
            .finish()
    }
}

impl BigQueryService {
    /// Builds a service over [`RestTransport`] with the default [`ClientConfig`].
    pub async fn new() -> crate::Result<Self> {
        Self::with_config(&ClientConfig::default()).await
    }

    pub async fn with_config(config: &ClientConfig) -> crate::Result<Self> {
        let transport = RestTransport::new(config).await?;
        Ok(Self::from_transport(transport, config))
    }
}

impl<T: Transport> BigQueryService<T> {
    pub fn from_transport(transport: T, config: &ClientConfig) -> Self {
        Self::from_parts(transport, SystemClock, config)
    }
}

impl<T: Transport, C: Clock> BigQueryService<T, C> {
    pub fn from_parts(transport: T, clock: C, config: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                executor: RequestExecutor::new(transport, config.max_retries),
                clock,
            }),
        }
    }

    #[inline]
    pub(crate) fn executor(&self) -> &RequestExecutor<T> {
        &self.inner.executor
    }

    #[inline]
    pub(crate) fn clock(&self) -> &C {
        &self.inner.clock
    }

    pub fn transport(&self) -> &T {
        self.inner.executor.transport()
    }
}
