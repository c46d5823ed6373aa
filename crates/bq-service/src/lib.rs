//! Table lifecycle, row ingestion and query execution against the BigQuery REST API.
//!
//! Every paginated call (table scans, table listings, query results) is driven
//! strictly sequentially, since each request depends on the previous response.
//! Transport concerns (auth, retries, framing) live behind the [`Transport`]
//! trait, with [`RestTransport`] as the default implementation.

#[macro_use]
extern crate tracing;

mod client;
pub mod clock;
pub mod config;
pub mod dataset;
mod error;
pub mod executor;
pub mod query;
pub mod table;
pub mod transport;

pub use bq_resources as resources;
pub use client::BigQueryService;
pub use clock::{Clock, SystemClock};
pub use config::ClientConfig;
pub use error::{ApiError, Error, ErrorKind};
pub use executor::RequestExecutor;
pub use transport::rest::RestTransport;
pub use transport::{ApiRequest, Transport};

/// Type alias to [`core::result::Result<T, Error>`].
pub type Result<T> = core::result::Result<T, Error>;
