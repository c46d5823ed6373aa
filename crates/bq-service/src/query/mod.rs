use std::num::NonZeroU32;

use bq_resources::job::JobReference;
use bq_resources::query::{QueryRequest, QueryResponse};

use crate::client::BigQueryService;
use crate::clock::Clock;
use crate::transport::{ApiRequest, Transport};

mod content;

pub use content::NULL_SENTINEL;

/// Server side wait hint for each query call, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u32 = 30_000;

/// Rows requested per result page.
pub const DEFAULT_CHUNK_SIZE: NonZeroU32 = match NonZeroU32::new(1000) {
    Some(chunk_size) => chunk_size,
    None => unreachable!(),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long the server may block each call waiting for the job. This is
    /// not a client side deadline; polling continues until the job completes.
    pub timeout_ms: u32,
    pub chunk_size: NonZeroU32,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl<T: Transport, C: Clock> BigQueryService<T, C> {
    /// Runs a standard SQL query, returning every result row as a line of
    /// comma joined values. See [`run_query_opt`] for details.
    ///
    /// [`run_query_opt`]: Self::run_query_opt
    pub async fn run_query(&self, project_id: &str, query: &str) -> crate::Result<String> {
        self.run_query_opt(project_id, query, QueryOptions::default())
            .await
    }

    /// Runs a query, polling until the job completes and every result page has
    /// been read.
    ///
    /// Each row becomes one `\n` terminated line, with cell values joined by `,`
    /// and null values written as [`NULL_SENTINEL`].
    pub async fn run_query_opt(
        &self,
        project_id: &str,
        query: &str,
        options: QueryOptions,
    ) -> crate::Result<String> {
        let mut request_body = QueryRequest::new(query);
        request_body.timeout_ms = Some(options.timeout_ms);
        request_body.max_results = Some(options.chunk_size);

        let request = ApiRequest::post(["projects", project_id, "queries"]).json_body(&request_body)?;

        let mut response: QueryResponse = self.executor().execute(request).await?;

        let job_ref = response
            .job_reference
            .take()
            .ok_or(crate::Error::MissingField("jobReference"))?;

        info!(
            message = "submitted query",
            job_id = %job_ref.job_id,
            job_complete = response.job_complete,
        );

        let mut out = String::new();

        loop {
            if response.job_complete {
                content::write_rows(&mut out, response.schema.as_ref(), &response.rows);
            }

            let page_token = response.page_token.take().filter(|token| !token.is_empty());

            if response.job_complete && page_token.is_none() {
                break;
            }

            info!(
                message = "polling query results",
                job_id = %job_ref.job_id,
                job_complete = response.job_complete,
                has_page_token = page_token.is_some(),
            );

            response = self
                .get_query_results(project_id, &job_ref, page_token.as_deref(), &options)
                .await?;
        }

        Ok(out)
    }

    async fn get_query_results(
        &self,
        project_id: &str,
        job_ref: &JobReference,
        page_token: Option<&str>,
        options: &QueryOptions,
    ) -> crate::Result<QueryResponse> {
        let request = ApiRequest::get(["projects", project_id, "queries", &*job_ref.job_id])
            .query("timeoutMs", options.timeout_ms)
            .query("maxResults", options.chunk_size)
            .query_opt("pageToken", page_token)
            .query_opt("location", job_ref.location.as_deref());

        self.executor().execute(request).await
    }
}
