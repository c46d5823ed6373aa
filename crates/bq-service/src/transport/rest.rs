//! [`Transport`] implementation on top of reqwest, authenticated via `gcp_auth`.

use std::fmt;
use std::sync::Arc;

use bq_resources::ErrorProto;
use bytes::Bytes;
use http::StatusCode;
use http::header::{self, HeaderValue};
use reqwest::Url;

use super::backoff::BackoffConfig;
use super::{ApiRequest, Transport};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// OAuth scope required by every BigQuery call made here.
pub const SCOPE: &str = "https://www.googleapis.com/auth/bigquery";

#[derive(Clone)]
pub struct RestTransport {
    inner: Arc<InnerTransport>,
}

struct InnerTransport {
    client: reqwest::Client,
    auth: Arc<dyn gcp_auth::TokenProvider>,
    base_url: Url,
    backoff: BackoffConfig,
}

impl fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestTransport")
            .field("base_url", &self.inner.base_url.as_str())
            .field("backoff", &self.inner.backoff)
            .finish_non_exhaustive()
    }
}

impl RestTransport {
    /// Builds a transport using the default `gcp_auth` provider discovery.
    pub async fn new(config: &ClientConfig) -> crate::Result<Self> {
        let auth = gcp_auth::provider().await?;
        Self::from_parts(auth, config)
    }

    pub fn from_parts(
        auth: Arc<dyn gcp_auth::TokenProvider>,
        config: &ClientConfig,
    ) -> crate::Result<Self> {
        let base_url = Url::parse(&config.base_url)?;

        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        let client = reqwest::Client::builder()
            .user_agent(&*config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerTransport {
                client,
                auth,
                base_url,
                backoff: config.backoff,
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }
}

impl Transport for RestTransport {
    async fn send(&self, request: &ApiRequest, max_retries: u32) -> crate::Result<Bytes> {
        let mut backoff = self.inner.backoff.make_backoff(max_retries);

        loop {
            let error = match self.inner.send_once(request).await {
                Ok(bytes) => return Ok(bytes),
                Err(error) if error.is_transient() => error,
                Err(error) => return Err(error),
            };

            match backoff.backoff_once() {
                Some(once) => {
                    warn!(
                        message = "retrying request after transient error",
                        method = %request.method,
                        path = %request.display_path(),
                        retry = once.on_retry(),
                        max_retries = once.max_retries(),
                        waiting = ?once.waiting(),
                        error = %error,
                    );
                    once.await;
                }
                None => return Err(error),
            }
        }
    }
}

impl InnerTransport {
    async fn auth_header(&self) -> crate::Result<HeaderValue> {
        let token = self.auth.token(&[SCOPE]).await?;
        let mut header = HeaderValue::try_from(format!("Bearer {}", token.as_str()))?;
        header.set_sensitive(true);
        Ok(header)
    }

    async fn send_once(&self, request: &ApiRequest) -> crate::Result<Bytes> {
        let url = make_url(&self.base_url, &request.path);
        let auth_header = self.auth_header().await?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(header::AUTHORIZATION, auth_header);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(ref body) = request.body {
            builder = builder
                .header(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )
                .body(body.clone());
        }

        let resp = builder.send().await?;

        if resp.status().is_success() {
            Ok(resp.bytes().await?)
        } else {
            Err(handle_error(resp).await)
        }
    }
}

fn make_url<P>(base_url: &Url, path: P) -> Url
where
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    let mut url = base_url.clone();

    // base urls are checked in 'from_parts', so this always succeeds.
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(path);
    }

    url
}

async fn handle_error(response: reqwest::Response) -> crate::Error {
    let status = response.status();

    match response.text().await {
        Ok(text) => decode_error_body(status, &text).into(),
        Err(error) => error.into(),
    }
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<Box<str>>,
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

/// Decodes Google's `{"error": {"code", "message", "errors"}}` envelope,
/// falling back to the raw response text.
fn decode_error_body(status: StatusCode, text: &str) -> ApiError {
    match serde_json::from_str::<ErrorEnvelope>(text) {
        Ok(ErrorEnvelope { error }) => {
            let message = error
                .message
                .unwrap_or_else(|| Box::from(status.canonical_reason().unwrap_or("unknown error")));

            ApiError::new(status, message).with_errors(error.errors)
        }
        Err(_) if text.trim().is_empty() => {
            ApiError::new(status, status.canonical_reason().unwrap_or("unknown error"))
        }
        Err(_) => ApiError::new(status, text.trim()),
    }
}
