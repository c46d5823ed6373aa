use std::fmt;

use bq_resources::ErrorProto;
use http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] gcp_auth::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("response is missing the required field '{0}'")]
    MissingField(&'static str),
    #[error("server under-delivered rows: expected {expected}, only received {received}")]
    UnderDelivered { expected: u64, received: u64 },
}

/// Coarse classification of an [`Error`], used to decide whether a failure
/// can be recovered locally, retried, or needs to surface to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The referenced resource doesn't exist.
    NotFound,
    /// Worth retrying, i.e rate limits, backend errors and connection failures.
    Transient,
    Fatal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(api) => api.kind(),
            Self::Reqwest(error) if error.is_timeout() || error.is_connect() => {
                ErrorKind::Transient
            }
            Self::Reqwest(error) => match error.status() {
                Some(status) if status == StatusCode::NOT_FOUND => ErrorKind::NotFound,
                Some(status) if is_transient_status(status) => ErrorKind::Transient,
                _ => ErrorKind::Fatal,
            },
            _ => ErrorKind::Fatal,
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    #[inline]
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

/// A non-success response from the API, decoded from its error envelope when possible.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: Box<str>,
    pub errors: Vec<ErrorProto>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<Box<str>>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<ErrorProto>) -> Self {
        self.errors = errors;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        if self.status == StatusCode::NOT_FOUND || self.errors.iter().any(ErrorProto::is_not_found)
        {
            return ErrorKind::NotFound;
        }

        let transient_reason = self.errors.iter().any(|error| {
            matches!(
                error.reason.as_deref(),
                Some("backendError" | "rateLimitExceeded" | "internalError")
            )
        });

        if transient_reason || is_transient_status(self.status) {
            ErrorKind::Transient
        } else {
            ErrorKind::Fatal
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)?;

        for error in self.errors.iter() {
            write!(f, "\n- {error}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ApiError {}

fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}
