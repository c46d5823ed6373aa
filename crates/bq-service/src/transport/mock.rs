//! Scripted [`Transport`] for unit tests.

use std::collections::VecDeque;
use std::future::{Future, ready};

use bytes::Bytes;
use parking_lot::Mutex;

use super::{ApiRequest, Transport};

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub request: ApiRequest,
    pub max_retries: u32,
}

impl RecordedRequest {
    pub fn path(&self) -> String {
        self.request.display_path().to_string()
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.request.query_value(key)
    }

    pub fn json_body(&self) -> serde_json::Value {
        match self.request.body {
            Some(ref body) => serde_json::from_slice(body).expect("request body is json"),
            None => serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<crate::Result<Bytes>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, value: serde_json::Value) -> &Self {
        let bytes = serde_json::to_vec(&value).expect("json values serialize");
        self.responses.lock().push_back(Ok(Bytes::from(bytes)));
        self
    }

    pub fn push_empty(&self) -> &Self {
        self.responses.lock().push_back(Ok(Bytes::new()));
        self
    }

    pub fn push_error(&self, error: impl Into<crate::Error>) -> &Self {
        self.responses.lock().push_back(Err(error.into()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        request: &ApiRequest,
        max_retries: u32,
    ) -> impl Future<Output = crate::Result<Bytes>> + Send {
        self.requests.lock().push(RecordedRequest {
            request: request.clone(),
            max_retries,
        });

        let response = self.responses.lock().pop_front().unwrap_or_else(|| {
            panic!(
                "unexpected request: {} {}",
                request.method,
                request.display_path()
            )
        });

        ready(response)
    }
}
