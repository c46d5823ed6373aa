use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;

pub mod backoff;
#[cfg(test)]
pub(crate) mod mock;
pub mod rest;

/// The RPC collaborator that actually talks to the API.
///
/// Implementations own authentication, framing, and the retry mechanism:
/// a failed call may be retried up to `max_retries` times (so at most
/// `max_retries + 1` attempts) before its error is returned.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &ApiRequest,
        max_retries: u32,
    ) -> impl Future<Output = crate::Result<Bytes>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    #[inline]
    fn send(
        &self,
        request: &ApiRequest,
        max_retries: u32,
    ) -> impl Future<Output = crate::Result<Bytes>> + Send {
        T::send(self, request, max_retries)
    }
}

/// A single call against the API, relative to the API root
/// (i.e `projects/{project}/datasets/{dataset}/tables`).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: Vec<Box<str>>,
    pub query: Vec<(&'static str, Box<str>)>,
    /// Pre-serialized json body.
    pub body: Option<Bytes>,
}

impl ApiRequest {
    pub fn new<P>(method: Method, path: P) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self {
            method,
            path: path.into_iter().map(|part| Box::from(part.as_ref())).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    #[inline]
    pub fn get<P>(path: P) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self::new(Method::GET, path)
    }

    #[inline]
    pub fn post<P>(path: P) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self::new(Method::POST, path)
    }

    #[inline]
    pub fn patch<P>(path: P) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self::new(Method::PATCH, path)
    }

    #[inline]
    pub fn delete<P>(path: P) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.query.push((key, value.to_string().into_boxed_str()));
        self
    }

    pub fn query_opt(self, key: &'static str, value: Option<impl fmt::Display>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json_body<B>(mut self, body: &B) -> crate::Result<Self>
    where
        B: serde::Serialize + ?Sized,
    {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Returns the first value given for a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| &**value)
    }

    pub fn display_path(&self) -> DisplayPath<'_> {
        DisplayPath(&self.path)
    }
}

/// Displays the path segments of an [`ApiRequest`], joined by `/`.
pub struct DisplayPath<'a>(&'a [Box<str>]);

impl fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, part) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("/")?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::get(["projects", "p", "datasets", "d", "tables"])
            .query("maxResults", 10)
            .query_opt("pageToken", None::<&str>)
            .query_opt("startIndex", Some(20));

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.display_path().to_string(), "projects/p/datasets/d/tables");
        assert_eq!(request.query_value("maxResults"), Some("10"));
        assert_eq!(request.query_value("startIndex"), Some("20"));
        assert_eq!(request.query_value("pageToken"), None);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_json_body() -> crate::Result<()> {
        let request =
            ApiRequest::post(["projects", "p", "queries"]).json_body(&serde_json::json!({"a": 1}))?;

        assert_eq!(request.body.as_deref(), Some(&b"{\"a\":1}"[..]));
        Ok(())
    }
}
