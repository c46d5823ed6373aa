use std::fmt;

pub mod builders;
pub mod job;
pub mod query;
pub mod table;
pub mod table_data;
pub mod util;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference<S = Box<str>> {
    pub project_id: S,
    pub dataset_id: S,
    pub table_id: S,
}

impl<S> TableReference<S> {
    #[inline]
    pub const fn new(project_id: S, dataset_id: S, table_id: S) -> Self {
        Self {
            project_id,
            dataset_id,
            table_id,
        }
    }

    /// Borrows each component as a `&str`, regardless of the owned string type.
    #[inline]
    pub fn as_str_ref(&self) -> TableReference<&str>
    where
        S: AsRef<str>,
    {
        TableReference {
            project_id: self.project_id.as_ref(),
            dataset_id: self.dataset_id.as_ref(),
            table_id: self.table_id.as_ref(),
        }
    }
}

impl<S: fmt::Display> fmt::Display for TableReference<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}

/// A single error entry, as returned in `errors` arrays by the REST API.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
pub struct ErrorProto<S = Box<str>> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<S>,
    pub message: S,
}

impl<S> ErrorProto<S> {
    pub const fn new(message: S) -> Self {
        Self {
            reason: None,
            location: None,
            debug_info: None,
            message,
        }
    }

    pub fn with_reason(mut self, reason: S) -> Self {
        self.reason = Some(reason);
        self
    }
}

impl<S: fmt::Display> fmt::Display for ErrorProto<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            Some(ref reason) => write!(f, "{}: {reason}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl<S: AsRef<str>> ErrorProto<S> {
    pub fn is_not_found(&self) -> bool {
        self.reason
            .as_ref()
            .is_some_and(|reason| reason.as_ref() == "notFound")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_reference_json() {
        let table_ref = TableReference::new("project", "dataset", "table");

        let json = serde_json::to_value(table_ref).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "projectId": "project",
                "datasetId": "dataset",
                "tableId": "table",
            })
        );

        assert_eq!(table_ref.to_string(), "project.dataset.table");
    }

    #[test]
    fn test_error_proto_not_found() {
        let error: ErrorProto = serde_json::from_str(
            r#"{"reason": "notFound", "message": "Not found: Table p:d.t"}"#,
        )
        .unwrap();

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Not found: Table p:d.t: notFound");

        let other: ErrorProto = serde_json::from_str(r#"{"message": "boom"}"#).unwrap();
        assert!(!other.is_not_found());
    }
}
