use std::num::NonZeroU32;

use crate::ErrorProto;
use crate::job::JobReference;
use crate::table::TableSchema;
use crate::table_data::TableRow;
use crate::util;

/// Request body for `jobs.query`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<S = Box<str>> {
    pub query: S,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<NonZeroU32>,
    pub use_legacy_sql: bool,
}

impl<S> QueryRequest<S> {
    pub const fn new(query: S) -> Self {
        Self {
            query,
            timeout_ms: None,
            max_results: None,
            use_legacy_sql: false,
        }
    }
}

/// Response of both `jobs.query` and `jobs.getQueryResults`.
///
/// Rows are only meaningful once `job_complete` is set, until then the job
/// is still running server side and needs to be polled again.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse<S = Box<str>> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_reference: Option<JobReference<S>>,
    #[serde(default)]
    pub job_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema<S>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<TableRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<S>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64::optional"
    )]
    pub total_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorProto<S>>,
    #[serde(default, skip_serializing_if = "util::is_false")]
    pub cache_hit: bool,
}
