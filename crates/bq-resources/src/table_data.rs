use super::ErrorProto;
use crate::util;

/// A single page of rows, as returned by `tabledata.list`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDataList<S = Box<str>> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<S>,
    /// The total number of rows in the table, not just in this page.
    #[serde(with = "util::int64")]
    pub total_rows: u64,
    #[serde(
        default,
        alias = "nextPageToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_token: Option<S>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<TableRow>,
}

/// A row in the `{"f": [{"v": ...}]}` encoding shared by `tabledata.list` and query results.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TableRow {
    #[serde(default)]
    pub f: Vec<TableCell>,
}

impl TableRow {
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<V>>,
        V: Into<Box<str>>,
    {
        Self {
            f: values
                .into_iter()
                .map(|v| TableCell { v: v.map(Into::into) })
                .collect(),
        }
    }

    /// Consumes the row, returning the raw cell values in column order.
    pub fn into_values(self) -> Vec<Option<Box<str>>> {
        self.f.into_iter().map(|cell| cell.v).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.f.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.f.is_empty()
    }
}

/// A single cell, holding the raw string representation of its value.
///
/// `null` decodes to [`None`], strings are kept as-is, and nested values
/// (repeated fields and records) are kept as their compact json text.
/// A cell with no `v` at all decodes to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct TableCell {
    #[serde(default = "missing_value", deserialize_with = "deserialize_value")]
    pub v: Option<Box<str>>,
}

fn missing_value() -> Option<Box<str>> {
    Some(Box::default())
}

fn deserialize_value<'de, D>(deserializer: D) -> Result<Option<Box<str>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: serde_json::Value = serde::Deserialize::deserialize(deserializer)?;

    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(string) => Some(string.into_boxed_str()),
        other => Some(other.to_string().into_boxed_str()),
    })
}

#[derive(Debug, Default, PartialEq, Clone, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDataInsertAllResponse<S = Box<str>> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<S>,
    /// An array of errors for rows that were not inserted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insert_errors: Vec<InsertErrors<S>>,
}

impl<S> TableDataInsertAllResponse<S> {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.insert_errors.is_empty()
    }
}

#[derive(Debug, PartialEq, Clone, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertErrors<S = Box<str>> {
    /// The index of the row that error applies to.
    pub index: usize,
    /// Error information for the row indicated by the index property.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorProto<S>>,
}
