use std::collections::HashMap;

use super::TableReference;
use crate::builders::Unset;
use crate::builders::table_field_schema::TableFieldSchemaBuilder;
use crate::util;

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table<S = Box<str>> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_reference: Option<TableReference<S>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<Box<str>, S>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema<S>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewDefinition<S>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64::optional"
    )]
    pub num_bytes: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64::optional"
    )]
    pub num_rows: Option<u64>,
    /// Milliseconds since the unix epoch.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64::optional"
    )]
    pub creation_time: Option<i64>,
    /// Milliseconds since the unix epoch.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64::optional"
    )]
    pub expiration_time: Option<i64>,
    /// Milliseconds since the unix epoch.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64::optional"
    )]
    pub last_modified_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub ty: Option<TableType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableType {
    Table,
    View,
    External,
    MaterializedView,
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDefinition<S = Box<str>> {
    pub query: S,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_legacy_sql: Option<bool>,
}

impl<S> ViewDefinition<S> {
    pub const fn new(query: S) -> Self {
        Self {
            query,
            use_legacy_sql: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema<S = Box<str>> {
    #[serde(default)]
    pub fields: Vec<TableFieldSchema<S>>,
}

impl<S> Default for TableSchema<S> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<S> TableSchema<S> {
    pub const fn new(fields: Vec<TableFieldSchema<S>>) -> Self {
        Self { fields }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFieldSchema<S = Box<str>> {
    pub name: S,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default)]
    pub mode: FieldMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<S>,
    /// Sub-fields, only present for [`FieldType::Record`] fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<TableFieldSchema<S>>,
}

impl<S> TableFieldSchema<S> {
    pub const fn builder(name: S) -> TableFieldSchemaBuilder<S, Unset> {
        TableFieldSchemaBuilder::new(name)
    }

    pub const fn new(name: S, ty: FieldType, mode: FieldMode) -> Self {
        Self {
            name,
            ty,
            mode,
            description: None,
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldMode {
    #[default]
    Nullable,
    Repeated,
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    String,
    Bytes,
    #[serde(alias = "INT64")]
    Integer,
    #[serde(alias = "FLOAT64")]
    Float,
    #[serde(alias = "BOOLEAN")]
    Bool,
    Timestamp,
    Date,
    Time,
    DateTime,
    Geography,
    Numeric,
    BigNumeric,
    Json,
    #[serde(alias = "STRUCT")]
    Record,
    Range,
    Interval,
}

/// A single page of a `tables.list` call.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableList<S = Box<str>> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<S>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64::optional"
    )]
    pub total_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TableListItem<S>>,
}

impl<S: AsRef<str>> TableList<S> {
    /// The continuation token, treating an empty token the same as a missing one.
    pub fn page_token(&self) -> Option<&str> {
        self.next_page_token
            .as_ref()
            .map(AsRef::as_ref)
            .filter(|token| !token.is_empty())
    }

    /// Iterates over the table ids in this page, skipping entries without a reference.
    pub fn table_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.tables.iter().filter_map(|table| {
            table
                .table_reference
                .as_ref()
                .map(|table_ref| table_ref.table_id.as_ref())
        })
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListItem<S = Box<str>> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_reference: Option<TableReference<S>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub ty: Option<TableType>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64::optional"
    )]
    pub creation_time: Option<i64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "util::int64::optional"
    )]
    pub expiration_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE_JSON: &str = r#"{
        "kind": "bigquery#table",
        "etag": "\"abc\"",
        "id": "bigquery_project_id:bigquery_dataset_id.bigquery_table_id",
        "tableReference": {
            "projectId": "bigquery_project_id",
            "datasetId": "bigquery_dataset_id",
            "tableId": "bigquery_table_id"
        },
        "schema": {
            "fields": [
                {"name": "firstname", "type": "STRING", "mode": "REQUIRED"},
                {"name": "surname", "type": "STRING", "mode": "REQUIRED"},
                {"name": "age", "type": "INTEGER"},
                {"name": "address", "type": "RECORD", "mode": "NULLABLE", "fields": [
                    {"name": "city", "type": "STRING"}
                ]}
            ]
        },
        "numBytes": "0",
        "numRows": "0",
        "creationTime": "1446642060000",
        "lastModifiedTime": "1446642060000",
        "type": "TABLE"
    }"#;

    #[test]
    fn test_table_deserialize() {
        let table: Table = serde_json::from_str(TABLE_JSON).unwrap();

        assert_eq!(table.ty, Some(TableType::Table));
        assert_eq!(table.kind.as_deref(), Some("bigquery#table"));
        assert_eq!(table.creation_time, Some(1_446_642_060_000));

        let schema = table.schema.unwrap();
        assert_eq!(schema.len(), 4);
        assert_eq!(schema.fields[2].mode, FieldMode::Nullable);
        assert_eq!(schema.fields[2].ty, FieldType::Integer);
        assert_eq!(schema.fields[3].fields.len(), 1);
    }

    #[test]
    fn test_view_patch_serializes_only_view() {
        let patch = Table::<&str> {
            view: Some(ViewDefinition::new("SELECT 1")),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "view": { "query": "SELECT 1" } })
        );
    }

    #[test]
    fn test_table_list_without_tables() {
        let list: TableList = serde_json::from_str(r#"{"kind": "bigquery#tableList"}"#).unwrap();

        assert!(list.tables.is_empty());
        assert_eq!(list.page_token(), None);

        let empty_token: TableList = serde_json::from_str(r#"{"nextPageToken": ""}"#).unwrap();
        assert_eq!(empty_token.page_token(), None);
    }

    #[test]
    fn test_field_type_aliases() {
        let types: Vec<FieldType> =
            serde_json::from_str(r#"["INT64", "FLOAT64", "BOOLEAN", "BOOL", "STRUCT", "DATETIME"]"#)
                .unwrap();

        assert_eq!(types, vec![
            FieldType::Integer,
            FieldType::Float,
            FieldType::Bool,
            FieldType::Bool,
            FieldType::Record,
            FieldType::DateTime,
        ]);
    }
}
