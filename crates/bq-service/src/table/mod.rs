use bq_resources::TableReference;
use bq_resources::table::{Table, TableSchema, ViewDefinition};
use bq_resources::table_data::TableDataInsertAllResponse;
use bq_resources::util;

use crate::client::BigQueryService;
use crate::clock::{self, Clock};
use crate::transport::{ApiRequest, Transport};

mod insert_rows;
mod scan;

pub use insert_rows::InsertRowOptions;
pub use scan::{DEFAULT_MAX_ROWS, PAGE_ROWS, TableRows};

/// Result of [`BigQueryService::delete_table_opt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteOutcome {
    /// The existence check found nothing, so no delete was issued.
    AlreadyAbsent,
    Deleted,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertTable<'a, S> {
    table_reference: TableReference<&'a str>,
    schema: &'a TableSchema<S>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "util::int64::optional::serialize"
    )]
    expiration_time: Option<i64>,
}

pub(crate) fn tables_path<'a>(project_id: &'a str, dataset_id: &'a str) -> [&'a str; 5] {
    ["projects", project_id, "datasets", dataset_id, "tables"]
}

pub(crate) fn table_path<'a>(table_ref: &TableReference<&'a str>) -> [&'a str; 6] {
    [
        "projects",
        table_ref.project_id,
        "datasets",
        table_ref.dataset_id,
        "tables",
        table_ref.table_id,
    ]
}

impl<T: Transport, C: Clock> BigQueryService<T, C> {
    /// Creates a table with the given schema, optionally expiring `expire_in_hours` from now.
    /// Zero hours, like [`None`], creates a table that never expires.
    pub async fn insert_table<S, Sch>(
        &self,
        table_ref: &TableReference<S>,
        schema: &TableSchema<Sch>,
        expire_in_hours: Option<u32>,
    ) -> crate::Result<Table>
    where
        S: AsRef<str>,
        Sch: serde::Serialize,
    {
        let table_ref = table_ref.as_str_ref();

        let body = InsertTable {
            table_reference: table_ref,
            schema,
            expiration_time: expire_in_hours
                .filter(|&hours| hours > 0)
                .map(|hours| clock::expiration_ms(self.clock(), hours)),
        };

        let request = ApiRequest::post(tables_path(table_ref.project_id, table_ref.dataset_id))
            .json_body(&body)?;

        self.executor().execute(request).await
    }

    /// Returns the table if it exists. Only a not found error maps to [`None`].
    pub async fn has_table<S>(&self, table_ref: &TableReference<S>) -> crate::Result<Option<Table>>
    where
        S: AsRef<str>,
    {
        let table_ref = table_ref.as_str_ref();

        match self.get_table(&table_ref).await {
            Ok(table) => Ok(Some(table)),
            Err(error) if error.is_not_found() => {
                debug!(message = "table not found", table = %table_ref);
                Ok(None)
            }
            Err(error) => {
                error!(
                    message = "failed to check for table existence",
                    table = %table_ref,
                    error = %error,
                );
                Err(error)
            }
        }
    }

    /// Deletes the table, checking that it exists first.
    pub async fn delete_table<S>(&self, table_ref: &TableReference<S>) -> crate::Result<DeleteOutcome>
    where
        S: AsRef<str>,
    {
        self.delete_table_opt(table_ref, true).await
    }

    pub async fn delete_table_opt<S>(
        &self,
        table_ref: &TableReference<S>,
        check_if_exists: bool,
    ) -> crate::Result<DeleteOutcome>
    where
        S: AsRef<str>,
    {
        let table_ref = table_ref.as_str_ref();

        if check_if_exists && self.has_table(&table_ref).await?.is_none() {
            return Ok(DeleteOutcome::AlreadyAbsent);
        }

        self.executor()
            .execute_empty(ApiRequest::delete(table_path(&table_ref)))
            .await?;

        Ok(DeleteOutcome::Deleted)
    }

    pub async fn get_table<S>(&self, table_ref: &TableReference<S>) -> crate::Result<Table>
    where
        S: AsRef<str>,
    {
        let table_ref = table_ref.as_str_ref();

        self.executor()
            .execute(ApiRequest::get(table_path(&table_ref)))
            .await
    }

    /// Returns the schema of the table, or an empty schema if it has none.
    pub async fn get_table_schema<S>(&self, table_ref: &TableReference<S>) -> crate::Result<TableSchema>
    where
        S: AsRef<str>,
    {
        let table = self.get_table(table_ref).await?;
        Ok(table.schema.unwrap_or_default())
    }

    /// Replaces the defining query of a view.
    pub async fn update_view_query<S>(
        &self,
        table_ref: &TableReference<S>,
        query: &str,
    ) -> crate::Result<Table>
    where
        S: AsRef<str>,
    {
        let table_ref = table_ref.as_str_ref();

        let patch = Table::<&str> {
            view: Some(ViewDefinition::new(query)),
            ..Default::default()
        };

        let request = ApiRequest::patch(table_path(&table_ref)).json_body(&patch)?;
        let table = self.executor().execute(request).await?;

        debug!(message = "updated view query", table = %table_ref, query = query);

        Ok(table)
    }

    pub async fn insert_rows<S, R>(
        &self,
        table_ref: &TableReference<S>,
        rows: R,
    ) -> crate::Result<TableDataInsertAllResponse>
    where
        S: AsRef<str>,
        R: IntoIterator,
        R::Item: serde::Serialize,
    {
        self.insert_rows_opt(table_ref, rows, InsertRowOptions::default())
            .await
    }

    /// Streams rows into the table. Per-row failures are reported in the
    /// response's `insert_errors`, not as an [`Err`].
    pub async fn insert_rows_opt<S, R>(
        &self,
        table_ref: &TableReference<S>,
        rows: R,
        options: InsertRowOptions,
    ) -> crate::Result<TableDataInsertAllResponse>
    where
        S: AsRef<str>,
        R: IntoIterator,
        R::Item: serde::Serialize,
    {
        let table_ref = table_ref.as_str_ref();
        let path = table_path(&table_ref).into_iter().chain(["insertAll"]);

        let payload = insert_rows::InsertRows::new(options, rows);
        let request = ApiRequest::post(path).json_body(&payload)?;

        self.executor().execute(request).await
    }
}
