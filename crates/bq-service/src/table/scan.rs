use bq_resources::TableReference;
use bq_resources::table_data::TableDataList;

use super::table_path;
use crate::client::BigQueryService;
use crate::clock::Clock;
use crate::transport::{ApiRequest, Transport};

/// Row cap used by [`BigQueryService::get_table_rows`].
pub const DEFAULT_MAX_ROWS: u64 = 100_000;

/// Rows requested per `tabledata.list` call.
pub const PAGE_ROWS: u64 = 10_000;

/// Row-major cell values, in column order. Null cells are [`None`].
pub type TableRows = Vec<Vec<Option<Box<str>>>>;

impl<T: Transport, C: Clock> BigQueryService<T, C> {
    /// Reads up to [`DEFAULT_MAX_ROWS`] rows from the start of the table.
    pub async fn get_table_rows<S>(&self, table_ref: &TableReference<S>) -> crate::Result<TableRows>
    where
        S: AsRef<str>,
    {
        self.get_table_rows_max(table_ref, DEFAULT_MAX_ROWS).await
    }

    /// Reads up to `max_rows` rows from the start of the table, paging
    /// sequentially. The cap is lowered to the table's `totalRows` once known.
    ///
    /// Fails with [`Error::UnderDelivered`] if the server returns an empty
    /// page before the cap is reached.
    ///
    /// [`Error::UnderDelivered`]: crate::Error::UnderDelivered
    pub async fn get_table_rows_max<S>(
        &self,
        table_ref: &TableReference<S>,
        max_rows: u64,
    ) -> crate::Result<TableRows>
    where
        S: AsRef<str>,
    {
        let table_ref = table_ref.as_str_ref();
        let path = table_path(&table_ref).into_iter().chain(["data"]);
        let base_request = ApiRequest::get(path);

        let mut effective_max = max_rows;
        let mut rows = TableRows::new();

        while (rows.len() as u64) < effective_max {
            let received = rows.len() as u64;
            let remaining = effective_max - received;

            let request = base_request
                .clone()
                .query("maxResults", remaining.min(PAGE_ROWS))
                .query("startIndex", received);

            let page: TableDataList = self.executor().execute(request).await?;

            effective_max = effective_max.min(page.total_rows);

            // the table shrank below what was already read
            if received >= effective_max {
                rows.truncate(usize::try_from(effective_max).unwrap_or(usize::MAX));
                break;
            }

            if page.rows.is_empty() {
                if received != effective_max {
                    return Err(crate::Error::UnderDelivered {
                        expected: effective_max,
                        received,
                    });
                }
                break;
            }

            let take = usize::try_from(effective_max - received).unwrap_or(usize::MAX);
            rows.extend(page.rows.into_iter().take(take).map(|row| row.into_values()));
        }

        Ok(rows)
    }
}
