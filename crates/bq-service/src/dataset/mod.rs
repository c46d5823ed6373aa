use std::collections::HashSet;

use bq_resources::table::TableList;

use crate::client::BigQueryService;
use crate::clock::Clock;
use crate::table::tables_path;
use crate::transport::{ApiRequest, Transport};

impl<T: Transport, C: Clock> BigQueryService<T, C> {
    /// Returns the first page of tables in a dataset.
    pub async fn list_tables(&self, project_id: &str, dataset_id: &str) -> crate::Result<TableList> {
        self.list_tables_page(project_id, dataset_id, None).await
    }

    async fn list_tables_page(
        &self,
        project_id: &str,
        dataset_id: &str,
        page_token: Option<&str>,
    ) -> crate::Result<TableList> {
        let request =
            ApiRequest::get(tables_path(project_id, dataset_id)).query_opt("pageToken", page_token);

        self.executor().execute(request).await
    }

    /// Collects the id of every table in a dataset, following page tokens
    /// until a page comes back without one.
    pub async fn list_all_table_ids(
        &self,
        project_id: &str,
        dataset_id: &str,
    ) -> crate::Result<HashSet<Box<str>>> {
        let mut table_ids = HashSet::new();
        let mut page = self.list_tables_page(project_id, dataset_id, None).await?;

        loop {
            table_ids.extend(page.table_ids().map(Box::from));

            let Some(token) = page.page_token().map(Box::<str>::from) else {
                break;
            };

            page = self
                .list_tables_page(project_id, dataset_id, Some(&token))
                .await?;
        }

        debug!(
            message = "listed dataset tables",
            project_id,
            dataset_id,
            table_ids = ?table_ids,
        );

        Ok(table_ids)
    }
}
