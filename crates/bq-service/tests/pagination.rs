use std::collections::{HashSet, VecDeque};
use std::future::{Future, ready};
use std::sync::Arc;

use bq_service::resources::TableReference;
use bq_service::resources::table::TableSchema;
use bq_service::table::DeleteOutcome;
use bq_service::{ApiError, ApiRequest, BigQueryService, ClientConfig, Error, Transport};
use bytes::Bytes;
use http::{Method, StatusCode};
use parking_lot::Mutex;
use time::OffsetDateTime;

/// Replays canned responses in order, recording every request it sees.
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<serde_json::Value, ApiError>>>,
    seen: Mutex<Vec<(ApiRequest, u32)>>,
}

impl ScriptedTransport {
    fn respond(&self, value: serde_json::Value) -> &Self {
        self.responses.lock().push_back(Ok(value));
        self
    }

    fn fail(&self, error: ApiError) -> &Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    fn seen(&self) -> Vec<(ApiRequest, u32)> {
        self.seen.lock().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        request: &ApiRequest,
        max_retries: u32,
    ) -> impl Future<Output = bq_service::Result<Bytes>> + Send {
        self.seen.lock().push((request.clone(), max_retries));

        let next = self
            .responses
            .lock()
            .pop_front()
            .expect("no scripted response left");

        ready(match next {
            Ok(value) => Ok(Bytes::from(serde_json::to_vec(&value).unwrap())),
            Err(error) => Err(Error::Api(error)),
        })
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn service_with(
    config: &ClientConfig,
) -> (Arc<ScriptedTransport>, BigQueryService<Arc<ScriptedTransport>, OffsetDateTime>) {
    init_tracing();

    let transport = Arc::new(ScriptedTransport::default());
    let now = OffsetDateTime::from_unix_timestamp(1_600_000_000).unwrap();
    let service = BigQueryService::from_parts(Arc::clone(&transport), now, config);
    (transport, service)
}

fn service() -> (Arc<ScriptedTransport>, BigQueryService<Arc<ScriptedTransport>, OffsetDateTime>) {
    service_with(&ClientConfig::default())
}

fn data_page(total_rows: u64, count: u64) -> serde_json::Value {
    let rows = (0..count)
        .map(|idx| serde_json::json!({"f": [{"v": idx.to_string()}, {"v": null}]}))
        .collect::<Vec<_>>();

    serde_json::json!({"totalRows": total_rows.to_string(), "rows": rows})
}

#[tokio::test]
async fn scan_stops_at_total_rows() -> bq_service::Result<()> {
    let (transport, service) = service();
    transport
        .respond(data_page(25_000, 10_000))
        .respond(data_page(25_000, 10_000))
        .respond(data_page(25_000, 5_000));

    let table = TableReference::new("p", "d", "t");
    let rows = service.get_table_rows(&table).await?;

    assert_eq!(rows.len(), 25_000);
    assert!(rows.iter().all(|row| row.len() == 2 && row[1].is_none()));

    let max_results = transport
        .seen()
        .iter()
        .map(|(req, _)| req.query_value("maxResults").map(str::to_owned))
        .collect::<Vec<_>>();

    assert_eq!(
        max_results,
        ["10000", "10000", "5000"].map(|s| Some(s.to_owned()))
    );
    Ok(())
}

#[tokio::test]
async fn scan_reports_under_delivery() {
    let (transport, service) = service();
    transport
        .respond(data_page(20_000, 10_000))
        .respond(serde_json::json!({"totalRows": "20000"}));

    let table = TableReference::new("p", "d", "t");
    let error = service.get_table_rows(&table).await.unwrap_err();

    assert!(matches!(
        error,
        Error::UnderDelivered {
            expected: 20_000,
            received: 10_000
        }
    ));
}

#[tokio::test]
async fn every_request_carries_the_retry_budget() -> bq_service::Result<()> {
    let mut config = ClientConfig::default();
    config.max_retries(5);

    let (transport, service) = service_with(&config);
    transport
        .respond(serde_json::json!({"tables": [{"tableReference": {"projectId": "p", "datasetId": "d", "tableId": "a"}}], "nextPageToken": "x"}))
        .respond(serde_json::json!({"tables": [{"tableReference": {"projectId": "p", "datasetId": "d", "tableId": "a"}}]}))
        .respond(serde_json::json!({"jobReference": {"jobId": "j"}, "jobComplete": false}))
        .respond(serde_json::json!({"jobReference": {"jobId": "j"}, "jobComplete": true, "rows": [{"f": [{"v": "1"}]}]}));

    let ids = service.list_all_table_ids("p", "d").await?;
    assert_eq!(ids, HashSet::from([Box::from("a")]));

    let out = service.run_query("p", "SELECT 1").await?;
    assert_eq!(out, "1\n");

    let seen = transport.seen();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|(_, max_retries)| *max_retries == 5));
    Ok(())
}

#[tokio::test]
async fn table_lifecycle() -> bq_service::Result<()> {
    let (transport, service) = service();
    let table = TableReference::new("p", "d", "t");

    transport
        .respond(serde_json::json!({"tableReference": {"projectId": "p", "datasetId": "d", "tableId": "t"}}))
        .respond(serde_json::json!({"tableReference": {"projectId": "p", "datasetId": "d", "tableId": "t"}}))
        .respond(serde_json::json!({}))
        .fail(ApiError::new(StatusCode::NOT_FOUND, "Not found: Table p:d.t"));

    service
        .insert_table(&table, &TableSchema::<&str>::default(), Some(2))
        .await?;

    assert_eq!(service.delete_table(&table).await?, DeleteOutcome::Deleted);
    assert_eq!(service.delete_table(&table).await?, DeleteOutcome::AlreadyAbsent);

    let seen = transport.seen();
    let methods = seen.iter().map(|(req, _)| req.method.clone()).collect::<Vec<_>>();
    assert_eq!(methods, [Method::POST, Method::GET, Method::DELETE, Method::GET]);

    let (insert, _) = &seen[0];
    let body: serde_json::Value = serde_json::from_slice(insert.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["expirationTime"], "1600007200000");
    Ok(())
}
