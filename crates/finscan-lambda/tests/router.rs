//! Router tests with in-memory collaborators. No network access.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use finscan_bedrock::error::BedrockError;
use finscan_core::models::document::{Entity, FormField, Page, StructuredDocument};
use finscan_core::s3_keys::ObjectUri;
use finscan_lambda::collaborators::{BoxFuture, DocumentProcessor, ObjectStore};
use finscan_lambda::pipeline::ExtractionStrategy;
use finscan_lambda::state::AppState;
use finscan_storage::error::StorageError;
use finscan_storage::objects::ObjectMeta;

const OUTPUT_BUCKET: &str = "finscan-output";
const SOURCE_URI: &str = "s3://finscan-input/statements/Balance-Sheet-Example.pdf";

#[derive(Clone)]
struct StoredObject {
    body: Vec<u8>,
    content_type: Option<String>,
    written_at: i64,
}

#[derive(Default)]
struct MemoryStore {
    objects: Mutex<BTreeMap<(String, String), StoredObject>>,
    clock: Mutex<i64>,
    listing_fails: AtomicBool,
}

impl MemoryStore {
    fn with_object(self, bucket: &str, key: &str, body: &[u8]) -> Self {
        self.insert(bucket, key, body.to_vec(), None);
        self
    }

    fn insert(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: Option<String>) {
        let mut clock = self.clock.lock().unwrap();
        *clock += 1;
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type,
                written_at: *clock,
            },
        );
    }

    fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }
}

impl ObjectStore for MemoryStore {
    fn fetch<'a>(&'a self, uri: &'a ObjectUri) -> BoxFuture<'a, Result<Vec<u8>, StorageError>> {
        Box::pin(async move {
            self.get(&uri.bucket, &uri.key)
                .map(|obj| obj.body)
                .ok_or_else(|| StorageError::NotFound {
                    bucket: uri.bucket.clone(),
                    key: uri.key.clone(),
                })
        })
    }

    fn store<'a>(
        &'a self,
        body: Vec<u8>,
        filename: &'a str,
        bucket: &'a str,
        content_type: &'a str,
    ) -> BoxFuture<'a, Result<ObjectUri, StorageError>> {
        Box::pin(async move {
            self.insert(bucket, filename, body, Some(content_type.to_string()));
            Ok(ObjectUri::new(bucket, filename))
        })
    }

    fn list<'a>(&'a self, bucket: &'a str) -> BoxFuture<'a, Result<Vec<ObjectMeta>, StorageError>> {
        Box::pin(async move {
            if self.listing_fails.load(Ordering::SeqCst) {
                return Err(StorageError::ListObjects("access denied".to_string()));
            }
            Ok(self
                .objects
                .lock()
                .unwrap()
                .iter()
                .filter(|((b, _), _)| b.as_str() == bucket)
                .map(|((_, key), obj)| ObjectMeta {
                    key: key.clone(),
                    size: obj.body.len() as i64,
                    last_modified: Some(obj.written_at),
                })
                .collect())
        })
    }
}

struct FixedProcessor {
    document: Option<StructuredDocument>,
}

impl DocumentProcessor for FixedProcessor {
    fn process<'a>(
        &'a self,
        bytes: &'a [u8],
        mime_type: &'a str,
        _filename: &'a str,
    ) -> BoxFuture<'a, Result<StructuredDocument, BedrockError>> {
        Box::pin(async move {
            assert_eq!(mime_type, "application/pdf");
            assert!(!bytes.is_empty());
            self.document
                .clone()
                .ok_or_else(|| BedrockError::Invocation("service unavailable".to_string()))
        })
    }
}

fn balance_sheet() -> StructuredDocument {
    StructuredDocument {
        entities: vec![
            Entity::new("Capital", "500"),
            Entity::new("Total-Liabilities", "250"),
            Entity::new("Signature", "J. Doe"),
        ],
        pages: vec![Page {
            text: "Balance Sheet".to_string(),
            form_fields: vec![],
        }],
    }
}

fn invoice() -> StructuredDocument {
    StructuredDocument {
        entities: vec![],
        pages: vec![
            Page {
                text: "Invoice".to_string(),
                form_fields: vec![
                    FormField::new("Vendor", "Acme"),
                    FormField::new("Total", "1,200"),
                ],
            },
            Page::default(),
        ],
    }
}

struct Harness {
    store: Arc<MemoryStore>,
    app: axum::Router,
}

fn harness(strategy: ExtractionStrategy, document: Option<StructuredDocument>) -> Harness {
    let store = Arc::new(MemoryStore::default().with_object(
        "finscan-input",
        "statements/Balance-Sheet-Example.pdf",
        b"%PDF-1.7 fake",
    ));
    let state = AppState {
        store: store.clone(),
        processor: Arc::new(FixedProcessor { document }),
        output_bucket: OUTPUT_BUCKET.to_string(),
        strategy,
    };
    Harness {
        store,
        app: finscan_lambda::app(state),
    }
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn process_body(uri: &str) -> String {
    json!({ "pdf_gcs_uri": uri }).to_string()
}

#[tokio::test]
async fn health_check_ok() {
    let h = harness(ExtractionStrategy::Financial, Some(balance_sheet()));
    let response = h.app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn financial_pipeline_stores_json_and_csv() {
    let h = harness(ExtractionStrategy::Financial, Some(balance_sheet()));

    let response = h
        .app
        .oneshot(post_json("/", &process_body(SOURCE_URI)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["json_gcs_uri"],
        "s3://finscan-output/Balance-Sheet-Example.json"
    );
    assert_eq!(
        body["csv_gcs_uri"],
        "s3://finscan-output/Balance-Sheet-Example.csv"
    );

    let data = body["extracted_data"].as_object().unwrap();
    assert_eq!(data["Capital"], "500");
    assert_eq!(data["Total-Liabilities"], "250");
    assert!(data["Investments"].is_null());
    assert_eq!(data["Current-Ratio"], 2.0);
    assert_eq!(data["Quick-Ratio"], 2.0);
    assert_eq!(data["Debt-to-Equity-Ratio"], 0.5);
    assert_eq!(data.len(), 11);

    let json_artifact = h
        .store
        .get(OUTPUT_BUCKET, "Balance-Sheet-Example.json")
        .unwrap();
    assert_eq!(json_artifact.content_type.as_deref(), Some("application/json"));
    let stored: Value = serde_json::from_slice(&json_artifact.body).unwrap();
    assert_eq!(&stored, &body["extracted_data"]);

    let csv_artifact = h
        .store
        .get(OUTPUT_BUCKET, "Balance-Sheet-Example.csv")
        .unwrap();
    assert_eq!(csv_artifact.content_type.as_deref(), Some("text/csv"));
    let csv = String::from_utf8(csv_artifact.body).unwrap();
    assert!(csv.starts_with("Capital,Investments,"));
    assert!(csv.lines().nth(1).unwrap().ends_with(",2.0,2.0,0.5"));
}

#[tokio::test]
async fn forms_pipeline_returns_csv_uri_only() {
    let h = harness(ExtractionStrategy::Forms, Some(invoice()));

    let response = h
        .app
        .oneshot(post_json("/process", &process_body(SOURCE_URI)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "csv_gcs_uri": "s3://finscan-output/Balance-Sheet-Example.csv" })
    );

    let csv = h
        .store
        .get(OUTPUT_BUCKET, "Balance-Sheet-Example.csv")
        .unwrap();
    assert_eq!(
        String::from_utf8(csv.body).unwrap(),
        "Vendor,Total\nAcme,\"1,200\"\n"
    );
    assert!(h.store.get(OUTPUT_BUCKET, "Balance-Sheet-Example.json").is_none());
}

#[tokio::test]
async fn uri_alias_is_accepted() {
    let h = harness(ExtractionStrategy::Forms, Some(invoice()));
    let body = json!({ "pdf_uri": SOURCE_URI }).to_string();
    let response = h.app.oneshot(post_json("/", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn primary_uri_key_wins_over_alias() {
    let h = harness(ExtractionStrategy::Forms, Some(invoice()));
    let body = json!({
        "pdf_gcs_uri": SOURCE_URI,
        "pdf_uri": "s3://finscan-input/statements/missing.pdf",
    })
    .to_string();
    let response = h.app.oneshot(post_json("/process", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "csv_gcs_uri": "s3://finscan-output/Balance-Sheet-Example.csv" })
    );
}

#[tokio::test]
async fn missing_uri_is_bad_request() {
    for body in ["{}", "not json", "", r#"{"pdf_gcs_uri": 42}"#] {
        let h = harness(ExtractionStrategy::Financial, Some(balance_sheet()));
        let response = h.app.oneshot(post_json("/", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing PDF GCS URI in request" })
        );
    }
}

#[tokio::test]
async fn invalid_uri_is_bad_request() {
    let h = harness(ExtractionStrategy::Financial, Some(balance_sheet()));
    let response = h
        .app
        .oneshot(post_json("/", &process_body("gs://bucket/file.pdf")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("s3://"));
}

#[tokio::test]
async fn missing_source_object_is_internal_error() {
    let h = harness(ExtractionStrategy::Financial, Some(balance_sheet()));
    let response = h
        .app
        .oneshot(post_json("/", &process_body("s3://finscan-input/missing.pdf")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("missing.pdf"));
    assert!(h.store.get(OUTPUT_BUCKET, "missing.json").is_none());
}

#[tokio::test]
async fn processor_failure_is_internal_error_without_artifacts() {
    let h = harness(ExtractionStrategy::Financial, None);
    let response = h
        .app
        .oneshot(post_json("/", &process_body(SOURCE_URI)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "model invocation failed: service unavailable" })
    );
    assert!(h.store.get(OUTPUT_BUCKET, "Balance-Sheet-Example.json").is_none());
    assert!(h.store.get(OUTPUT_BUCKET, "Balance-Sheet-Example.csv").is_none());
}

#[tokio::test]
async fn latest_csv_returns_newest_artifact() {
    let h = harness(ExtractionStrategy::Financial, Some(balance_sheet()));
    h.store
        .insert(OUTPUT_BUCKET, "older.csv", b"a,b\n1,2\n".to_vec(), None);
    h.store
        .insert(OUTPUT_BUCKET, "newer.csv", b"c,d\n3,4\n".to_vec(), None);
    h.store
        .insert(OUTPUT_BUCKET, "newest.json", b"{}".to_vec(), None);

    let response = h.app.oneshot(get("/outputs/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"newer.csv\""
    );
    assert_eq!(body_bytes(response).await, b"c,d\n3,4\n");
}

#[tokio::test]
async fn latest_csv_not_found_when_bucket_empty() {
    let h = harness(ExtractionStrategy::Financial, Some(balance_sheet()));
    let response = h.app.oneshot(get("/outputs/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("no CSV"));
}

#[tokio::test]
async fn latest_csv_listing_failure_is_internal_error() {
    let h = harness(ExtractionStrategy::Financial, Some(balance_sheet()));
    h.store.listing_fails.store(true, Ordering::SeqCst);

    let response = h.app.oneshot(get("/outputs/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "S3 ListObjects error: access denied" })
    );
}
