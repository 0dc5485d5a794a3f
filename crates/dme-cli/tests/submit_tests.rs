//! Submission and end-to-end batch tests against an in-process server

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use dme_cli::commands::extract::run_extraction;
use dme_cli::{CliError, Submitter};
use dme_extractor::{Device, ExtractorConfig, OrderExtractor};
use serde_json::{json, Value};
use std::fs;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

type Received = Arc<Mutex<Vec<Value>>>;

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn intake_server() -> (String, Received) {
    async fn accept(State(received): State<Received>, Json(body): Json<Value>) -> StatusCode {
        received.lock().unwrap().push(body);
        StatusCode::CREATED
    }

    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/orders", post(accept))
        .with_state(received.clone());
    (format!("{}/orders", spawn(app).await), received)
}

#[tokio::test]
async fn test_submits_record_as_camel_case_json() {
    let (endpoint, received) = intake_server().await;
    let submitter = Submitter::new(endpoint).unwrap();

    let order = OrderExtractor::default()
        .extract("Patient needs a CPAP with full face mask and humidifier. AHI > 20. Ordered by Dr. Cameron.")
        .await
        .unwrap();
    submitter.submit(&order).await.unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        json!({
            "device": "CPAP",
            "orderingProvider": "Dr. Cameron",
            "maskType": "full face",
            "addOns": ["humidifier"],
            "qualifier": "AHI > 20"
        })
    );
}

#[tokio::test]
async fn test_rejected_submission_is_error() {
    async fn reject() -> (StatusCode, &'static str) {
        (StatusCode::UNPROCESSABLE_ENTITY, "missing patient")
    }

    let base = spawn(Router::new().route("/orders", post(reject))).await;
    let submitter = Submitter::new(format!("{}/orders", base)).unwrap();
    let order = OrderExtractor::default()
        .extract("Wheelchair. Ordered by Dr. House.")
        .await
        .unwrap();

    match submitter.submit(&order).await {
        Err(CliError::Submission(msg)) => {
            assert!(msg.contains("422"));
            assert!(msg.contains("missing patient"));
        }
        other => panic!("Expected submission error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_batch_submits_each_extracted_note() {
    let (endpoint, received) = intake_server().await;
    let submitter = Submitter::new(endpoint).unwrap();

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("1.txt"), "Patient requires a wheelchair. Ordered by Dr. House.").unwrap();
    fs::write(dir.path().join("2.txt"), "").unwrap();
    fs::write(dir.path().join("3.json"), r#"{"data": "Patient needs a CPAP machine."}"#).unwrap();
    let files = dme_cli::source::discover(&[dir.path().to_path_buf()]).unwrap();

    let report = run_extraction(&OrderExtractor::default(), Some(&submitter), &files).await;

    assert_eq!(report.extracted.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, "invalid-input");

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0]["device"], "Wheelchair");
    assert_eq!(received[1]["device"], "CPAP");
    assert_eq!(received[1]["orderingProvider"], "Unknown");
}

#[tokio::test]
async fn test_model_strategy_against_local_server() {
    async fn generate(Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(body["format"]["additionalProperties"], false);
        let reply = json!({
            "device": "Oxygen Tank",
            "liters": "2",
            "usage": "sleep and exertion",
            "diagnosis": "COPD",
            "orderingProvider": "Dr. Cuddy",
            "patientName": "",
            "dob": "",
            "maskType": "",
            "addOns": [],
            "qualifier": ""
        });
        Json(json!({"response": reply.to_string(), "done": true}))
    }

    let base = spawn(Router::new().route("/api/generate", post(generate))).await;
    let mut config = ExtractorConfig::local_model("llama3.1");
    config.model.endpoint = Some(base);
    let extractor = OrderExtractor::from_config(&config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let note = dir.path().join("oxygen.txt");
    fs::write(&note, "Requires a portable oxygen tank delivering 2 L per minute.").unwrap();

    let report = run_extraction(&extractor, None, &[note]).await;
    assert!(report.failures.is_empty());

    let order = &report.extracted[0].order;
    assert_eq!(order.device(), &Device::OxygenTank);
    assert_eq!(order.liters(), Some("2 L"));
    assert_eq!(order.diagnosis(), Some("COPD"));
    assert!(order.mask_type().is_none());
}

#[tokio::test]
async fn test_model_outage_is_upstream_failure() {
    async fn unavailable() -> (StatusCode, &'static str) {
        (StatusCode::SERVICE_UNAVAILABLE, "loading model")
    }

    let base = spawn(Router::new().route("/api/generate", post(unavailable))).await;
    let mut config = ExtractorConfig::local_model("llama3.1");
    config.model.endpoint = Some(base);
    let extractor = OrderExtractor::from_config(&config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let note = dir.path().join("note.txt");
    fs::write(&note, "Patient needs a CPAP machine.").unwrap();

    let report = run_extraction(&extractor, None, &[note]).await;
    assert!(report.extracted.is_empty());
    assert_eq!(report.failures[0].kind, "upstream");
}
