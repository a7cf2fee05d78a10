//! Backend client tests against a stub HTTP backend

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use jobdeck_client::{BackendClient, JobSource};
use jobdeck_core::domain::job::{JobStatus, JobType};
use jobdeck_core::domain::payload::JobPayload;
use jobdeck_core::dto::job::JobSpec;
use serde_json::{Value, json};

fn job_json(id: &str, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "type": "add_numbers",
        "status": status,
        "priority": 2,
        "thread_demand": 1,
        "created_at": created_at
    })
}

async fn live_jobs() -> Json<Value> {
    Json(json!([
        job_json("live-1", "Running", "2025-03-01T10:00:00Z"),
        job_json("live-2", "Pending", "2025-03-01T10:01:00Z"),
    ]))
}

async fn historical_jobs() -> Json<Value> {
    // Go encodes an empty slice as null
    Json(Value::Null)
}

async fn get_job(Path(id): Path<String>) -> impl IntoResponse {
    if id == "live-1" {
        (
            StatusCode::OK,
            Json(job_json("live-1", "Running", "2025-03-01T10:00:00Z")),
        )
            .into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"error": "job not found"}))).into_response()
    }
}

async fn submit_job(Json(body): Json<Value>) -> impl IntoResponse {
    if body["type"] == "reverse_string" {
        return (StatusCode::INTERNAL_SERVER_ERROR, String::new()).into_response();
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": "new-1",
            "type": body["type"],
            "status": "Pending",
            "priority": body["priority"],
            "thread_demand": body["thread_demand"],
            "created_at": "2025-03-01T11:00:00Z"
        })),
    )
        .into_response()
}

/// Serve the stub backend on an ephemeral port and return its base URL
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/jobs", get(live_jobs).post(submit_job))
        .route("/jobs/{id}", get(get_job))
        .route("/db/jobs", get(historical_jobs));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_fetch_live_jobs() {
    let client = BackendClient::new(spawn_backend().await);

    let jobs = client.fetch_live_jobs().await.unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, "live-1");
    assert_eq!(jobs[0].status, JobStatus::Running);
    assert_eq!(jobs[1].kind, JobType::AddNumbers);
}

#[tokio::test]
async fn test_null_historical_list_is_empty() {
    let client = BackendClient::new(spawn_backend().await);

    let jobs = client.fetch_historical_jobs().await.unwrap();
    assert!(jobs.is_empty());
}

#[tokio::test]
async fn test_fetch_job_not_found() {
    let client = BackendClient::new(spawn_backend().await);

    let job = client.fetch_job("live-1").await.unwrap();
    assert_eq!(job.id, "live-1");

    let err = client.fetch_job("missing").await.unwrap_err();
    assert!(err.is_not_found());
    let message = err.to_string();
    assert!(message.contains("404"), "{}", message);
    assert!(message.contains("Not Found"), "{}", message);
    assert!(message.contains("job not found"), "{}", message);
}

#[tokio::test]
async fn test_submit_job_echoes_created_job() {
    let client = BackendClient::new(spawn_backend().await);

    let spec = JobSpec::new(JobPayload::AddNumbers { x: 1, y: 2 })
        .with_priority(4)
        .with_thread_demand(3);
    let job = JobSource::submit_job(&client, &spec).await.unwrap();

    assert_eq!(job.id, "new-1");
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.priority, 4);
    assert_eq!(job.thread_demand, 3);
    assert!(job.started_at.is_none());
}

#[tokio::test]
async fn test_submit_failure_carries_reason_phrase() {
    let client = BackendClient::new(spawn_backend().await);

    let spec = JobSpec::new(JobPayload::ReverseString {
        text: "abc".to_string(),
    });
    let err = client.submit_job(&spec).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.is_server_error());
    assert_eq!(
        err.to_string(),
        "API error (status 500): Internal Server Error"
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_request_error() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = BackendClient::new(format!("http://{}", addr));
    let err = client.fetch_live_jobs().await.unwrap_err();
    assert!(matches!(err, jobdeck_client::TransportError::Request(_)));
}
