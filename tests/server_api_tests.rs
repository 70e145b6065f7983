use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use duelsim::parallel::WorkerPool;
use duelsim::server::router;
use duelsim::server::routes::{route_request, AppState};
use tower::ServiceExt;

fn state() -> AppState {
    AppState {
        pool: WorkerPool::with_workers(2),
        ..AppState::default()
    }
}

#[test]
fn health_endpoint_returns_ok_json() {
    let response = route_request(&state(), "GET", "/api/health", "");
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert!(response.body.contains("\"status\": \"ok\""));
    assert!(response.body.contains("duelsim-api"));
}

#[test]
fn simulate_endpoint_returns_a_summary() {
    let body = r#"{
        "attacker": { "name": "Alice", "max_life": 900 },
        "defender": { "name": "Bob", "max_life": 900 },
        "trials": 200,
        "seed": 31
    }"#;
    let response = route_request(&state(), "POST", "/api/simulate", body);
    assert_eq!(response.status_code, 200);

    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["seed"], 31);
    assert!(payload["run_id"].as_str().is_some());

    let summary = &payload["summary"];
    assert_eq!(summary["trials"], 200);
    let wins = summary["attacker_wins"].as_u64().unwrap_or(0)
        + summary["defender_wins"].as_u64().unwrap_or(0)
        + summary["stalemates"].as_u64().unwrap_or(0);
    assert_eq!(wins, 200);
    let log = summary["sample_log"].as_array().expect("sample log array");
    assert!(!log.is_empty());
    assert!(log
        .iter()
        .filter_map(|line| line.as_str())
        .any(|line| line.starts_with("Alice") || line.starts_with("Bob")));
}

#[test]
fn seeded_requests_are_reproducible() {
    let body = r#"{ "trials": 50, "seed": 4 }"#;
    let first = route_request(&state(), "POST", "/api/simulate", body);
    let second = route_request(&state(), "POST", "/api/simulate", body);
    let summary = |raw: &str| {
        let payload: serde_json::Value = serde_json::from_str(raw).expect("json");
        payload["summary"].clone()
    };
    assert_eq!(summary(&first.body), summary(&second.body));
}

#[test]
fn malformed_json_is_a_bad_request() {
    let response = route_request(&state(), "POST", "/api/simulate", "{ not json");
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("Invalid request body"));
}

#[test]
fn out_of_range_fields_fail_validation() {
    let body = r#"{ "trials": 500000, "attacker": { "max_life": 0 } }"#;
    let response = route_request(&state(), "POST", "/api/simulate", body);
    assert_eq!(response.status_code, 400);

    let payload: serde_json::Value = serde_json::from_str(&response.body).expect("json");
    assert_eq!(payload["message"], "Validation failed");
    let fields: Vec<&str> = payload["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|issue| issue["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["trials", "attacker.max_life"]);
}

#[test]
fn unknown_routes_and_wrong_methods_are_rejected() {
    assert_eq!(route_request(&state(), "GET", "/api/nope", "").status_code, 404);
    assert_eq!(route_request(&state(), "GET", "/api/simulate", "").status_code, 405);
    assert_eq!(route_request(&state(), "DELETE", "/api/health", "").status_code, 405);
}

#[tokio::test]
async fn router_serves_requests_over_axum() {
    let app = router(state());
    let request = Request::builder()
        .method("POST")
        .uri("/api/simulate")
        .header("content-type", "application/json")
        .body(Body::from(r#"{ "trials": 20, "seed": 8 }"#))
        .expect("request builds");

    let response = app.oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").map(|v| v.as_bytes()),
        Some(&b"application/json"[..])
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(payload["summary"]["trials"], 20);
}

#[tokio::test]
async fn router_returns_not_found_for_unknown_paths() {
    let request = Request::builder()
        .uri("/missing")
        .body(Body::empty())
        .expect("request builds");
    let response = router(state()).oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
