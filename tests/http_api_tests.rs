#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::Response,
};
use open_hours::{
    HoursService, MemoryQueryCache, MemoryScheduleStore, Schedule, http_api,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;

fn new_router() -> axum::Router {
    let service = HoursService::new(
        Arc::new(MemoryScheduleStore::new()),
        Arc::new(MemoryQueryCache::default()),
    );
    http_api::router(http_api::AppState::new(service))
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn open_names(app: &axum::Router, datetime: &str) -> Vec<String> {
    let response = send(
        app,
        "GET",
        &format!("/api/v1/restaurants/open?datetime={datetime}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_value(json_body(response).await).unwrap()
}

#[tokio::test]
async fn schedule_lifecycle_via_http_api() {
    let app = new_router();

    let response = send(
        &app,
        "POST",
        "/api/v1/restaurants",
        Some(json!({ "name": "Test Restaurant", "hours": "Mon-Sun 11:00 am - 10:00 pm" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Schedule = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(created.name, "Test Restaurant");
    assert_eq!(created.hours.len(), 7);

    let response = send(&app, "GET", "/api/v1/restaurants/Test%20Restaurant", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["hours"][0]["open_time"], json!("11:00"));
    assert_eq!(body["hours"][0]["close_time"], json!("22:00"));
    assert!(body["hours"][0]["day_of_week"].is_u64());

    assert_eq!(
        open_names(&app, "2024-03-15T11:00:00").await,
        vec!["Test Restaurant".to_string()]
    );
    assert!(open_names(&app, "2024-03-15T22:00:00").await.is_empty());

    let response = send(
        &app,
        "PUT",
        "/api/v1/restaurants/Test%20Restaurant",
        Some(json!({ "name": "Test Restaurant", "hours": "Mon-Sun 5:00 pm - 2:00 am" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(open_names(&app, "2024-03-15T11:00:00").await.is_empty());
    assert_eq!(open_names(&app, "2024-03-16T01:30:00").await.len(), 1);

    let response = send(&app, "DELETE", "/api/v1/restaurants/Test%20Restaurant", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/api/v1/restaurants/Test%20Restaurant", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], json!("not_found"));
}

#[tokio::test]
async fn invalid_datetime_returns_bad_request() {
    let app = new_router();
    let response = send(
        &app,
        "GET",
        "/api/v1/restaurants/open?datetime=invalid-format",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], json!("invalid_request"));
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("Invalid datetime format")
    );
}

#[tokio::test]
async fn invalid_hours_and_duplicates_are_rejected() {
    let app = new_router();
    let response = send(
        &app,
        "POST",
        "/api/v1/restaurants",
        Some(json!({ "name": "Broken", "hours": "Mon-Fri 9 am - 5 pm / Funday 9 am - 5 pm" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("Funday 9 am - 5 pm")
    );

    let payload = json!({ "name": "Cafe", "hours": "Mon 9 am - 5 pm" });
    let response = send(&app, "POST", "/api/v1/restaurants", Some(payload.clone())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = send(&app, "POST", "/api/v1/restaurants", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], json!("conflict"));

    let response = send(
        &app,
        "PUT",
        "/api/v1/restaurants/Nowhere",
        Some(json!({ "name": "Nowhere", "hours": "Mon 9 am - 5 pm" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/api/v1/restaurants", None).await;
    let list: Vec<Schedule> = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn cache_debug_endpoints() {
    let app = new_router();
    send(
        &app,
        "POST",
        "/api/v1/restaurants",
        Some(json!({ "name": "Cafe", "hours": "Mon-Sun 9 am - 5 pm" })),
    )
    .await;

    let datetime = "2024-03-15T15:00:00";
    assert_eq!(open_names(&app, datetime).await, vec!["Cafe".to_string()]);

    let body = json_body(send(&app, "GET", &format!("/api/v1/debug/cache/{datetime}"), None).await).await;
    assert_eq!(body["is_cached"], json!(true));
    assert_eq!(body["cached_data"], json!(["Cafe"]));

    let response = send(&app, "POST", "/api/v1/debug/clear-cache", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(send(&app, "GET", &format!("/api/v1/debug/cache/{datetime}"), None).await).await;
    assert_eq!(body["is_cached"], json!(false));
    assert_eq!(body["cached_data"], Value::Null);

    let response = send(
        &app,
        "GET",
        &format!("/api/v1/restaurants/open?datetime={datetime}&use_cache=false"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(send(&app, "GET", &format!("/api/v1/debug/cache/{datetime}"), None).await).await;
    assert_eq!(body["is_cached"], json!(false));
}

#[tokio::test]
async fn data_loading_summary_and_health() {
    let app = new_router();
    for (name, hours) in [
        ("Cafe", "Mon-Fri 9 am - 5 pm"),
        ("Night Owl", "Mon-Sun 5 pm - 2 am"),
    ] {
        send(
            &app,
            "POST",
            "/api/v1/restaurants",
            Some(json!({ "name": name, "hours": hours })),
        )
        .await;
    }

    let body = json_body(send(&app, "GET", "/api/v1/debug/data-loading", None).await).await;
    assert_eq!(body["total_schedules"], json!(2));
    assert_eq!(body["total_hours_entries"], json!(12));
    assert_eq!(body["schedules"][0]["name"], json!("Cafe"));

    let body = json_body(send(&app, "GET", "/health", None).await).await;
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn reserved_open_name_is_rejected() {
    let app = new_router();
    let response = send(
        &app,
        "POST",
        "/api/v1/restaurants",
        Some(json!({ "name": "open", "hours": "Mon 9 am - 5 pm" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], json!("invalid_request"));

    send(
        &app,
        "POST",
        "/api/v1/restaurants",
        Some(json!({ "name": "Cafe", "hours": "Mon 9 am - 5 pm" })),
    )
    .await;
    let response = send(
        &app,
        "PUT",
        "/api/v1/restaurants/Cafe",
        Some(json!({ "name": "open", "hours": "Mon 9 am - 5 pm" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/v1/restaurants", None).await;
    let list: Vec<Schedule> = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Cafe");
}

#[tokio::test]
async fn collection_accepts_trailing_slash() {
    let app = new_router();
    let response = send(
        &app,
        "POST",
        "/api/v1/restaurants/",
        Some(json!({ "name": "Cafe", "hours": "Mon 9 am - 5 pm" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, "GET", "/api/v1/restaurants/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list: Vec<Schedule> = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(list.len(), 1);
}
