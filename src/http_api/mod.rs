use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{HoursService, LoadingSummary, PersistenceError, Schedule, ServiceError};

#[derive(Clone)]
pub struct AppState {
    service: Arc<HoursService>,
}

impl AppState {
    pub fn new(service: HoursService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    fn service(&self) -> &HoursService {
        &self.service
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Parse(err) => ApiError::Invalid(err.to_string()),
            ServiceError::NotFound(_) => ApiError::NotFound(value.to_string()),
            ServiceError::AlreadyExists(_) => ApiError::Conflict(value.to_string()),
            ServiceError::Persistence(PersistenceError::InvalidData(message)) => {
                ApiError::Invalid(message)
            }
            ServiceError::Persistence(PersistenceError::Conflict(name)) => {
                ApiError::Conflict(format!("schedule '{name}' already exists"))
            }
            ServiceError::Persistence(err) => {
                error!("storage failure: {err}");
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct OpenQuery {
    datetime: String,
    #[serde(default = "default_use_cache")]
    use_cache: bool,
}

fn default_use_cache() -> bool {
    true
}

/// Body for create and update: the entity name and its hours notation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePayload {
    pub name: String,
    pub hours: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheProbe {
    pub datetime: String,
    pub cached_data: Option<Vec<String>>,
    pub is_cached: bool,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/restaurants/open", get(open_restaurants))
        .route("/restaurants", get(list_restaurants).post(create_restaurant))
        .route("/restaurants/", get(list_restaurants).post(create_restaurant))
        .route(
            "/restaurants/:name",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
        .route("/debug/data-loading", get(data_loading))
        .route("/debug/cache/:datetime", get(probe_cache))
        .route("/debug/clear-cache", post(clear_cache));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, service: HoursService) -> std::io::Result<()> {
    let app = router(AppState::new(service));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn open_restaurants(
    State(state): State<AppState>,
    Query(query): Query<OpenQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = state.service().open_at(&query.datetime, query.use_cache)?;
    Ok(Json(names))
}

async fn list_restaurants(State(state): State<AppState>) -> Result<Json<Vec<Schedule>>, ApiError> {
    Ok(Json(state.service().list()?))
}

async fn get_restaurant(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Schedule>, ApiError> {
    Ok(Json(state.service().get(&name)?))
}

async fn create_restaurant(
    State(state): State<AppState>,
    Json(payload): Json<SchedulePayload>,
) -> Result<(StatusCode, Json<Schedule>), ApiError> {
    let created = state.service().create(&payload.name, &payload.hours)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_restaurant(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<SchedulePayload>,
) -> Result<Json<Schedule>, ApiError> {
    let updated = state
        .service()
        .update(&name, &payload.name, &payload.hours)?;
    Ok(Json(updated))
}

async fn delete_restaurant(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service().delete(&name)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn data_loading(State(state): State<AppState>) -> Result<Json<LoadingSummary>, ApiError> {
    Ok(Json(state.service().loading_summary()?))
}

async fn probe_cache(
    State(state): State<AppState>,
    Path(datetime): Path<String>,
) -> Json<CacheProbe> {
    let cached_data = state.service().cached(&datetime);
    Json(CacheProbe {
        is_cached: cached_data.is_some(),
        cached_data,
        datetime,
    })
}

async fn clear_cache(State(state): State<AppState>) -> impl IntoResponse {
    state.service().clear_cache();
    Json(json!({ "message": "Cache cleared" }))
}
