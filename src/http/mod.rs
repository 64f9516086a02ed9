// HTTP transport glue: snapshots the axum request into HttpParts, then
// hands it to the per-route pipeline. All business behavior lives behind
// the dispatch layer; this module only wires and formats.
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post},
    Router,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::dispatch::Pipeline;
use crate::error::ApiError;
use crate::handlers::{DeleteUsers, GetUsers, SubmitAttendance, UpdateAttendance, UpdateUser};
use crate::state::AppState;

pub mod adapters;

/// Transport snapshot an adapter reshapes into an envelope.
#[derive(Debug, Clone)]
pub struct HttpParts {
    pub headers: HeaderMap,
    pub path_id: Option<String>,
    pub body: Value,
}

impl HttpParts {
    pub fn new(headers: HeaderMap, path_id: Option<String>, body: Value) -> Self {
        Self {
            headers,
            path_id,
            body,
        }
    }
}

// One pipeline per route, composed once. The auth stage is part of the
// composition itself, so no route can reach a handler around the gate.
static LIST_USERS: Lazy<Pipeline<HttpParts>> = Lazy::new(|| {
    Pipeline::new(
        adapters::authenticate_request,
        adapters::list_users_request,
        Box::new(GetUsers),
    )
});

static GET_USER: Lazy<Pipeline<HttpParts>> = Lazy::new(|| {
    Pipeline::new(
        adapters::authenticate_request,
        adapters::get_user_by_id_request,
        Box::new(GetUsers),
    )
});

static UPDATE_USER: Lazy<Pipeline<HttpParts>> = Lazy::new(|| {
    Pipeline::new(
        adapters::authenticate_request,
        adapters::update_user_request,
        Box::new(UpdateUser),
    )
});

static DELETE_ALL_USERS: Lazy<Pipeline<HttpParts>> = Lazy::new(|| {
    Pipeline::new(
        adapters::authenticate_request,
        adapters::delete_all_users_request,
        Box::new(DeleteUsers),
    )
});

static DELETE_USER: Lazy<Pipeline<HttpParts>> = Lazy::new(|| {
    Pipeline::new(
        adapters::authenticate_request,
        adapters::delete_user_by_id_request,
        Box::new(DeleteUsers),
    )
});

static SUBMIT_ATTENDANCE: Lazy<Pipeline<HttpParts>> = Lazy::new(|| {
    Pipeline::new(
        adapters::authenticate_request,
        adapters::submit_attendance_request,
        Box::new(SubmitAttendance),
    )
});

static UPDATE_ATTENDANCE: Lazy<Pipeline<HttpParts>> = Lazy::new(|| {
    Pipeline::new(
        adapters::authenticate_request,
        adapters::update_attendance_request,
        Box::new(UpdateAttendance),
    )
});

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/api/users", user_routes())
        .nest("/api/attendance", attendance_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(users_list).delete(users_delete_all))
        .route(
            "/:id",
            get(users_get).patch(users_update).delete(users_delete),
        )
}

fn attendance_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(attendance_submit))
        .route("/:id", patch(attendance_update))
}

fn respond(result: Result<Value, ApiError>) -> Response {
    match result {
        Ok(data) => Json(json!({ "success": true, "data": data })).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn users_list(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let raw = HttpParts::new(headers, None, Value::Null);
    respond(LIST_USERS.dispatch(&state, &raw).await)
}

async fn users_get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let raw = HttpParts::new(headers, Some(id), Value::Null);
    respond(GET_USER.dispatch(&state, &raw).await)
}

async fn users_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let raw = HttpParts::new(headers, Some(id), body.map(|Json(v)| v).unwrap_or(Value::Null));
    respond(UPDATE_USER.dispatch(&state, &raw).await)
}

async fn users_delete_all(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let raw = HttpParts::new(headers, None, Value::Null);
    respond(DELETE_ALL_USERS.dispatch(&state, &raw).await)
}

async fn users_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let raw = HttpParts::new(headers, Some(id), Value::Null);
    respond(DELETE_USER.dispatch(&state, &raw).await)
}

async fn attendance_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let raw = HttpParts::new(headers, None, body.map(|Json(v)| v).unwrap_or(Value::Null));
    respond(SUBMIT_ATTENDANCE.dispatch(&state, &raw).await)
}

async fn attendance_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let raw = HttpParts::new(headers, Some(id), body.map(|Json(v)| v).unwrap_or(Value::Null));
    respond(UPDATE_ATTENDANCE.dispatch(&state, &raw).await)
}

async fn index() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Attend API",
            "version": version,
            "description": "Organizational attendance backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "users": "/api/users[/:id] (protected)",
                "attendance": "/api/attendance[/:id] (protected)",
            }
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
