use super::{finish, make_request_id};
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    finish(
        "/healthz",
        &request_id,
        Json(json!({"status": "ok"})).into_response(),
    )
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let payload = json!({
        "name": "praxis",
        "version": env!("CARGO_PKG_VERSION"),
        "build_hash": option_env!("PRAXIS_BUILD_HASH").unwrap_or("dev"),
        "config_schema_version": crate::config::CONFIG_SCHEMA_VERSION,
    });
    finish("/version", &request_id, Json(payload).into_response())
}
