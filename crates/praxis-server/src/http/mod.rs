use crate::AppState;
use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use praxis_api::{map_error, ApiError};
use praxis_store::StoreError;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::atomic::Ordering;
use tracing::{error, info};

pub(crate) mod auth_handlers;
pub(crate) mod customization_handlers;
pub(crate) mod department_handlers;
pub(crate) mod meta_handlers;
pub(crate) mod process_handlers;
pub(crate) mod task_handlers;

pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = StatusCode::from_u16(map_error(&err).status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err }))).into_response()
}

/// Auth-extractor rejection path; same envelope and request-id stamp as
/// every other error.
pub(crate) fn unauthenticated_response(state: &AppState, err: ApiError) -> Response {
    let request_id = make_request_id(state);
    finish("auth", &request_id, api_error_response(err))
}

pub(crate) fn store_error(err: &StoreError) -> ApiError {
    match err {
        StoreError::NotFound(what) => ApiError::not_found(what.clone()),
        StoreError::Conflict(reason) => ApiError::conflict(reason.clone()),
        StoreError::Invalid(validation) => {
            ApiError::new(
                praxis_api::ApiErrorCode::ValidationFailed,
                "validation failed",
                json!({"field_errors": [{"reason": validation.to_string()}]}),
            )
        }
        StoreError::Data(msg) => {
            error!("stored data failed to decode: {msg}");
            ApiError::internal()
        }
        StoreError::Sqlite(e) => {
            error!("sqlite failure: {e}");
            ApiError::internal()
        }
    }
}

pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::invalid_body(e.to_string()))
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

/// Stamps the request id onto the response and emits the access log line.
pub(crate) fn finish(route: &str, request_id: &str, mut response: Response) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    info!(
        route,
        status = response.status().as_u16(),
        request_id,
        "request"
    );
    response
}
