use super::{api_error_response, decode_body, finish, make_request_id, store_error};
use crate::auth::AuthUser;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use praxis_api::{
    customization_to_dto, parse_kanban_update, parse_upsert_request, CustomizationUpsertRequest,
    KanbanUpdateRequest,
};
use praxis_store::{update_customization_kanban, upsert_customization};

/// Create-or-replace keyed by the (process, country, department)
/// triple. Always answers 201 with the stored row, whether it was inserted
/// or replaced.
pub(crate) async fn upsert_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    body: Bytes,
) -> Response {
    let request_id = make_request_id(&state);
    let route = "/customizations/";
    let req: CustomizationUpsertRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let payload = match parse_upsert_request(&req) {
        Ok(payload) => payload,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let conn = state.db.lock().await;
    match upsert_customization(&conn, &payload) {
        Ok(customization) => finish(
            route,
            &request_id,
            (StatusCode::CREATED, Json(customization_to_dto(&customization))).into_response(),
        ),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

pub(crate) async fn update_kanban_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> Response {
    let request_id = make_request_id(&state);
    let route = "/customizations/:id/update-kanban-status/";
    let req: KanbanUpdateRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let target = match parse_kanban_update(&req) {
        Ok(target) => target,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let conn = state.db.lock().await;
    match update_customization_kanban(&conn, id, target) {
        Ok(customization) => finish(
            route,
            &request_id,
            Json(customization_to_dto(&customization)).into_response(),
        ),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}
