use super::{api_error_response, decode_body, finish, make_request_id, store_error};
use crate::auth::AuthUser;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use praxis_api::{parse_department_write, DepartmentWriteRequest};
use praxis_store::{
    create_department, delete_department, get_department, list_departments, update_department,
};

pub(crate) async fn list_handler(State(state): State<AppState>, _user: AuthUser) -> Response {
    let request_id = make_request_id(&state);
    let route = "/departments/";
    let conn = state.db.lock().await;
    match list_departments(&conn) {
        Ok(departments) => finish(route, &request_id, Json(departments).into_response()),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

pub(crate) async fn create_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    body: Bytes,
) -> Response {
    let request_id = make_request_id(&state);
    let route = "/departments/";
    let req: DepartmentWriteRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let new = match parse_department_write(&req) {
        Ok(new) => new,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let conn = state.db.lock().await;
    match create_department(&conn, &new) {
        Ok(department) => finish(
            route,
            &request_id,
            (StatusCode::CREATED, Json(department)).into_response(),
        ),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

pub(crate) async fn detail_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Response {
    let request_id = make_request_id(&state);
    let route = "/departments/:id/";
    let conn = state.db.lock().await;
    match get_department(&conn, id) {
        Ok(department) => finish(route, &request_id, Json(department).into_response()),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

pub(crate) async fn update_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> Response {
    let request_id = make_request_id(&state);
    let route = "/departments/:id/";
    let req: DepartmentWriteRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let new = match parse_department_write(&req) {
        Ok(new) => new,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let conn = state.db.lock().await;
    match update_department(&conn, id, &new) {
        Ok(department) => finish(route, &request_id, Json(department).into_response()),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

/// Tree-delete: removing a department removes its whole subtree.
pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Response {
    let request_id = make_request_id(&state);
    let route = "/departments/:id/";
    let mut conn = state.db.lock().await;
    match delete_department(&mut conn, id) {
        Ok(()) => finish(route, &request_id, StatusCode::NO_CONTENT.into_response()),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}
