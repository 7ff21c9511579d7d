use super::{api_error_response, decode_body, finish, make_request_id, store_error};
use crate::auth::AuthUser;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use praxis_api::{ApiError, TaskCreateRequest, TaskPatchRequest};
use praxis_store::{create_task, delete_task, get_task, list_tasks, update_task, NewTask, TaskPatch};

pub(crate) async fn list_handler(State(state): State<AppState>, _user: AuthUser) -> Response {
    let request_id = make_request_id(&state);
    let route = "/tasks/";
    let conn = state.db.lock().await;
    match list_tasks(&conn) {
        Ok(tasks) => finish(route, &request_id, Json(tasks).into_response()),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

pub(crate) async fn create_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    body: Bytes,
) -> Response {
    let request_id = make_request_id(&state);
    let route = "/tasks/";
    let req: TaskCreateRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    if req.title.trim().is_empty() {
        return finish(
            route,
            &request_id,
            api_error_response(ApiError::validation_failed("title", "must not be empty")),
        );
    }
    let conn = state.db.lock().await;
    match create_task(
        &conn,
        &NewTask {
            title: req.title,
            completed: req.completed,
        },
    ) {
        Ok(task) => finish(
            route,
            &request_id,
            (StatusCode::CREATED, Json(task)).into_response(),
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
    let route = "/tasks/:id/";
    let conn = state.db.lock().await;
    match get_task(&conn, id) {
        Ok(task) => finish(route, &request_id, Json(task).into_response()),
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
    let route = "/tasks/:id/";
    let req: TaskPatchRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return finish(
                route,
                &request_id,
                api_error_response(ApiError::validation_failed("title", "must not be empty")),
            );
        }
    }
    let conn = state.db.lock().await;
    match update_task(
        &conn,
        id,
        &TaskPatch {
            title: req.title,
            completed: req.completed,
        },
    ) {
        Ok(task) => finish(route, &request_id, Json(task).into_response()),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Response {
    let request_id = make_request_id(&state);
    let route = "/tasks/:id/";
    let conn = state.db.lock().await;
    match delete_task(&conn, id) {
        Ok(()) => finish(route, &request_id, StatusCode::NO_CONTENT.into_response()),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}
