use super::{api_error_response, decode_body, finish, make_request_id, store_error};
use crate::auth::AuthUser;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use praxis_api::{
    parse_bulk_request, parse_kanban_update, parse_process_create, parse_process_patch,
    parse_scope_query, process_to_dto, BulkKanbanRequest, BulkKanbanResponse, KanbanUpdateRequest,
    ProcessDto, ProcessWriteRequest,
};
use praxis_model::{Scope, Variant};
use praxis_store::{
    bulk_update_kanban, create_process, delete_process, get_process, list_processes,
    update_process, ProcessPatch,
};
use std::collections::HashMap;

const fn collection_route(variant: Variant) -> &'static str {
    match variant {
        Variant::Pmbok => "/pmbok-processes/",
        Variant::Scrum => "/scrum-processes/",
    }
}

const fn detail_route(variant: Variant) -> &'static str {
    match variant {
        Variant::Pmbok => "/pmbok-processes/:id/",
        Variant::Scrum => "/scrum-processes/:id/",
    }
}

async fn list(state: AppState, variant: Variant, params: HashMap<String, String>) -> Response {
    let request_id = make_request_id(&state);
    let route = collection_route(variant);
    let scope: Option<Scope> = match parse_scope_query(&params) {
        Ok(scope) => scope,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let conn = state.db.lock().await;
    match list_processes(&conn, variant) {
        Ok(processes) => {
            let dtos: Vec<ProcessDto> = processes
                .iter()
                .map(|p| process_to_dto(p, scope.as_ref()))
                .collect();
            finish(route, &request_id, Json(dtos).into_response())
        }
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

async fn create(state: AppState, variant: Variant, body: Bytes) -> Response {
    let request_id = make_request_id(&state);
    let route = collection_route(variant);
    let req: ProcessWriteRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let new = match parse_process_create(&req) {
        Ok(new) => new,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let conn = state.db.lock().await;
    match create_process(&conn, variant, &new) {
        Ok(process) => finish(
            route,
            &request_id,
            (StatusCode::CREATED, Json(process_to_dto(&process, None))).into_response(),
        ),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

async fn detail(
    state: AppState,
    variant: Variant,
    id: i64,
    params: HashMap<String, String>,
) -> Response {
    let request_id = make_request_id(&state);
    let route = detail_route(variant);
    let scope = match parse_scope_query(&params) {
        Ok(scope) => scope,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let conn = state.db.lock().await;
    match get_process(&conn, variant, id) {
        Ok(process) => finish(
            route,
            &request_id,
            Json(process_to_dto(&process, scope.as_ref())).into_response(),
        ),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

async fn update(state: AppState, variant: Variant, id: i64, body: Bytes, full: bool) -> Response {
    let request_id = make_request_id(&state);
    let route = detail_route(variant);
    let req: ProcessWriteRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let patch = match parse_process_patch(&req, full) {
        Ok(patch) => patch,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let conn = state.db.lock().await;
    match update_process(&conn, variant, id, &patch) {
        Ok(process) => finish(
            route,
            &request_id,
            Json(process_to_dto(&process, None)).into_response(),
        ),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

async fn delete(state: AppState, variant: Variant, id: i64) -> Response {
    let request_id = make_request_id(&state);
    let route = detail_route(variant);
    let conn = state.db.lock().await;
    match delete_process(&conn, variant, id) {
        Ok(()) => finish(route, &request_id, StatusCode::NO_CONTENT.into_response()),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

async fn update_kanban(state: AppState, variant: Variant, id: i64, body: Bytes) -> Response {
    let request_id = make_request_id(&state);
    let route = match variant {
        Variant::Pmbok => "/pmbok-processes/:id/update-kanban-status/",
        Variant::Scrum => "/scrum-processes/:id/update-kanban-status/",
    };
    let req: KanbanUpdateRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let target = match parse_kanban_update(&req) {
        Ok(target) => target,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let patch = ProcessPatch {
        kanban_state: Some(target),
        ..ProcessPatch::default()
    };
    let conn = state.db.lock().await;
    match update_process(&conn, variant, id, &patch) {
        Ok(process) => finish(
            route,
            &request_id,
            Json(process_to_dto(&process, None)).into_response(),
        ),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

async fn bulk_kanban(state: AppState, variant: Variant, body: Bytes) -> Response {
    let request_id = make_request_id(&state);
    let route = match variant {
        Variant::Pmbok => "/pmbok-processes/bulk-update-kanban-status/",
        Variant::Scrum => "/scrum-processes/bulk-update-kanban-status/",
    };
    let req: BulkKanbanRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let (ids, target) = match parse_bulk_request(&req) {
        Ok(parsed) => parsed,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let mut conn = state.db.lock().await;
    match bulk_update_kanban(&mut conn, variant, &ids, target) {
        Ok(updated) => finish(
            route,
            &request_id,
            Json(BulkKanbanResponse { updated }).into_response(),
        ),
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

// Per-variant wrappers: the route table stays readable and the shared
// handlers stay parameterized by `Variant`.

pub(crate) async fn pmbok_list_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    list(state, Variant::Pmbok, params).await
}

pub(crate) async fn scrum_list_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    list(state, Variant::Scrum, params).await
}

pub(crate) async fn pmbok_create_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    body: Bytes,
) -> Response {
    create(state, Variant::Pmbok, body).await
}

pub(crate) async fn scrum_create_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    body: Bytes,
) -> Response {
    create(state, Variant::Scrum, body).await
}

pub(crate) async fn pmbok_detail_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    detail(state, Variant::Pmbok, id, params).await
}

pub(crate) async fn scrum_detail_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    detail(state, Variant::Scrum, id, params).await
}

pub(crate) async fn pmbok_put_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> Response {
    update(state, Variant::Pmbok, id, body, true).await
}

pub(crate) async fn scrum_put_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> Response {
    update(state, Variant::Scrum, id, body, true).await
}

pub(crate) async fn pmbok_patch_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> Response {
    update(state, Variant::Pmbok, id, body, false).await
}

pub(crate) async fn scrum_patch_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> Response {
    update(state, Variant::Scrum, id, body, false).await
}

pub(crate) async fn pmbok_delete_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Response {
    delete(state, Variant::Pmbok, id).await
}

pub(crate) async fn scrum_delete_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Response {
    delete(state, Variant::Scrum, id).await
}

pub(crate) async fn pmbok_update_kanban_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> Response {
    update_kanban(state, Variant::Pmbok, id, body).await
}

pub(crate) async fn scrum_update_kanban_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> Response {
    update_kanban(state, Variant::Scrum, id, body).await
}

pub(crate) async fn pmbok_bulk_kanban_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    body: Bytes,
) -> Response {
    bulk_kanban(state, Variant::Pmbok, body).await
}

pub(crate) async fn scrum_bulk_kanban_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    body: Bytes,
) -> Response {
    bulk_kanban(state, Variant::Scrum, body).await
}
