#![forbid(unsafe_code)]
//! HTTP surface for the praxis process catalog.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;
use rusqlite::Connection;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::Mutex;

mod auth;
mod config;
mod http;

pub use auth::{decode_token, hash_password, issue_pair, verify_password, AuthUser, Claims};
pub use config::ApiConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub cfg: Arc<ApiConfig>,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(conn: Connection, cfg: ApiConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            cfg: Arc::new(cfg),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.cfg.max_body_bytes;
    Router::new()
        .route("/healthz", get(http::meta_handlers::healthz_handler))
        .route("/version", get(http::meta_handlers::version_handler))
        .route("/token/", post(http::auth_handlers::token_obtain_handler))
        .route(
            "/token/refresh/",
            post(http::auth_handlers::token_refresh_handler),
        )
        .route("/register/", post(http::auth_handlers::register_handler))
        .route(
            "/2fa/setup-verify/",
            post(http::auth_handlers::two_fa_setup_handler),
        )
        .route(
            "/2fa/login-verify/",
            post(http::auth_handlers::two_fa_login_handler),
        )
        .route(
            "/pmbok-processes/",
            get(http::process_handlers::pmbok_list_handler)
                .post(http::process_handlers::pmbok_create_handler),
        )
        .route(
            "/pmbok-processes/bulk-update-kanban-status/",
            post(http::process_handlers::pmbok_bulk_kanban_handler),
        )
        .route(
            "/pmbok-processes/:id/",
            get(http::process_handlers::pmbok_detail_handler)
                .put(http::process_handlers::pmbok_put_handler)
                .patch(http::process_handlers::pmbok_patch_handler)
                .delete(http::process_handlers::pmbok_delete_handler),
        )
        .route(
            "/pmbok-processes/:id/update-kanban-status/",
            patch(http::process_handlers::pmbok_update_kanban_handler),
        )
        .route(
            "/scrum-processes/",
            get(http::process_handlers::scrum_list_handler)
                .post(http::process_handlers::scrum_create_handler),
        )
        .route(
            "/scrum-processes/bulk-update-kanban-status/",
            post(http::process_handlers::scrum_bulk_kanban_handler),
        )
        .route(
            "/scrum-processes/:id/",
            get(http::process_handlers::scrum_detail_handler)
                .put(http::process_handlers::scrum_put_handler)
                .patch(http::process_handlers::scrum_patch_handler)
                .delete(http::process_handlers::scrum_delete_handler),
        )
        .route(
            "/scrum-processes/:id/update-kanban-status/",
            patch(http::process_handlers::scrum_update_kanban_handler),
        )
        .route(
            "/customizations/",
            post(http::customization_handlers::upsert_handler),
        )
        .route(
            "/customizations/:id/update-kanban-status/",
            patch(http::customization_handlers::update_kanban_handler),
        )
        .route(
            "/departments/",
            get(http::department_handlers::list_handler)
                .post(http::department_handlers::create_handler),
        )
        .route(
            "/departments/:id/",
            get(http::department_handlers::detail_handler)
                .put(http::department_handlers::update_handler)
                .delete(http::department_handlers::delete_handler),
        )
        .route(
            "/tasks/",
            get(http::task_handlers::list_handler).post(http::task_handlers::create_handler),
        )
        .route(
            "/tasks/:id/",
            get(http::task_handlers::detail_handler)
                .put(http::task_handlers::update_handler)
                .delete(http::task_handlers::delete_handler),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
