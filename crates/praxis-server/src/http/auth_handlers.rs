use super::{api_error_response, decode_body, finish, make_request_id, store_error};
use crate::auth::{
    decode_token, hash_password, issue_access, issue_pair, verify_password, AuthUser,
    TOKEN_KIND_REFRESH,
};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use praxis_api::{
    parse_register, AccessTokenResponse, ApiError, RegisterRequest, TokenRefreshRequest,
    TokenRequest, TwoFaLoginRequest, TwoFaSetupRequest,
};
use praxis_store::{create_account, find_account_by_email, set_two_fa_enabled, NewAccount};
use serde_json::json;
use tracing::info;

pub(crate) async fn register_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = make_request_id(&state);
    let route = "/register/";
    let req: RegisterRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    if let Err(e) = parse_register(&req) {
        return finish(route, &request_id, api_error_response(e));
    }
    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let conn = state.db.lock().await;
    match create_account(
        &conn,
        &NewAccount {
            email: req.email.trim().to_string(),
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
        },
    ) {
        Ok(account) => {
            info!(email = %account.email, "account registered");
            finish(
                route,
                &request_id,
                (StatusCode::CREATED, Json(account)).into_response(),
            )
        }
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

pub(crate) async fn token_obtain_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = make_request_id(&state);
    let route = "/token/";
    let req: TokenRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let found = {
        let conn = state.db.lock().await;
        match find_account_by_email(&conn, req.email.trim()) {
            Ok(found) => found,
            Err(e) => return finish(route, &request_id, api_error_response(store_error(&e))),
        }
    };
    let Some((account, stored_hash)) = found else {
        return finish(
            route,
            &request_id,
            api_error_response(ApiError::unauthenticated("invalid credentials")),
        );
    };
    if !account.is_active || !verify_password(&stored_hash, &req.password) {
        return finish(
            route,
            &request_id,
            api_error_response(ApiError::unauthenticated("invalid credentials")),
        );
    }
    match issue_pair(&state.cfg, account.id, &account.email) {
        Ok(pair) => finish(route, &request_id, Json(pair).into_response()),
        Err(e) => finish(route, &request_id, api_error_response(e)),
    }
}

pub(crate) async fn token_refresh_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = make_request_id(&state);
    let route = "/token/refresh/";
    let req: TokenRefreshRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    let claims = match decode_token(&state.cfg, &req.refresh) {
        Ok(claims) => claims,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    if claims.kind != TOKEN_KIND_REFRESH {
        return finish(
            route,
            &request_id,
            api_error_response(ApiError::unauthenticated("token is not a refresh token")),
        );
    }
    match issue_access(&state.cfg, claims.sub, &claims.email) {
        Ok(access) => finish(
            route,
            &request_id,
            Json(AccessTokenResponse { access }).into_response(),
        ),
        Err(e) => finish(route, &request_id, api_error_response(e)),
    }
}

// The 2FA flow is a stub: fixed codes from configuration, no TOTP. It
// exists so the login UI contract round-trips.
pub(crate) async fn two_fa_setup_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = make_request_id(&state);
    let route = "/2fa/setup-verify/";
    let req: TwoFaSetupRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    if req.code1 != state.cfg.two_fa_setup_code1 || req.code2 != state.cfg.two_fa_setup_code2 {
        return finish(
            route,
            &request_id,
            api_error_response(ApiError::validation_failed("code", "codes do not match")),
        );
    }
    let conn = state.db.lock().await;
    match set_two_fa_enabled(&conn, req.email.trim()) {
        Ok(account) => {
            info!(email = %account.email, "two-factor enabled");
            finish(
                route,
                &request_id,
                Json(json!({"success": true})).into_response(),
            )
        }
        Err(e) => finish(route, &request_id, api_error_response(store_error(&e))),
    }
}

pub(crate) async fn two_fa_login_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    body: Bytes,
) -> Response {
    let request_id = make_request_id(&state);
    let route = "/2fa/login-verify/";
    let req: TwoFaLoginRequest = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return finish(route, &request_id, api_error_response(e)),
    };
    if req.code != state.cfg.two_fa_login_code {
        return finish(
            route,
            &request_id,
            api_error_response(ApiError::validation_failed("code", "code is incorrect")),
        );
    }
    finish(
        route,
        &request_id,
        Json(json!({"success": true})).into_response(),
    )
}
