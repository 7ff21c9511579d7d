#![forbid(unsafe_code)]

use praxis_server::{build_router, ApiConfig, AppState};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("PRAXIS_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env_string("PRAXIS_BIND", "0.0.0.0:8080");
    let db_path = PathBuf::from(env_string("PRAXIS_DB_PATH", "praxis.sqlite3"));

    let defaults = ApiConfig::default();
    let cfg = ApiConfig {
        jwt_secret: env_string("PRAXIS_JWT_SECRET", &defaults.jwt_secret),
        access_ttl: Duration::from_secs(env_u64(
            "PRAXIS_ACCESS_TTL_SECS",
            defaults.access_ttl.as_secs(),
        )),
        refresh_ttl: Duration::from_secs(env_u64(
            "PRAXIS_REFRESH_TTL_SECS",
            defaults.refresh_ttl.as_secs(),
        )),
        two_fa_setup_code1: env_string("PRAXIS_2FA_SETUP_CODE1", &defaults.two_fa_setup_code1),
        two_fa_setup_code2: env_string("PRAXIS_2FA_SETUP_CODE2", &defaults.two_fa_setup_code2),
        two_fa_login_code: env_string("PRAXIS_2FA_LOGIN_CODE", &defaults.two_fa_login_code),
        max_body_bytes: env_usize("PRAXIS_MAX_BODY_BYTES", defaults.max_body_bytes),
    };

    let conn = praxis_store::open(&db_path)
        .map_err(|e| format!("open database {}: {e}", db_path.display()))?;
    let state = AppState::new(conn, cfg);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr}: {e}"))?;
    info!("praxis-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
