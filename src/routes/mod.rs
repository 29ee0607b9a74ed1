//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the page and auth routes under a single Axum router and applies
//! the session gate to every navigation, so no handler renders before a
//! routing decision is made. Static assets are served outside the gate —
//! they carry no session-sensitive content.

pub mod auth;
pub mod pages;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::gate;
use crate::state::AppState;

/// Full application router: pages + auth + health, gated per navigation.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/dashboard", get(pages::dashboard))
        .route("/dashboard/reports", get(pages::reports))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        .route("/register", get(pages::register))
        .route("/terms", get(pages::terms))
        .route("/privacy", get(pages::privacy))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(state.clone(), gate::session_gate))
        .nest_service("/assets", ServeDir::new(assets_dir()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolve the static assets directory.
fn assets_dir() -> PathBuf {
    std::env::var("ASSETS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
