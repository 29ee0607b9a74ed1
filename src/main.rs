mod gate;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let identity = services::session::IdentityConfig::from_env().expect("IDENTITY_URL required");
    let store = Arc::new(services::session::HttpSessionStore::new(identity));

    // Route classification is fixed configuration; overlap is a startup error.
    let table = gate::RouteTable::standard().expect("route table misconfigured");
    let targets = gate::RedirectTargets::from_env();
    let cookie_secure = routes::auth::cookie_secure();

    let state = state::AppState::new(store, table, targets, cookie_secure);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "vestboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
