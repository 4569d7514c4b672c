use anyhow::{anyhow, Context};
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use admin_cell::services::PasswordService;
use shared_config::AppConfig;
use shared_utils::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hospital records server");

    let mut config = AppConfig::from_env();

    if config.admin_password_hash.is_empty() {
        if let Some(password) = config.admin_password.take() {
            warn!("ADMIN_PASSWORD is set in plain text; prefer ADMIN_PASSWORD_HASH");
            config.admin_password_hash = PasswordService::hash_password(&password)
                .map_err(|e| anyhow!("failed to hash ADMIN_PASSWORD: {e}"))?;
        }
    }

    let addr = config.bind_addr();
    let state = AppState::new(config);

    state
        .database
        .initialize()
        .with_context(|| format!("opening record store at {}", state.database.path().display()))?;

    let app = router::create_router(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
            .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
    );

    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
