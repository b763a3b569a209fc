use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use ripple_api::{AppState, AppStateInner};
use ripple_core::engagement::EngagementService;
use ripple_core::posts::PostService;
use ripple_core::token::TokenConfig;
use ripple_core::users::UserService;
use ripple_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ripple=debug,tower_http=debug".into()),
        )
        .init();

    // Config — read once, immutable afterwards
    let jwt_secret =
        std::env::var("RIPPLE_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let ttl_secs: u64 = std::env::var("RIPPLE_TOKEN_TTL_SECS")
        .unwrap_or_else(|_| "2592000".into())
        .parse()?;
    let db_path = std::env::var("RIPPLE_DB_PATH").unwrap_or_else(|_| "ripple.db".into());
    let host = std::env::var("RIPPLE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("RIPPLE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    let tokens = TokenConfig::new(jwt_secret, Duration::from_secs(ttl_secs))?;
    let db = Arc::new(Database::open(&PathBuf::from(&db_path))?);

    let state: AppState = Arc::new(AppStateInner {
        users: UserService::new(db.clone(), tokens.clone()),
        posts: PostService::new(db.clone()),
        engagement: EngagementService::new(db),
        tokens,
    });

    let app = ripple_api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("Ripple listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
