use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use banter_api::{AppStateInner, routes};
use banter_auth::gate::SessionGate;
use banter_auth::token::TokenCodec;
use banter_gateway::hub::NotificationHub;
use banter_store::Database;
use banter_store::blob::FsBlobStore;
use banter_store::log::MessageLog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banter=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("BANTER_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let token_ttl_secs: i64 = std::env::var("BANTER_TOKEN_TTL_SECS")
        .unwrap_or_else(|_| "7200".into())
        .parse()?;
    let db_path = std::env::var("BANTER_DB_PATH").unwrap_or_else(|_| "banter.db".into());
    let blob_dir = std::env::var("BANTER_BLOB_DIR").unwrap_or_else(|_| "blobs".into());
    let host = std::env::var("BANTER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("BANTER_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let blob_base_url = std::env::var("BANTER_BLOB_BASE_URL")
        .unwrap_or_else(|_| format!("http://127.0.0.1:{}/blobs", port));

    // Init stores
    let store = Arc::new(Database::open(&PathBuf::from(&db_path))?);
    let blobs = Arc::new(FsBlobStore::new(PathBuf::from(&blob_dir), blob_base_url)?);

    // Shared state
    let codec = TokenCodec::new(&jwt_secret, chrono::Duration::seconds(token_ttl_secs));
    let state = Arc::new(AppStateInner {
        gate: SessionGate::new(codec),
        store: store.clone(),
        log: MessageLog::new(store, blobs),
        hub: NotificationHub::new(),
    });

    let app = routes::router(state)
        .nest_service("/blobs", ServeDir::new(&blob_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Banter server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
