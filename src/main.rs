use std::sync::Arc;

use attend_api::auth::JwtVerifier;
use attend_api::config;
use attend_api::state::AppState;
use attend_api::store::{PgAttendanceStore, PgEventStore, PgUserStore};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attend_api=info,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Attend API in {:?} mode", config.environment);

    let state = Arc::new(build_state(config).await);
    let app = attend_api::http::router(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Attend API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

async fn build_state(config: &config::AppConfig) -> AppState {
    let verifier = Arc::new(JwtVerifier::from_config());

    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(
                    config.database.connection_timeout_secs,
                ))
                .connect(&url)
                .await
                .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

            AppState::new(
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgEventStore::new(pool.clone())),
                Arc::new(PgAttendanceStore::new(pool)),
                verifier,
                config.verify_timeout(),
            )
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, falling back to in-memory stores");
            let (state, _, _, _) =
                AppState::in_memory(&config.security.jwt_secret, config.verify_timeout());
            state
        }
    }
}
