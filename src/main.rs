//! Entry point: load config, wire dependencies, and run the server.

use chrono::Duration;
use std::sync::Arc;
use storyfeed::auth::{PasswordHasher, TokenIssuer};
use storyfeed::config::{Config, StorageBackend};
use storyfeed::db::{self, CredentialStore, MemoryStore, PgStore, StoryStore};
use storyfeed::{create_app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (credentials, stories): (Arc<dyn CredentialStore>, Arc<dyn StoryStore>) =
        match config.storage_backend {
            StorageBackend::Postgres => {
                let pool = db::create_pool(&config.database_url).await?;
                db::run_migrations(&pool).await?;
                let store = Arc::new(PgStore::new(pool));
                (
                    store.clone() as Arc<dyn CredentialStore>,
                    store as Arc<dyn StoryStore>,
                )
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on exit");
                let store = Arc::new(MemoryStore::new());
                (
                    store.clone() as Arc<dyn CredentialStore>,
                    store as Arc<dyn StoryStore>,
                )
            }
        };

    let hasher = PasswordHasher::new(config.password_algorithm, config.bcrypt_cost)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let tokens = TokenIssuer::new(
        config.jwt_secret.as_bytes(),
        Duration::hours(config.token_ttl_hours),
    );

    let state = AppState::new(credentials, stories, hasher, tokens);
    let app = create_app(state);

    tracing::info!(
        addr = %config.server_addr,
        backend = ?config.storage_backend,
        algorithm = ?config.password_algorithm,
        "listening"
    );
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
