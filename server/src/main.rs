use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use evently_server::config::Config;
use evently_server::routes::create_routes;
use evently_server::state::AppState;
use evently_server::store::{seed::seed_demo, EventStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let config = Config::from_env().expect("Invalid configuration");

    let store: Arc<dyn EventStore> = match &config.database_url {
        Some(database_url) => {
            let store = PgStore::connect(database_url)
                .await
                .expect("Failed to connect to database");
            store.migrate().await.expect("Failed to run migrations");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store with demo data");
            let store = MemoryStore::new();
            seed_demo(&store).await.expect("Failed to seed demo data");
            Arc::new(store)
        }
    };

    let app = create_routes(AppState::new(store, &config));

    tracing::info!("🚀 Server running at http://{}", config.listen_addr);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
