//! Laundry Loop - pickup booking service
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────┐    ┌──────────┐
//! │ Booking  │───▶│ Gateway  │───▶│   Services   │───▶│  Store   │
//! │  pages   │    │  (axum)  │    │ avail/orders │    │ Postgres │
//! └──────────┘    └──────────┘    │ ledger/pay   │    │ / memory │
//!                      ▲          └──────────────┘    └──────────┘
//!       payment provider webhook
//! ```
//!
//! Flags: `--env/-e <name>` (config/<name>.yaml), `--port <n>`,
//! `--memory` (in-memory store with seed zones, no PostgreSQL).

use std::sync::Arc;

use anyhow::Context;

use laundry_loop::config::AppConfig;
use laundry_loop::db::Database;
use laundry_loop::gateway::{self, state::AppState};
use laundry_loop::store::{BookingStore, MemoryStore, PgStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn use_memory_store() -> bool {
    std::env::args().any(|a| a == "--memory")
}

async fn open_store(config: &AppConfig, memory: bool) -> anyhow::Result<Arc<dyn BookingStore>> {
    if memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        return Ok(Arc::new(MemoryStore::seeded()));
    }

    let url = config
        .postgres_url
        .as_deref()
        .context("postgres_url not configured (set DATABASE_URL or use --memory)")?;
    let db = Database::connect(url, config.postgres_max_connections)
        .await
        .context("Failed to connect to PostgreSQL")?;
    db.init_schema().await?;
    Ok(Arc::new(PgStore::new(db.pool().clone())))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }

    let _log_guard = laundry_loop::logging::init_logging(&app_config);

    tracing::info!(
        "Starting Laundry Loop ({}) in {} mode",
        env!("GIT_HASH"),
        env
    );

    if app_config.payment.webhook_secret.is_none() {
        tracing::warn!("No payment webhook secret configured; webhooks will be rejected");
    }
    if app_config.orders.transactional_ledger {
        tracing::info!("Order and ledger rows are written in one transaction");
    }

    let store = open_store(&app_config, use_memory_store()).await?;
    let state = Arc::new(AppState::new(
        store,
        app_config.orders.transactional_ledger,
        &app_config.payment,
        app_config.booking.clone(),
    ));

    gateway::run_server(&app_config.gateway.host, app_config.gateway.port, state).await
}
