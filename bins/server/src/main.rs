//! Accrual API Server
//!
//! Main entry point for the overtime and leave accrual service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accrual_api::{AppState, create_router};
use accrual_core::AccrualService;
use accrual_core::bulk::BulkRecapRunner;
use accrual_core::policy::{Clock, Policy, SystemClock};
use accrual_db::{MemoryStore, SeedFile};
use accrual_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accrual=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let policy = Policy::from_config(&config.policy, &config.leave)
        .context("Invalid policy configuration")?;
    info!(
        timezone = %policy.timezone,
        payable_cap = %policy.payable_cap_hours,
        holidays = policy.public_holidays.len(),
        "Policy loaded"
    );

    let quota = config.leave.default_annual_quota;
    let store = match &config.seed_path {
        Some(path) => {
            let seed = SeedFile::load(path)
                .with_context(|| format!("Failed to load seed file {}", path.display()))?;
            let store = MemoryStore::from_seed(seed, quota)?;
            info!(path = %path.display(), "Employees seeded");
            store
        }
        None => MemoryStore::new(quota),
    };

    let runner = BulkRecapRunner::new(&config.bulk).context("Failed to build bulk worker pool")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = AccrualService::new(Arc::new(store), clock, policy, runner);

    let app = create_router(
        AppState::new(service),
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
