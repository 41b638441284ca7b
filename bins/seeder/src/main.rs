//! Database seeder for Entryflow development and testing.
//!
//! Provisions a top-level distributor with an initial quota and publishes a
//! welcome notice. Safe to run repeatedly: existing rows are left alone.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use entryflow_db::repositories::account::NewDistributor;
use entryflow_db::{AccountRepository, Clock, NoticeRepository};
use entryflow_shared::{AppConfig, telemetry};
use tracing::info;

/// Username of the development distributor.
const SEED_DISTRIBUTOR: &str = "distributor";
/// Quota granted to the development distributor.
const SEED_QUOTA: i64 = 1_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init(&config.logging);
    let clock = Clock::new(config.app.tz()?);

    info!("Connecting to database...");
    let db = entryflow_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let accounts = AccountRepository::new(db.clone()).with_clock(clock);
    if accounts.find_by_username(SEED_DISTRIBUTOR).await?.is_some() {
        info!(username = SEED_DISTRIBUTOR, "Distributor already exists, skipping");
    } else {
        let distributor = accounts
            .create_distributor(NewDistributor {
                username: SEED_DISTRIBUTOR.to_string(),
                password: "distributor".to_string(),
                name: "Development Distributor".to_string(),
                mobile: "9000000000".to_string(),
                email: "distributor@entryflow.dev".to_string(),
                total_amount: SEED_QUOTA,
            })
            .await
            .context("failed to seed distributor")?;
        info!(
            username = %distributor.username,
            quota = distributor.total_amount,
            "Seeded distributor"
        );
    }

    let notices = NoticeRepository::new(db).with_clock(clock);
    if notices.latest().await?.is_none() {
        notices
            .publish("Welcome", "Entryflow is ready for submissions.")
            .await
            .context("failed to seed notice")?;
        info!("Seeded welcome notice");
    }

    info!("Seeding complete");
    Ok(())
}
