use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use stockwatch_api as api;

use api::services::low_stock::{LowStockAlertService, ReportParams};

/// Runs one low-stock alert report and prints it as JSON.
#[derive(Debug, Parser)]
#[command(name = "stockwatch-api", version, about)]
struct Cli {
    /// Company to report on
    #[arg(long)]
    company_id: i64,

    /// Trailing sales window in days (1-365, defaults to 30)
    #[arg(long)]
    days: Option<i32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db_pool = api::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await?;
    }
    api::db::check_connection(&db_pool).await?;

    let service = LowStockAlertService::new(Arc::new(db_pool));
    let report = service
        .generate(ReportParams {
            company_id: cli.company_id,
            days_window: cli.days,
        })
        .await?;

    info!(total_alerts = report.total_alerts, "Report complete");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
