//! Entry point for the Commission Engine binary.
//!
//! Running this binary starts an HTTP server serving commission reports
//! for the dataset named by `COMMISSION_DATA_FILE`.  See
//! [`commission_engine::config`] for the full list of settings.

use anyhow::Result;
use commission_engine::{api, config::AppConfig, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    telemetry::init(&config.log_filter)?;
    api::serve(&config).await
}
