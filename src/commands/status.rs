//! Backend health command.

use serde::Serialize;
use tabled::Tabled;

use cabinet_core::config::AppConfig;
use cabinet_core::error::AppError;
use cabinet_service::HealthReport;

use crate::output::{self, OutputFormat};

/// Health display row
#[derive(Debug, Serialize, Tabled)]
struct StatusRow {
    /// Database
    database: &'static str,
    /// Storage
    storage: &'static str,
    /// Provider
    provider: String,
    /// Root
    root: String,
}

impl From<&HealthReport> for StatusRow {
    fn from(r: &HealthReport) -> Self {
        Self {
            database: up_down(r.database),
            storage: up_down(r.storage),
            provider: r.storage_provider.clone(),
            root: r.storage_root.display().to_string(),
        }
    }
}

fn up_down(ok: bool) -> &'static str {
    if ok { "up" } else { "down" }
}

/// Execute the status command
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let facade = super::create_facade(config).await?;
    let report = facade.health_check().await?;

    output::print_item(&StatusRow::from(&report), format);

    if report.is_healthy() {
        Ok(())
    } else {
        Err(AppError::internal("One or more backends are unavailable"))
    }
}
