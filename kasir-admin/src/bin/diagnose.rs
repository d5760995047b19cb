//! # kasir-diagnose
//!
//! Step-by-step check of the database setup: connectivity, which database
//! the URL reaches, migrations, table row counts, catalog consistency and
//! the environment. Ends with recommended next steps.
//!
//! Exits 0 when the database is reachable and every expected table exists.

use kasir_admin::config::Config;
use kasir_admin::diagnose::{diagnose, environment_snapshot, DiagnosisReport};
use kasir_admin::error::{report_exit, AdminResult};
use kasir_admin::logging::init_tracing;
use kasir_admin::store::Store;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    Ok(report_exit(run().await))
}

async fn run() -> AdminResult<u8> {
    let config = Config::from_env()?;
    let environment = environment_snapshot(|key| std::env::var(key).ok());

    let report = match config.database_config() {
        Ok(database) => {
            let snapshot = environment.clone();
            Store::scoped(database, |store| async move {
                Ok(diagnose(store.pool(), snapshot).await)
            })
            .await
            .unwrap_or_else(|e| DiagnosisReport::without_database(environment, e.to_string()))
        }
        Err(e) => DiagnosisReport::without_database(environment, e.to_string()),
    };

    println!("{report}");
    Ok(report.exit_code())
}
