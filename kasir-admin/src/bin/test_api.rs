//! # kasir-test-api
//!
//! Smoke test for a running backend: summarizes the catalog straight from
//! the database, then waits for the REST server and hits its products and
//! categories listings.
//!
//! ## Usage
//!
//! ```bash
//! KASIR_API_URL=http://localhost:5000 KASIR_API_TOKEN=... kasir-test-api
//! ```
//!
//! Exits 0 only when the database and both endpoints answered.

use kasir_admin::config::Config;
use kasir_admin::error::{report_exit, AdminResult};
use kasir_admin::logging::init_tracing;
use kasir_admin::smoke::{open_store_phase, smoke_test};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    Ok(report_exit(run().await))
}

async fn run() -> AdminResult<u8> {
    let (database, api) = Config::phases_from_env();

    let api = match api {
        Ok(api) => api,
        Err(e) => {
            // Nothing to probe, but the store phase still runs
            if let Ok(summary) = open_store_phase(database).await {
                println!("{summary}");
            }
            return Err(e);
        }
    };

    let report = smoke_test(database, &api).await?;
    println!("{report}");
    Ok(report.exit_code())
}
