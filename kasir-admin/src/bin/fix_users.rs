//! # kasir-fix-users
//!
//! Deletes every user and recreates the development admin and cashier
//! accounts with fresh Argon2id hashes.
//!
//! ⚠️  Destructive. Refuses to run without `--yes` or
//! `KASIR_CONFIRM_RESET=yes`.
//!
//! ## Usage
//!
//! ```bash
//! kasir-fix-users --yes
//! ```

use kasir_admin::config::Config;
use kasir_admin::error::{report_exit, AdminError, AdminResult};
use kasir_admin::logging::init_tracing;
use kasir_admin::repair::{is_confirmed, repair_users};
use kasir_admin::seed::default_accounts;
use kasir_admin::store::Store;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    Ok(report_exit(run().await))
}

async fn run() -> AdminResult<u8> {
    let config = Config::from_env()?;

    let confirmed = is_confirmed(std::env::args().skip(1), config.confirm_reset);
    if !confirmed {
        return Err(AdminError::NotConfirmed);
    }

    let accounts = default_accounts();
    let report = Store::scoped(config.database_config()?, |store| async move {
        repair_users(&store, &accounts, confirmed).await
    })
    .await?;

    println!("{report}");
    Ok(0)
}
