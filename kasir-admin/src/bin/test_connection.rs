//! # kasir-test-connection
//!
//! Loads the catalog through the REST API the way the storefront does and
//! renders it as text. Reads commands from stdin afterwards:
//!
//! - `r` or an empty line: refresh
//! - `q`: quit
//!
//! Needs no database. Exits 0 when the last load succeeded.

use kasir_admin::api_client::ApiClient;
use kasir_admin::config::Config;
use kasir_admin::connection_probe::{render, ConnectionProbe, ProbeState, RefreshOutcome};
use kasir_admin::error::{report_exit, AdminResult};
use kasir_admin::logging::init_tracing;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    Ok(report_exit(run().await))
}

async fn run() -> AdminResult<u8> {
    let config = Config::from_env()?;
    let probe = ConnectionProbe::new(ApiClient::new(&config.api)?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if let RefreshOutcome::Completed(state) = probe.refresh().await {
            println!("{}", render(&state));
        }
        println!("\n[r] refresh  [q] quit");

        let refresh = loop {
            match lines.next_line().await {
                Ok(Some(line)) => match line.trim() {
                    "" | "r" => break true,
                    "q" => break false,
                    other => warn!(command = other, "Unknown command"),
                },
                Ok(None) => break false,
                Err(e) => {
                    warn!(error = %e, "Cannot read stdin");
                    break false;
                }
            }
        };

        if !refresh {
            break;
        }
    }

    let code = match probe.state() {
        ProbeState::Success { .. } => 0,
        _ => 1,
    };
    Ok(code)
}
