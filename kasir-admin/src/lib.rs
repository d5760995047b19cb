//! # Kasir Admin Library
//!
//! Operator tooling for the kasir point-of-sale backend. Each binary under
//! `src/bin` is a thin shell around one operation here:
//!
//! - `kasir-check-users`: [`verify::verify_users`]
//! - `kasir-fix-users`: [`repair::repair_users`]
//! - `kasir-test-api`: [`smoke::store_phase`] and [`smoke::api_phase`]
//! - `kasir-test-connection`: [`connection_probe::ConnectionProbe`]
//! - `kasir-diagnose`: [`diagnose::diagnose`]
//! - `kasir-migrate`: schema bootstrap from `kasir-shared`
//!
//! ## Modules
//!
//! - `store`: Database handle, release discipline, and the store traits
//! - `api_client`: HTTP client for the REST server
//! - `readiness`: Backoff poll until the server answers
//! - `config`: Environment configuration
//! - `error`: Error types
//!
//! ## Example
//!
//! ```no_run
//! use kasir_admin::config::Config;
//! use kasir_admin::probes::ProbeTable;
//! use kasir_admin::seed::default_accounts;
//! use kasir_admin::store::Store;
//! use kasir_admin::verify::verify_users;
//!
//! # async fn example() -> kasir_admin::error::AdminResult<()> {
//! let config = Config::from_env()?;
//! let probes = ProbeTable::from_seed(&default_accounts());
//!
//! let report = Store::scoped(config.database_config()?, |store| async move {
//!     verify_users(&store, &probes).await
//! })
//! .await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod api_client;
pub mod config;
pub mod connection_probe;
pub mod diagnose;
pub mod error;
pub mod logging;
pub mod probes;
pub mod readiness;
pub mod repair;
pub mod seed;
pub mod smoke;
pub mod store;
pub mod verify;
