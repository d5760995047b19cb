/// Database layer for the kasir tooling
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool construction, health check, URL masking
/// - `migrations`: Embedded migration runner and status
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use kasir_shared::db::pool::{connect_lazy, DatabaseConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// };
///
/// let pool = connect_lazy(&config)?;
/// # Ok(())
/// # }
/// ```

pub mod migrations;
pub mod pool;
