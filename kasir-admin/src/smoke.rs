/// API smoke test
///
/// Two independent phases:
///
/// 1. **Store**: counts categories, products and users, and samples the first
///    few products with their category names.
/// 2. **HTTP**: waits for the server, then GETs the products and categories
///    listings and reports each status and array length.
///
/// A failure in one phase never prevents the other, and each endpoint is
/// probed on its own. Only an entirely clean run exits 0.

use crate::api_client::{ApiClient, CATEGORIES_PATH, PRODUCTS_PATH};
use crate::config::ApiConfig;
use crate::connection_probe::format_rupiah;
use crate::error::{AdminError, AdminResult, NetworkError};
use crate::readiness::{wait_until_ready, Readiness, ReadinessPolicy};
use crate::store::{CatalogStore, Store, UserDirectory};
use kasir_shared::db::pool::DatabaseConfig;
use kasir_shared::models::product::ProductWithCategory;
use std::fmt;
use tracing::{error, info};

/// Products sampled in the store phase
pub const SAMPLE_SIZE: i64 = 5;

/// What the store phase read
#[derive(Debug, Clone)]
pub struct StoreSummary {
    pub categories: i64,
    pub products: i64,
    pub users: i64,
    pub sample: Vec<ProductWithCategory>,
}

/// Runs the store phase
pub async fn store_phase<S>(store: &S) -> AdminResult<StoreSummary>
where
    S: CatalogStore + UserDirectory + ?Sized,
{
    info!("🔍 Testing database connection...");

    let categories = store.count_categories().await?;
    let products = store.count_products().await?;
    let users = store.count_users().await?;
    let sample = store.sample_products(SAMPLE_SIZE).await?;

    info!("✅ Database connected successfully");

    Ok(StoreSummary {
        categories,
        products,
        users,
        sample,
    })
}

/// Successful answer from one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointHit {
    pub status: u16,

    /// Array length; 0 for a non-array body
    pub count: usize,
}

/// One endpoint and what happened to it
#[derive(Debug)]
pub struct EndpointProbe {
    pub path: &'static str,
    pub result: Result<EndpointHit, NetworkError>,
}

impl EndpointProbe {
    fn noun(&self) -> &'static str {
        match self.path {
            PRODUCTS_PATH => "Products",
            CATEGORIES_PATH => "Categories",
            _ => "Items",
        }
    }
}

/// What the HTTP phase saw
#[derive(Debug)]
pub struct ApiPhase {
    pub readiness: Result<Readiness, NetworkError>,
    pub endpoints: Vec<EndpointProbe>,
}

impl ApiPhase {
    pub fn is_success(&self) -> bool {
        self.readiness.is_ok() && self.endpoints.iter().all(|e| e.result.is_ok())
    }
}

/// GETs one endpoint and counts the elements of its array body
pub async fn probe_endpoint(client: &ApiClient, path: &'static str) -> EndpointProbe {
    let result = client
        .get_json::<serde_json::Value>(path)
        .await
        .map(|(status, body)| EndpointHit {
            status,
            count: body.as_array().map(Vec::len).unwrap_or(0),
        });

    match &result {
        Ok(hit) => info!(endpoint = path, status = hit.status, count = hit.count, "Endpoint OK"),
        Err(e) => error!(endpoint = path, "❌ NetworkError: {}", e),
    }

    EndpointProbe { path, result }
}

/// Runs the HTTP phase
///
/// Both endpoints are probed even when the readiness poll gave up, so the
/// report always names the failure of each one.
pub async fn api_phase(client: &ApiClient, ready_path: &str, policy: ReadinessPolicy) -> ApiPhase {
    info!("🌐 Testing API endpoints...");

    let readiness = wait_until_ready(client, ready_path, policy).await;
    if let Err(e) = &readiness {
        error!("❌ NetworkError: {}", e);
    }

    let mut endpoints = Vec::with_capacity(2);
    for path in [PRODUCTS_PATH, CATEGORIES_PATH] {
        endpoints.push(probe_endpoint(client, path).await);
    }

    ApiPhase {
        readiness,
        endpoints,
    }
}

/// Opens the store and runs the store phase, releasing the pool afterwards
pub async fn open_store_phase(database: AdminResult<DatabaseConfig>) -> AdminResult<StoreSummary> {
    match database {
        Ok(database) => Store::scoped(&database, |store| async move { store_phase(&store).await }).await,
        Err(e) => Err(e),
    }
    .or_else(store_unavailable)
}

/// Runs both phases
///
/// A database config error is reported as the store phase's failure and the
/// HTTP phase still runs.
pub async fn smoke_test(database: AdminResult<DatabaseConfig>, api: &ApiConfig) -> AdminResult<SmokeReport> {
    let store = open_store_phase(database).await;

    let client = ApiClient::new(api)?;
    let policy = ReadinessPolicy::with_timeout(api.ready_timeout);
    let api = api_phase(&client, &api.ready_path, policy).await;

    Ok(SmokeReport { store, api })
}

/// Outcome of the whole smoke test
#[derive(Debug)]
pub struct SmokeReport {
    pub store: AdminResult<StoreSummary>,
    pub api: ApiPhase,
}

impl SmokeReport {
    pub fn is_success(&self) -> bool {
        self.store.is_ok() && self.api.is_success()
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for StoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 Database Summary:")?;
        writeln!(f, "   - Categories: {}", self.categories)?;
        writeln!(f, "   - Products: {}", self.products)?;
        writeln!(f, "   - Users: {}", self.users)?;
        write!(f, "📦 Sample Products:")?;

        for product in &self.sample {
            write!(
                f,
                "\n   - {} ({}) - Rp {}",
                product.name,
                product.category_name.as_deref().unwrap_or("-"),
                format_rupiah(product.price)
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for EndpointProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(hit) => {
                writeln!(f, "✅ GET {} - Status: {}", self.path, hit.status)?;
                write!(f, "   {} found: {}", self.noun(), hit.count)
            }
            Err(e) => match e.status() {
                Some(status) => write!(f, "❌ GET {} - Status: {}", self.path, status),
                None => write!(f, "❌ GET {} - {}", self.path, e),
            },
        }
    }
}

impl fmt::Display for SmokeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.store {
            Ok(summary) => writeln!(f, "{summary}")?,
            Err(e) => writeln!(f, "❌ Database Error: {e}")?,
        }

        writeln!(f)?;
        match &self.api.readiness {
            Ok(ready) => writeln!(f, "⏳ Server answered after {} attempt(s)", ready.attempts)?,
            Err(e) => writeln!(f, "❌ {e}")?,
        }

        for endpoint in &self.api.endpoints {
            writeln!(f, "{endpoint}")?;
        }

        if self.is_success() {
            write!(f, "🎉 Smoke test passed")
        } else {
            write!(f, "❌ Smoke test failed")
        }
    }
}

/// Wraps a failed store phase for the report
pub fn store_unavailable(err: AdminError) -> AdminResult<StoreSummary> {
    error!("❌ {}: {}", err.label(), err);
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: i64, category: Option<&str>) -> ProductWithCategory {
        ProductWithCategory {
            id: 1,
            name: name.to_string(),
            price,
            stock: 10,
            barcode: None,
            category_name: category.map(str::to_string),
        }
    }

    #[test]
    fn test_summary_display() {
        let summary = StoreSummary {
            categories: 5,
            products: 12,
            users: 2,
            sample: vec![
                product("Pulpen Pilot G2 0.7mm", 5500, Some("Pulpen & Pensil")),
                product("Kertas Lepas", 1250000, None),
            ],
        };

        let text = summary.to_string();
        assert!(text.contains("   - Categories: 5"));
        assert!(text.contains("   - Users: 2"));
        assert!(text.contains("   - Pulpen Pilot G2 0.7mm (Pulpen & Pensil) - Rp 5.500"));
        assert!(text.contains("   - Kertas Lepas (-) - Rp 1.250.000"));
    }

    #[test]
    fn test_endpoint_display() {
        let ok = EndpointProbe {
            path: PRODUCTS_PATH,
            result: Ok(EndpointHit {
                status: 200,
                count: 3,
            }),
        };
        assert_eq!(
            ok.to_string(),
            "✅ GET /api/products - Status: 200\n   Products found: 3"
        );

        let failed = EndpointProbe {
            path: CATEGORIES_PATH,
            result: Err(NetworkError::Status {
                endpoint: CATEGORIES_PATH.to_string(),
                status: 500,
            }),
        };
        assert_eq!(failed.to_string(), "❌ GET /api/categories - Status: 500");
    }

    #[test]
    fn test_exit_code_requires_everything() {
        let api = ApiPhase {
            readiness: Ok(Readiness {
                attempts: 1,
                waited: std::time::Duration::ZERO,
                status: 200,
            }),
            endpoints: vec![],
        };
        let report = SmokeReport {
            store: Err(AdminError::Config("DATABASE_URL environment variable is required".into())),
            api,
        };

        assert!(report.api.is_success());
        assert!(!report.is_success());
        assert_eq!(report.exit_code(), 1);
        assert!(report.to_string().contains("❌ Database Error"));
    }
}
