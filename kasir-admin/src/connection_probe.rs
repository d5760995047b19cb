/// Frontend-to-backend connection probe
///
/// A small state machine that loads the catalog the way the storefront does
/// and renders what it got as text panels.
///
/// ```text
///            refresh()
///   ┌────────────────────────┐
///   ▼                        │
/// Loading ──► Success ───────┤
///    │                       │
///    └──────► Error ─────────┘
/// ```
///
/// Categories are fetched first, then products. A failure on either moves
/// to `Error` without publishing the list that did load. Only one refresh
/// may be in flight; a second one is refused instead of racing the first.

use crate::api_client::{ApiCategory, ApiClient, ApiProduct};
use crate::error::NetworkError;
use async_trait::async_trait;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{error, info};

/// Product cards shown before the remainder is summarized
pub const MAX_PRODUCT_CARDS: usize = 8;

/// Where the probe loads the catalog from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn categories(&self) -> Result<Vec<ApiCategory>, NetworkError>;

    async fn products(&self) -> Result<Vec<ApiProduct>, NetworkError>;
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn categories(&self) -> Result<Vec<ApiCategory>, NetworkError> {
        self.fetch_categories().await
    }

    async fn products(&self) -> Result<Vec<ApiProduct>, NetworkError> {
        self.fetch_products().await
    }
}

/// Current view of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeState {
    Loading,
    Success {
        categories: Vec<ApiCategory>,
        products: Vec<ApiProduct>,
    },
    Error {
        message: String,
    },
}

/// Result of asking for a refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The refresh ran; holds the state it ended in
    Completed(ProbeState),

    /// Another refresh was still running; nothing changed
    AlreadyInFlight,
}

/// Clears the in-flight flag when the refresh ends or is dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The probe itself
pub struct ConnectionProbe<S> {
    source: S,
    state: Mutex<ProbeState>,
    in_flight: AtomicBool,
}

impl<S: CatalogSource> ConnectionProbe<S> {
    /// New probe in the `Loading` state; nothing is fetched yet
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(ProbeState::Loading),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ProbeState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_state(&self, next: ProbeState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Reloads the catalog
    ///
    /// Used both for the initial load and for the refresh/retry action.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            return RefreshOutcome::AlreadyInFlight;
        };

        self.set_state(ProbeState::Loading);
        info!("🔍 Testing frontend to backend connection...");

        let next = match self.load().await {
            Ok((categories, products)) => ProbeState::Success {
                categories,
                products,
            },
            Err(message) => {
                error!("❌ API Test failed: {}", message);
                ProbeState::Error { message }
            }
        };

        self.set_state(next.clone());
        RefreshOutcome::Completed(next)
    }

    async fn load(&self) -> Result<(Vec<ApiCategory>, Vec<ApiProduct>), String> {
        let categories = self
            .source
            .categories()
            .await
            .map_err(|e| failure_message("Categories", &e))?;
        info!(count = categories.len(), "✅ Categories loaded");

        let products = self
            .source
            .products()
            .await
            .map_err(|e| failure_message("Products", &e))?;
        info!(count = products.len(), "✅ Products loaded");

        Ok((categories, products))
    }
}

fn failure_message(api: &str, err: &NetworkError) -> String {
    match err.status() {
        Some(status) => format!("{api} API failed: {status}"),
        None => format!("{api} API failed: {err}"),
    }
}

/// Formats whole rupiah with `.` as the thousands separator
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if amount < 0 {
        grouped.push('-');
    }

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    grouped
}

/// Renders a state as text panels
pub fn render(state: &ProbeState) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = match state {
        ProbeState::Loading => write!(out, "⏳ Loading catalog..."),
        ProbeState::Error { message } => {
            write!(out, "Connection Error\n{message}\n[Retry]")
        }
        ProbeState::Success {
            categories,
            products,
        } => render_success(&mut out, categories, products),
    };

    out
}

fn render_success(
    out: &mut String,
    categories: &[ApiCategory],
    products: &[ApiProduct],
) -> std::fmt::Result {
    writeln!(out, "✅ Connection Successful!")?;
    writeln!(out, "Frontend successfully connected to backend API")?;
    writeln!(out)?;

    writeln!(out, "📂 Categories ({})", categories.len())?;
    for category in categories {
        writeln!(out, " - {}", category.name)?;
        if let Some(description) = &category.description {
            writeln!(out, "   {description}")?;
        }
        writeln!(out, "   {} products", category.product_count())?;
    }
    writeln!(out)?;

    writeln!(out, "📦 Products ({})", products.len())?;
    for product in products.iter().take(MAX_PRODUCT_CARDS) {
        writeln!(out, " - {}", product.name)?;
        if let Some(category) = &product.category {
            writeln!(out, "   {}", category.name)?;
        }
        writeln!(out, "   Rp {}", format_rupiah(product.price))?;
        writeln!(out, "   Stock: {}", product.stock)?;
        if let Some(barcode) = product.barcode.as_deref().filter(|b| !b.is_empty()) {
            writeln!(out, "   📷 {barcode}")?;
        }
    }
    if products.len() > MAX_PRODUCT_CARDS {
        writeln!(
            out,
            "... and {} more products",
            products.len() - MAX_PRODUCT_CARDS
        )?;
    }
    writeln!(out)?;

    write!(out, "[🔄 Refresh Data]")
}
