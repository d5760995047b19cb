/// HTTP client for the kasir REST server
///
/// Thin wrapper over `reqwest` that knows the base URL, the optional bearer
/// token, and the two catalog endpoints the smoke tests read:
///
/// - `GET /api/products` → `[{id, name, price, stock, barcode?, category: {name}}]`
/// - `GET /api/categories` → `[{id, name, description, _count: {products}}]`
///
/// Every non-2xx answer becomes [`NetworkError::Status`].

use crate::config::ApiConfig;
use crate::error::{AdminError, AdminResult, NetworkError};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

pub const PRODUCTS_PATH: &str = "/api/products";
pub const CATEGORIES_PATH: &str = "/api/categories";

/// Category reference embedded in a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,
}

/// Product as served by the REST API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProduct {
    pub id: i64,
    pub name: String,

    /// Whole rupiah; the server may send a number or a decimal string
    #[serde(deserialize_with = "deserialize_rupiah")]
    pub price: i64,

    pub stock: i64,

    #[serde(default)]
    pub barcode: Option<String>,

    #[serde(default)]
    pub category: Option<CategoryRef>,
}

/// Relation counts attached to a category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    #[serde(default)]
    pub products: i64,
}

/// Category as served by the REST API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCategory {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "_count", default)]
    pub counts: Option<CategoryCounts>,
}

impl ApiCategory {
    pub fn product_count(&self) -> i64 {
        self.counts.map(|c| c.products).unwrap_or(0)
    }
}

fn deserialize_rupiah<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    let amount = match RawPrice::deserialize(deserializer)? {
        RawPrice::Integer(value) => return Ok(value),
        RawPrice::Float(value) => value,
        RawPrice::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid price: {text}")))?,
    };

    if !amount.is_finite() {
        return Err(de::Error::custom("price is not a finite number"));
    }

    Ok(amount.round() as i64)
}

/// Client for one REST server
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Builds a client with the configured timeout
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Config` if the TLS backend cannot initialize.
    pub fn new(config: &ApiConfig) -> AdminResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AdminError::Config(format!("Cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Absolute URL for `path`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(self.url(path));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends one GET and returns the status, whatever it is
    ///
    /// Used by the readiness poll, where any answer means the server is up.
    pub async fn probe(&self, path: &str) -> Result<u16, NetworkError> {
        let response = self
            .get(path)
            .send()
            .await
            .map_err(|source| NetworkError::Request {
                endpoint: path.to_string(),
                source,
            })?;

        Ok(response.status().as_u16())
    }

    /// GETs `path` and decodes a 2xx JSON body
    ///
    /// Returns the status alongside the body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<(u16, T), NetworkError> {
        let response = self
            .get(path)
            .send()
            .await
            .map_err(|source| NetworkError::Request {
                endpoint: path.to_string(),
                source,
            })?;

        let status = response.status();
        debug!(endpoint = path, status = status.as_u16(), "API response");

        if !status.is_success() {
            return Err(NetworkError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| NetworkError::Request {
                endpoint: path.to_string(),
                source,
            })?;

        let value = serde_json::from_slice(&body).map_err(|e| NetworkError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })?;

        Ok((status.as_u16(), value))
    }

    pub async fn fetch_products(&self) -> Result<Vec<ApiProduct>, NetworkError> {
        let (_, products) = self.get_json(PRODUCTS_PATH).await?;
        Ok(products)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<ApiCategory>, NetworkError> {
        let (_, categories) = self.get_json(CATEGORIES_PATH).await?;
        Ok(categories)
    }
}
