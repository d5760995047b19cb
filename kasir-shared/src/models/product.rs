/// Product model and read queries
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     barcode VARCHAR(64) UNIQUE,
///     price BIGINT NOT NULL CHECK (price >= 0),
///     stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
///     category_id INTEGER NOT NULL REFERENCES categories(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Prices are whole rupiah. The `CHECK` constraints only hold for schemas
/// created by our migrations, which is why [`Product::audit`] exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Sellable product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,

    /// EAN/UPC or an in-house code such as `PEN001`
    pub barcode: Option<String>,

    /// Unit price in rupiah
    pub price: i64,

    pub stock: i32,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product joined with its category name
///
/// `category_name` is `None` when the category row is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductWithCategory {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub barcode: Option<String>,
    pub category_name: Option<String>,
}

/// Rows that break catalog invariants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogAudit {
    pub negative_price: i64,
    pub negative_stock: i64,

    /// Products whose `category_id` points at no category
    pub dangling_category: i64,
}

impl CatalogAudit {
    /// Whether every product passed
    pub fn is_clean(&self) -> bool {
        self.negative_price == 0 && self.negative_stock == 0 && self.dangling_category == 0
    }
}

impl Product {
    /// Counts total number of products
    pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Returns the first `limit` products by id, with their category name
    pub async fn sample_with_category<'e, E>(
        executor: E,
        limit: i64,
    ) -> Result<Vec<ProductWithCategory>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, ProductWithCategory>(
            r#"
            SELECT p.id, p.name, p.price, p.stock, p.barcode, c.name AS category_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            ORDER BY p.id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    /// Counts products that violate the catalog invariants
    pub async fn audit<'e, E>(executor: E) -> Result<CatalogAudit, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, CatalogAudit>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE p.price < 0) AS negative_price,
                COUNT(*) FILTER (WHERE p.stock < 0) AS negative_stock,
                COUNT(*) FILTER (WHERE c.id IS NULL) AS dangling_category
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            "#,
        )
        .fetch_one(executor)
        .await
    }
}
