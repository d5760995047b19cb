/// Store accessor
///
/// A [`Store`] is the one database handle a script owns. It is built at
/// script start, passed explicitly to every operation, and released exactly
/// once by [`scoped`], whether the body succeeded or failed.
///
/// Operations are written against the [`UserDirectory`] and [`CatalogStore`]
/// traits rather than against `Store` itself, so the check/fix/smoke logic
/// can run against in-memory fakes in tests.
///
/// # Example
///
/// ```no_run
/// use kasir_admin::store::{Store, UserDirectory};
/// use kasir_shared::db::pool::DatabaseConfig;
///
/// # async fn example(config: DatabaseConfig) -> kasir_admin::error::AdminResult<()> {
/// let total = Store::scoped(&config, |store| async move {
///     Ok(store.count_users().await?)
/// })
/// .await?;
/// println!("{total} users");
/// # Ok(())
/// # }
/// ```

use crate::error::{AdminResult, StoreError};
use async_trait::async_trait;
use kasir_shared::db::pool::{close_pool, connect_lazy, DatabaseConfig};
use kasir_shared::models::{
    category::Category,
    product::{Product, ProductWithCategory},
    user::{CreateUser, User},
};
use sqlx::PgPool;
use std::future::Future;
use tracing::{debug, info};

/// Result of replacing every user
#[derive(Debug, Clone)]
pub struct ReplacedUsers {
    /// Rows removed
    pub deleted: u64,

    /// Rows inserted, in input order
    pub created: Vec<User>,
}

/// Read and replace access to user accounts
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every user, ordered by id
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// `COUNT(*)` over users
    async fn count_users(&self) -> Result<i64, StoreError>;

    /// Deletes every user and inserts `accounts`, atomically
    ///
    /// Either all of it happens or none of it does.
    async fn replace_users(&self, accounts: Vec<CreateUser>) -> Result<ReplacedUsers, StoreError>;
}

/// Read access to the product catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn count_categories(&self) -> Result<i64, StoreError>;

    async fn count_products(&self) -> Result<i64, StoreError>;

    /// First `limit` products by id, joined with category names
    async fn sample_products(&self, limit: i64) -> Result<Vec<ProductWithCategory>, StoreError>;
}

/// A handle that must be given back when the script is done
#[async_trait]
pub trait Release: Send {
    async fn release(self);
}

/// Runs `body` with `handle`, then releases `handle`
///
/// The release happens on both the success and the error path. The body
/// receives its own clone; clones share the underlying resource.
pub async fn scoped<H, F, Fut, T>(handle: H, body: F) -> AdminResult<T>
where
    H: Release + Clone,
    F: FnOnce(H) -> Fut,
    Fut: Future<Output = AdminResult<T>>,
{
    let result = body(handle.clone()).await;
    handle.release().await;
    result
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Builds a store without connecting
    ///
    /// The first query opens the first connection, so an unreachable
    /// database shows up as a `StoreError::Connect` from that query.
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = connect_lazy(config).map_err(StoreError::Connect)?;
        debug!("Store opened");
        Ok(Self { pool })
    }

    /// Underlying pool, for queries outside the traits
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Opens a store, runs `body`, and always closes the store
    pub async fn scoped<F, Fut, T>(config: &DatabaseConfig, body: F) -> AdminResult<T>
    where
        F: FnOnce(Store) -> Fut,
        Fut: Future<Output = AdminResult<T>>,
    {
        let store = Store::open(config)?;
        scoped(store, body).await
    }
}

#[async_trait]
impl Release for Store {
    async fn release(self) {
        close_pool(self.pool).await;
        debug!("Store released");
    }
}

#[async_trait]
impl UserDirectory for Store {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(User::list_all(&self.pool).await?)
    }

    async fn count_users(&self) -> Result<i64, StoreError> {
        Ok(User::count(&self.pool).await?)
    }

    async fn replace_users(&self, accounts: Vec<CreateUser>) -> Result<ReplacedUsers, StoreError> {
        let mut tx = self.pool.begin().await?;

        let deleted = User::delete_all(&mut *tx).await?;
        info!(deleted, "🗑️ Deleted existing users");

        let mut created = Vec::with_capacity(accounts.len());
        for account in accounts {
            created.push(User::create(&mut *tx, account).await?);
        }

        tx.commit().await?;

        Ok(ReplacedUsers { deleted, created })
    }
}

#[async_trait]
impl CatalogStore for Store {
    async fn count_categories(&self) -> Result<i64, StoreError> {
        Ok(Category::count(&self.pool).await?)
    }

    async fn count_products(&self) -> Result<i64, StoreError> {
        Ok(Product::count(&self.pool).await?)
    }

    async fn sample_products(&self, limit: i64) -> Result<Vec<ProductWithCategory>, StoreError> {
        Ok(Product::sample_with_category(&self.pool, limit).await?)
    }
}
