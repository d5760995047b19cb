/// Database models for the kasir point-of-sale store
///
/// # Models
///
/// - `user`: Staff accounts with Argon2id password hashes and roles
/// - `category`: Product categories
/// - `product`: Products, their category join, and the catalog audit
///
/// # Example
///
/// ```no_run
/// use kasir_shared::models::{product::Product, user::User};
/// use kasir_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let users = User::count(&pool).await?;
/// let sample = Product::sample_with_category(&pool, 5).await?;
/// println!("{} users, first product: {:?}", users, sample.first());
/// # Ok(())
/// # }
/// ```

pub mod category;
pub mod product;
pub mod user;
