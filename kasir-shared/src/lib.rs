//! # Kasir Shared Library
//!
//! Data layer shared by the kasir admin binaries: the PostgreSQL pool and
//! embedded migrations, the `users`/`categories`/`products` models, and the
//! Argon2id password hashing that defines the stored credential format.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migrations
//! - `models`: Database models and queries
//! - `auth`: Password hashing and verification

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the kasir shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
