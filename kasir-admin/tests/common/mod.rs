//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An in-memory store implementing the store traits, with failure injection
//! - In-process axum stubs standing in for the REST server
//! - Fixture builders for users and products

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use kasir_admin::config::ApiConfig;
use kasir_admin::error::StoreError;
use kasir_admin::store::{CatalogStore, ReplacedUsers, UserDirectory};
use kasir_shared::auth::password::hash_password;
use kasir_shared::models::product::ProductWithCategory;
use kasir_shared::models::user::{CreateUser, User, UserRole};
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;

/// Which store operation should fail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailOn {
    #[default]
    Nothing,
    List,
    Count,
    Replace,
    /// `replace_users` writes every row but returns only the first
    ReplaceShort,
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    pub categories: i64,
    pub products: Vec<ProductWithCategory>,
    pub fail_on: FailOn,
}

fn injected() -> StoreError {
    StoreError::Query(sqlx::Error::Protocol("injected failure".to_string()))
}

impl MemoryStore {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Default::default()
        }
    }

    pub fn with_catalog(categories: i64, products: Vec<ProductWithCategory>) -> Self {
        Self {
            categories,
            products,
            ..Default::default()
        }
    }

    pub fn failing(fail_on: FailOn) -> Self {
        Self {
            fail_on,
            ..Default::default()
        }
    }

    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        if self.fail_on == FailOn::List {
            return Err(injected());
        }
        Ok(self.users())
    }

    async fn count_users(&self) -> Result<i64, StoreError> {
        if self.fail_on == FailOn::Count {
            return Err(injected());
        }
        Ok(self.users.lock().unwrap().len() as i64)
    }

    async fn replace_users(&self, accounts: Vec<CreateUser>) -> Result<ReplacedUsers, StoreError> {
        if self.fail_on == FailOn::Replace {
            return Err(injected());
        }

        let mut users = self.users.lock().unwrap();
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let deleted = users.len() as u64;

        let created: Vec<User> = accounts
            .into_iter()
            .enumerate()
            .map(|(i, account)| {
                let now = Utc::now();
                User {
                    id: next_id + i as i32,
                    name: account.name,
                    email: account.email,
                    password_hash: account.password_hash,
                    role: account.role,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                }
            })
            .collect();

        *users = created.clone();

        let mut created = created;
        if self.fail_on == FailOn::ReplaceShort {
            created.truncate(1);
        }
        Ok(ReplacedUsers { deleted, created })
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn count_categories(&self) -> Result<i64, StoreError> {
        if self.fail_on == FailOn::Count {
            return Err(injected());
        }
        Ok(self.categories)
    }

    async fn count_products(&self) -> Result<i64, StoreError> {
        if self.fail_on == FailOn::Count {
            return Err(injected());
        }
        Ok(self.products.len() as i64)
    }

    async fn sample_products(&self, limit: i64) -> Result<Vec<ProductWithCategory>, StoreError> {
        Ok(self.products.iter().take(limit as usize).cloned().collect())
    }
}

/// A user whose hash was computed from `password`
pub fn user_with_password(id: i32, email: &str, password: &str, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id,
        name: format!("User {id}"),
        email: email.to_string(),
        password_hash: hash_password(password).unwrap(),
        role,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn product_row(id: i32, name: &str, price: i64, category: &str) -> ProductWithCategory {
    ProductWithCategory {
        id,
        name: name.to_string(),
        price,
        stock: 10,
        barcode: None,
        category_name: Some(category.to_string()),
    }
}

/// JSON product as the REST server sends it
pub fn product_json(id: i64, name: &str, price: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "stock": 25,
        "barcode": format!("BRC{id:03}"),
        "categoryId": 1,
        "category": { "id": 1, "name": "Alat Tulis" }
    })
}

/// JSON category as the REST server sends it
pub fn category_json(id: i64, name: &str, products: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("Kategori {name}"),
        "_count": { "products": products }
    })
}

/// Serves `router` on an ephemeral local port and returns its base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

/// Base URL of a port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// API settings with short timeouts for tests
pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        request_timeout: Duration::from_secs(2),
        ready_timeout: Duration::from_secs(1),
        ..Default::default()
    }
}
