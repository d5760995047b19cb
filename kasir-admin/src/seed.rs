/// Development seed accounts
///
/// The two accounts the repair script writes, and from which the default
/// probe table is derived. These are development credentials; they must
/// never reach a production database.

use crate::error::{AdminError, AdminResult};
use kasir_shared::models::user::UserRole;
use std::collections::HashSet;
use validator::Validate;

pub const ADMIN_EMAIL: &str = "admin@kasir.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const CASHIER_EMAIL: &str = "kasir@kasir.com";
pub const CASHIER_PASSWORD: &str = "kasir123";

/// A user account with its plaintext password
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SeedAccount {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,

    pub role: UserRole,
}

impl SeedAccount {
    pub fn new(name: &str, email: &str, password: &str, role: UserRole) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        }
    }
}

/// The administrator and the first cashier
pub fn default_accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount::new("Administrator", ADMIN_EMAIL, ADMIN_PASSWORD, UserRole::Admin),
        SeedAccount::new("Kasir 1", CASHIER_EMAIL, CASHIER_PASSWORD, UserRole::Cashier),
    ]
}

/// Checks a set of accounts before anything is written
///
/// Every account must validate, emails must be unique (ignoring case), and
/// at least one account must be an admin so the reset cannot lock everyone
/// out of the back office.
pub fn validate_accounts(accounts: &[SeedAccount]) -> AdminResult<()> {
    if accounts.is_empty() {
        return Err(AdminError::Validation("No seed accounts given".to_string()));
    }

    let mut seen = HashSet::new();
    for account in accounts {
        account
            .validate()
            .map_err(|e| AdminError::Validation(format!("{}: {}", account.email, e)))?;

        if !seen.insert(account.email.to_lowercase()) {
            return Err(AdminError::Validation(format!(
                "Duplicate seed email: {}",
                account.email
            )));
        }
    }

    if !accounts.iter().any(|a| a.role == UserRole::Admin) {
        return Err(AdminError::Validation(
            "Seed accounts must include an admin".to_string(),
        ));
    }

    Ok(())
}
