/// Destructive user reset
///
/// Replaces every row in `users` with the seed accounts. The order of
/// operations is:
///
/// 1. Refuse unless the operator confirmed.
/// 2. Validate the accounts, hash each password, and self-check each hash
///    before touching the database.
/// 3. Delete and insert inside one transaction.
/// 4. Re-verify the hash each stored row came back with.
///
/// ⚠️  **WARNING**: every existing account is discarded. Development use only.

use crate::error::{AdminError, AdminResult};
use crate::seed::{validate_accounts, SeedAccount};
use crate::store::UserDirectory;
use kasir_shared::auth::password::{hash_password, verify_password};
use kasir_shared::models::user::{CreateUser, User, UserRole};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Command-line flag that confirms the reset
pub const CONFIRM_FLAG: &str = "--yes";

/// Whether the operator confirmed the reset
///
/// Either the `--yes` argument or the `KASIR_CONFIRM_RESET=yes` setting is
/// enough.
pub fn is_confirmed<I, S>(args: I, env_confirmed: bool) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    env_confirmed || args.into_iter().any(|arg| arg.as_ref() == CONFIRM_FLAG)
}

/// A seed account paired with its freshly computed hash
#[derive(Debug, Clone)]
pub struct PreparedAccount {
    pub account: SeedAccount,
    pub password_hash: String,
}

/// One account as it ended up in the store
#[derive(Debug, Clone)]
pub struct CreatedAccount {
    pub user: User,

    /// Plaintext the operator can log in with
    pub password: String,

    /// Whether the stored hash verified against `password`
    pub verified: bool,
}

/// Outcome of the reset
#[derive(Debug, Clone)]
pub struct RepairReport {
    pub deleted: u64,
    pub created: Vec<CreatedAccount>,
}

/// Validates, hashes and self-checks the accounts
///
/// Nothing is written; a failure here leaves the store untouched.
pub fn prepare_accounts(accounts: &[SeedAccount]) -> AdminResult<Vec<PreparedAccount>> {
    validate_accounts(accounts)?;

    accounts
        .iter()
        .map(|account| {
            let password_hash = hash_password(&account.password)?;
            debug!(email = %account.email, hash = %password_hash, "🔑 Hashed seed password");

            if !verify_password(&account.password, &password_hash)? {
                return Err(AdminError::SelfCheckFailed {
                    email: account.email.clone(),
                });
            }

            Ok(PreparedAccount {
                account: account.clone(),
                password_hash,
            })
        })
        .collect()
}

/// Replaces every user with `accounts`
///
/// # Errors
///
/// - `AdminError::NotConfirmed` when `confirmed` is false; nothing happens
/// - `AdminError::Validation` / `AdminError::Password` from preparation
/// - `AdminError::Store` if the transaction fails; prior rows survive
/// - `AdminError::SelfCheckFailed` if a stored hash does not verify
pub async fn repair_users<D>(
    directory: &D,
    accounts: &[SeedAccount],
    confirmed: bool,
) -> AdminResult<RepairReport>
where
    D: UserDirectory + ?Sized,
{
    if !confirmed {
        warn!("User reset not confirmed, nothing changed");
        return Err(AdminError::NotConfirmed);
    }

    info!("🔧 Fixing user passwords...");
    let prepared = prepare_accounts(accounts)?;

    let rows = prepared
        .iter()
        .map(|p| CreateUser {
            name: p.account.name.clone(),
            email: p.account.email.clone(),
            password_hash: p.password_hash.clone(),
            role: p.account.role,
        })
        .collect();

    let replaced = directory.replace_users(rows).await?;

    if replaced.created.len() != prepared.len() {
        let email = prepared
            .get(replaced.created.len())
            .map(|p| p.account.email.clone())
            .or_else(|| replaced.created.get(prepared.len()).map(|u| u.email.clone()))
            .unwrap_or_default();
        error!(
            expected = prepared.len(),
            created = replaced.created.len(),
            "Store returned a different set of users than was written"
        );
        return Err(AdminError::SelfCheckFailed { email });
    }

    let mut created = Vec::with_capacity(replaced.created.len());
    for (user, prepared) in replaced.created.into_iter().zip(&prepared) {
        let verified = verify_password(&prepared.account.password, &user.password_hash)?;
        if !verified {
            return Err(AdminError::SelfCheckFailed { email: user.email });
        }

        info!(id = user.id, email = %user.email, role = %user.role, "✅ Created user");
        created.push(CreatedAccount {
            user,
            password: prepared.account.password.clone(),
            verified,
        });
    }

    info!("🎉 User fix completed!");

    Ok(RepairReport {
        deleted: replaced.deleted,
        created,
    })
}

fn role_badge(role: UserRole) -> (&'static str, &'static str) {
    match role {
        UserRole::Admin => ("👨‍💼", "Admin"),
        UserRole::Cashier => ("👩‍💻", "Cashier"),
    }
}

impl fmt::Display for RepairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🗑️ Deleted {} existing users", self.deleted)?;

        for account in &self.created {
            writeln!(
                f,
                "✅ Created {} user: {{ id: {}, email: {} }}",
                account.user.role, account.user.id, account.user.email
            )?;
        }

        for account in &self.created {
            writeln!(
                f,
                "🧪 Password test {}: {}",
                account.user.email, account.verified
            )?;
        }

        writeln!(f, "🎉 User fix completed!")?;
        write!(f, "🔑 Login credentials:")?;
        for account in &self.created {
            let (icon, label) = role_badge(account.user.role);
            write!(
                f,
                "\n   {icon} {label}: {} / {}",
                account.user.email, account.password
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_accounts;

    #[test]
    fn test_is_confirmed() {
        assert!(!is_confirmed(Vec::<String>::new(), false));
        assert!(is_confirmed(["kasir-fix-users", "--yes"], false));
        assert!(is_confirmed(["kasir-fix-users"], true));
        assert!(!is_confirmed(["kasir-fix-users", "-y"], false));
    }

    #[test]
    fn test_prepare_accounts_hashes_and_self_checks() {
        let prepared = prepare_accounts(&default_accounts()).expect("Seed accounts should prepare");

        assert_eq!(prepared.len(), 2);
        for p in &prepared {
            assert!(p.password_hash.starts_with("$argon2id$"));
            assert_ne!(p.password_hash, p.account.password);
            assert!(verify_password(&p.account.password, &p.password_hash).unwrap());
        }
    }

    #[test]
    fn test_prepare_accounts_rejects_invalid_seed() {
        let accounts = vec![SeedAccount::new("", "admin@kasir.com", "admin123", UserRole::Admin)];
        assert!(matches!(
            prepare_accounts(&accounts),
            Err(AdminError::Validation(_))
        ));
    }
}
