/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
///
/// The kasir tooling never handles sessions or tokens; the REST server owns
/// those. What it does own is the password hash format written into the
/// `users` table.

pub mod password;
