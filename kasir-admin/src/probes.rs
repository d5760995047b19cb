/// Expected password probes for the user check
///
/// A probe table maps a login email to the plaintext password that should
/// verify against that user's stored hash. It is fixture data: the default
/// table comes from the seed accounts, and `KASIR_PROBE_FILE` can replace it
/// with a JSON object such as:
///
/// ```json
/// { "admin@kasir.com": "admin123", "gudang@kasir.com": "gudang123" }
/// ```
///
/// Lookups ignore case.

use crate::error::{AdminError, AdminResult};
use crate::seed::SeedAccount;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeTable {
    probes: HashMap<String, String>,
}

impl ProbeTable {
    /// Builds a table from explicit `(email, probe)` pairs
    pub fn from_pairs<I, E, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, P)>,
        E: AsRef<str>,
        P: Into<String>,
    {
        let probes = pairs
            .into_iter()
            .map(|(email, probe)| (email.as_ref().to_lowercase(), probe.into()))
            .collect();
        Self { probes }
    }

    /// One probe per seed account
    pub fn from_seed(accounts: &[SeedAccount]) -> Self {
        Self::from_pairs(accounts.iter().map(|a| (&a.email, a.password.clone())))
    }

    /// Parses a JSON object of `email -> probe`
    pub fn from_json(json: &str) -> AdminResult<Self> {
        let pairs: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| AdminError::Config(format!("Invalid probe file: {e}")))?;
        Ok(Self::from_pairs(pairs))
    }

    /// Reads and parses a probe file
    pub fn load(path: &Path) -> AdminResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AdminError::Config(format!("Cannot read probe file {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Expected plaintext for `email`, if any
    pub fn probe_for(&self, email: &str) -> Option<&str> {
        self.probes.get(&email.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_accounts;

    #[test]
    fn test_from_seed() {
        let table = ProbeTable::from_seed(&default_accounts());

        assert_eq!(table.len(), 2);
        assert_eq!(table.probe_for("admin@kasir.com"), Some("admin123"));
        assert_eq!(table.probe_for("kasir@kasir.com"), Some("kasir123"));
        assert_eq!(table.probe_for("gudang@kasir.com"), None);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let table = ProbeTable::from_pairs([("Admin@Kasir.com", "admin123")]);
        assert_eq!(table.probe_for("ADMIN@kasir.COM"), Some("admin123"));
    }

    #[test]
    fn test_from_json() {
        let table =
            ProbeTable::from_json(r#"{"gudang@kasir.com": "gudang123"}"#).expect("valid JSON");
        assert_eq!(table.probe_for("gudang@kasir.com"), Some("gudang123"));
        assert!(table.probe_for("admin@kasir.com").is_none());
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(matches!(
            ProbeTable::from_json(r#"["admin123"]"#),
            Err(AdminError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ProbeTable::load(Path::new("/nonexistent/probes.json"));
        assert!(matches!(result, Err(AdminError::Config(msg)) if msg.contains("probes.json")));
    }
}
