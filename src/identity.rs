//! Identity anonymization for voters
//!
//! Voters are never stored under their submitted identity directly. Instead a
//! fixed-length fingerprint is derived from the `(student_id, name)` pair and
//! used as the uniqueness key for duplicate-vote prevention.
//!
//! The derivation is a plain unkeyed Blake3 hash, so it is deterministic and
//! collision-resistant but NOT resistant to offline guessing of identifier
//! pairs. Treat fingerprints as pseudonymization, not strong anonymization.

use serde::{Deserialize, Serialize};

/// Length of a hex-encoded fingerprint (32 Blake3 bytes)
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Separator between the two identity fields inside the hash input.
/// A control character so neither field can smuggle the separator in
/// (`("a:b", "c")` and `("a", "b:c")` must not collide).
const FIELD_SEPARATOR: u8 = 0x1f;

/// A voter fingerprint: 64 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Get the fingerprint as a hex string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log lines
    ///
    /// Deserialization accepts whatever string a snapshot contains, so this
    /// must not assume the full 64 characters are present.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the fingerprint for a `(student_id, name)` pair.
///
/// Pure and deterministic: identical inputs always produce identical output.
/// Callers must validate that both fields are present before calling; this
/// function itself never fails.
pub fn fingerprint(student_id: &str, name: &str) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(student_id.as_bytes());
    hasher.update(&[FIELD_SEPARATOR]);
    hasher.update(name.as_bytes());

    let hash: [u8; 32] = hasher.finalize().into();
    Fingerprint(hex::encode(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint("S1", "Alice");
        let b = fingerprint("S1", "Alice");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), FINGERPRINT_HEX_LEN);
    }

    #[test]
    fn test_fingerprint_input_sensitivity() {
        let base = fingerprint("S1", "Alice");
        assert_ne!(base, fingerprint("S1", "Bob"));
        assert_ne!(base, fingerprint("S2", "Alice"));
        // Swapped fields are distinct identities
        assert_ne!(fingerprint("Alice", "S1"), base);
    }

    #[test]
    fn test_fingerprint_field_boundary() {
        // The separator keeps shifted field boundaries apart
        assert_ne!(fingerprint("S1A", "lice"), fingerprint("S1", "Alice"));
        assert_ne!(fingerprint("", "S1Alice"), fingerprint("S1", "Alice"));
    }

    #[test]
    fn test_short_tolerates_truncated_snapshot_values() {
        // A hand-edited snapshot can carry arbitrary fingerprint strings;
        // logging them must not panic.
        let truncated: Fingerprint = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(truncated.short(), "abc");

        let empty: Fingerprint = serde_json::from_str("\"\"").unwrap();
        assert_eq!(empty.short(), "");

        let full = fingerprint("S1", "Alice");
        assert_eq!(full.short().len(), 8);
    }

    #[test]
    fn test_fingerprint_is_lowercase_hex() {
        let fp = fingerprint("S1", "Alice");
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp.as_str(), fp.as_str().to_lowercase());
        assert_eq!(fp.short().len(), 8);
    }
}
