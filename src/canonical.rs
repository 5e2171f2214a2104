//! Canonical serialization for deterministic fingerprints.
//!
//! Rule tables (standardization steps, sugar thresholds, depiction palette)
//! are plain serde values. Their fingerprints are computed off a canonical
//! byte form so that the same table always reports the same fingerprint,
//! across runs and platforms.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable Vec order: vectors serialize in index order
//! - No HashMap in fingerprinted data: use BTreeMap for maps
//! - Stable float format: f64 serializes consistently

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("canonical serialization failed")
}

/// Compute the canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute the canonical hash and return it as a hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

/// Fingerprint a versioned rule table: `<version>:<hash>`.
///
/// Responses cite this string so a consumer can tell which rule revision
/// produced a result.
pub fn table_fingerprint<T: Serialize>(version: &str, table: &T) -> String {
    format!("{}:{}", version, canonical_hash_hex(table))
}
