//! Version tags for optimistic-concurrency slot writes.

use sha2::{Digest, Sha256};

use crate::api::DaySlots;

/// Compute the version tag for a day's slot list.
///
/// The tag is the SHA-256 of the list's canonical JSON. Compare-and-swap
/// writes present the tag they read; a mismatch means a concurrent writer
/// committed in between.
pub fn slot_list_version(slots: &DaySlots) -> String {
    let json = serde_json::to_string(slots).unwrap_or_default();
    calculate_checksum(&json)
}

/// SHA-256 checksum of string content, hex encoded.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}
