//! Event fingerprint computation for repeat-signature detection.
//!
//! A fingerprint hashes the identifying fields that stay stable across
//! repeated occurrences of the same activity, excluding volatile fields
//! like timestamps or per-day counters.

use sha2::{Digest, Sha256};

use crate::models::event::SecurityEvent;

/// Compute an event fingerprint.
///
/// Inputs: event_type, action, source, device (absent device hashes as a
/// fixed placeholder so presence/absence changes the signature).
pub fn compute(event_type: &str, action: &str, source: &str, device: Option<&str>) -> String {
    hash(&format!(
        "EVENT:{event_type}:{action}:{source}:{}",
        device.unwrap_or("-")
    ))
}

/// Fingerprint for a full event.
pub fn for_event(event: &SecurityEvent) -> String {
    compute(
        &event.event_type,
        &event.action,
        &event.source,
        event.device.as_deref(),
    )
}

/// SHA-256 hash a string and return hex-encoded digest.
fn hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_fingerprint() {
        let fp1 = compute("malware_detection", "quarantine_endpoint", "edr", Some("ws-7"));
        let fp2 = compute("malware_detection", "quarantine_endpoint", "edr", Some("ws-7"));
        assert_eq!(fp1, fp2);
    }

    #[test]
    fn different_action_different_fingerprint() {
        let fp1 = compute("malware_detection", "quarantine_endpoint", "edr", Some("ws-7"));
        let fp2 = compute("malware_detection", "full_scan", "edr", Some("ws-7"));
        assert_ne!(fp1, fp2);
    }

    #[test]
    fn missing_device_differs_from_any_device() {
        let fp1 = compute("login_anomaly", "observe", "siem", None);
        let fp2 = compute("login_anomaly", "observe", "siem", Some("ws-7"));
        assert_ne!(fp1, fp2);
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        let fp = compute("login_anomaly", "observe", "siem", None);
        assert_eq!(fp.len(), 64); // SHA-256 hex = 64 chars
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
