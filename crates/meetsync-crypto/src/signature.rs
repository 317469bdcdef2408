// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook secret verification and challenge-response hashing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compare a presented webhook secret against the configured one in constant
/// time. A short-circuiting equality check would leak the match length
/// through timing.
pub fn verify_shared_secret(presented: &str, configured: &str) -> bool {
    if configured.is_empty() {
        // Fail closed: an unset secret authorizes nothing.
        return false;
    }
    ring::constant_time::verify_slices_are_equal(presented.as_bytes(), configured.as_bytes())
        .is_ok()
}

/// Hex-encoded HMAC-SHA256 of `data` keyed by `secret`, as required by the
/// remote service's URL-validation challenge.
pub fn challenge_hash(secret: &str, data: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_secret_verifies() {
        assert!(verify_shared_secret("s3cr3t", "s3cr3t"));
    }

    #[test]
    fn mismatched_secret_rejects() {
        assert!(!verify_shared_secret("wrong", "s3cr3t"));
        assert!(!verify_shared_secret("s3cr3", "s3cr3t"));
        assert!(!verify_shared_secret("", "s3cr3t"));
    }

    #[test]
    fn empty_configured_secret_fails_closed() {
        assert!(!verify_shared_secret("", ""));
        assert!(!verify_shared_secret("anything", ""));
    }

    #[test]
    fn challenge_hash_matches_known_vector() {
        // HMAC-SHA256("s", "abc"), independently computed.
        assert_eq!(
            challenge_hash("s", "abc"),
            "47d920ed90784dc5eae635bfd0824f612d05f09f9a47f60390de873ad37e546b"
        );
    }

    #[test]
    fn challenge_hash_is_deterministic_per_key() {
        let h1 = challenge_hash("secret", "token");
        let h2 = challenge_hash("secret", "token");
        let h3 = challenge_hash("other", "token");
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(h1.len(), 64);
    }
}
