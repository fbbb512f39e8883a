//! Third-party verification of revealed seeds.
//!
//! Kept independent of [`crate::fairness::stream`]: it re-derives every value
//! straight from the HMAC and SHA-256 primitives so that a bug in the game's
//! stream cannot hide itself from the check. The byte-to-float mapping must
//! stay identical to the stream's.

use crate::fairness::seeds::RevealedSeeds;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Outcome of [`verify_game_replay`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayVerification {
    pub verified: bool,
    pub total_events: u64,
}

impl ReplayVerification {
    fn rejected() -> Self {
        Self {
            verified: false,
            total_events: 0,
        }
    }
}

fn is_hex(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Check a revealed server seed against its published commitment.
pub fn verify_server_seed(server_seed: &str, server_seed_hash: &str) -> bool {
    if !is_hex(server_seed) || !is_hex(server_seed_hash) || server_seed_hash.len() != 64 {
        return false;
    }

    let computed = Sha256::digest(server_seed.as_bytes());
    hex::encode(computed) == server_seed_hash
}

/// Recompute the single draw at `nonce`.
///
/// Returns NaN if the MAC cannot be keyed, so range checks fail closed.
pub fn compute_value_at_nonce(server_seed: &str, client_seed: &str, nonce: u64) -> f64 {
    let Ok(mut mac) = <Hmac<Sha256> as Mac>::new_from_slice(server_seed.as_bytes()) else {
        return f64::NAN;
    };
    mac.update(client_seed.as_bytes());
    mac.update(b":");
    mac.update(nonce.to_string().as_bytes());
    let digest = mac.finalize().into_bytes();

    let mut leading = [0u8; 8];
    leading.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(leading) >> 11) as f64 / 9_007_199_254_740_992.0 // 2^53
}

/// Recompute `count` consecutive draws starting at `start_nonce`.
pub fn replay_values(server_seed: &str, client_seed: &str, start_nonce: u64, count: u64) -> Vec<f64> {
    (0..count)
        .map_while(|i| start_nonce.checked_add(i))
        .map(|nonce| compute_value_at_nonce(server_seed, client_seed, nonce))
        .collect()
}

/// Replay a whole game's stream.
///
/// `event_count` arrives as a JSON number, so negative, fractional and
/// non-finite counts are rejected here along with empty or non-hex seeds.
/// Any other count is replayed in full, however long; only a nonce range
/// that would run past `u64::MAX` is refused.
pub fn verify_game_replay(
    server_seed: &str,
    client_seed: &str,
    start_nonce: u64,
    event_count: f64,
) -> ReplayVerification {
    if server_seed.is_empty() || client_seed.is_empty() || !is_hex(server_seed) {
        return ReplayVerification::rejected();
    }
    if !event_count.is_finite() || event_count < 0.0 || event_count.fract() != 0.0 {
        return ReplayVerification::rejected();
    }
    // 2^64 is the first f64 that does not fit
    if event_count >= u64::MAX as f64 {
        return ReplayVerification::rejected();
    }

    let count = event_count as u64;
    let Some(end) = start_nonce.checked_add(count) else {
        return ReplayVerification::rejected();
    };

    let all_in_range = (start_nonce..end)
        .map(|nonce| compute_value_at_nonce(server_seed, client_seed, nonce))
        .all(|v| (0.0..1.0).contains(&v));

    ReplayVerification {
        verified: all_in_range,
        total_events: if all_in_range { count } else { 0 },
    }
}

/// Commitment check on a full disclosure artifact
pub fn verify_disclosure(revealed: &RevealedSeeds) -> bool {
    verify_server_seed(&revealed.server_seed, &revealed.server_seed_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fairness::stream::{hash_server_seed, RandomStream};

    #[test]
    fn test_verify_server_seed_round_trip() {
        let seed = "aa".repeat(32);
        assert!(verify_server_seed(&seed, &hash_server_seed(&seed)));
    }

    #[test]
    fn test_verify_server_seed_detects_tamper() {
        let seed = "aa".repeat(32);
        let mut hash: Vec<char> = hash_server_seed(&seed).chars().collect();
        hash[10] = if hash[10] == '0' { '1' } else { '0' };
        let tampered: String = hash.into_iter().collect();
        assert!(!verify_server_seed(&seed, &tampered));
    }

    #[test]
    fn test_verify_server_seed_rejects_non_hex() {
        let hash = hash_server_seed("zz");
        assert!(!verify_server_seed("zz", &hash));
        assert!(!verify_server_seed("", &hash));
    }

    #[test]
    fn test_value_at_nonce_matches_stream() {
        let seed = "aa".repeat(32);
        let mut stream = RandomStream::new(seed.clone(), "test-client");
        for n in 0..200 {
            let expected = stream.random();
            let recomputed = compute_value_at_nonce(&seed, "test-client", n);
            assert_eq!(expected.to_bits(), recomputed.to_bits(), "nonce {}", n);
        }
    }

    #[test]
    fn test_replay_rejections() {
        let seed = "aa".repeat(32);
        let rejected = ReplayVerification {
            verified: false,
            total_events: 0,
        };
        assert_eq!(verify_game_replay("", "c", 0, 10.0), rejected);
        assert_eq!(verify_game_replay(&seed, "", 0, 10.0), rejected);
        assert_eq!(verify_game_replay(&seed, "c", 0, -1.0), rejected);
        assert_eq!(verify_game_replay(&seed, "c", 0, 2.5), rejected);
        assert_eq!(verify_game_replay(&seed, "c", 0, f64::NAN), rejected);
        assert_eq!(verify_game_replay(&seed, "c", 0, f64::INFINITY), rejected);
    }

    #[test]
    fn test_replay_accepts_valid_counts() {
        let seed = "aa".repeat(32);
        for n in [0u64, 1, 37, 500] {
            let result = verify_game_replay(&seed, "test-client", 3, n as f64);
            assert!(result.verified);
            assert_eq!(result.total_events, n);
        }
    }

    #[test]
    fn test_replay_past_one_million_events() {
        let seed = "aa".repeat(32);
        let result = verify_game_replay(&seed, "long-game", 0, 1_000_001.0);
        assert!(result.verified);
        assert_eq!(result.total_events, 1_000_001);
    }

    #[test]
    fn test_replay_rejects_nonce_overflow() {
        let seed = "aa".repeat(32);
        assert!(!verify_game_replay(&seed, "c", u64::MAX - 1, 5.0).verified);
        assert!(verify_game_replay(&seed, "c", u64::MAX - 5, 5.0).verified);
        assert!(!verify_game_replay(&seed, "c", 0, 2f64.powi(64)).verified);
    }

    #[test]
    fn test_value_at_nonce_accepts_any_key_length() {
        for key in ["", "a", &"ff".repeat(100)] {
            let value = compute_value_at_nonce(key, "client", 9);
            assert!((0.0..1.0).contains(&value), "key {:?}", key);
        }
    }

    #[test]
    fn test_replay_values_consecutive() {
        let seed = "cd".repeat(32);
        let values = replay_values(&seed, "x", 5, 3);
        assert_eq!(values.len(), 3);
        assert_eq!(values[1].to_bits(), compute_value_at_nonce(&seed, "x", 6).to_bits());
    }

    #[test]
    fn test_replay_serializes_camel_case() {
        let json = serde_json::to_string(&ReplayVerification {
            verified: true,
            total_events: 4,
        })
        .unwrap();
        assert_eq!(json, r#"{"verified":true,"totalEvents":4}"#);
    }
}
