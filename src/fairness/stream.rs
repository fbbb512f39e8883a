//! Seeded random stream keyed by `(server_seed, client_seed, nonce)`.
//!
//! Every draw is `HMAC-SHA256(key = server_seed, msg = "client_seed:nonce")`
//! mapped onto `[0, 1)`. The only state a stream carries between draws is
//! its nonce, so the full sequence is reproducible by anyone holding the
//! revealed seeds.

use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Bytes of entropy in a freshly generated server seed (64 hex chars)
pub const SERVER_SEED_BYTES: usize = 32;
/// Bytes of entropy in a freshly generated client seed (32 hex chars)
pub const CLIENT_SEED_BYTES: usize = 16;

/// 53 bits fill an f64 mantissa exactly
const UNIT_BITS: u32 = 53;

/// One entry of a weighted table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedOption<T> {
    pub value: T,
    pub weight: u32,
}

impl<T> WeightedOption<T> {
    pub const fn new(value: T, weight: u32) -> Self {
        Self { value, weight }
    }
}

/// Select from `options` using an already drawn value in `[0, 1)`.
///
/// The draw is scaled by the actual weight sum and the cumulative
/// distribution is walked in table order; the first option whose cumulative
/// weight exceeds the scaled draw wins. Empty and zero-weight tables yield
/// `None`.
pub fn pick_weighted<T: Copy>(options: &[WeightedOption<T>], draw: f64) -> Option<T> {
    let total: u64 = options.iter().map(|o| o.weight as u64).sum();
    if total == 0 {
        return None;
    }

    let scaled = draw * total as f64;
    let mut cumulative = 0u64;
    for option in options {
        cumulative += option.weight as u64;
        if cumulative as f64 > scaled {
            return Some(option.value);
        }
    }

    // draw < 1.0 keeps us inside the loop; guard float edge cases anyway
    options.iter().rev().find(|o| o.weight > 0).map(|o| o.value)
}

/// Compute the draw for a single nonce without touching any stream.
///
/// A key the MAC refuses yields NaN, which no `[0, 1)` check accepts.
pub fn draw_at(server_seed: &str, client_seed: &str, nonce: u64) -> f64 {
    let Ok(mut mac) = HmacSha256::new_from_slice(server_seed.as_bytes()) else {
        return f64::NAN;
    };
    mac.update(format!("{}:{}", client_seed, nonce).as_bytes());
    let digest = mac.finalize().into_bytes();
    digest_to_unit(&digest)
}

/// Map the leading 8 digest bytes (big-endian) onto `[0, 1)`.
pub fn digest_to_unit(digest: &[u8]) -> f64 {
    let word = digest
        .iter()
        .take(8)
        .fold(0u64, |acc, byte| (acc << 8) | *byte as u64);
    (word >> (64 - UNIT_BITS)) as f64 / (1u64 << UNIT_BITS) as f64
}

/// Generate a fresh 32-byte server seed from the OS entropy source.
pub fn generate_server_seed() -> String {
    random_hex(SERVER_SEED_BYTES)
}

/// Generate a fresh 16-byte client seed from the OS entropy source.
pub fn generate_client_seed() -> String {
    random_hex(CLIENT_SEED_BYTES)
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// One-way commitment to a server seed: lowercase hex SHA-256.
pub fn hash_server_seed(server_seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(server_seed.as_bytes());
    hex::encode(hasher.finalize())
}

/// Non-empty and made only of ASCII hex digits.
pub fn is_hex_token(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Deterministic stream of draws for one game.
///
/// Deliberately not `Clone`: two copies of one stream would hand out the
/// same nonces twice.
pub struct RandomStream {
    server_seed: String,
    client_seed: String,
    nonce: u64,
}

impl RandomStream {
    /// Start a stream at nonce 0
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>) -> Self {
        Self::with_nonce(server_seed, client_seed, 0)
    }

    /// Resume a stream at an arbitrary nonce
    pub fn with_nonce(
        server_seed: impl Into<String>,
        client_seed: impl Into<String>,
        nonce: u64,
    ) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
        }
    }

    /// Nonce the next draw will use; equals the number of draws taken when
    /// the stream started at 0.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Next value in `[0, 1)`; advances the nonce by one.
    pub fn random(&mut self) -> f64 {
        let value = draw_at(&self.server_seed, &self.client_seed, self.nonce);
        self.nonce += 1;
        value
    }

    /// True with probability `p` (one draw).
    pub fn chance(&mut self, p: f64) -> bool {
        self.random() < p
    }

    /// Uniform in `[lo, hi)` (one draw).
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.random()
    }

    /// Uniform integer in `[lo, hi]` inclusive (one draw).
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            self.random();
            return lo;
        }
        let span = (hi - lo + 1) as f64;
        let offset = (self.random() * span).floor() as i32;
        (lo + offset).min(hi)
    }

    /// Weighted selection consuming exactly one draw.
    pub fn weighted_choice<T: Copy>(&mut self, options: &[WeightedOption<T>]) -> Option<T> {
        let draw = self.random();
        pick_weighted(options, draw)
    }
}

impl fmt::Debug for RandomStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the secret half of the pair.
        f.debug_struct("RandomStream")
            .field("server_seed_hash", &hash_server_seed(&self.server_seed))
            .field("client_seed", &self.client_seed)
            .field("nonce", &self.nonce)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stream() -> RandomStream {
        RandomStream::new("aa".repeat(32), "test-client")
    }

    #[test]
    fn test_random_advances_nonce() {
        let mut stream = sample_stream();
        assert_eq!(stream.nonce(), 0);
        stream.random();
        stream.random();
        assert_eq!(stream.nonce(), 2);
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mut stream = sample_stream();
        for _ in 0..1_000 {
            let v = stream.random();
            assert!((0.0..1.0).contains(&v), "value out of range: {}", v);
        }
    }

    #[test]
    fn test_stream_is_reproducible() {
        let mut a = sample_stream();
        let mut b = sample_stream();
        for _ in 0..100 {
            assert_eq!(a.random().to_bits(), b.random().to_bits());
        }
    }

    #[test]
    fn test_different_client_seed_diverges() {
        let mut a = sample_stream();
        let mut b = RandomStream::new("aa".repeat(32), "other-client");
        let same = (0..20).filter(|_| a.random() == b.random()).count();
        assert!(same < 20);
    }

    #[test]
    fn test_draw_at_matches_stream() {
        let mut stream = sample_stream();
        for n in 0..50 {
            let expected = draw_at(&"aa".repeat(32), "test-client", n);
            assert_eq!(stream.random().to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn test_draw_at_short_and_long_keys() {
        for key in ["", "0", &"ab".repeat(96)] {
            let value = draw_at(key, "test-client", 0);
            assert!((0.0..1.0).contains(&value), "key {:?}", key);
        }
    }

    #[test]
    fn test_digest_mapping_edges() {
        assert_eq!(digest_to_unit(&[0u8; 32]), 0.0);
        let max = digest_to_unit(&[0xff; 32]);
        assert!(max < 1.0);
        assert!(max > 0.999_999);
    }

    #[test]
    fn test_pick_weighted_boundaries() {
        let table = [
            WeightedOption::new('A', 40),
            WeightedOption::new('B', 30),
            WeightedOption::new('C', 30),
        ];
        assert_eq!(pick_weighted(&table, 0.0), Some('A'));
        assert_eq!(pick_weighted(&table, 0.39999), Some('A'));
        assert_eq!(pick_weighted(&table, 0.40001), Some('B'));
        assert_eq!(pick_weighted(&table, 0.69999), Some('B'));
        assert_eq!(pick_weighted(&table, 0.70001), Some('C'));
        assert_eq!(pick_weighted(&table, 0.99999), Some('C'));
    }

    #[test]
    fn test_pick_weighted_normalizes_by_actual_sum() {
        // Sum is 4, not 100
        let table = [WeightedOption::new(1, 1), WeightedOption::new(2, 3)];
        assert_eq!(pick_weighted(&table, 0.24), Some(1));
        assert_eq!(pick_weighted(&table, 0.26), Some(2));
    }

    #[test]
    fn test_pick_weighted_empty_and_zero() {
        let empty: [WeightedOption<u8>; 0] = [];
        assert_eq!(pick_weighted(&empty, 0.5), None);
        let zero = [WeightedOption::new(1u8, 0)];
        assert_eq!(pick_weighted(&zero, 0.5), None);
    }

    #[test]
    fn test_zero_weight_option_never_chosen() {
        let table = [
            WeightedOption::new('A', 0),
            WeightedOption::new('B', 10),
        ];
        assert_eq!(pick_weighted(&table, 0.0), Some('B'));
    }

    #[test]
    fn test_weighted_choice_consumes_one_draw() {
        let mut stream = sample_stream();
        let table = [WeightedOption::new(1, 1), WeightedOption::new(2, 1)];
        stream.weighted_choice(&table);
        assert_eq!(stream.nonce(), 1);
    }

    #[test]
    fn test_range_i32_inclusive() {
        let mut stream = sample_stream();
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..500 {
            let v = stream.range_i32(1, 3);
            assert!((1..=3).contains(&v));
            seen_lo |= v == 1;
            seen_hi |= v == 3;
        }
        assert!(seen_lo && seen_hi);
    }

    #[test]
    fn test_generated_seed_lengths() {
        let server = generate_server_seed();
        let client = generate_client_seed();
        assert_eq!(server.len(), 64);
        assert_eq!(client.len(), 32);
        assert!(is_hex_token(&server));
        assert!(is_hex_token(&client));
        assert_ne!(server, generate_server_seed());
    }

    #[test]
    fn test_hash_server_seed_known_value() {
        // SHA-256("abc")
        assert_eq!(
            hash_server_seed("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_debug_hides_server_seed() {
        let stream = sample_stream();
        let rendered = format!("{:?}", stream);
        assert!(!rendered.contains(&"aa".repeat(32)));
        assert!(rendered.contains("test-client"));
    }
}
