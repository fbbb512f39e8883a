//! Commit-reveal lifecycle for one game's seed triple.
//!
//! A [`SeedTriple`] is created before kickoff. Only its [`PublicSeeds`]
//! projection may be shown while the game is pending; the secret server seed
//! leaves the triple solely through [`SeedManager::reveal_seeds`], which
//! demands a [`TerminalWitness`] that only the engine can mint once a game
//! has completed.

use crate::errors::{SeedError, SeedKind};
use crate::fairness::stream::{
    generate_client_seed, generate_server_seed, hash_server_seed, is_hex_token, RandomStream,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Committed seeds for one game. Fields are private so the server seed can
/// never be read before reveal.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedTriple {
    server_seed: String,
    client_seed: String,
    server_seed_hash: String,
    nonce: u64,
}

impl SeedTriple {
    pub fn server_seed_hash(&self) -> &str {
        &self.server_seed_hash
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    /// Always 0: draws are counted by the stream, not the commitment
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The subset that is safe to publish before the game finishes
    pub fn public_seeds(&self) -> PublicSeeds {
        PublicSeeds {
            server_seed_hash: self.server_seed_hash.clone(),
            client_seed: self.client_seed.clone(),
            nonce: self.nonce,
        }
    }

    /// Exclusive stream for the game this triple was committed to
    pub(crate) fn open_stream(&self) -> RandomStream {
        RandomStream::with_nonce(self.server_seed.clone(), self.client_seed.clone(), self.nonce)
    }
}

impl fmt::Debug for SeedTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedTriple")
            .field("server_seed", &"<committed>")
            .field("client_seed", &self.client_seed)
            .field("server_seed_hash", &self.server_seed_hash)
            .field("nonce", &self.nonce)
            .finish()
    }
}

/// Pre-completion artifact: commitment hash, client seed, nonce 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSeeds {
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
}

/// Post-completion disclosure artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedSeeds {
    pub server_seed: String,
    pub client_seed: String,
    pub server_seed_hash: String,
    /// Number of draws the game consumed, starting from nonce 0
    pub nonce: u64,
}

/// Proof that a simulation reached its completed state.
///
/// Constructed only inside the crate by the engine.
#[derive(Debug)]
pub struct TerminalWitness {
    draws_consumed: u64,
}

impl TerminalWitness {
    pub(crate) fn new(draws_consumed: u64) -> Self {
        Self { draws_consumed }
    }

    pub fn draws_consumed(&self) -> u64 {
        self.draws_consumed
    }
}

/// Generates, publishes and reveals seed triples
pub struct SeedManager;

impl SeedManager {
    /// Fresh server and client seeds from the OS entropy source, committed
    /// with SHA-256, nonce 0.
    pub fn generate_game_seeds() -> SeedTriple {
        let server_seed = generate_server_seed();
        let client_seed = generate_client_seed();
        let server_seed_hash = hash_server_seed(&server_seed);
        tracing::debug!("Committed new seed triple {}", server_seed_hash);

        SeedTriple {
            server_seed,
            client_seed,
            server_seed_hash,
            nonce: 0,
        }
    }

    /// Commit to a caller-supplied pair, e.g. to replay a finished game.
    pub fn from_existing(server_seed: &str, client_seed: &str) -> Result<SeedTriple, SeedError> {
        if server_seed.is_empty() {
            return Err(SeedError::Empty(SeedKind::Server));
        }
        if !is_hex_token(server_seed) {
            return Err(SeedError::NotHex(SeedKind::Server));
        }
        if client_seed.is_empty() {
            return Err(SeedError::Empty(SeedKind::Client));
        }

        Ok(SeedTriple {
            server_seed: server_seed.to_string(),
            client_seed: client_seed.to_string(),
            server_seed_hash: hash_server_seed(server_seed),
            nonce: 0,
        })
    }

    pub fn get_public_seeds(triple: &SeedTriple) -> PublicSeeds {
        triple.public_seeds()
    }

    /// Full disclosure once the game is over. Returns a copy; the triple is
    /// left untouched.
    pub fn reveal_seeds(triple: &SeedTriple, witness: &TerminalWitness) -> RevealedSeeds {
        RevealedSeeds {
            server_seed: triple.server_seed.clone(),
            client_seed: triple.client_seed.clone(),
            server_seed_hash: triple.server_seed_hash.clone(),
            nonce: triple.nonce + witness.draws_consumed(),
        }
    }

    /// Does `server_seed` hash to `server_seed_hash`? Malformed input is a
    /// mismatch, never an error.
    pub fn verify_game(server_seed: &str, server_seed_hash: &str) -> bool {
        if !is_hex_token(server_seed) || server_seed_hash.len() != 64 || !is_hex_token(server_seed_hash) {
            return false;
        }
        hash_server_seed(server_seed) == server_seed_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_game_seeds() {
        let triple = SeedManager::generate_game_seeds();
        assert_eq!(triple.nonce(), 0);
        assert_eq!(triple.client_seed().len(), 32);
        assert_eq!(triple.server_seed_hash().len(), 64);
        assert_eq!(hash_server_seed(&triple.server_seed), triple.server_seed_hash);
    }

    #[test]
    fn test_public_seeds_hide_server_seed() {
        let triple = SeedManager::generate_game_seeds();
        let public = SeedManager::get_public_seeds(&triple);
        let json = serde_json::to_string(&public).unwrap();

        assert!(!json.contains(&triple.server_seed));
        assert_eq!(public.nonce, 0);
        assert_eq!(public.server_seed_hash, triple.server_seed_hash());
    }

    #[test]
    fn test_reveal_is_copy_and_counts_draws() {
        let triple = SeedManager::from_existing(&"aa".repeat(32), "test-client").unwrap();
        let before = triple.clone();
        let revealed = SeedManager::reveal_seeds(&triple, &TerminalWitness::new(42));

        assert_eq!(triple, before);
        assert_eq!(revealed.server_seed, "aa".repeat(32));
        assert_eq!(revealed.nonce, 42);
        assert!(SeedManager::verify_game(&revealed.server_seed, &revealed.server_seed_hash));
    }

    #[test]
    fn test_from_existing_rejects_malformed() {
        assert_eq!(
            SeedManager::from_existing("", "client"),
            Err(SeedError::Empty(SeedKind::Server))
        );
        assert_eq!(
            SeedManager::from_existing("not-hex!", "client"),
            Err(SeedError::NotHex(SeedKind::Server))
        );
        assert_eq!(
            SeedManager::from_existing("abcd", ""),
            Err(SeedError::Empty(SeedKind::Client))
        );
    }

    #[test]
    fn test_verify_game_fails_closed() {
        let seed = "aa".repeat(32);
        let hash = hash_server_seed(&seed);
        assert!(SeedManager::verify_game(&seed, &hash));
        assert!(!SeedManager::verify_game("", &hash));
        assert!(!SeedManager::verify_game("zz", &hash));
        assert!(!SeedManager::verify_game(&seed, ""));
        assert!(!SeedManager::verify_game(&seed, &hash[..63]));
        assert!(!SeedManager::verify_game(&seed, &hash.to_uppercase()));
    }

    #[test]
    fn test_debug_redacts_server_seed() {
        let triple = SeedManager::from_existing(&"bb".repeat(32), "c").unwrap();
        assert!(!format!("{:?}", triple).contains(&"bb".repeat(32)));
    }

    #[test]
    fn test_open_stream_starts_at_commitment_nonce() {
        let triple = SeedManager::from_existing(&"aa".repeat(32), "test-client").unwrap();
        let mut stream = triple.open_stream();
        assert_eq!(stream.nonce(), 0);
        let first = stream.random();
        let mut reference = RandomStream::new("aa".repeat(32), "test-client");
        assert_eq!(first.to_bits(), reference.random().to_bits());
    }
}
