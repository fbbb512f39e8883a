//! Provable fairness: seeded stream, commit-reveal seeds, verification.

pub mod seeds;
pub mod stream;
pub mod verifier;

pub use seeds::{PublicSeeds, RevealedSeeds, SeedManager, SeedTriple, TerminalWitness};
pub use stream::{pick_weighted, RandomStream, WeightedOption};
pub use verifier::{
    compute_value_at_nonce, verify_game_replay, verify_server_seed, ReplayVerification,
};
