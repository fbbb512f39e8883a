//! Gridiron - Provably Fair Football Game Simulation
//!
//! Simulates complete football games play by play from a committed seed
//! pair. Every random outcome comes from one HMAC-SHA256 stream per game,
//! so anyone holding the revealed seeds can replay and verify the result.

pub mod config;
pub mod demo;
pub mod engine;
pub mod errors;
pub mod fairness;
pub mod playbook;
pub mod teams;

pub use config::{ConfigLoader, SimulationConfig};
pub use engine::{
    simulate_game, GameEvent, GameState, SeedSource, SimulationRequest, SimulationResult,
};
pub use errors::{GridironError, GridironResult};
pub use fairness::{
    compute_value_at_nonce, verify_game_replay, verify_server_seed, PublicSeeds, RandomStream,
    RevealedSeeds, SeedManager, SeedTriple,
};
pub use teams::{GameType, PlayerProfile, TeamProfile, TeamSheet};
