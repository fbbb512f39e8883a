//! Game engine: state machine, play resolution, commentary and stats

pub mod commentary;
pub(crate) mod overtime;
pub mod penalties;
pub(crate) mod resolve;
pub mod simulator;
pub mod state;
pub mod stats;
pub mod types;
pub mod weather;

pub use commentary::describe;
pub use penalties::{Penalty, PenaltyKind};
pub use simulator::{simulate_game, SeedSource, SimulationRequest};
pub use state::{GameState, Period, Side};
pub use stats::{select_mvp, BoxScore, Mvp, PlayerLine, TeamStats};
pub use types::{
    FinalScore, GameDisclosure, GameEvent, KickResult, NarrativeContext, Participants,
    PlayResult, PlayType, PlayerRef, ScoreKind, ScoringPlay, Snap, SimulationResult,
    TouchdownKind, Turnover, TurnoverKind,
};
pub use weather::{Weather, WeatherCondition};
