//! Play results, events and the terminal simulation artifact

use crate::engine::penalties::Penalty;
use crate::engine::state::{GameState, Period, Side};
use crate::engine::stats::{BoxScore, Mvp};
use crate::engine::weather::Weather;
use crate::fairness::RevealedSeeds;
use crate::playbook::{ConceptModifier, DefensiveCall, PlayCall, RouteConcept};
use crate::teams::{GameType, PlayerProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Run,
    PassComplete,
    PassIncomplete,
    Interception,
    Sack,
    Scramble,
    Kneel,
    Spike,
    Punt,
    FieldGoal,
    ExtraPoint,
    TwoPointConversion,
    Kickoff,
    OnsideKick,
    FreeKick,
    /// Dead-ball foul before the snap; no play was run
    Penalty,
}

impl PlayType {
    /// Downs played from scrimmage with a live ball
    pub fn is_scrimmage(&self) -> bool {
        matches!(
            self,
            PlayType::Run
                | PlayType::PassComplete
                | PlayType::PassIncomplete
                | PlayType::Interception
                | PlayType::Sack
                | PlayType::Scramble
        )
    }

    pub fn is_pass_attempt(&self) -> bool {
        matches!(
            self,
            PlayType::PassComplete | PlayType::PassIncomplete | PlayType::Interception
        )
    }

    pub fn is_kickoff(&self) -> bool {
        matches!(self, PlayType::Kickoff | PlayType::OnsideKick | PlayType::FreeKick)
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self, PlayType::ExtraPoint | PlayType::TwoPointConversion)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TouchdownKind {
    Rushing,
    Passing,
    InterceptionReturn,
    FumbleReturn,
    KickReturn,
    PuntReturn,
    BlockedKickReturn,
}

impl TouchdownKind {
    /// Scored by the team that did not have the ball at the snap
    pub fn is_return(&self) -> bool {
        !matches!(self, TouchdownKind::Rushing | TouchdownKind::Passing)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Touchdown(TouchdownKind),
    FieldGoal,
    ExtraPoint,
    TwoPointConversion,
    Safety,
}

impl ScoreKind {
    pub fn points(&self) -> u8 {
        match self {
            ScoreKind::Touchdown(_) => 6,
            ScoreKind::FieldGoal => 3,
            ScoreKind::ExtraPoint => 1,
            ScoreKind::TwoPointConversion => 2,
            ScoreKind::Safety => 2,
        }
    }

    pub fn is_touchdown(&self) -> bool {
        matches!(self, ScoreKind::Touchdown(_))
    }
}

/// Points scored on a play and by whom
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringPlay {
    pub team: Side,
    pub kind: ScoreKind,
    pub points: u8,
}

impl ScoringPlay {
    pub fn new(team: Side, kind: ScoreKind) -> Self {
        Self {
            team,
            kind,
            points: kind.points(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TurnoverKind {
    Interception,
    Fumble,
    Downs,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turnover {
    pub kind: TurnoverKind,
    pub return_yards: i32,
}

/// Kicking detail for kickoffs, punts, field goals and extra points
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct KickResult {
    /// Air distance; for field goals the attempt distance
    pub distance: i32,
    pub return_yards: i32,
    pub touchback: bool,
    pub blocked: bool,
    /// Field goals and extra points only
    pub good: Option<bool>,
    /// Onside kicks only: did the kicking team get it back
    pub recovered: Option<bool>,
}

/// Player reference carried in events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerRef {
    pub id: String,
    pub name: String,
    pub team: Side,
}

impl PlayerRef {
    pub(crate) fn of(player: &PlayerProfile, team: Side) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            team,
        }
    }
}

/// Who did what on a play
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participants {
    pub passer: Option<PlayerRef>,
    pub ball_carrier: Option<PlayerRef>,
    pub receiver: Option<PlayerRef>,
    /// Tackler, sacker, interceptor or fumble recoverer
    pub defender: Option<PlayerRef>,
    pub kicker: Option<PlayerRef>,
    pub returner: Option<PlayerRef>,
}

impl Participants {
    pub fn all(&self) -> impl Iterator<Item = &PlayerRef> {
        [
            &self.passer,
            &self.ball_carrier,
            &self.receiver,
            &self.defender,
            &self.kicker,
            &self.returner,
        ]
        .into_iter()
        .flatten()
    }
}

/// Down, distance and spot at the snap
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snap {
    pub period: Period,
    pub clock: u32,
    pub down: u8,
    pub yards_to_go: u8,
    pub ball_position: u8,
}

impl Snap {
    pub(crate) fn of(state: &GameState) -> Self {
        Self {
            period: state.period,
            clock: state.clock,
            down: state.down,
            yards_to_go: state.yards_to_go,
            ball_position: state.ball_position,
        }
    }
}

/// Outcome of one play. Built by the engine and frozen once its event is
/// emitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayResult {
    pub play_type: PlayType,
    /// Team in possession at the snap (the kicking team on kicks)
    pub offense: Side,
    pub snap: Snap,
    /// Net yards for the offense from the line of scrimmage
    pub yards: i32,
    pub air_yards: Option<i32>,
    pub play_call: Option<PlayCall>,
    pub defense: Option<DefensiveCall>,
    pub concept: Option<RouteConcept>,
    pub concept_modifier: Option<ConceptModifier>,
    pub out_of_bounds: bool,
    pub turnover: Option<Turnover>,
    pub kick: Option<KickResult>,
    pub scoring: Option<ScoringPlay>,
    pub penalty: Option<Penalty>,
    /// Wiped out by an accepted or offsetting penalty
    pub nullified: bool,
    pub first_down: bool,
    pub clock_used: u32,
    pub timeout: Option<Side>,
    pub players: Participants,
    pub injury: Option<PlayerRef>,
}

impl PlayResult {
    pub(crate) fn new(play_type: PlayType, offense: Side, state: &GameState) -> Self {
        Self {
            play_type,
            offense,
            snap: Snap::of(state),
            yards: 0,
            air_yards: None,
            play_call: None,
            defense: None,
            concept: None,
            concept_modifier: None,
            out_of_bounds: false,
            turnover: None,
            kick: None,
            scoring: None,
            penalty: None,
            nullified: false,
            first_down: false,
            clock_used: 0,
            timeout: None,
            players: Participants::default(),
            injury: None,
        }
    }

    /// Turnover that actually stood (not wiped out by a flag)
    pub fn counted_turnover(&self) -> Option<&Turnover> {
        if self.nullified {
            return None;
        }
        self.turnover.as_ref()
    }
}

/// Situation tags attached to every event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NarrativeContext {
    pub drive_number: u32,
    pub drive_plays: u32,
    pub drive_yards: i32,
    pub red_zone: bool,
    pub goal_to_go: bool,
    pub two_minute_drill: bool,
    pub comeback_opportunity: bool,
    pub lead_change: bool,
    /// Home score minus away score after the play
    pub score_margin: i32,
    pub momentum: Option<Side>,
}

/// The unit of output: one per play, append-only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameEvent {
    /// 1-based, strictly sequential
    pub event_number: u32,
    pub play: PlayResult,
    pub commentary: String,
    /// State immediately after the play
    pub game_state: GameState,
    pub narrative: NarrativeContext,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinalScore {
    pub home: u16,
    pub away: u16,
}

/// Everything an independent verifier needs after the game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameDisclosure {
    pub game_id: Uuid,
    pub home_team_id: String,
    pub away_team_id: String,
    pub final_score: FinalScore,
    pub seeds: RevealedSeeds,
}

/// Terminal artifact of one simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    pub game_id: Uuid,
    pub home_team_id: String,
    pub away_team_id: String,
    pub game_type: GameType,
    pub events: Vec<GameEvent>,
    pub final_score: FinalScore,
    pub winner: Option<Side>,
    pub box_score: BoxScore,
    pub mvp: Option<Mvp>,
    pub weather: Weather,
    pub total_plays: u32,
    pub overtime_periods: u8,
    /// Cut off by the play cap before a natural finish
    pub truncated: bool,
    pub seeds: RevealedSeeds,
}

impl SimulationResult {
    pub fn disclosure(&self) -> GameDisclosure {
        GameDisclosure {
            game_id: self.game_id,
            home_team_id: self.home_team_id.clone(),
            away_team_id: self.away_team_id.clone(),
            final_score: self.final_score,
            seeds: self.seeds.clone(),
        }
    }
}
