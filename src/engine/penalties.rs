//! Flags: which fouls occur, how far they walk off, and whether the
//! non-offending team takes them.

use crate::engine::resolve::Next;
use crate::engine::state::{GameState, Side};
use crate::engine::types::PlayResult;
use crate::fairness::{RandomStream, WeightedOption};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chance that a live-ball flag is answered by a foul on the other team
const OFFSETTING_RATE: f64 = 0.06;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    FalseStart,
    Offside,
    OffensiveHolding,
    DefensiveHolding,
    PassInterference,
    RoughingThePasser,
    FaceMask,
}

impl PenaltyKind {
    /// Nominal yardage; pass interference is a spot foul and uses the air distance
    pub fn base_yards(&self) -> u8 {
        match self {
            PenaltyKind::FalseStart | PenaltyKind::Offside | PenaltyKind::DefensiveHolding => 5,
            PenaltyKind::OffensiveHolding => 10,
            PenaltyKind::PassInterference => 0,
            PenaltyKind::RoughingThePasser | PenaltyKind::FaceMask => 15,
        }
    }

    pub fn on_offense(&self) -> bool {
        matches!(self, PenaltyKind::FalseStart | PenaltyKind::OffensiveHolding)
    }

    pub fn is_pre_snap(&self) -> bool {
        matches!(self, PenaltyKind::FalseStart | PenaltyKind::Offside)
    }

    pub fn automatic_first_down(&self) -> bool {
        matches!(
            self,
            PenaltyKind::DefensiveHolding
                | PenaltyKind::PassInterference
                | PenaltyKind::RoughingThePasser
                | PenaltyKind::FaceMask
        )
    }

    /// Personal fouls are added to the end of the play instead of replacing it
    pub fn enforced_from_end_of_play(&self) -> bool {
        matches!(self, PenaltyKind::RoughingThePasser | PenaltyKind::FaceMask)
    }
}

impl fmt::Display for PenaltyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PenaltyKind::FalseStart => "false start",
            PenaltyKind::Offside => "offside",
            PenaltyKind::OffensiveHolding => "holding, offense",
            PenaltyKind::DefensiveHolding => "holding, defense",
            PenaltyKind::PassInterference => "pass interference",
            PenaltyKind::RoughingThePasser => "roughing the passer",
            PenaltyKind::FaceMask => "face mask",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Penalty {
    pub kind: PenaltyKind,
    pub against: Side,
    /// Yards walked off after half-the-distance; 0 when declined or offsetting
    pub yards: u8,
    pub declined: bool,
    pub offsetting: bool,
}

impl Penalty {
    pub fn enforced(&self) -> bool {
        !self.declined && !self.offsetting
    }
}

const RUN_FLAGS: [WeightedOption<PenaltyKind>; 5] = [
    WeightedOption::new(PenaltyKind::FalseStart, 20),
    WeightedOption::new(PenaltyKind::Offside, 14),
    WeightedOption::new(PenaltyKind::OffensiveHolding, 24),
    WeightedOption::new(PenaltyKind::DefensiveHolding, 12),
    WeightedOption::new(PenaltyKind::FaceMask, 6),
];

const PASS_FLAGS: [WeightedOption<PenaltyKind>; 7] = [
    WeightedOption::new(PenaltyKind::FalseStart, 20),
    WeightedOption::new(PenaltyKind::Offside, 14),
    WeightedOption::new(PenaltyKind::OffensiveHolding, 24),
    WeightedOption::new(PenaltyKind::DefensiveHolding, 12),
    WeightedOption::new(PenaltyKind::PassInterference, 14),
    WeightedOption::new(PenaltyKind::RoughingThePasser, 5),
    WeightedOption::new(PenaltyKind::FaceMask, 6),
];

/// One draw for whether a flag flies, a second for which foul
pub(crate) fn draw_flag(stream: &mut RandomStream, rate: f64, is_pass: bool) -> Option<PenaltyKind> {
    if !stream.chance(rate) {
        return None;
    }
    let table: &[WeightedOption<PenaltyKind>] = if is_pass { &PASS_FLAGS } else { &RUN_FLAGS };
    stream.weighted_choice(table)
}

pub(crate) fn draw_offsetting(stream: &mut RandomStream) -> bool {
    stream.chance(OFFSETTING_RATE)
}

/// Yards actually walked off from `spot`, halving the distance to the goal
/// when the full penalty would cross it.
pub(crate) fn enforced_yards(kind: PenaltyKind, spot: u8, air_yards: Option<i32>) -> u8 {
    let spot = spot.min(99);
    match kind {
        PenaltyKind::PassInterference => {
            let air = air_yards.unwrap_or(10).max(1);
            air.min(99 - spot as i32).max(0) as u8
        }
        k if k.on_offense() => k.base_yards().min(spot / 2),
        k => k.base_yards().min((100 - spot) / 2),
    }
}

fn against(kind: PenaltyKind, offense: Side) -> Side {
    if kind.on_offense() {
        offense
    } else {
        offense.opponent()
    }
}

fn walk_off(kind: PenaltyKind, from: u8, yards: u8) -> u8 {
    if kind.on_offense() {
        from.saturating_sub(yards).max(1)
    } else {
        (from + yards).min(99)
    }
}

/// Dead-ball foul: always enforced, down replayed
pub(crate) fn pre_snap(kind: PenaltyKind, offense: Side, state: &GameState) -> (Penalty, Next) {
    let yards = enforced_yards(kind, state.ball_position, None);
    let penalty = Penalty {
        kind,
        against: against(kind, offense),
        yards,
        declined: false,
        offsetting: false,
    };
    let next = Next::Keep {
        spot: walk_off(kind, state.ball_position, yards),
        same_down: true,
        first_down: kind.automatic_first_down(),
    };
    (penalty, next)
}

fn nullify(play: &mut PlayResult) {
    play.nullified = true;
    play.scoring = None;
    play.turnover = None;
    play.first_down = false;
}

/// Rule on a live-ball foul. The non-offending team keeps whichever of the
/// play or the penalty serves it better; offsetting fouls replay the down.
pub(crate) fn adjudicate(
    kind: PenaltyKind,
    offsetting: bool,
    play: &mut PlayResult,
    next: Next,
    state: &GameState,
) -> Next {
    let offense = play.offense;
    let fouling = against(kind, offense);

    if offsetting {
        play.penalty = Some(Penalty {
            kind,
            against: fouling,
            yards: 0,
            declined: false,
            offsetting: true,
        });
        nullify(play);
        return Next::Keep {
            spot: state.ball_position,
            same_down: true,
            first_down: false,
        };
    }

    let offense_td = matches!(play.scoring, Some(s) if s.team == offense && s.kind.is_touchdown());
    let lost_ball =
        play.turnover.is_some() || matches!(play.scoring, Some(s) if s.team != offense);
    let gained_first = !lost_ball && play.yards >= state.yards_to_go as i32;
    let stands = kind.enforced_from_end_of_play() && !lost_ball && play.scoring.is_none();

    let base = if stands {
        (state.ball_position as i32 + play.yards).clamp(1, 99) as u8
    } else {
        state.ball_position
    };
    let yards = enforced_yards(kind, base, play.air_yards);

    let accepted = if kind.on_offense() {
        // Defense's choice
        if lost_ball {
            false
        } else if offense_td || play.yards > 0 {
            true
        } else if play.yards < 0 {
            false
        } else {
            state.down < 3
        }
    } else if offense_td {
        false
    } else if lost_ball || stands {
        true
    } else {
        !(gained_first && play.yards >= yards as i32)
    };

    play.penalty = Some(Penalty {
        kind,
        against: fouling,
        yards: if accepted { yards } else { 0 },
        declined: !accepted,
        offsetting: false,
    });

    if !accepted {
        return next;
    }
    if !stands {
        nullify(play);
    }

    Next::Keep {
        spot: walk_off(kind, base, yards),
        same_down: true,
        first_down: kind.automatic_first_down(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{PlayType, ScoreKind, ScoringPlay, TouchdownKind, Turnover, TurnoverKind};

    fn state_at(ball_position: u8, down: u8, yards_to_go: u8) -> GameState {
        let mut state = GameState::opening(900, 3, Side::Home);
        state.ball_position = ball_position;
        state.down = down;
        state.yards_to_go = yards_to_go;
        state
    }

    fn play(play_type: PlayType, yards: i32, state: &GameState) -> PlayResult {
        let mut play = PlayResult::new(play_type, Side::Home, state);
        play.yards = yards;
        play
    }

    fn gain_next(state: &GameState, yards: i32) -> Next {
        Next::Keep {
            spot: (state.ball_position as i32 + yards) as u8,
            same_down: false,
            first_down: false,
        }
    }

    #[test]
    fn test_half_the_distance() {
        assert_eq!(enforced_yards(PenaltyKind::OffensiveHolding, 8, None), 4);
        assert_eq!(enforced_yards(PenaltyKind::OffensiveHolding, 40, None), 10);
        assert_eq!(enforced_yards(PenaltyKind::FaceMask, 94, None), 3);
        assert_eq!(enforced_yards(PenaltyKind::Offside, 50, None), 5);
    }

    #[test]
    fn test_pass_interference_is_spot_foul() {
        assert_eq!(enforced_yards(PenaltyKind::PassInterference, 30, Some(25)), 25);
        // Never into the end zone
        assert_eq!(enforced_yards(PenaltyKind::PassInterference, 90, Some(25)), 9);
    }

    #[test]
    fn test_false_start_replays_down() {
        let state = state_at(30, 2, 6);
        let (penalty, next) = pre_snap(PenaltyKind::FalseStart, Side::Home, &state);
        assert_eq!(penalty.against, Side::Home);
        assert_eq!(penalty.yards, 5);
        assert_eq!(
            next,
            Next::Keep {
                spot: 25,
                same_down: true,
                first_down: false
            }
        );
    }

    #[test]
    fn test_offense_declines_defensive_holding_after_big_gain() {
        let state = state_at(30, 1, 10);
        let mut result = play(PlayType::Run, 22, &state);
        let next = adjudicate(PenaltyKind::DefensiveHolding, false, &mut result, gain_next(&state, 22), &state);

        assert!(result.penalty.unwrap().declined);
        assert!(!result.nullified);
        assert_eq!(next, gain_next(&state, 22));
    }

    #[test]
    fn test_offense_accepts_holding_after_short_gain() {
        let state = state_at(30, 3, 8);
        let mut result = play(PlayType::PassIncomplete, 0, &state);
        let next = adjudicate(PenaltyKind::DefensiveHolding, false, &mut result, gain_next(&state, 0), &state);

        assert!(result.penalty.unwrap().enforced());
        assert!(result.nullified);
        assert_eq!(
            next,
            Next::Keep {
                spot: 35,
                same_down: true,
                first_down: true
            }
        );
    }

    #[test]
    fn test_defense_declines_holding_on_turnover() {
        let state = state_at(40, 2, 7);
        let mut result = play(PlayType::Interception, 0, &state);
        result.turnover = Some(Turnover {
            kind: TurnoverKind::Interception,
            return_yards: 5,
        });
        let original = Next::Possession {
            team: Side::Away,
            spot: 40,
        };
        let next = adjudicate(PenaltyKind::OffensiveHolding, false, &mut result, original, &state);

        assert!(result.penalty.unwrap().declined);
        assert!(result.turnover.is_some());
        assert_eq!(next, original);
    }

    #[test]
    fn test_holding_wipes_out_touchdown() {
        let state = state_at(80, 1, 10);
        let mut result = play(PlayType::PassComplete, 20, &state);
        result.scoring = Some(ScoringPlay::new(Side::Home, ScoreKind::Touchdown(TouchdownKind::Passing)));
        adjudicate(PenaltyKind::OffensiveHolding, false, &mut result, Next::Score, &state);

        assert!(result.nullified);
        assert!(result.scoring.is_none());
    }

    #[test]
    fn test_defense_declines_on_third_down_incompletion() {
        let state = state_at(50, 3, 4);
        let mut result = play(PlayType::PassIncomplete, 0, &state);
        adjudicate(PenaltyKind::OffensiveHolding, false, &mut result, gain_next(&state, 0), &state);
        assert!(result.penalty.unwrap().declined);
    }

    #[test]
    fn test_roughing_added_to_end_of_play() {
        let state = state_at(30, 2, 10);
        let mut result = play(PlayType::PassComplete, 12, &state);
        let next = adjudicate(PenaltyKind::RoughingThePasser, false, &mut result, gain_next(&state, 12), &state);

        assert!(!result.nullified);
        assert_eq!(
            next,
            Next::Keep {
                spot: 57,
                same_down: true,
                first_down: true
            }
        );
    }

    #[test]
    fn test_offsetting_replays_down() {
        let state = state_at(45, 2, 3);
        let mut result = play(PlayType::Run, 9, &state);
        let next = adjudicate(PenaltyKind::FaceMask, true, &mut result, gain_next(&state, 9), &state);

        assert!(result.penalty.unwrap().offsetting);
        assert!(result.nullified);
        assert_eq!(
            next,
            Next::Keep {
                spot: 45,
                same_down: true,
                first_down: false
            }
        );
    }

    #[test]
    fn test_run_plays_never_draw_pass_fouls() {
        let mut stream = RandomStream::new("aa".repeat(32), "flags");
        for _ in 0..400 {
            if let Some(kind) = draw_flag(&mut stream, 1.0, false) {
                assert!(!matches!(
                    kind,
                    PenaltyKind::PassInterference | PenaltyKind::RoughingThePasser
                ));
            }
        }
    }
}
