//! Per-play outcome resolution.
//!
//! Each resolver draws from the game's stream, produces the frozen
//! [`PlayResult`] facts for one play and says where the ball goes next.
//! Downs, phases and the clock are left to the simulator.

use crate::config::TuningConfig;
use crate::engine::state::{GameState, Side};
use crate::engine::types::{
    KickResult, PlayResult, PlayType, PlayerRef, ScoreKind, ScoringPlay, TouchdownKind, Turnover,
    TurnoverKind,
};
use crate::engine::weather::Weather;
use crate::fairness::RandomStream;
use crate::playbook::{ConceptModifier, DefensiveCall, PlayCall, RouteConcept};
use crate::teams::{DepthChart, PlayStyle, PlayerProfile, Position, TeamProfile};

/// Where the ball goes after a play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Next {
    /// Offense keeps the ball at `spot`. `same_down` replays the down;
    /// `first_down` resets the chains regardless of the line to gain.
    Keep {
        spot: u8,
        same_down: bool,
        first_down: bool,
    },
    /// `team` takes over with a first down at `spot` in its own coordinates
    Possession { team: Side, spot: u8 },
    /// Points were scored; the scoring descriptor decides what follows
    Score,
    /// Try is over, `team` kicks off
    ConversionOver { team: Side },
}

/// One team as seen by the resolver
#[derive(Clone, Copy)]
pub(crate) struct Unit<'a> {
    pub side: Side,
    pub team: &'a TeamProfile,
    pub depth: &'a DepthChart,
    /// Home-field rating points
    pub bonus: f64,
}

impl Unit<'_> {
    fn offense_rating(&self) -> f64 {
        self.team.offense_rating as f64 + self.bonus
    }

    fn defense_rating(&self) -> f64 {
        self.team.defense_rating as f64 + self.bonus
    }

    fn special_teams(&self) -> f64 {
        self.team.special_teams_rating as f64 + self.bonus
    }

    fn player(&self, player: Option<&PlayerProfile>) -> Option<PlayerRef> {
        player.map(|p| PlayerRef::of(p, self.side))
    }
}

enum Landing {
    Field(u8),
    Touchdown,
    Safety,
}

/// Clamp a gain to the field and classify where it ended
fn landing(ball_position: u8, yards: i32) -> (i32, Landing) {
    let start = ball_position as i32;
    let end = start + yards;
    if end >= 100 {
        (100 - start, Landing::Touchdown)
    } else if end <= 0 {
        (-start, Landing::Safety)
    } else {
        (yards, Landing::Field(end as u8))
    }
}

/// Make probability for a field goal of `distance` yards
pub(crate) fn field_goal_probability(distance: i32, kicker_rating: u8, weather: &Weather) -> f64 {
    let d = distance as f64;
    let base = if distance <= 30 {
        0.97
    } else if distance <= 40 {
        0.97 - (d - 30.0) * 0.006
    } else if distance <= 50 {
        0.91 - (d - 40.0) * 0.014
    } else if distance <= 60 {
        0.77 - (d - 50.0) * 0.035
    } else {
        0.42 - (d - 60.0) * 0.05
    };
    (base + (kicker_rating as f64 - 75.0) / 300.0 + weather.kicking_adjust()).clamp(0.01, 0.99)
}

pub(crate) struct Resolver<'a> {
    pub stream: &'a mut RandomStream,
    pub tuning: &'a TuningConfig,
    pub weather: &'a Weather,
    /// Team in possession (the kicking team on kicks)
    pub offense: Unit<'a>,
    pub defense: Unit<'a>,
    pub state: &'a GameState,
    /// How much `clutch` matters right now; zero outside late-game pressure
    pub clutch_weight: f64,
}

impl<'a> Resolver<'a> {
    fn edge(&self) -> f64 {
        (self.offense.offense_rating() - self.defense.defense_rating()) / 100.0
    }

    fn clutch(&self, player: Option<&PlayerProfile>) -> f64 {
        player
            .map(|p| self.clutch_weight * (p.clutch as f64 - 60.0) / 40.0)
            .unwrap_or(0.0)
    }

    fn new_play(&self, play_type: PlayType) -> PlayResult {
        PlayResult::new(play_type, self.offense.side, self.state)
    }

    /// Ball carried from the line of scrimmage
    fn settle(&self, play: &mut PlayResult, yards: i32, touchdown: TouchdownKind) -> (Next, Option<u8>) {
        let (yards, landing) = landing(self.state.ball_position, yards);
        play.yards = yards;
        match landing {
            Landing::Field(spot) => (
                Next::Keep {
                    spot,
                    same_down: false,
                    first_down: false,
                },
                Some(spot),
            ),
            Landing::Touchdown => {
                play.scoring = Some(ScoringPlay::new(
                    self.offense.side,
                    ScoreKind::Touchdown(touchdown),
                ));
                (Next::Score, None)
            }
            Landing::Safety => {
                play.scoring = Some(ScoringPlay::new(self.defense.side, ScoreKind::Safety));
                (Next::Score, None)
            }
        }
    }

    /// Defense gains the ball at `at` (offense coordinates) and runs it back.
    /// One draw.
    fn defensive_return(
        &mut self,
        play: &mut PlayResult,
        at: i32,
        long_chance: f64,
        touchdown: TouchdownKind,
    ) -> (i32, Next) {
        let start = 100 - at;
        let r = self.stream.random();
        let return_yards = if start >= 100 || r < long_chance {
            (100 - start).max(0)
        } else {
            ((r - long_chance) / (1.0 - long_chance) * 22.0) as i32
        };

        let end = start + return_yards;
        if end >= 100 {
            play.scoring = Some(ScoringPlay::new(
                self.defense.side,
                ScoreKind::Touchdown(touchdown),
            ));
            return (return_yards, Next::Score);
        }
        (
            return_yards,
            Next::Possession {
                team: self.defense.side,
                spot: end.clamp(1, 99) as u8,
            },
        )
    }

    /// Fumble check after a carry ending at `spot`. Two draws when the ball
    /// comes out, one otherwise.
    fn fumble(&mut self, play: &mut PlayResult, spot: u8, rate: f64, return_chance: f64) -> Option<Next> {
        let p = rate * self.weather.fumble_factor();
        if !self.stream.chance(p) {
            return None;
        }
        if self.stream.chance(0.45) {
            // Offense fell on it
            return None;
        }
        let (return_yards, next) =
            self.defensive_return(play, spot as i32, return_chance, TouchdownKind::FumbleReturn);
        play.turnover = Some(Turnover {
            kind: TurnoverKind::Fumble,
            return_yards,
        });
        Some(next)
    }

    pub(crate) fn run(&mut self, call: PlayCall, defense: DefensiveCall) -> (PlayResult, Next) {
        let mut play = self.new_play(PlayType::Run);
        play.play_call = Some(call);
        play.defense = Some(defense);

        let offense_depth = self.offense.depth;
        let defense_depth = self.defense.depth;
        let carrier = if call == PlayCall::QbSneak {
            offense_depth.quarterback()
        } else {
            offense_depth.ball_carrier(self.stream)
        };
        let tackler = defense_depth.tackler(self.stream);
        play.players.ball_carrier = self.offense.player(carrier);
        play.players.defender = self.defense.player(tackler);

        let (loss_chance, breakaway_chance, mean) = match call {
            PlayCall::QbSneak => (0.06, 0.0, 1.8),
            PlayCall::OutsideRun => (0.16, 0.045, 3.9),
            _ => (0.11, 0.03, 3.5),
        };
        let carrier_rating = carrier.map(|p| p.rating).unwrap_or(50) as f64;
        let carrier_speed = carrier.map(|p| p.speed).unwrap_or(50) as f64;
        let line = (offense_depth.unit_rating(Position::OL, 5)
            - defense_depth.unit_rating(Position::DL, 4))
            / 100.0;
        let mean = mean
            + self.edge() * 6.0
            + line * 4.0
            + (carrier_rating - 70.0) / 20.0
            + defense.front.run_yards_adjust()
            - (self.weather.fumble_factor() - 1.0)
            + self.clutch(carrier) * 10.0;

        let branch = self.stream.random();
        let spread = self.stream.random();
        let yards = if branch < loss_chance {
            -1 - (spread * 4.0) as i32
        } else if branch >= 1.0 - breakaway_chance {
            10 + (spread * 28.0) as i32 + ((carrier_speed - 75.0) / 5.0).max(0.0) as i32
        } else {
            (mean - 3.0 + spread * 7.0).round() as i32
        };

        let (mut next, spot) = self.settle(&mut play, yards, TouchdownKind::Rushing);
        if let Some(spot) = spot {
            let strength = carrier.map(|p| p.strength).unwrap_or(60) as f64;
            let rate = self.tuning.fumble_rate * (1.0 + (60.0 - strength) / 200.0);
            if let Some(turnover) = self.fumble(&mut play, spot, rate, 0.05) {
                next = turnover;
            } else {
                let sideline = if call == PlayCall::OutsideRun { 0.30 } else { 0.06 };
                play.out_of_bounds = self.stream.chance(sideline);
            }
        }

        (play, next)
    }

    pub(crate) fn pass(
        &mut self,
        call: PlayCall,
        defense: DefensiveCall,
        concept: Option<(RouteConcept, ConceptModifier)>,
        two_minute_drill: bool,
    ) -> (PlayResult, Next) {
        let mut play = self.new_play(PlayType::PassIncomplete);
        play.play_call = Some(call);
        play.defense = Some(defense);

        let offense_depth = self.offense.depth;
        let defense_depth = self.defense.depth;
        let qb = offense_depth.quarterback();
        play.players.passer = self.offense.player(qb);

        let profile = call.pass_profile();
        let qb_rating = qb.map(|p| p.rating).unwrap_or(50) as f64;
        let qb_awareness = qb.map(|p| p.awareness).unwrap_or(50) as f64;
        let qb_speed = qb.map(|p| p.speed).unwrap_or(50) as f64;
        let protection = (offense_depth.unit_rating(Position::OL, 5)
            - defense_depth.unit_rating(Position::DL, 4))
            / 100.0;

        let blitz = if defense.blitz { 0.035 } else { 0.0 };
        let sack_chance = (0.065 + blitz + profile.sack_adjust
            - protection * 0.15
            - (qb_awareness - 70.0) / 1000.0)
            .clamp(0.01, 0.2);
        if self.stream.chance(sack_chance) {
            play.play_type = PlayType::Sack;
            let rusher = defense_depth.pass_rusher(self.stream);
            play.players.defender = self.defense.player(rusher);
            let loss = self.stream.range_i32(2, 10);
            let (mut next, spot) = self.settle(&mut play, -loss, TouchdownKind::Rushing);
            if let Some(spot) = spot {
                if let Some(turnover) = self.fumble(&mut play, spot, self.tuning.fumble_rate * 2.5, 0.08) {
                    next = turnover;
                }
            }
            return (play, next);
        }

        let scramble_chance = 0.03 * (qb_speed / 70.0) + if defense.blitz { 0.01 } else { 0.0 };
        if self.stream.chance(scramble_chance) {
            play.play_type = PlayType::Scramble;
            play.players.ball_carrier = self.offense.player(qb);
            let tackler = defense_depth.tackler(self.stream);
            play.players.defender = self.defense.player(tackler);
            let yards = self.stream.range_i32(-1, 12) + ((qb_speed - 70.0) / 10.0) as i32;
            let (next, spot) = self.settle(&mut play, yards, TouchdownKind::Rushing);
            if spot.is_some() {
                play.out_of_bounds = self.stream.chance(0.4);
            }
            return (play, next);
        }

        let target = offense_depth.pass_target(self.stream);
        let cover = defense_depth.cover_defender(self.stream);
        play.players.receiver = self.offense.player(target);
        play.players.defender = self.defense.player(cover);

        let modifier = concept.map(|(_, m)| m).unwrap_or(ConceptModifier::NONE);
        if let Some((name, m)) = concept {
            play.concept = Some(name);
            play.concept_modifier = Some(m);
        }

        let target_rating = target.map(|p| p.rating).unwrap_or(50) as f64;
        let target_speed = target.map(|p| p.speed).unwrap_or(50) as f64;
        let cover_rating = cover.map(|p| p.rating).unwrap_or(50) as f64;

        let completion = (self.tuning.base_completion
            + profile.completion
            + modifier.completion_bonus
            + (qb_rating - 70.0) / 250.0
            + (target_rating - 70.0) / 300.0
            - (cover_rating - 70.0) / 300.0
            + self.edge() * 0.3
            + defense.front.completion_adjust()
            - if defense.blitz { 0.03 } else { 0.0 }
            + self.weather.completion_adjust()
            + self.clutch(qb))
        .clamp(0.05, 0.95);
        let interception = (self.tuning.interception_rate
            * profile.interception_factor
            * (1.0 + (cover_rating - qb_rating) / 100.0))
            .clamp(0.002, 0.12);

        let air = (profile.air_yards * (0.6 + 0.8 * self.stream.random()) + modifier.yards_bonus * 0.5)
            .round()
            .max(0.0) as i32;
        play.air_yards = Some(air);

        let r = self.stream.random();
        if r < interception {
            play.play_type = PlayType::Interception;
            let at = self.state.ball_position as i32 + air.max(1);
            if at >= 100 {
                // Picked in the end zone and downed
                play.turnover = Some(Turnover {
                    kind: TurnoverKind::Interception,
                    return_yards: 0,
                });
                return (
                    play,
                    Next::Possession {
                        team: self.defense.side,
                        spot: 20,
                    },
                );
            }
            let (return_yards, next) =
                self.defensive_return(&mut play, at, 0.07, TouchdownKind::InterceptionReturn);
            play.turnover = Some(Turnover {
                kind: TurnoverKind::Interception,
                return_yards,
            });
            return (play, next);
        }

        if r >= interception + completion * (1.0 - interception) {
            return (
                play,
                Next::Keep {
                    spot: self.state.ball_position,
                    same_down: false,
                    first_down: false,
                },
            );
        }

        play.play_type = PlayType::PassComplete;
        let y = self.stream.random();
        let screen_bonus = if call == PlayCall::Screen { 4.0 } else { 0.0 };
        let yac = if y > 0.97 {
            10 + ((y - 0.97) * 900.0) as i32
        } else {
            (y * (4.0 + screen_bonus + (target_speed - 70.0) / 5.0).max(1.0)) as i32
        };
        let yards = air + yac + (modifier.yards_bonus * 0.5).round() as i32;

        let (mut next, spot) = self.settle(&mut play, yards, TouchdownKind::Passing);
        if let Some(spot) = spot {
            if let Some(turnover) = self.fumble(&mut play, spot, self.tuning.fumble_rate * 0.5, 0.05) {
                next = turnover;
            } else {
                let sideline = play.concept.map(|c| c.is_sideline()).unwrap_or(false);
                let mut chance = 0.12;
                if sideline {
                    chance += 0.25;
                    if two_minute_drill {
                        chance += 0.2;
                    }
                }
                play.out_of_bounds = self.stream.chance(chance);
            }
        }

        (play, next)
    }

    pub(crate) fn kneel(&mut self) -> (PlayResult, Next) {
        let mut play = self.new_play(PlayType::Kneel);
        let qb = self.offense.depth.quarterback();
        play.players.ball_carrier = self.offense.player(qb);
        let spot = self.state.ball_position.saturating_sub(1).max(1);
        play.yards = spot as i32 - self.state.ball_position as i32;
        (
            play,
            Next::Keep {
                spot,
                same_down: false,
                first_down: false,
            },
        )
    }

    pub(crate) fn spike(&mut self) -> (PlayResult, Next) {
        let mut play = self.new_play(PlayType::Spike);
        let qb = self.offense.depth.quarterback();
        play.players.passer = self.offense.player(qb);
        (
            play,
            Next::Keep {
                spot: self.state.ball_position,
                same_down: false,
                first_down: false,
            },
        )
    }

    fn special_teams_edge(&self) -> f64 {
        (self.offense.special_teams() - self.defense.special_teams()) / 100.0
    }

    /// Kick blocked at `at` (offense coordinates, may be behind the goal line)
    fn blocked_kick(&mut self, play: &mut PlayResult, at: i32, return_chance: f64) -> Next {
        if let Some(kick) = play.kick.as_mut() {
            kick.blocked = true;
        }
        let rusher = self.defense.depth.pass_rusher(self.stream);
        play.players.defender = self.defense.player(rusher);
        if at <= 0 {
            play.scoring = Some(ScoringPlay::new(
                self.defense.side,
                ScoreKind::Touchdown(TouchdownKind::BlockedKickReturn),
            ));
            return Next::Score;
        }
        let (return_yards, next) =
            self.defensive_return(play, at, return_chance, TouchdownKind::BlockedKickReturn);
        if let Some(kick) = play.kick.as_mut() {
            kick.return_yards = return_yards;
        }
        next
    }

    pub(crate) fn punt(&mut self) -> (PlayResult, Next) {
        let mut play = self.new_play(PlayType::Punt);
        play.kick = Some(KickResult::default());
        let punter = self.offense.depth.punter();
        play.players.kicker = self.offense.player(punter);
        let edge = self.special_teams_edge();
        let pos = self.state.ball_position as i32;

        if self.stream.chance((0.008 - edge * 0.01).clamp(0.002, 0.03)) {
            let next = self.blocked_kick(&mut play, pos - 7, 0.3);
            return (play, next);
        }

        let punter_rating = punter.map(|p| p.rating).unwrap_or(50) as f64;
        let distance = (self.stream.range_f64(38.0, 52.0)
            + (punter_rating - 70.0) / 4.0
            + self.weather.kick_distance_adjust())
        .round()
        .max(15.0) as i32;
        let landing = pos + distance;

        if landing >= 100 {
            play.kick = Some(KickResult {
                distance: 100 - pos,
                touchback: true,
                ..Default::default()
            });
            return (
                play,
                Next::Possession {
                    team: self.defense.side,
                    spot: 20,
                },
            );
        }

        let returner = self.defense.depth.returner();
        play.players.returner = self.defense.player(returner);
        let speed = returner.map(|p| p.speed).unwrap_or(70) as f64;
        let td_chance = (0.003 + (speed - 85.0) / 4000.0 - edge * 0.004).clamp(0.001, 0.02);
        let catch = 100 - landing;
        let r = self.stream.random();

        if r < td_chance {
            play.kick = Some(KickResult {
                distance,
                return_yards: 100 - catch,
                ..Default::default()
            });
            play.scoring = Some(ScoringPlay::new(
                self.defense.side,
                ScoreKind::Touchdown(TouchdownKind::PuntReturn),
            ));
            return (play, Next::Score);
        }

        let return_yards =
            (((r - td_chance) / (1.0 - td_chance)) * 16.0) as i32 - 2 - (edge * 5.0) as i32;
        let spot = (catch + return_yards).clamp(1, 99);
        play.kick = Some(KickResult {
            distance,
            return_yards: spot - catch,
            ..Default::default()
        });
        (
            play,
            Next::Possession {
                team: self.defense.side,
                spot: spot as u8,
            },
        )
    }

    pub(crate) fn field_goal(&mut self) -> (PlayResult, Next) {
        let mut play = self.new_play(PlayType::FieldGoal);
        let kicker = self.offense.depth.kicker();
        play.players.kicker = self.offense.player(kicker);
        let pos = self.state.ball_position as i32;
        let distance = (100 - pos) + 17;
        play.kick = Some(KickResult {
            distance,
            good: Some(false),
            ..Default::default()
        });

        let block_chance = if distance > 50 { 0.025 } else { 0.015 };
        if self.stream.chance(block_chance) {
            let next = self.blocked_kick(&mut play, pos - 8, 0.12);
            return (play, next);
        }

        let rating = kicker.map(|p| p.rating).unwrap_or(50);
        let make = (field_goal_probability(distance, rating, self.weather) + self.clutch(kicker))
            .clamp(0.01, 0.99);
        if self.stream.chance(make) {
            if let Some(kick) = play.kick.as_mut() {
                kick.good = Some(true);
            }
            play.scoring = Some(ScoringPlay::new(self.offense.side, ScoreKind::FieldGoal));
            return (play, Next::Score);
        }

        // Ball at the spot of the kick or the 20, whichever is better for the defense
        let spot = (107 - pos).clamp(20, 99) as u8;
        (
            play,
            Next::Possession {
                team: self.defense.side,
                spot,
            },
        )
    }

    pub(crate) fn extra_point(&mut self) -> (PlayResult, Next) {
        let mut play = self.new_play(PlayType::ExtraPoint);
        let kicker = self.offense.depth.kicker();
        play.players.kicker = self.offense.player(kicker);
        let rating = kicker.map(|p| p.rating).unwrap_or(50) as f64;
        let make = (0.94 + (rating - 75.0) / 400.0 + self.weather.kicking_adjust()).clamp(0.5, 0.995);
        let good = self.stream.chance(make);
        play.kick = Some(KickResult {
            distance: 33,
            good: Some(good),
            ..Default::default()
        });
        if good {
            play.scoring = Some(ScoringPlay::new(self.offense.side, ScoreKind::ExtraPoint));
        }
        (
            play,
            Next::ConversionOver {
                team: self.offense.side,
            },
        )
    }

    pub(crate) fn two_point(&mut self) -> (PlayResult, Next) {
        let mut play = self.new_play(PlayType::TwoPointConversion);
        let depth = self.offense.depth;
        let clutch_player = if self.offense.team.play_style == PlayStyle::RunHeavy {
            play.play_call = Some(PlayCall::InsideRun);
            let carrier = depth.ball_carrier(self.stream);
            play.players.ball_carrier = self.offense.player(carrier);
            carrier
        } else {
            play.play_call = Some(PlayCall::QuickPass);
            let qb = depth.quarterback();
            let target = depth.pass_target(self.stream);
            play.players.passer = self.offense.player(qb);
            play.players.receiver = self.offense.player(target);
            qb
        };

        let success = (0.47 + self.edge() * 0.5 + self.weather.completion_adjust() * 0.5
            + self.clutch(clutch_player))
        .clamp(0.2, 0.75);
        if self.stream.chance(success) {
            play.yards = 2;
            play.scoring = Some(ScoringPlay::new(
                self.offense.side,
                ScoreKind::TwoPointConversion,
            ));
        }
        (
            play,
            Next::ConversionOver {
                team: self.offense.side,
            },
        )
    }

    /// Kickoff from the 35, or a free kick from the 20 after a safety
    pub(crate) fn kickoff(&mut self, free_kick: bool, onside: bool) -> (PlayResult, Next) {
        let play_type = if onside {
            PlayType::OnsideKick
        } else if free_kick {
            PlayType::FreeKick
        } else {
            PlayType::Kickoff
        };
        let mut play = self.new_play(play_type);
        let kicker = if free_kick {
            self.offense.depth.punter()
        } else {
            self.offense.depth.kicker()
        };
        play.players.kicker = self.offense.player(kicker);
        let edge = self.special_teams_edge();
        let tee = self.state.ball_position as i32;

        if onside {
            let recovered = self.stream.chance((0.10 + edge * 0.2).clamp(0.03, 0.2));
            play.kick = Some(KickResult {
                distance: 11,
                recovered: Some(recovered),
                ..Default::default()
            });
            let next = if recovered {
                Next::Possession {
                    team: self.offense.side,
                    spot: (tee + 11) as u8,
                }
            } else {
                Next::Possession {
                    team: self.defense.side,
                    spot: (100 - tee - 11) as u8,
                }
            };
            return (play, next);
        }

        let rating = kicker.map(|p| p.rating).unwrap_or(50) as f64;
        let touchback_chance = if free_kick {
            0.05
        } else {
            (0.55 + (rating - 70.0) / 200.0 + self.weather.kick_distance_adjust() * 0.02)
                .clamp(0.2, 0.85)
        };
        if self.stream.chance(touchback_chance) {
            play.kick = Some(KickResult {
                distance: 100 - tee,
                touchback: true,
                ..Default::default()
            });
            let spot = if free_kick { 20 } else { 25 };
            return (
                play,
                Next::Possession {
                    team: self.defense.side,
                    spot,
                },
            );
        }

        let distance = if free_kick {
            self.stream.range_i32(40, 55)
        } else {
            self.stream.range_i32(58, 72)
        };
        // fielded in the end zone counts from the goal line
        let catch = (100 - (tee + distance)).max(0);
        let returner = self.defense.depth.returner();
        play.players.returner = self.defense.player(returner);
        let speed = returner.map(|p| p.speed).unwrap_or(70) as f64;
        let td_chance = (0.004 + (speed - 85.0) / 5000.0 - edge * 0.004).clamp(0.001, 0.015);

        let r = self.stream.random();
        if r < td_chance {
            play.kick = Some(KickResult {
                distance,
                return_yards: 100 - catch,
                ..Default::default()
            });
            play.scoring = Some(ScoringPlay::new(
                self.defense.side,
                ScoreKind::Touchdown(TouchdownKind::KickReturn),
            ));
            return (play, Next::Score);
        }

        let return_yards =
            15 + (((r - td_chance) / (1.0 - td_chance)) * 25.0) as i32 - (edge * 8.0) as i32;
        let spot = (catch + return_yards).clamp(1, 99);
        play.kick = Some(KickResult {
            distance,
            return_yards: spot - catch,
            ..Default::default()
        });
        (
            play,
            Next::Possession {
                team: self.defense.side,
                spot: spot as u8,
            },
        )
    }
}
