//! One-line play descriptions and per-event narrative context

use crate::engine::state::{GameState, Period, Side};
use crate::engine::types::{
    NarrativeContext, PlayResult, PlayType, PlayerRef, ScoreKind, TurnoverKind,
};

/// Plays after a swing during which the swinging team has momentum
const MOMENTUM_WINDOW: u32 = 8;

/// Gain that counts as a swing play
const BIG_PLAY_YARDS: i32 = 25;

fn name(player: &Option<PlayerRef>, fallback: &str) -> String {
    player
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_else(|| fallback.to_string())
}

fn yardage(yards: i32) -> String {
    match yards {
        0 => "no gain".to_string(),
        1 => "1 yard".to_string(),
        -1 => "a loss of 1 yard".to_string(),
        n if n < 0 => format!("a loss of {} yards", -n),
        n => format!("{} yards", n),
    }
}

/// Template commentary for a finished play. `abbreviations` is (home, away).
pub fn describe(play: &PlayResult, abbreviations: (&str, &str)) -> String {
    let abbr = |side: Side| match side {
        Side::Home => abbreviations.0,
        Side::Away => abbreviations.1,
    };
    let p = &play.players;

    let mut line = match play.play_type {
        PlayType::Run => {
            let call = play
                .play_call
                .map(|c| c.to_string())
                .unwrap_or_else(|| "run".to_string());
            format!("{} {} for {}", name(&p.ball_carrier, "Runner"), call, yardage(play.yards))
        }
        PlayType::PassComplete => {
            let mut text = format!(
                "{} complete to {} for {}",
                name(&p.passer, "Quarterback"),
                name(&p.receiver, "receiver"),
                yardage(play.yards)
            );
            if let Some(concept) = play.concept {
                text.push_str(&format!(" on {}", concept));
            }
            text
        }
        PlayType::PassIncomplete => format!(
            "{} pass incomplete, intended for {}",
            name(&p.passer, "Quarterback"),
            name(&p.receiver, "receiver")
        ),
        PlayType::Interception => format!(
            "{} INTERCEPTED by {}",
            name(&p.passer, "Quarterback"),
            name(&p.defender, "the defense")
        ),
        PlayType::Sack => format!(
            "{} sacked by {} for {}",
            name(&p.passer, "Quarterback"),
            name(&p.defender, "the defense"),
            yardage(play.yards)
        ),
        PlayType::Scramble => format!(
            "{} scrambles for {}",
            name(&p.ball_carrier, "Quarterback"),
            yardage(play.yards)
        ),
        PlayType::Kneel => format!("{} takes a knee", name(&p.ball_carrier, "Quarterback")),
        PlayType::Spike => format!("{} spikes it to stop the clock", name(&p.passer, "Quarterback")),
        PlayType::Punt => {
            let kick = play.kick.unwrap_or_default();
            let punter = name(&p.kicker, "Punter");
            if kick.blocked {
                format!("{} punt BLOCKED", punter)
            } else if kick.touchback {
                format!("{} punts {} yards into the end zone, touchback", punter, kick.distance)
            } else {
                format!(
                    "{} punts {} yards, {} returns it {}",
                    punter,
                    kick.distance,
                    name(&p.returner, "returner"),
                    yardage(kick.return_yards)
                )
            }
        }
        PlayType::FieldGoal => {
            let kick = play.kick.unwrap_or_default();
            let verdict = if kick.blocked {
                "is BLOCKED"
            } else if kick.good == Some(true) {
                "is GOOD"
            } else {
                "is NO GOOD"
            };
            format!("{} {}-yard field goal {}", name(&p.kicker, "Kicker"), kick.distance, verdict)
        }
        PlayType::ExtraPoint => {
            let good = play.kick.and_then(|k| k.good).unwrap_or(false);
            format!(
                "{} extra point is {}",
                name(&p.kicker, "Kicker"),
                if good { "good" } else { "no good" }
            )
        }
        PlayType::TwoPointConversion => {
            if play.scoring.is_some() {
                format!("Two-point try by {} is GOOD", abbr(play.offense))
            } else {
                format!("Two-point try by {} fails", abbr(play.offense))
            }
        }
        PlayType::Kickoff | PlayType::FreeKick => {
            let kick = play.kick.unwrap_or_default();
            let what = if play.play_type == PlayType::FreeKick {
                "free kicks"
            } else {
                "kicks off"
            };
            if kick.touchback {
                format!("{} {}, touchback", name(&p.kicker, "Kicker"), what)
            } else {
                format!(
                    "{} {} {} yards, {} returns it {}",
                    name(&p.kicker, "Kicker"),
                    what,
                    kick.distance,
                    name(&p.returner, "returner"),
                    yardage(kick.return_yards)
                )
            }
        }
        PlayType::OnsideKick => {
            let recovered = play.kick.and_then(|k| k.recovered).unwrap_or(false);
            let by = if recovered {
                play.offense
            } else {
                play.offense.opponent()
            };
            format!("Onside kick, recovered by {}", abbr(by))
        }
        PlayType::Penalty => match play.penalty {
            Some(flag) => format!(
                "PENALTY: {} on {}, {} yards",
                flag.kind,
                abbr(flag.against),
                flag.yards
            ),
            None => "Flag on the play".to_string(),
        },
    };

    if play.play_type != PlayType::Penalty {
        if let Some(flag) = play.penalty {
            let ruling = if flag.offsetting {
                "offsetting, replay the down".to_string()
            } else if flag.declined {
                "declined".to_string()
            } else {
                format!("{} yards", flag.yards)
            };
            line.push_str(&format!(". Flag: {} on {}, {}", flag.kind, abbr(flag.against), ruling));
        }
    }
    if play.nullified {
        line.push_str(", play does not count");
    }

    if let Some(turnover) = play.counted_turnover() {
        match turnover.kind {
            TurnoverKind::Fumble => line.push_str(&format!(
                ". FUMBLE, recovered by {}",
                abbr(play.offense.opponent())
            )),
            TurnoverKind::Downs => line.push_str(". Turnover on downs"),
            TurnoverKind::Interception => {}
        }
    }

    if let Some(score) = play.scoring {
        match score.kind {
            ScoreKind::Touchdown(_) => line.push_str(&format!(". TOUCHDOWN {}!", abbr(score.team))),
            ScoreKind::Safety => line.push_str(&format!(". SAFETY, 2 points {}", abbr(score.team))),
            _ => {}
        }
    } else if play.first_down {
        line.push_str(". First down");
    }
    if play.out_of_bounds {
        line.push_str(", out of bounds");
    }
    if let Some(side) = play.timeout {
        line.push_str(&format!(". Timeout {}", abbr(side)));
    }
    if let Some(hurt) = &play.injury {
        line.push_str(&format!(". {} is shaken up on the play", hurt.name));
    }
    line
}

/// Tracks drives, momentum and lead changes across a game
#[derive(Debug, Default)]
pub(crate) struct Narrator {
    plays: u32,
    drive_number: u32,
    drive_team: Option<Side>,
    drive_plays: u32,
    drive_yards: i32,
    last_swing: Option<(Side, u32)>,
}

impl Narrator {
    fn swing(play: &PlayResult) -> Option<Side> {
        if let Some(score) = play.scoring {
            return Some(score.team);
        }
        if play.counted_turnover().is_some() {
            return Some(play.offense.opponent());
        }
        if play.play_type.is_scrimmage() && !play.nullified && play.yards >= BIG_PLAY_YARDS {
            return Some(play.offense);
        }
        None
    }

    pub(crate) fn observe(
        &mut self,
        play: &PlayResult,
        before: &GameState,
        after: &GameState,
        two_minute_drill: bool,
    ) -> NarrativeContext {
        self.plays += 1;

        let drive_play = !play.play_type.is_kickoff() && !play.play_type.is_conversion();
        if drive_play {
            if self.drive_team != Some(play.offense) {
                self.drive_number += 1;
                self.drive_team = Some(play.offense);
                self.drive_plays = 0;
                self.drive_yards = 0;
            }
            self.drive_plays += 1;
            if !play.nullified && play.play_type.is_scrimmage() {
                self.drive_yards += play.yards;
            }
        }

        if let Some(side) = Self::swing(play) {
            self.last_swing = Some((side, self.plays));
        }
        let momentum = self
            .last_swing
            .filter(|(_, at)| self.plays - at < MOMENTUM_WINDOW)
            .map(|(side, _)| side);

        let lead_change = matches!(
            (before.leader(), after.leader()),
            (Some(was), Some(now)) if was != now
        );

        let late = match after.period {
            Period::Quarter(4) => after.clock <= 300,
            Period::Overtime(_) => true,
            Period::Quarter(_) => false,
        };
        let deficit = -after.margin(after.possession);
        let comeback_opportunity = (late || two_minute_drill) && (1..=8).contains(&deficit);

        let context = NarrativeContext {
            drive_number: self.drive_number,
            drive_plays: self.drive_plays,
            drive_yards: self.drive_yards,
            red_zone: after.in_red_zone(),
            goal_to_go: after.goal_to_go(),
            two_minute_drill,
            comeback_opportunity,
            lead_change,
            score_margin: after.home_score as i32 - after.away_score as i32,
            momentum,
        };

        let possession_over = after.possession != play.offense
            || play.scoring.is_some()
            || play.play_type.is_kickoff();
        if drive_play && possession_over {
            self.drive_team = None;
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::penalties::{Penalty, PenaltyKind};
    use crate::engine::types::{KickResult, ScoringPlay, TouchdownKind, Turnover};
    use crate::playbook::PlayCall;

    fn player(name: &str, team: Side) -> Option<PlayerRef> {
        Some(PlayerRef {
            id: format!("{}-id", name),
            name: name.to_string(),
            team,
        })
    }

    fn state() -> GameState {
        let mut state = GameState::opening(900, 3, Side::Home);
        state.first_and_ten(Side::Home, 25);
        state
    }

    #[test]
    fn test_describe_run() {
        let mut play = PlayResult::new(PlayType::Run, Side::Home, &state());
        play.play_call = Some(PlayCall::InsideRun);
        play.players.ball_carrier = player("Dawson", Side::Home);
        play.yards = 4;
        assert_eq!(describe(&play, ("HCM", "RMO")), "Dawson inside run for 4 yards");
    }

    #[test]
    fn test_describe_sack_and_fumble() {
        let mut play = PlayResult::new(PlayType::Sack, Side::Home, &state());
        play.players.passer = player("Reyes", Side::Home);
        play.players.defender = player("Okafor", Side::Away);
        play.yards = -7;
        play.turnover = Some(Turnover {
            kind: TurnoverKind::Fumble,
            return_yards: 0,
        });
        let line = describe(&play, ("HCM", "RMO"));
        assert!(line.starts_with("Reyes sacked by Okafor for a loss of 7 yards"));
        assert!(line.contains("FUMBLE, recovered by RMO"));
    }

    #[test]
    fn test_describe_field_goal_and_touchdown() {
        let mut fg = PlayResult::new(PlayType::FieldGoal, Side::Away, &state());
        fg.players.kicker = player("Lund", Side::Away);
        fg.kick = Some(KickResult {
            distance: 44,
            good: Some(true),
            ..Default::default()
        });
        assert_eq!(describe(&fg, ("HCM", "RMO")), "Lund 44-yard field goal is GOOD");

        let mut td = PlayResult::new(PlayType::Interception, Side::Home, &state());
        td.scoring = Some(ScoringPlay::new(
            Side::Away,
            ScoreKind::Touchdown(TouchdownKind::InterceptionReturn),
        ));
        assert!(describe(&td, ("HCM", "RMO")).ends_with("TOUCHDOWN RMO!"));
    }

    #[test]
    fn test_describe_declined_flag() {
        let mut play = PlayResult::new(PlayType::PassIncomplete, Side::Home, &state());
        play.penalty = Some(Penalty {
            kind: PenaltyKind::OffensiveHolding,
            against: Side::Home,
            yards: 0,
            declined: true,
            offsetting: false,
        });
        assert!(describe(&play, ("HCM", "RMO")).contains("holding, offense on HCM, declined"));
    }

    #[test]
    fn test_drive_numbers_follow_possession() {
        let mut narrator = Narrator::default();
        let before = state();
        let mut after = before;
        after.ball_position = 30;

        let run = PlayResult::new(PlayType::Run, Side::Home, &before);
        assert_eq!(narrator.observe(&run, &before, &after, false).drive_number, 1);
        let context = narrator.observe(&run, &before, &after, false);
        assert_eq!(context.drive_number, 1);
        assert_eq!(context.drive_plays, 2);

        let punt = PlayResult::new(PlayType::Punt, Side::Home, &before);
        let mut flipped = after;
        flipped.first_and_ten(Side::Away, 20);
        narrator.observe(&punt, &before, &flipped, false);

        let answer = PlayResult::new(PlayType::Run, Side::Away, &flipped);
        let context = narrator.observe(&answer, &flipped, &flipped, false);
        assert_eq!(context.drive_number, 2);
        assert_eq!(context.drive_plays, 1);
    }

    #[test]
    fn test_lead_change_and_momentum() {
        let mut narrator = Narrator::default();
        let mut before = state();
        before.home_score = 3;
        let mut after = before;
        after.away_score = 6;

        let mut play = PlayResult::new(PlayType::PassComplete, Side::Away, &before);
        play.scoring = Some(ScoringPlay::new(
            Side::Away,
            ScoreKind::Touchdown(TouchdownKind::Passing),
        ));
        let context = narrator.observe(&play, &before, &after, false);
        assert!(context.lead_change);
        assert_eq!(context.momentum, Some(Side::Away));
        assert_eq!(context.score_margin, -3);

        let quiet = PlayResult::new(PlayType::Run, Side::Home, &after);
        for _ in 0..MOMENTUM_WINDOW {
            narrator.observe(&quiet, &after, &after, false);
        }
        assert_eq!(narrator.observe(&quiet, &after, &after, false).momentum, None);
    }
}
