//! Box score and MVP, derived purely from the event list

use crate::engine::state::Side;
use crate::engine::types::{
    GameEvent, PlayResult, PlayType, PlayerRef, ScoreKind, TouchdownKind, TurnoverKind,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multiplier on MVP scores for players on the winning side
const WINNER_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamStats {
    pub points: u16,
    /// Q1..Q4 then one column per overtime period
    pub score_by_period: Vec<u16>,
    pub total_yards: i32,
    pub passing_yards: i32,
    pub rushing_yards: i32,
    pub first_downs: u32,
    pub third_down_attempts: u32,
    pub third_down_conversions: u32,
    /// Interceptions thrown plus fumbles lost
    pub turnovers: u32,
    pub sacks_allowed: u32,
    pub penalties: u32,
    pub penalty_yards: u32,
    /// Seconds
    pub time_of_possession: u32,
    pub plays: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerLine {
    pub player_id: String,
    pub name: String,
    pub team: Side,
    pub pass_attempts: u32,
    pub completions: u32,
    pub passing_yards: i32,
    pub passing_touchdowns: u32,
    pub interceptions_thrown: u32,
    pub rush_attempts: u32,
    pub rushing_yards: i32,
    pub rushing_touchdowns: u32,
    pub targets: u32,
    pub receptions: u32,
    pub receiving_yards: i32,
    pub receiving_touchdowns: u32,
    pub fumbles_lost: u32,
    pub tackles: u32,
    pub sacks: u32,
    pub interceptions: u32,
    pub defensive_touchdowns: u32,
    pub field_goals_attempted: u32,
    pub field_goals_made: u32,
    pub extra_points_made: u32,
    pub return_yards: i32,
    pub return_touchdowns: u32,
}

impl PlayerLine {
    fn new(player_id: &str, name: &str, team: Side) -> Self {
        Self {
            player_id: player_id.to_string(),
            name: name.to_string(),
            team,
            pass_attempts: 0,
            completions: 0,
            passing_yards: 0,
            passing_touchdowns: 0,
            interceptions_thrown: 0,
            rush_attempts: 0,
            rushing_yards: 0,
            rushing_touchdowns: 0,
            targets: 0,
            receptions: 0,
            receiving_yards: 0,
            receiving_touchdowns: 0,
            fumbles_lost: 0,
            tackles: 0,
            sacks: 0,
            interceptions: 0,
            defensive_touchdowns: 0,
            field_goals_attempted: 0,
            field_goals_made: 0,
            extra_points_made: 0,
            return_yards: 0,
            return_touchdowns: 0,
        }
    }

    /// Fantasy-style impact score
    pub fn impact(&self) -> f64 {
        self.passing_yards as f64 * 0.04 + self.passing_touchdowns as f64 * 4.0
            - self.interceptions_thrown as f64 * 2.0
            + self.rushing_yards as f64 * 0.1
            + self.rushing_touchdowns as f64 * 6.0
            + self.receptions as f64 * 0.5
            + self.receiving_yards as f64 * 0.1
            + self.receiving_touchdowns as f64 * 6.0
            - self.fumbles_lost as f64 * 2.0
            + self.tackles as f64 * 0.5
            + self.sacks as f64 * 2.0
            + self.interceptions as f64 * 3.0
            + self.defensive_touchdowns as f64 * 6.0
            + self.field_goals_made as f64 * 3.0
            + self.extra_points_made as f64
            + self.return_yards as f64 * 0.04
            + self.return_touchdowns as f64 * 6.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoxScore {
    pub home: TeamStats,
    pub away: TeamStats,
    /// Sorted by team then player id. Ids are only unique within a team.
    pub players: Vec<PlayerLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mvp {
    pub player_id: String,
    pub name: String,
    pub team: Side,
    pub score: f64,
}

struct Tally {
    home: TeamStats,
    away: TeamStats,
    players: BTreeMap<(Side, String), PlayerLine>,
}

impl Tally {
    fn team(&mut self, side: Side) -> &mut TeamStats {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    fn player(&mut self, player: &Option<PlayerRef>) -> Option<&mut PlayerLine> {
        let player = player.as_ref()?;
        Some(
            self.players
                .entry((player.team, player.id.clone()))
                .or_insert_with(|| PlayerLine::new(&player.id, &player.name, player.team)),
        )
    }

    fn record(&mut self, play: &PlayResult) {
        let offense = play.offense;

        if let Some(flag) = play.penalty.filter(|f| f.enforced()) {
            let team = self.team(flag.against);
            team.penalties += 1;
            team.penalty_yards += flag.yards as u32;
        }

        if let Some(score) = play.scoring {
            let column = play.snap.period.index();
            let team = self.team(score.team);
            team.points += score.points as u16;
            if team.score_by_period.len() <= column {
                team.score_by_period.resize(column + 1, 0);
            }
            team.score_by_period[column] += score.points as u16;
        }

        if !play.play_type.is_kickoff() && !play.play_type.is_conversion() {
            self.team(offense).time_of_possession += play.clock_used;
        }

        if play.nullified {
            return;
        }

        let offense_td = play
            .scoring
            .filter(|s| s.team == offense && s.kind.is_touchdown())
            .is_some();
        let lost_fumble = matches!(play.counted_turnover(), Some(t) if t.kind == TurnoverKind::Fumble);

        if play.play_type.is_scrimmage() {
            let team = self.team(offense);
            team.plays += 1;
            if play.snap.down == 3 {
                team.third_down_attempts += 1;
                if play.first_down || offense_td {
                    team.third_down_conversions += 1;
                }
            }
        }
        if play.first_down {
            self.team(offense).first_downs += 1;
        }
        if let Some(turnover) = play.counted_turnover() {
            if turnover.kind != TurnoverKind::Downs {
                self.team(offense).turnovers += 1;
            }
        }

        match play.play_type {
            PlayType::Run | PlayType::Scramble => {
                let team = self.team(offense);
                team.rushing_yards += play.yards;
                team.total_yards += play.yards;
                if let Some(line) = self.player(&play.players.ball_carrier) {
                    line.rush_attempts += 1;
                    line.rushing_yards += play.yards;
                    if offense_td {
                        line.rushing_touchdowns += 1;
                    }
                    if lost_fumble {
                        line.fumbles_lost += 1;
                    }
                }
                if !offense_td {
                    if let Some(line) = self.player(&play.players.defender) {
                        line.tackles += 1;
                    }
                }
            }
            PlayType::PassComplete => {
                let team = self.team(offense);
                team.passing_yards += play.yards;
                team.total_yards += play.yards;
                if let Some(line) = self.player(&play.players.passer) {
                    line.pass_attempts += 1;
                    line.completions += 1;
                    line.passing_yards += play.yards;
                    if offense_td {
                        line.passing_touchdowns += 1;
                    }
                }
                if let Some(line) = self.player(&play.players.receiver) {
                    line.targets += 1;
                    line.receptions += 1;
                    line.receiving_yards += play.yards;
                    if offense_td {
                        line.receiving_touchdowns += 1;
                    }
                    if lost_fumble {
                        line.fumbles_lost += 1;
                    }
                }
                if !offense_td {
                    if let Some(line) = self.player(&play.players.defender) {
                        line.tackles += 1;
                    }
                }
            }
            PlayType::PassIncomplete | PlayType::Interception => {
                let picked = play.play_type == PlayType::Interception;
                if let Some(line) = self.player(&play.players.passer) {
                    line.pass_attempts += 1;
                    if picked {
                        line.interceptions_thrown += 1;
                    }
                }
                if let Some(line) = self.player(&play.players.receiver) {
                    line.targets += 1;
                }
                if picked {
                    let pick_six = play.scoring.is_some();
                    if let Some(line) = self.player(&play.players.defender) {
                        line.interceptions += 1;
                        if pick_six {
                            line.defensive_touchdowns += 1;
                        }
                    }
                }
            }
            PlayType::Sack => {
                let team = self.team(offense);
                team.sacks_allowed += 1;
                team.passing_yards += play.yards;
                team.total_yards += play.yards;
                if lost_fumble {
                    if let Some(line) = self.player(&play.players.passer) {
                        line.fumbles_lost += 1;
                    }
                }
                if let Some(line) = self.player(&play.players.defender) {
                    line.sacks += 1;
                }
            }
            PlayType::FieldGoal | PlayType::ExtraPoint => {
                let good = play.kick.and_then(|k| k.good).unwrap_or(false);
                let is_field_goal = play.play_type == PlayType::FieldGoal;
                if let Some(line) = self.player(&play.players.kicker) {
                    if is_field_goal {
                        line.field_goals_attempted += 1;
                        if good {
                            line.field_goals_made += 1;
                        }
                    } else if good {
                        line.extra_points_made += 1;
                    }
                }
            }
            PlayType::Kickoff | PlayType::FreeKick | PlayType::Punt => {
                let return_yards = play.kick.map(|k| k.return_yards).unwrap_or(0);
                let return_td = matches!(
                    play.scoring.map(|s| s.kind),
                    Some(ScoreKind::Touchdown(TouchdownKind::KickReturn | TouchdownKind::PuntReturn))
                );
                if let Some(line) = self.player(&play.players.returner) {
                    line.return_yards += return_yards;
                    if return_td {
                        line.return_touchdowns += 1;
                    }
                }
            }
            _ => {}
        }

        // Scoop-and-score and blocked kick returns credit the defender
        if let Some(score) = play.scoring {
            let defensive_return = score.team != offense
                && matches!(
                    score.kind,
                    ScoreKind::Touchdown(TouchdownKind::FumbleReturn | TouchdownKind::BlockedKickReturn)
                );
            if defensive_return {
                if let Some(line) = self.player(&play.players.defender) {
                    line.defensive_touchdowns += 1;
                }
            }
        }
    }
}

impl BoxScore {
    pub fn from_events(events: &[GameEvent]) -> Self {
        let mut tally = Tally {
            home: TeamStats {
                score_by_period: vec![0; 4],
                ..Default::default()
            },
            away: TeamStats {
                score_by_period: vec![0; 4],
                ..Default::default()
            },
            players: BTreeMap::new(),
        };
        for event in events {
            tally.record(&event.play);
        }

        let columns = tally.home.score_by_period.len().max(tally.away.score_by_period.len());
        tally.home.score_by_period.resize(columns, 0);
        tally.away.score_by_period.resize(columns, 0);

        Self {
            home: tally.home,
            away: tally.away,
            players: tally.players.into_values().collect(),
        }
    }

    pub fn team(&self, side: Side) -> &TeamStats {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn player(&self, team: Side, player_id: &str) -> Option<&PlayerLine> {
        self.players
            .binary_search_by(|line| {
                line.team
                    .cmp(&team)
                    .then_with(|| line.player_id.as_str().cmp(player_id))
            })
            .ok()
            .map(|idx| &self.players[idx])
    }
}

/// Highest impact score wins; the winning side gets a multiplier and ties
/// go to the lower player id.
pub fn select_mvp(box_score: &BoxScore, winner: Option<Side>) -> Option<Mvp> {
    let mut best: Option<Mvp> = None;
    for line in &box_score.players {
        let mut score = line.impact();
        if winner == Some(line.team) {
            score *= WINNER_MULTIPLIER;
        }
        let better = best
            .as_ref()
            .map(|b| score > b.score || (score == b.score && line.player_id < b.player_id))
            .unwrap_or(true);
        if better {
            best = Some(Mvp {
                player_id: line.player_id.clone(),
                name: line.name.clone(),
                team: line.team,
                score,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::penalties::{Penalty, PenaltyKind};
    use crate::engine::state::{GameState, Period};
    use crate::engine::types::{NarrativeContext, ScoringPlay, Turnover};
    use chrono::{TimeZone, Utc};

    fn who(id: &str, team: Side) -> Option<PlayerRef> {
        Some(PlayerRef {
            id: id.to_string(),
            name: id.to_uppercase(),
            team,
        })
    }

    fn event(number: u32, play: PlayResult) -> GameEvent {
        GameEvent {
            event_number: number,
            play,
            commentary: String::new(),
            game_state: GameState::opening(900, 3, Side::Home),
            narrative: NarrativeContext::default(),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    fn snap(down: u8) -> GameState {
        let mut state = GameState::opening(900, 3, Side::Home);
        state.first_and_ten(Side::Home, 30);
        state.down = down;
        state
    }

    fn completion(yards: i32) -> PlayResult {
        let mut play = PlayResult::new(PlayType::PassComplete, Side::Home, &snap(3));
        play.yards = yards;
        play.players.passer = who("h-qb", Side::Home);
        play.players.receiver = who("h-wr", Side::Home);
        play.players.defender = who("a-cb", Side::Away);
        play
    }

    #[test]
    fn test_passing_and_third_downs() {
        let mut converted = completion(12);
        converted.first_down = true;
        let short = completion(3);
        let box_score = BoxScore::from_events(&[event(1, converted), event(2, short)]);

        assert_eq!(box_score.home.passing_yards, 15);
        assert_eq!(box_score.home.third_down_attempts, 2);
        assert_eq!(box_score.home.third_down_conversions, 1);
        assert_eq!(box_score.home.first_downs, 1);

        let qb = box_score.player(Side::Home, "h-qb").unwrap();
        assert_eq!((qb.pass_attempts, qb.completions, qb.passing_yards), (2, 2, 15));
        assert_eq!(box_score.player(Side::Away, "a-cb").unwrap().tackles, 2);
    }

    #[test]
    fn test_score_by_period_includes_overtime() {
        let mut state = snap(1);
        state.period = Period::Overtime(1);
        let mut td = PlayResult::new(PlayType::Run, Side::Away, &state);
        td.yards = 8;
        td.players.ball_carrier = who("a-rb", Side::Away);
        td.scoring = Some(ScoringPlay::new(
            Side::Away,
            ScoreKind::Touchdown(TouchdownKind::Rushing),
        ));
        let box_score = BoxScore::from_events(&[event(1, td)]);
        assert_eq!(box_score.away.score_by_period, vec![0, 0, 0, 0, 6]);
        assert_eq!(box_score.home.score_by_period.len(), 5);
        assert_eq!(box_score.away.points, 6);
        assert_eq!(box_score.player(Side::Away, "a-rb").unwrap().rushing_touchdowns, 1);
    }

    #[test]
    fn test_nullified_play_counts_only_the_flag() {
        let mut play = completion(40);
        play.nullified = true;
        play.penalty = Some(Penalty {
            kind: PenaltyKind::OffensiveHolding,
            against: Side::Home,
            yards: 10,
            declined: false,
            offsetting: false,
        });
        let box_score = BoxScore::from_events(&[event(1, play)]);
        assert_eq!(box_score.home.passing_yards, 0);
        assert_eq!(box_score.home.penalties, 1);
        assert_eq!(box_score.home.penalty_yards, 10);
        assert!(box_score.players.is_empty());
    }

    #[test]
    fn test_interception_counts_turnover() {
        let mut play = PlayResult::new(PlayType::Interception, Side::Home, &snap(2));
        play.players.passer = who("h-qb", Side::Home);
        play.players.defender = who("a-s", Side::Away);
        play.turnover = Some(Turnover {
            kind: TurnoverKind::Interception,
            return_yards: 5,
        });
        let box_score = BoxScore::from_events(&[event(1, play)]);
        assert_eq!(box_score.home.turnovers, 1);
        assert_eq!(box_score.player(Side::Home, "h-qb").unwrap().interceptions_thrown, 1);
        assert_eq!(box_score.player(Side::Away, "a-s").unwrap().interceptions, 1);
    }

    #[test]
    fn test_mvp_prefers_winner_and_lower_id() {
        let mut box_score = BoxScore::default();
        let mut a = PlayerLine::new("a-1", "A", Side::Away);
        a.rushing_yards = 100;
        let mut b = PlayerLine::new("b-1", "B", Side::Home);
        b.rushing_yards = 100;
        box_score.players = vec![a, b];

        assert_eq!(select_mvp(&box_score, None).unwrap().player_id, "a-1");
        assert_eq!(select_mvp(&box_score, Some(Side::Home)).unwrap().player_id, "b-1");
        assert!(select_mvp(&BoxScore::default(), None).is_none());
    }

    #[test]
    fn test_shared_id_kept_apart_per_team() {
        let mut home_run = PlayResult::new(PlayType::Run, Side::Home, &snap(1));
        home_run.yards = 7;
        home_run.players.ball_carrier = who("rb1", Side::Home);
        let mut away_run = PlayResult::new(PlayType::Run, Side::Away, &snap(1));
        away_run.yards = 12;
        away_run.players.ball_carrier = who("rb1", Side::Away);

        let box_score = BoxScore::from_events(&[event(1, home_run), event(2, away_run)]);
        assert_eq!(box_score.players.len(), 2);
        assert_eq!(box_score.player(Side::Home, "rb1").unwrap().rushing_yards, 7);
        assert_eq!(box_score.player(Side::Away, "rb1").unwrap().rushing_yards, 12);
    }
}
