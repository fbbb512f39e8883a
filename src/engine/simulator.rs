//! Game state machine.
//!
//! One game runs start to finish as a single synchronous computation over
//! its own [`RandomStream`]. Every draw happens in a fixed order, so the
//! same seeds always produce the same event list.

use crate::config::SimulationConfig;
use crate::engine::commentary::{describe, Narrator};
use crate::engine::overtime::OvertimeTracker;
use crate::engine::penalties::{self, draw_flag, draw_offsetting};
use crate::engine::resolve::{field_goal_probability, Next, Resolver, Unit};
use crate::engine::state::{GameState, Period, Side};
use crate::engine::stats::{select_mvp, BoxScore};
use crate::engine::types::{
    FinalScore, GameEvent, PlayResult, PlayType, PlayerRef, ScoreKind, SimulationResult, Turnover,
    TurnoverKind,
};
use crate::engine::weather::Weather;
use crate::errors::GridironResult;
use crate::fairness::{RandomStream, SeedManager, SeedTriple, TerminalWitness};
use crate::playbook::{
    call_defense, call_offense, conversion_choice, decide_snap, select_concept, ConversionChoice,
    PlayContext, SnapDecision,
};
use crate::teams::{validate_matchup, DepthChart, GameType, TeamSheet};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Where the seeds for a game come from
#[derive(Debug, Clone)]
pub enum SeedSource {
    /// Generate and commit a new pair
    Fresh,
    /// Replay with a known pair
    Reuse {
        server_seed: String,
        client_seed: String,
    },
    /// A triple the caller already published
    Committed(SeedTriple),
}

/// Everything the engine needs to play one game
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub game_id: Uuid,
    pub home: TeamSheet,
    pub away: TeamSheet,
    pub game_type: GameType,
    pub seeds: SeedSource,
    /// Event timestamps are this instant plus elapsed game seconds
    pub kickoff_at: DateTime<Utc>,
}

impl SimulationRequest {
    pub fn new(home: TeamSheet, away: TeamSheet) -> Self {
        Self {
            game_id: Uuid::new_v4(),
            home,
            away,
            game_type: GameType::Regular,
            seeds: SeedSource::Fresh,
            kickoff_at: Utc::now(),
        }
    }

    pub fn with_game_type(mut self, game_type: GameType) -> Self {
        self.game_type = game_type;
        self
    }

    pub fn with_seeds(mut self, server_seed: impl Into<String>, client_seed: impl Into<String>) -> Self {
        self.seeds = SeedSource::Reuse {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
        };
        self
    }

    pub fn with_commitment(mut self, triple: SeedTriple) -> Self {
        self.seeds = SeedSource::Committed(triple);
        self
    }

    pub fn with_game_id(mut self, game_id: Uuid) -> Self {
        self.game_id = game_id;
        self
    }

    pub fn with_kickoff_at(mut self, kickoff_at: DateTime<Utc>) -> Self {
        self.kickoff_at = kickoff_at;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Kicking team is the side in possession
    Kickoff { free_kick: bool },
    /// Try after a touchdown by the side in possession
    Conversion,
    Scrimmage,
    Complete,
}

/// Both teams and their live depth charts
struct Teams<'a> {
    home: &'a TeamSheet,
    away: &'a TeamSheet,
    home_depth: DepthChart,
    away_depth: DepthChart,
    home_bonus: f64,
}

impl<'a> Teams<'a> {
    fn sheet(&self, side: Side) -> &'a TeamSheet {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    fn depth_mut(&mut self, side: Side) -> &mut DepthChart {
        match side {
            Side::Home => &mut self.home_depth,
            Side::Away => &mut self.away_depth,
        }
    }

    fn unit(&self, side: Side) -> Unit<'_> {
        let (sheet, depth, bonus) = match side {
            Side::Home => (self.home, &self.home_depth, self.home_bonus),
            Side::Away => (self.away, &self.away_depth, 0.0),
        };
        Unit {
            side,
            team: &sheet.team,
            depth,
            bonus,
        }
    }
}

struct Game<'a> {
    config: &'a SimulationConfig,
    game_type: GameType,
    teams: Teams<'a>,
    stream: RandomStream,
    weather: Weather,
    state: GameState,
    phase: Phase,
    opening_receiver: Side,
    clock_running: bool,
    overtime: OvertimeTracker,
    overtime_periods: u8,
    narrator: Narrator,
    events: Vec<GameEvent>,
    elapsed: u32,
    kickoff_at: DateTime<Utc>,
    truncated: bool,
}

impl<'a> Game<'a> {
    fn new(
        config: &'a SimulationConfig,
        request: &'a SimulationRequest,
        mut stream: RandomStream,
    ) -> Self {
        let engine = &config.engine;
        let weather = Weather::draw(&mut stream, request.game_type.is_neutral_site());
        let opening_receiver = if stream.chance(0.5) { Side::Home } else { Side::Away };
        let home_bonus = if request.game_type.is_neutral_site() {
            0.0
        } else {
            config.tuning.home_field_advantage
        };

        Self {
            config,
            game_type: request.game_type,
            teams: Teams {
                home: &request.home,
                away: &request.away,
                home_depth: DepthChart::new(&request.home.roster),
                away_depth: DepthChart::new(&request.away.roster),
                home_bonus,
            },
            stream,
            weather,
            state: GameState::opening(
                engine.quarter_seconds,
                engine.timeouts_per_half,
                opening_receiver.opponent(),
            ),
            phase: Phase::Kickoff { free_kick: false },
            opening_receiver,
            clock_running: false,
            overtime: OvertimeTracker::default(),
            overtime_periods: 0,
            narrator: Narrator::default(),
            events: Vec::new(),
            elapsed: 0,
            kickoff_at: request.kickoff_at,
            truncated: false,
        }
    }

    fn play(&mut self) {
        loop {
            if self.phase == Phase::Complete {
                break;
            }
            if self.events.len() as u32 >= self.config.engine.max_plays {
                self.truncated = true;
                tracing::warn!(
                    "Play cap of {} reached in {} with {}-{}, ending game",
                    self.config.engine.max_plays,
                    self.state.period,
                    self.state.home_score,
                    self.state.away_score
                );
                break;
            }
            if self.state.clock == 0 && self.phase != Phase::Conversion {
                self.end_period();
                continue;
            }
            self.next_play();
        }
    }

    fn end_period(&mut self) {
        let engine = &self.config.engine;
        self.clock_running = false;
        match self.state.period {
            Period::Quarter(q @ (1 | 3)) => {
                self.state.period = Period::Quarter(q + 1);
                self.state.clock = engine.quarter_seconds;
            }
            Period::Quarter(2) => {
                self.state.period = Period::Quarter(3);
                self.state.clock = engine.quarter_seconds;
                self.state.reset_timeouts(engine.timeouts_per_half);
                // Team that received the opening kick kicks off the second half
                self.state.kick_spot(self.opening_receiver, 35);
                self.phase = Phase::Kickoff { free_kick: false };
            }
            Period::Quarter(_) => {
                if self.state.leader().is_none() {
                    self.start_overtime(1);
                } else {
                    self.phase = Phase::Complete;
                }
            }
            Period::Overtime(n) => {
                if self.game_type.is_playoff() && self.state.leader().is_none() {
                    self.start_overtime(n + 1);
                } else {
                    self.phase = Phase::Complete;
                }
            }
        }
    }

    fn start_overtime(&mut self, number: u8) {
        let engine = &self.config.engine;
        self.state.period = Period::Overtime(number);
        self.state.clock = engine.overtime_seconds;
        self.state.reset_timeouts(engine.overtime_timeouts);
        self.overtime_periods = number;

        if number == 1 {
            let receiver = if self.stream.chance(0.5) { Side::Home } else { Side::Away };
            self.state.kick_spot(receiver.opponent(), 35);
            self.phase = Phase::Kickoff { free_kick: false };
            self.overtime = OvertimeTracker::default();
        }
        tracing::debug!("Overtime period {} begins", number);
    }

    fn two_minute_drill(&self) -> bool {
        self.state.period.ends_half() && self.state.clock <= self.config.engine.two_minute_seconds
    }

    fn is_late(&self) -> bool {
        match self.state.period {
            Period::Quarter(4) => self.state.clock <= 300,
            Period::Overtime(_) => true,
            Period::Quarter(_) => false,
        }
    }

    fn clutch_weight(&self) -> f64 {
        if self.is_late() {
            0.02 + 0.05 * self.game_type.pressure()
        } else {
            0.0
        }
    }

    fn context(&self) -> PlayContext {
        let offense = self.state.possession;
        let kicker_rating = self
            .teams
            .unit(offense)
            .depth
            .kicker()
            .map(|k| k.rating)
            .unwrap_or(50);
        let distance = 100 - self.state.ball_position as i32 + 17;
        PlayContext {
            down: self.state.down,
            yards_to_go: self.state.yards_to_go,
            ball_position: self.state.ball_position,
            clock: self.state.clock,
            period: self.state.period,
            score_margin: self.state.margin(offense),
            two_minute_drill: self.two_minute_drill(),
            offense_timeouts: self.state.timeouts(offense),
            defense_timeouts: self.state.timeouts(offense.opponent()),
            clock_running: self.clock_running,
            play_style: self.teams.sheet(offense).team.play_style,
            field_goal_probability: field_goal_probability(distance, kicker_rating, &self.weather),
        }
    }

    /// Timeout called while the clock runs between plays
    fn timeout_call(&self) -> Option<Side> {
        if !self.clock_running || !self.two_minute_drill() {
            return None;
        }
        let offense = self.state.possession;
        let defense = offense.opponent();
        let offense_needs = self.state.margin(offense) <= 0 || self.state.period == Period::Quarter(2);
        if offense_needs && self.state.timeouts(offense) > 0 {
            return Some(offense);
        }
        let defense_needs = self.state.period.is_late() && self.state.margin(defense) < 0;
        if defense_needs && self.state.timeouts(defense) > 0 {
            return Some(defense);
        }
        None
    }

    fn next_play(&mut self) {
        let before = self.state;
        let phase = self.phase;
        let two_minute_drill = self.two_minute_drill();

        let mut timeout = None;
        if phase == Phase::Scrimmage {
            timeout = self.timeout_call();
            if let Some(side) = timeout {
                self.state.use_timeout(side);
                self.clock_running = false;
            }
        }
        let snap_state = self.state;

        let (mut play, next) = match phase {
            Phase::Kickoff { free_kick } => self.kickoff(free_kick),
            Phase::Conversion => self.conversion(),
            Phase::Scrimmage => self.scrimmage(two_minute_drill),
            Phase::Complete => return,
        };
        play.timeout = timeout;

        let possession_ended = self.apply(&mut play, next, phase);

        if phase != Phase::Conversion {
            play.clock_used = self.run_clock(&play, &snap_state, two_minute_drill);
        }
        self.injury_check(&mut play);

        if self.state.period.is_overtime() && self.phase != Phase::Complete {
            if possession_ended {
                self.overtime.record_possession(play.offense);
            }
            if self
                .overtime
                .decides_game(play.scoring.as_ref(), possession_ended, &self.state)
            {
                self.phase = Phase::Complete;
            }
        }

        self.emit(play, &before, two_minute_drill);
    }

    fn resolver(&mut self, offense: Side) -> Resolver<'_> {
        let clutch_weight = self.clutch_weight();
        Resolver {
            stream: &mut self.stream,
            tuning: &self.config.tuning,
            weather: &self.weather,
            offense: self.teams.unit(offense),
            defense: self.teams.unit(offense.opponent()),
            state: &self.state,
            clutch_weight,
        }
    }

    fn kickoff(&mut self, free_kick: bool) -> (PlayResult, Next) {
        let kicking = self.state.possession;
        let margin = self.state.margin(kicking);
        let onside = !free_kick
            && self.state.period == Period::Quarter(4)
            && self.state.clock <= 180
            && (-8..=-1).contains(&margin);
        self.resolver(kicking).kickoff(free_kick, onside)
    }

    fn conversion(&mut self) -> (PlayResult, Next) {
        let team = self.state.possession;
        let choice = conversion_choice(self.state.margin(team), self.state.period, self.state.clock);
        let mut resolver = self.resolver(team);
        match choice {
            ConversionChoice::ExtraPoint => resolver.extra_point(),
            ConversionChoice::TwoPoint => resolver.two_point(),
        }
    }

    fn scrimmage(&mut self, two_minute_drill: bool) -> (PlayResult, Next) {
        let offense = self.state.possession;
        let ctx = self.context();

        match decide_snap(&ctx) {
            SnapDecision::Kneel => return self.resolver(offense).kneel(),
            SnapDecision::Spike => return self.resolver(offense).spike(),
            SnapDecision::Punt => return self.resolver(offense).punt(),
            SnapDecision::FieldGoal => return self.resolver(offense).field_goal(),
            SnapDecision::Play => {}
        }

        let call = call_offense(&ctx, &mut self.stream);
        let defense = call_defense(&ctx, &mut self.stream);
        let flag = draw_flag(&mut self.stream, self.config.tuning.penalty_rate, call.is_pass());

        if let Some(kind) = flag.filter(|k| k.is_pre_snap()) {
            let mut play = PlayResult::new(PlayType::Penalty, offense, &self.state);
            let (penalty, next) = penalties::pre_snap(kind, offense, &self.state);
            play.play_call = Some(call);
            play.defense = Some(defense);
            play.penalty = Some(penalty);
            return (play, next);
        }

        let concept = select_concept(call, defense.coverage, &mut self.stream);
        let (mut play, mut next) = if call.is_run() {
            self.resolver(offense).run(call, defense)
        } else {
            self.resolver(offense).pass(call, defense, concept, two_minute_drill)
        };

        if let Some(kind) = flag {
            let offsetting = draw_offsetting(&mut self.stream);
            next = penalties::adjudicate(kind, offsetting, &mut play, next, &self.state);
        }
        (play, next)
    }

    /// Move the ball, score points and pick the next phase. Returns whether
    /// the offense's possession ended on this play.
    fn apply(&mut self, play: &mut PlayResult, next: Next, phase: Phase) -> bool {
        let offense = play.offense;
        let from_scrimmage = phase == Phase::Scrimmage;

        if let Some(score) = play.scoring {
            self.state.add_points(score.team, score.points);
        }

        match next {
            Next::Keep {
                spot,
                same_down,
                first_down,
            } => {
                let line = self.state.line_to_gain();
                if first_down || spot >= line {
                    self.state.first_and_ten(offense, spot);
                    play.first_down = true;
                } else if same_down {
                    self.state.ball_position = spot;
                    self.state.yards_to_go = line - spot;
                } else if self.state.down >= 4 {
                    play.turnover = Some(Turnover {
                        kind: TurnoverKind::Downs,
                        return_yards: 0,
                    });
                    self.state.first_and_ten(offense.opponent(), 100 - spot);
                    return from_scrimmage;
                } else {
                    self.state.down += 1;
                    self.state.ball_position = spot;
                    self.state.yards_to_go = line - spot;
                }
                false
            }
            Next::Possession { team, spot } => {
                self.state.first_and_ten(team, spot);
                self.phase = Phase::Scrimmage;
                from_scrimmage && team != offense
            }
            Next::Score => {
                let Some(score) = play.scoring else {
                    return false;
                };
                match score.kind {
                    ScoreKind::Touchdown(_) => {
                        self.state.conversion_spot(score.team);
                        self.phase = Phase::Conversion;
                    }
                    ScoreKind::Safety => {
                        self.state.kick_spot(score.team.opponent(), 20);
                        self.phase = Phase::Kickoff { free_kick: true };
                    }
                    _ => {
                        self.state.kick_spot(score.team, 35);
                        self.phase = Phase::Kickoff { free_kick: false };
                    }
                }
                from_scrimmage
            }
            Next::ConversionOver { team } => {
                self.state.kick_spot(team, 35);
                self.phase = Phase::Kickoff { free_kick: false };
                false
            }
        }
    }

    /// Charge the play and the runoff before it to the clock. Returns the
    /// seconds used.
    fn run_clock(&mut self, play: &PlayResult, snap: &GameState, two_minute_drill: bool) -> u32 {
        let offense = snap.possession;
        let touchback = play.kick.map(|k| k.touchback).unwrap_or(false);

        let play_time = match play.play_type {
            PlayType::Penalty => 0,
            PlayType::Kneel => 2,
            PlayType::Spike => 1,
            _ if touchback && play.play_type.is_kickoff() => 0,
            PlayType::Punt | PlayType::FieldGoal | PlayType::Kickoff | PlayType::FreeKick
            | PlayType::OnsideKick => self.stream.range_i32(4, 9) as u32,
            _ => self.stream.range_i32(4, 8) as u32,
        };

        let runoff = if !self.clock_running {
            0
        } else if play.play_type == PlayType::Kneel || (self.is_late() && snap.margin(offense) > 0) {
            38
        } else if two_minute_drill {
            12
        } else {
            33
        };

        let used = (play_time + runoff).min(snap.clock);
        let clock_before = snap.clock;
        self.state.clock = clock_before - used;

        // Two-minute warning
        let warning = self.config.engine.two_minute_seconds;
        let warned = matches!(snap.period, Period::Quarter(2) | Period::Quarter(4))
            && clock_before > warning
            && self.state.clock < warning;
        if warned {
            self.state.clock = warning;
        }

        let possession_changed = self.state.possession != offense;
        let flagged = play.penalty.map(|p| p.enforced() || p.offsetting).unwrap_or(false);
        let stops = matches!(
            play.play_type,
            PlayType::PassIncomplete
                | PlayType::Spike
                | PlayType::Interception
                | PlayType::Punt
                | PlayType::FieldGoal
                | PlayType::Kickoff
                | PlayType::OnsideKick
                | PlayType::FreeKick
                | PlayType::Penalty
        ) || play.scoring.is_some()
            || possession_changed
            || flagged
            || play.nullified
            || (play.out_of_bounds && (two_minute_drill || self.is_late()));

        self.clock_running = !stops && !warned && self.phase == Phase::Scrimmage;
        clock_before - self.state.clock
    }

    /// One draw over everyone involved in the play; injury-prone players
    /// count double.
    fn injury_check(&mut self, play: &mut PlayResult) {
        if matches!(
            play.play_type,
            PlayType::Penalty | PlayType::Kneel | PlayType::Spike
        ) {
            return;
        }
        let involved: Vec<PlayerRef> = play.players.all().cloned().collect();
        if involved.is_empty() {
            return;
        }
        let rate = self.config.tuning.injury_rate;
        let weights: Vec<f64> = involved
            .iter()
            .map(|who| {
                let prone = self
                    .teams
                    .sheet(who.team)
                    .roster
                    .iter()
                    .any(|p| p.id == who.id && p.injury_prone);
                if prone {
                    rate * 2.0
                } else {
                    rate
                }
            })
            .collect();

        let roll = self.stream.random();
        let mut threshold = 0.0;
        for (who, weight) in involved.into_iter().zip(weights) {
            threshold += weight;
            if roll < threshold {
                if self.teams.depth_mut(who.team).injure(&who.id) {
                    tracing::debug!("{} ({}) leaves the game injured", who.name, who.team);
                    play.injury = Some(who);
                }
                return;
            }
        }
    }

    fn emit(&mut self, play: PlayResult, before: &GameState, two_minute_drill: bool) {
        let abbreviations = (
            self.teams.home.team.abbreviation.as_str(),
            self.teams.away.team.abbreviation.as_str(),
        );
        let commentary = describe(&play, abbreviations);
        let narrative = self
            .narrator
            .observe(&play, before, &self.state, two_minute_drill);
        self.elapsed += play.clock_used;

        let event_number = self.events.len() as u32 + 1;
        if self.config.logging.trace_plays {
            tracing::debug!(
                "#{} {} {} {}&{} at {}: {}",
                event_number,
                before.period,
                before.clock,
                before.down,
                before.yards_to_go,
                before.ball_position,
                commentary
            );
        }

        self.events.push(GameEvent {
            event_number,
            play,
            commentary,
            game_state: self.state,
            narrative,
            timestamp: self.kickoff_at + Duration::seconds(self.elapsed as i64),
        });
    }
}

/// Simulate one game.
///
/// Configuration, rosters and reused seeds are all checked before the
/// stream is opened; on failure nothing has been drawn and no partial
/// result exists.
pub fn simulate_game(
    request: SimulationRequest,
    config: &SimulationConfig,
) -> GridironResult<SimulationResult> {
    config.validate()?;
    validate_matchup(&request.home, &request.away, config.engine.min_roster_size)?;

    let triple = match &request.seeds {
        SeedSource::Fresh => SeedManager::generate_game_seeds(),
        SeedSource::Reuse {
            server_seed,
            client_seed,
        } => SeedManager::from_existing(server_seed, client_seed)?,
        SeedSource::Committed(triple) => triple.clone(),
    };

    tracing::info!(
        "Kickoff {} {} at {} ({}), commitment {}",
        request.game_id,
        request.away.team.abbreviation,
        request.home.team.abbreviation,
        request.game_type,
        triple.server_seed_hash()
    );

    let stream = triple.open_stream();
    let mut game = Game::new(config, &request, stream);
    game.play();

    let draws = game.stream.nonce() - triple.nonce();
    let seeds = SeedManager::reveal_seeds(&triple, &TerminalWitness::new(draws));
    let box_score = BoxScore::from_events(&game.events);
    let winner = game.state.leader();
    let mvp = select_mvp(&box_score, winner);
    let final_score = FinalScore {
        home: game.state.home_score,
        away: game.state.away_score,
    };

    tracing::info!(
        "Final {} {}-{} {} after {} plays ({} draws)",
        request.home.team.abbreviation,
        final_score.home,
        final_score.away,
        request.away.team.abbreviation,
        game.events.len(),
        draws
    );

    Ok(SimulationResult {
        game_id: request.game_id,
        home_team_id: request.home.team.id.clone(),
        away_team_id: request.away.team.id.clone(),
        game_type: request.game_type,
        total_plays: game.events.len() as u32,
        overtime_periods: game.overtime_periods,
        truncated: game.truncated,
        weather: game.weather,
        final_score,
        winner,
        box_score,
        mvp,
        events: game.events,
        seeds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use crate::errors::GridironError;
    use chrono::TimeZone;

    fn kickoff_at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn request(client: &str) -> SimulationRequest {
        let (home, away) = demo::demo_matchup();
        SimulationRequest::new(home, away)
            .with_seeds("aa".repeat(32), client)
            .with_kickoff_at(kickoff_at())
    }

    #[test]
    fn test_same_seeds_same_game() {
        let config = SimulationConfig::default();
        let first = simulate_game(request("test-client"), &config).unwrap();
        let second = simulate_game(request("test-client"), &config).unwrap();
        assert_eq!(first.final_score, second.final_score);
        assert_eq!(first.total_plays, second.total_plays);
        assert_eq!(first.events, second.events);
        assert_eq!(first.seeds, second.seeds);
    }

    #[test]
    fn test_events_are_numbered_contiguously() {
        let result = simulate_game(request("numbering"), &SimulationConfig::default()).unwrap();
        assert!(result.total_plays > 0 && result.total_plays < 500);
        for (idx, event) in result.events.iter().enumerate() {
            assert_eq!(event.event_number, idx as u32 + 1);
        }
        assert_eq!(result.events.len() as u32, result.total_plays);
    }

    #[test]
    fn test_box_score_matches_final_score() {
        for client in ["box-1", "box-2", "box-3"] {
            let result = simulate_game(request(client), &SimulationConfig::default()).unwrap();
            assert_eq!(result.box_score.home.points, result.final_score.home);
            assert_eq!(result.box_score.away.points, result.final_score.away);
            let last = result.events.last().unwrap();
            assert_eq!(last.game_state.home_score, result.final_score.home);
        }
    }

    #[test]
    fn test_revealed_nonce_counts_draws() {
        let result = simulate_game(request("draws"), &SimulationConfig::default()).unwrap();
        assert!(result.seeds.nonce > result.total_plays as u64);
        assert_eq!(result.seeds.server_seed, "aa".repeat(32));
        assert_eq!(
            result.seeds.server_seed_hash,
            crate::fairness::stream::hash_server_seed(&"aa".repeat(32))
        );
    }

    #[test]
    fn test_timestamps_follow_game_clock() {
        let result = simulate_game(request("clock"), &SimulationConfig::default()).unwrap();
        let mut previous = kickoff_at();
        for event in &result.events {
            assert!(event.timestamp >= previous);
            previous = event.timestamp;
        }
    }

    #[test]
    fn test_play_cap_truncates() {
        let mut config = SimulationConfig::default();
        config.engine.max_plays = 40;
        let result = simulate_game(request("cap"), &config).unwrap();
        assert!(result.truncated);
        assert_eq!(result.total_plays, 40);
    }

    #[test]
    fn test_short_roster_rejected_before_simulation() {
        let (mut home, away) = demo::demo_matchup();
        home.roster.truncate(10);
        let err = simulate_game(
            SimulationRequest::new(home, away).with_seeds("ab".repeat(32), "x"),
            &SimulationConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GridironError::Roster(_)));
    }

    #[test]
    fn test_malformed_server_seed_rejected() {
        let (home, away) = demo::demo_matchup();
        let err = simulate_game(
            SimulationRequest::new(home, away).with_seeds("not-hex", "x"),
            &SimulationConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GridironError::Seed(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimulationConfig::default();
        config.engine.max_plays = 900;
        let err = simulate_game(request("config"), &config).unwrap_err();
        assert!(matches!(err, GridironError::Configuration(_)));
    }

    #[test]
    fn test_regulation_ends_after_fourth_quarter() {
        for client in ["end-1", "end-2", "end-3", "end-4"] {
            let result = simulate_game(request(client), &SimulationConfig::default()).unwrap();
            if result.truncated {
                continue;
            }
            let last = &result.events.last().unwrap().game_state;
            if result.overtime_periods == 0 {
                assert_eq!(last.period, Period::Quarter(4));
                assert_ne!(result.final_score.home, result.final_score.away);
            } else {
                assert!(last.period.is_overtime());
            }
        }
    }

    #[test]
    fn test_playoff_game_never_ties() {
        for i in 0..6 {
            let result = simulate_game(
                request(&format!("playoff-{}", i)).with_game_type(GameType::Divisional),
                &SimulationConfig::quick(),
            )
            .unwrap();
            if !result.truncated {
                assert!(result.winner.is_some());
            }
        }
    }
}
