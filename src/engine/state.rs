//! Game clock, score and field position.
//!
//! `ball_position` is measured from the possessing team's own goal line:
//! 0 is its own goal, 100 the opponent's.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Team designation within one game
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// Regulation quarter (1..=4) or numbered overtime period
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Quarter(u8),
    Overtime(u8),
}

impl Period {
    pub fn is_overtime(&self) -> bool {
        matches!(self, Period::Overtime(_))
    }

    /// Periods that end with a two-minute drill
    pub fn ends_half(&self) -> bool {
        matches!(self, Period::Quarter(2) | Period::Quarter(4) | Period::Overtime(_))
    }

    /// Zero-based column in a score-by-period line
    pub fn index(&self) -> usize {
        match self {
            Period::Quarter(q) => q.saturating_sub(1) as usize,
            Period::Overtime(n) => 3 + *n as usize,
        }
    }

    /// Final quarter or any overtime
    pub fn is_late(&self) -> bool {
        matches!(self, Period::Quarter(4) | Period::Overtime(_))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Quarter(q) => write!(f, "Q{}", q),
            Period::Overtime(1) => write!(f, "OT"),
            Period::Overtime(n) => write!(f, "OT{}", n),
        }
    }
}

/// Snapshot of the game after a play
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub period: Period,
    /// Seconds left in the period
    pub clock: u32,
    pub down: u8,
    pub yards_to_go: u8,
    pub ball_position: u8,
    pub possession: Side,
    pub home_score: u16,
    pub away_score: u16,
    pub home_timeouts: u8,
    pub away_timeouts: u8,
}

impl GameState {
    /// Kickoff setup for the first quarter
    pub(crate) fn opening(quarter_seconds: u32, timeouts: u8, kicking: Side) -> Self {
        Self {
            period: Period::Quarter(1),
            clock: quarter_seconds,
            down: 1,
            yards_to_go: 10,
            ball_position: 35,
            possession: kicking,
            home_score: 0,
            away_score: 0,
            home_timeouts: timeouts,
            away_timeouts: timeouts,
        }
    }

    pub fn score(&self, side: Side) -> u16 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    pub fn timeouts(&self, side: Side) -> u8 {
        match side {
            Side::Home => self.home_timeouts,
            Side::Away => self.away_timeouts,
        }
    }

    /// Points `side` is ahead by (negative when behind)
    pub fn margin(&self, side: Side) -> i32 {
        self.score(side) as i32 - self.score(side.opponent()) as i32
    }

    pub fn leader(&self) -> Option<Side> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn yards_to_goal(&self) -> u8 {
        100u8.saturating_sub(self.ball_position)
    }

    pub fn in_red_zone(&self) -> bool {
        self.ball_position >= 80
    }

    pub fn goal_to_go(&self) -> bool {
        self.ball_position as u16 + self.yards_to_go as u16 >= 100
    }

    /// Absolute spot the offense must reach for a first down
    pub(crate) fn line_to_gain(&self) -> u8 {
        (self.ball_position as u16 + self.yards_to_go as u16).min(100) as u8
    }

    pub(crate) fn add_points(&mut self, side: Side, points: u8) {
        match side {
            Side::Home => self.home_score += points as u16,
            Side::Away => self.away_score += points as u16,
        }
    }

    /// Charge a timeout to `side`; false when none are left
    pub(crate) fn use_timeout(&mut self, side: Side) -> bool {
        let slot = match side {
            Side::Home => &mut self.home_timeouts,
            Side::Away => &mut self.away_timeouts,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub(crate) fn reset_timeouts(&mut self, timeouts: u8) {
        self.home_timeouts = timeouts;
        self.away_timeouts = timeouts;
    }

    /// Give `side` a first down at `spot` in its own coordinates
    pub(crate) fn first_and_ten(&mut self, side: Side, spot: u8) {
        let spot = spot.clamp(1, 99);
        self.possession = side;
        self.ball_position = spot;
        self.down = 1;
        self.yards_to_go = 10.min(100 - spot);
    }

    /// Untimed try from the two after a touchdown
    pub(crate) fn conversion_spot(&mut self, side: Side) {
        self.possession = side;
        self.ball_position = 98;
        self.down = 1;
        self.yards_to_go = 2;
    }

    /// Ball on the tee for a kickoff (35) or free kick (20)
    pub(crate) fn kick_spot(&mut self, kicking: Side, spot: u8) {
        self.possession = kicking;
        self.ball_position = spot;
        self.down = 1;
        self.yards_to_go = 10;
    }
}
