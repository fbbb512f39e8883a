//! Team and roster descriptors supplied by the caller.

use crate::errors::RosterError;
use crate::fairness::{RandomStream, WeightedOption};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Roster positions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    FB,
    WR,
    TE,
    OL,
    DL,
    LB,
    CB,
    S,
    K,
    P,
}

impl Position {
    /// Positions every playable roster must contain
    pub const REQUIRED: [Position; 4] = [Position::QB, Position::RB, Position::WR, Position::K];

    pub fn is_defense(&self) -> bool {
        matches!(self, Position::DL | Position::LB | Position::CB | Position::S)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::FB => "FB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::OL => "OL",
            Position::DL => "DL",
            Position::LB => "LB",
            Position::CB => "CB",
            Position::S => "S",
            Position::K => "K",
            Position::P => "P",
        };
        write!(f, "{}", label)
    }
}

/// Offensive identity of a team
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayStyle {
    #[default]
    Balanced,
    PassHeavy,
    RunHeavy,
    Aggressive,
    Conservative,
}

/// Stage of the season the game is played in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    #[default]
    Regular,
    WildCard,
    Divisional,
    Conference,
    SuperBowl,
}

impl GameType {
    /// Playoff games cannot end tied
    pub fn is_playoff(&self) -> bool {
        !matches!(self, GameType::Regular)
    }

    pub fn is_neutral_site(&self) -> bool {
        matches!(self, GameType::SuperBowl)
    }

    /// How much late-game clutch ratings matter
    pub fn pressure(&self) -> f64 {
        match self {
            GameType::Regular => 0.0,
            GameType::WildCard => 0.4,
            GameType::Divisional => 0.5,
            GameType::Conference => 0.7,
            GameType::SuperBowl => 1.0,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Regular => write!(f, "regular"),
            GameType::WildCard => write!(f, "wild_card"),
            GameType::Divisional => write!(f, "divisional"),
            GameType::Conference => write!(f, "conference"),
            GameType::SuperBowl => write!(f, "super_bowl"),
        }
    }
}

impl std::str::FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "regular" => Ok(GameType::Regular),
            "wild_card" | "wildcard" => Ok(GameType::WildCard),
            "divisional" => Ok(GameType::Divisional),
            "conference" => Ok(GameType::Conference),
            "super_bowl" | "superbowl" => Ok(GameType::SuperBowl),
            other => Err(format!("unknown game type '{}'", other)),
        }
    }
}

/// One player as supplied by the caller. Attributes are 0..=100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerProfile {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub rating: u8,
    pub speed: u8,
    pub strength: u8,
    pub awareness: u8,
    pub clutch: u8,
    #[serde(default)]
    pub injury_prone: bool,
}

/// Team-level descriptor. Ratings are 0..=100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamProfile {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub offense_rating: u8,
    pub defense_rating: u8,
    pub special_teams_rating: u8,
    #[serde(default)]
    pub play_style: PlayStyle,
}

/// Team plus roster: the unit the engine receives per side
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSheet {
    pub team: TeamProfile,
    pub roster: Vec<PlayerProfile>,
}

impl TeamSheet {
    /// Check everything the engine relies on before a game starts.
    pub fn validate(&self, min_roster_size: usize) -> Result<(), RosterError> {
        let label = if self.team.abbreviation.is_empty() {
            self.team.id.clone()
        } else {
            self.team.abbreviation.clone()
        };

        for (field, value) in [
            ("id", &self.team.id),
            ("name", &self.team.name),
            ("abbreviation", &self.team.abbreviation),
        ] {
            if value.trim().is_empty() {
                return Err(RosterError::MissingField {
                    team: label,
                    field: field.to_string(),
                });
            }
        }

        for (field, value) in [
            ("offense_rating", self.team.offense_rating),
            ("defense_rating", self.team.defense_rating),
            ("special_teams_rating", self.team.special_teams_rating),
        ] {
            check_rating(&label, field, value)?;
        }

        if self.roster.len() < min_roster_size {
            return Err(RosterError::TooFewPlayers {
                team: label,
                found: self.roster.len(),
                required: min_roster_size,
            });
        }

        let mut ids = BTreeSet::new();
        for player in &self.roster {
            if player.id.trim().is_empty() {
                return Err(RosterError::MissingField {
                    team: label,
                    field: "player.id".to_string(),
                });
            }
            if player.name.trim().is_empty() {
                return Err(RosterError::MissingField {
                    team: label,
                    field: format!("{}.name", player.id),
                });
            }
            if !ids.insert(player.id.as_str()) {
                return Err(RosterError::DuplicatePlayerId {
                    team: label,
                    id: player.id.clone(),
                });
            }
            for (field, value) in [
                ("rating", player.rating),
                ("speed", player.speed),
                ("strength", player.strength),
                ("awareness", player.awareness),
                ("clutch", player.clutch),
            ] {
                check_rating(&label, &format!("{}.{}", player.id, field), value)?;
            }
        }

        for position in Position::REQUIRED {
            if !self.roster.iter().any(|p| p.position == position) {
                return Err(RosterError::MissingPosition {
                    team: label,
                    position: position.to_string(),
                });
            }
        }

        Ok(())
    }
}

fn check_rating(team: &str, field: &str, value: u8) -> Result<(), RosterError> {
    if value > 100 {
        return Err(RosterError::RatingOutOfRange {
            team: team.to_string(),
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// Validate both sides of a matchup
pub fn validate_matchup(
    home: &TeamSheet,
    away: &TeamSheet,
    min_roster_size: usize,
) -> Result<(), RosterError> {
    home.validate(min_roster_size)?;
    away.validate(min_roster_size)?;
    if home.team.id == away.team.id {
        return Err(RosterError::SameTeam(home.team.id.clone()));
    }
    Ok(())
}

/// Healthy players per position, best first. Built once per game.
#[derive(Debug, Clone)]
pub(crate) struct DepthChart {
    roster: Vec<PlayerProfile>,
    by_position: BTreeMap<Position, Vec<usize>>,
}

impl DepthChart {
    pub(crate) fn new(roster: &[PlayerProfile]) -> Self {
        let mut by_position: BTreeMap<Position, Vec<usize>> = BTreeMap::new();
        for (idx, player) in roster.iter().enumerate() {
            by_position.entry(player.position).or_default().push(idx);
        }
        for slots in by_position.values_mut() {
            slots.sort_by(|&a, &b| {
                roster[b]
                    .rating
                    .cmp(&roster[a].rating)
                    .then_with(|| roster[a].id.cmp(&roster[b].id))
            });
        }

        Self {
            roster: roster.to_vec(),
            by_position,
        }
    }

    fn healthy(&self, position: Position) -> &[usize] {
        self.by_position
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Best healthy player at the first position in `positions` that has one
    pub(crate) fn starter(&self, positions: &[Position]) -> Option<&PlayerProfile> {
        positions
            .iter()
            .find_map(|p| self.healthy(*p).first())
            .map(|&idx| &self.roster[idx])
    }

    pub(crate) fn quarterback(&self) -> Option<&PlayerProfile> {
        self.starter(&[Position::QB, Position::RB, Position::WR])
    }

    pub(crate) fn kicker(&self) -> Option<&PlayerProfile> {
        self.starter(&[Position::K, Position::P])
    }

    pub(crate) fn punter(&self) -> Option<&PlayerProfile> {
        self.starter(&[Position::P, Position::K])
    }

    /// Weighted pick among the top `take` healthy players of each group.
    /// `groups` pairs a position with a share multiplier in percent.
    pub(crate) fn pick(
        &self,
        stream: &mut RandomStream,
        groups: &[(Position, usize, u32)],
    ) -> Option<&PlayerProfile> {
        let options: Vec<WeightedOption<usize>> = groups
            .iter()
            .flat_map(|&(position, take, share)| {
                self.healthy(position)
                    .iter()
                    .take(take)
                    .enumerate()
                    .map(move |(depth, &idx)| (idx, share, depth))
            })
            .map(|(idx, share, depth)| {
                // Starters see the ball more than backups
                let depth_factor = 100 / (depth as u32 + 1);
                let weight = (self.roster[idx].rating as u32 + 10) * share * depth_factor / 100;
                WeightedOption::new(idx, weight.max(1))
            })
            .collect();

        stream
            .weighted_choice(&options)
            .map(|idx| &self.roster[idx])
    }

    pub(crate) fn ball_carrier(&self, stream: &mut RandomStream) -> Option<&PlayerProfile> {
        self.pick(stream, &[(Position::RB, 2, 100), (Position::FB, 1, 15)])
            .or_else(|| self.quarterback())
    }

    pub(crate) fn pass_target(&self, stream: &mut RandomStream) -> Option<&PlayerProfile> {
        self.pick(
            stream,
            &[
                (Position::WR, 4, 100),
                (Position::TE, 2, 70),
                (Position::RB, 2, 40),
            ],
        )
    }

    pub(crate) fn pass_rusher(&self, stream: &mut RandomStream) -> Option<&PlayerProfile> {
        self.pick(stream, &[(Position::DL, 4, 100), (Position::LB, 3, 60)])
    }

    pub(crate) fn cover_defender(&self, stream: &mut RandomStream) -> Option<&PlayerProfile> {
        self.pick(
            stream,
            &[(Position::CB, 3, 100), (Position::S, 2, 80), (Position::LB, 2, 40)],
        )
    }

    pub(crate) fn tackler(&self, stream: &mut RandomStream) -> Option<&PlayerProfile> {
        self.pick(
            stream,
            &[(Position::LB, 3, 100), (Position::S, 2, 60), (Position::DL, 4, 50), (Position::CB, 2, 30)],
        )
    }

    pub(crate) fn returner(&self) -> Option<&PlayerProfile> {
        // Fastest of the skill backups
        [Position::WR, Position::RB, Position::CB]
            .iter()
            .flat_map(|p| self.healthy(*p).iter())
            .map(|&idx| &self.roster[idx])
            .max_by(|a, b| a.speed.cmp(&b.speed).then_with(|| b.id.cmp(&a.id)))
    }

    /// Remove a player for the rest of the game, unless they are the last
    /// healthy player at their position. Returns whether they were removed.
    pub(crate) fn injure(&mut self, player_id: &str) -> bool {
        let Some(idx) = self.roster.iter().position(|p| p.id == player_id) else {
            return false;
        };
        let position = self.roster[idx].position;
        match self.by_position.get_mut(&position) {
            Some(slots) if slots.len() > 1 => {
                slots.retain(|&i| i != idx);
                true
            }
            _ => false,
        }
    }

    /// Average rating of the top `take` healthy players at `position`
    pub(crate) fn unit_rating(&self, position: Position, take: usize) -> f64 {
        let slots = self.healthy(position);
        let picked: Vec<u32> = slots
            .iter()
            .take(take)
            .map(|&idx| self.roster[idx].rating as u32)
            .collect();
        if picked.is_empty() {
            return 50.0;
        }
        picked.iter().sum::<u32>() as f64 / picked.len() as f64
    }
}
