//! Deterministic sample teams for the CLI, tests and benchmarks.

use crate::teams::{PlayStyle, PlayerProfile, Position, TeamProfile, TeamSheet};

const FIRST_NAMES: [&str; 16] = [
    "Marcus", "Tyrell", "Jalen", "Cody", "Andre", "Luis", "Darius", "Nate", "Eli", "Trent",
    "Malik", "Owen", "Reggie", "Sam", "Victor", "Wes",
];

const LAST_NAMES: [&str; 16] = [
    "Hayes", "Okafor", "Brandt", "Mercer", "Whitfield", "Castillo", "Pruitt", "Lindqvist",
    "Barnes", "Calloway", "Dunleavy", "Fontaine", "Greer", "Holloway", "Ivey", "Jessup",
];

/// Position counts of a 46-man game-day roster
const ROSTER_SHAPE: [(Position, usize); 12] = [
    (Position::QB, 2),
    (Position::RB, 3),
    (Position::FB, 1),
    (Position::WR, 6),
    (Position::TE, 3),
    (Position::OL, 8),
    (Position::DL, 7),
    (Position::LB, 6),
    (Position::CB, 5),
    (Position::S, 3),
    (Position::K, 1),
    (Position::P, 1),
];

/// Build a roster whose attributes are a fixed function of `strength` and
/// each player's slot, so the same call always yields the same team.
pub fn demo_roster(abbreviation: &str, strength: u8, name_offset: usize) -> Vec<PlayerProfile> {
    let mut roster = Vec::new();
    let mut slot = 0usize;

    for (position, count) in ROSTER_SHAPE {
        for depth in 0..count {
            let drop = (depth as u8) * 6;
            let wobble = ((slot * 7 + name_offset) % 9) as u8;
            let rating = strength.saturating_sub(drop).saturating_add(wobble).min(99);
            let speed = match position {
                Position::WR | Position::CB | Position::RB => 80 + wobble,
                Position::OL | Position::DL => 45 + wobble,
                _ => 65 + wobble,
            };
            let strength_attr = match position {
                Position::OL | Position::DL | Position::FB => 85 + wobble,
                _ => 60 + wobble,
            };

            roster.push(PlayerProfile {
                id: format!("{}-{}-{}", abbreviation, position, depth + 1),
                name: format!(
                    "{} {}",
                    FIRST_NAMES[(slot + name_offset) % FIRST_NAMES.len()],
                    LAST_NAMES[(slot * 3 + name_offset) % LAST_NAMES.len()]
                ),
                position,
                rating,
                speed: speed.min(99),
                strength: strength_attr.min(99),
                awareness: (rating / 2 + 40).min(99),
                clutch: (55 + (slot as u8 * 5 + wobble) % 40).min(99),
                injury_prone: slot % 11 == 4,
            });
            slot += 1;
        }
    }

    roster
}

/// Two evenly matched sample teams
pub fn demo_matchup() -> (TeamSheet, TeamSheet) {
    let home = TeamSheet {
        team: TeamProfile {
            id: "harbor-city-mariners".to_string(),
            name: "Harbor City Mariners".to_string(),
            abbreviation: "HCM".to_string(),
            offense_rating: 82,
            defense_rating: 76,
            special_teams_rating: 74,
            play_style: PlayStyle::PassHeavy,
        },
        roster: demo_roster("HCM", 80, 0),
    };

    let away = TeamSheet {
        team: TeamProfile {
            id: "red-mesa-outlaws".to_string(),
            name: "Red Mesa Outlaws".to_string(),
            abbreviation: "RMO".to_string(),
            offense_rating: 77,
            defense_rating: 83,
            special_teams_rating: 79,
            play_style: PlayStyle::RunHeavy,
        },
        roster: demo_roster("RMO", 78, 5),
    };

    (home, away)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_roster_is_stable() {
        assert_eq!(demo_roster("AAA", 80, 1), demo_roster("AAA", 80, 1));
    }

    #[test]
    fn test_demo_roster_shape() {
        let roster = demo_roster("AAA", 80, 0);
        assert_eq!(roster.len(), 46);
        assert_eq!(roster.iter().filter(|p| p.position == Position::K).count(), 1);
        assert!(roster.iter().all(|p| p.rating <= 100 && p.speed <= 100));
    }
}
