//! Error types for the gridiron simulation core
//!
//! Verification outcomes are never errors: a seed that fails to match its
//! commitment is reported as `false`. The types here cover configuration,
//! unusable team input and malformed seeds handed to the engine for reuse.

use thiserror::Error;

/// Root error type for all gridiron operations
#[derive(Debug, Error)]
pub enum GridironError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Team or roster input the engine cannot play with
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    /// Seeds supplied for reuse are malformed
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    /// Reading team or config files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Team file or result encoding
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
}

/// Engine precondition failures on team input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("{team} roster has {found} players, at least {required} required")]
    TooFewPlayers {
        team: String,
        found: usize,
        required: usize,
    },

    #[error("{team} roster has no player at position {position}")]
    MissingPosition { team: String, position: String },

    #[error("{team} is missing required field '{field}'")]
    MissingField { team: String, field: String },

    #[error("{team} has {field} = {value}, expected 0..=100")]
    RatingOutOfRange {
        team: String,
        field: String,
        value: u8,
    },

    #[error("{team} lists player id '{id}' more than once")]
    DuplicatePlayerId { team: String, id: String },

    #[error("Home and away teams share id '{0}'")]
    SameTeam(String),
}

/// Which half of the seed pair a seed error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    Server,
    Client,
}

impl std::fmt::Display for SeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedKind::Server => write!(f, "server seed"),
            SeedKind::Client => write!(f, "client seed"),
        }
    }
}

/// Malformed seeds handed to the engine for reuse
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("{0} is empty")]
    Empty(SeedKind),

    #[error("{0} is not hex encoded")]
    NotHex(SeedKind),
}

impl From<toml::de::Error> for GridironError {
    fn from(e: toml::de::Error) -> Self {
        GridironError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

// Convenience type alias for Results
pub type GridironResult<T> = Result<T, GridironError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_error_display() {
        let roster_error = RosterError::TooFewPlayers {
            team: "HOU".to_string(),
            found: 10,
            required: 22,
        };
        let error = GridironError::Roster(roster_error);

        assert!(error.to_string().contains("Roster error"));
        assert!(error.to_string().contains("at least 22"));
    }

    #[test]
    fn test_seed_error_details() {
        let seed_error = SeedError::NotHex(SeedKind::Server);
        assert_eq!(seed_error.to_string(), "server seed is not hex encoded");
    }

    #[test]
    fn test_error_conversion() {
        let config_error = ConfigurationError::LoadFailed("missing".to_string());
        let error: GridironError = config_error.into();

        match error {
            GridironError::Configuration(_) => {}
            _ => panic!("Expected configuration error"),
        }
    }

    #[test]
    fn test_error_source() {
        let error = GridironError::Seed(SeedError::Empty(SeedKind::Client));
        assert!(error.source().is_some());
    }
}
