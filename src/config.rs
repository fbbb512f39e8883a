//! Configuration management with validation and defaults
//!
//! Settings load from an optional TOML file, then `GRIDIRON_*` environment
//! variables override individual fields, then the result is validated.

use crate::errors::{ConfigurationError, GridironResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Hard ceiling on plays per game; `max_plays` must stay below it
pub const PLAY_LIMIT: u32 = 500;

/// Complete simulation configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub engine: EngineConfig,
    pub tuning: TuningConfig,
    pub logging: LoggingConfig,
}

/// Rules and limits of the game state machine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Plays after which a game is cut off with its current score
    pub max_plays: u32,
    pub quarter_seconds: u32,
    pub overtime_seconds: u32,
    /// Length of the two-minute drill window at the end of a half
    pub two_minute_seconds: u32,
    pub min_roster_size: usize,
    pub timeouts_per_half: u8,
    pub overtime_timeouts: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_plays: 450,
            quarter_seconds: 900,
            overtime_seconds: 600,
            two_minute_seconds: 120,
            min_roster_size: 22,
            timeouts_per_half: 3,
            overtime_timeouts: 2,
        }
    }
}

/// League-wide outcome rates the play resolver starts from
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TuningConfig {
    pub base_completion: f64,
    /// Rating points added to the home team outside neutral sites
    pub home_field_advantage: f64,
    pub penalty_rate: f64,
    pub injury_rate: f64,
    pub fumble_rate: f64,
    pub interception_rate: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            base_completion: 0.56,
            home_field_advantage: 2.0,
            penalty_rate: 0.07,
            injury_rate: 0.002,
            fumble_rate: 0.012,
            interception_rate: 0.025,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Emit a debug line for every resolved play
    pub trace_plays: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            trace_plays: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string for `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn check_rate(field: &str, value: f64) -> Result<(), ConfigurationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, value, "must be a probability in 0..=1"));
    }
    Ok(())
}

impl SimulationConfig {
    /// Short games for tests and benchmarks
    pub fn quick() -> Self {
        Self {
            engine: EngineConfig {
                max_plays: 200,
                quarter_seconds: 300,
                overtime_seconds: 300,
                two_minute_seconds: 60,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let engine = &self.engine;

        if engine.max_plays == 0 || engine.max_plays >= PLAY_LIMIT {
            return Err(invalid(
                "engine.max_plays",
                engine.max_plays,
                "must be between 1 and 499",
            ));
        }
        if engine.quarter_seconds == 0 || engine.quarter_seconds > 900 {
            return Err(invalid(
                "engine.quarter_seconds",
                engine.quarter_seconds,
                "must be between 1 and 900",
            ));
        }
        if engine.overtime_seconds == 0 || engine.overtime_seconds > 600 {
            return Err(invalid(
                "engine.overtime_seconds",
                engine.overtime_seconds,
                "must be between 1 and 600",
            ));
        }
        if engine.two_minute_seconds > engine.quarter_seconds {
            return Err(invalid(
                "engine.two_minute_seconds",
                engine.two_minute_seconds,
                "cannot exceed quarter_seconds",
            ));
        }
        if engine.min_roster_size == 0 {
            return Err(invalid("engine.min_roster_size", 0, "cannot be zero"));
        }
        if engine.timeouts_per_half > 3 {
            return Err(invalid(
                "engine.timeouts_per_half",
                engine.timeouts_per_half,
                "at most 3 timeouts per half",
            ));
        }
        if engine.overtime_timeouts > 3 {
            return Err(invalid(
                "engine.overtime_timeouts",
                engine.overtime_timeouts,
                "at most 3 timeouts in overtime",
            ));
        }

        let tuning = &self.tuning;
        check_rate("tuning.base_completion", tuning.base_completion)?;
        check_rate("tuning.penalty_rate", tuning.penalty_rate)?;
        check_rate("tuning.injury_rate", tuning.injury_rate)?;
        check_rate("tuning.fumble_rate", tuning.fumble_rate)?;
        check_rate("tuning.interception_rate", tuning.interception_rate)?;
        if !tuning.home_field_advantage.is_finite()
            || !(0.0..=20.0).contains(&tuning.home_field_advantage)
        {
            return Err(invalid(
                "tuning.home_field_advantage",
                tuning.home_field_advantage,
                "must be between 0 and 20 rating points",
            ));
        }

        Ok(())
    }
}

/// Configuration loader with environment variable support
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> GridironResult<SimulationConfig> {
        let mut config = match &self.config_path {
            Some(path) => Self::load_from_file(path)?,
            None => SimulationConfig::default(),
        };

        apply_overrides(&mut config, |key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn load_from_file(path: &Path) -> GridironResult<SimulationConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(toml::from_str(&content)?)
    }
}

/// Apply `GRIDIRON_*` overrides using `lookup` to read variables
fn apply_overrides<F>(config: &mut SimulationConfig, lookup: F) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("GRIDIRON_MAX_PLAYS") {
        config.engine.max_plays = value
            .parse()
            .map_err(|_| invalid("GRIDIRON_MAX_PLAYS", &value, "Invalid play count"))?;
    }
    if let Some(value) = lookup("GRIDIRON_QUARTER_SECONDS") {
        config.engine.quarter_seconds = value
            .parse()
            .map_err(|_| invalid("GRIDIRON_QUARTER_SECONDS", &value, "Invalid number of seconds"))?;
    }
    if let Some(value) = lookup("GRIDIRON_LOG_LEVEL") {
        config.logging.level = value
            .parse()
            .map_err(|e: String| invalid("GRIDIRON_LOG_LEVEL", &value, &e))?;
    }
    if let Some(value) = lookup("GRIDIRON_TRACE_PLAYS") {
        config.logging.trace_plays = value
            .parse()
            .map_err(|_| invalid("GRIDIRON_TRACE_PLAYS", &value, "Invalid boolean value"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(SimulationConfig::quick().validate().is_ok());
    }

    #[test]
    fn test_max_plays_bounds() {
        let mut config = SimulationConfig::default();
        config.engine.max_plays = 500;
        assert!(config.validate().is_err());
        config.engine.max_plays = 0;
        assert!(config.validate().is_err());
        config.engine.max_plays = 499;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clock_bounds() {
        let mut config = SimulationConfig::default();
        config.engine.quarter_seconds = 901;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.engine.overtime_seconds = 601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rate_out_of_range() {
        let mut config = SimulationConfig::default();
        config.tuning.penalty_rate = 1.5;
        match config.validate() {
            Err(ConfigurationError::InvalidValue { field, .. }) => {
                assert_eq!(field, "tuning.penalty_rate");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            [engine]
            max_plays = 300

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.max_plays, 300);
        assert_eq!(config.engine.quarter_seconds, 900);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.tuning, TuningConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SimulationConfig::default();
        let lookup = lookup_from(&[
            ("GRIDIRON_MAX_PLAYS", "320"),
            ("GRIDIRON_LOG_LEVEL", "trace"),
            ("GRIDIRON_TRACE_PLAYS", "true"),
        ]);
        apply_overrides(&mut config, lookup).unwrap();

        assert_eq!(config.engine.max_plays, 320);
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert!(config.logging.trace_plays);
    }

    #[test]
    fn test_bad_env_override() {
        let mut config = SimulationConfig::default();
        let lookup = lookup_from(&[("GRIDIRON_QUARTER_SECONDS", "fifteen")]);
        assert!(matches!(
            apply_overrides(&mut config, lookup),
            Err(ConfigurationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_file_fails_to_load() {
        let result = ConfigLoader::new()
            .with_path("/nonexistent/gridiron.toml")
            .load();
        assert!(result.is_err());
    }
}
