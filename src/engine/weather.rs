//! Game-day weather, drawn once before the opening kickoff.

use crate::fairness::{RandomStream, WeightedOption};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Wind,
    /// Closed roof; only offered at neutral sites
    Dome,
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Wind => "windy",
            WeatherCondition::Dome => "dome",
        };
        write!(f, "{}", label)
    }
}

const OUTDOOR: [WeightedOption<WeatherCondition>; 5] = [
    WeightedOption::new(WeatherCondition::Clear, 45),
    WeightedOption::new(WeatherCondition::Cloudy, 25),
    WeightedOption::new(WeatherCondition::Rain, 13),
    WeightedOption::new(WeatherCondition::Snow, 5),
    WeightedOption::new(WeatherCondition::Wind, 12),
];

const NEUTRAL_SITE: [WeightedOption<WeatherCondition>; 6] = [
    WeightedOption::new(WeatherCondition::Clear, 45),
    WeightedOption::new(WeatherCondition::Cloudy, 25),
    WeightedOption::new(WeatherCondition::Rain, 13),
    WeightedOption::new(WeatherCondition::Snow, 5),
    WeightedOption::new(WeatherCondition::Wind, 12),
    WeightedOption::new(WeatherCondition::Dome, 40),
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Weather {
    pub condition: WeatherCondition,
    pub temperature_f: i32,
    pub wind_mph: u32,
}

impl Weather {
    /// Three draws: condition, temperature, wind
    pub fn draw(stream: &mut RandomStream, neutral_site: bool) -> Self {
        let table: &[WeightedOption<WeatherCondition>] = if neutral_site {
            &NEUTRAL_SITE
        } else {
            &OUTDOOR
        };
        let condition = stream
            .weighted_choice(table)
            .unwrap_or(WeatherCondition::Clear);

        let (low, high) = match condition {
            WeatherCondition::Snow => (12, 32),
            WeatherCondition::Rain => (38, 64),
            WeatherCondition::Dome => (70, 72),
            _ => (30, 88),
        };
        let temperature_f = stream.range_i32(low, high);

        let (calm, gusty) = match condition {
            WeatherCondition::Wind => (15, 32),
            WeatherCondition::Dome => (0, 0),
            _ => (0, 12),
        };
        let wind_mph = stream.range_i32(calm, gusty).max(0) as u32;

        Self {
            condition,
            temperature_f,
            wind_mph,
        }
    }

    /// Added to every pass completion probability
    pub fn completion_adjust(&self) -> f64 {
        let base = match self.condition {
            WeatherCondition::Rain => -0.04,
            WeatherCondition::Snow => -0.06,
            WeatherCondition::Wind => -0.03,
            WeatherCondition::Dome => 0.01,
            WeatherCondition::Clear | WeatherCondition::Cloudy => 0.0,
        };
        base - self.excess_wind() * 0.002
    }

    /// Multiplier on fumble rates
    pub fn fumble_factor(&self) -> f64 {
        match self.condition {
            WeatherCondition::Rain => 1.4,
            WeatherCondition::Snow => 1.6,
            _ => 1.0,
        }
    }

    /// Added to field goal and extra point make probabilities
    pub fn kicking_adjust(&self) -> f64 {
        let base = match self.condition {
            WeatherCondition::Rain => -0.02,
            WeatherCondition::Snow => -0.05,
            WeatherCondition::Wind => -0.05,
            WeatherCondition::Dome => 0.02,
            _ => 0.0,
        };
        let cold = if self.temperature_f < 25 { -0.02 } else { 0.0 };
        base + cold - self.excess_wind() * 0.004
    }

    /// Yards added to punt and kickoff distance
    pub fn kick_distance_adjust(&self) -> f64 {
        match self.condition {
            WeatherCondition::Snow => -3.0,
            WeatherCondition::Wind => -2.0 - self.excess_wind() * 0.2,
            WeatherCondition::Dome => 1.0,
            _ => 0.0,
        }
    }

    fn excess_wind(&self) -> f64 {
        self.wind_mph.saturating_sub(15) as f64
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.condition == WeatherCondition::Dome {
            return write!(f, "dome, {}F", self.temperature_f);
        }
        write!(
            f,
            "{}, {}F, wind {} mph",
            self.condition, self.temperature_f, self.wind_mph
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_consumes_three_values() {
        let mut stream = RandomStream::new("aa".repeat(32), "weather");
        Weather::draw(&mut stream, false);
        assert_eq!(stream.nonce(), 3);
    }

    #[test]
    fn test_outdoor_never_dome() {
        for i in 0..300 {
            let mut stream = RandomStream::new("ab".repeat(32), format!("w{}", i));
            let weather = Weather::draw(&mut stream, false);
            assert_ne!(weather.condition, WeatherCondition::Dome);
        }
    }

    #[test]
    fn test_neutral_site_can_be_dome() {
        let domes = (0..200)
            .filter(|i| {
                let mut stream = RandomStream::new("cd".repeat(32), format!("n{}", i));
                Weather::draw(&mut stream, true).condition == WeatherCondition::Dome
            })
            .count();
        assert!(domes > 0);
    }

    #[test]
    fn test_snow_is_cold_and_slippery() {
        let snow = Weather {
            condition: WeatherCondition::Snow,
            temperature_f: 20,
            wind_mph: 5,
        };
        assert!(snow.fumble_factor() > 1.0);
        assert!(snow.completion_adjust() < 0.0);
        assert!(snow.kicking_adjust() < -0.05);
    }

    #[test]
    fn test_heavy_wind_hurts_kicking_more() {
        let breeze = Weather {
            condition: WeatherCondition::Wind,
            temperature_f: 50,
            wind_mph: 15,
        };
        let gale = Weather {
            wind_mph: 30,
            ..breeze
        };
        assert!(gale.kicking_adjust() < breeze.kicking_adjust());
        assert!(gale.kick_distance_adjust() < breeze.kick_distance_adjust());
    }
}
