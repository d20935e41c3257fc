//! Generation settings loadable from JSON.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::career::DEFAULT_GAMES_PER_SEASON;
use crate::error::SynthError;
use crate::league::{FRANCHISES, LeagueLayout};
use crate::player::{Clock, FixedClock, SystemClock};
use crate::roster::RosterComposition;

/// Errors raised when generation settings violate their bounds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("{field} must not be empty")]
    EmptyList { field: &'static str },
    #[error("{field} contains duplicate name {name:?}")]
    DuplicateName { field: &'static str, name: String },
    #[error("roster count for {position} must be at least 1")]
    EmptyRosterSlot { position: String },
    #[error("league needs {needed} teams but only {available} franchises exist")]
    TooManyTeams { needed: usize, available: usize },
}

/// Everything a league generation run can be tuned by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "GenerationConfig::default_games_per_season")]
    pub games_per_season: u32,
    #[serde(default)]
    pub roster: RosterComposition,
    /// Overrides the system clock when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_year: Option<i32>,
    #[serde(default = "GenerationConfig::default_conference_names")]
    pub conference_names: Vec<String>,
    #[serde(default = "GenerationConfig::default_division_names")]
    pub division_names: Vec<String>,
    #[serde(default = "GenerationConfig::default_teams_per_division")]
    pub teams_per_division: usize,
}

impl GenerationConfig {
    #[must_use]
    pub const fn default_games_per_season() -> u32 {
        DEFAULT_GAMES_PER_SEASON
    }

    #[must_use]
    pub fn default_conference_names() -> Vec<String> {
        LeagueLayout::default().conference_names
    }

    #[must_use]
    pub fn default_division_names() -> Vec<String> {
        LeagueLayout::default().division_names
    }

    #[must_use]
    pub fn default_teams_per_division() -> usize {
        LeagueLayout::default().teams_per_division
    }

    /// Parse settings without validating them.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse and validate in one step.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::Json`] or [`SynthError::Config`].
    pub fn load(json: &str) -> Result<Self, SynthError> {
        let config = Self::from_json(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.games_per_season == 0 {
            return Err(ConfigError::MinViolation {
                field: "games_per_season",
                min: 1,
                value: 0,
            });
        }
        for (position, count) in self.roster.iter() {
            if count == 0 {
                return Err(ConfigError::EmptyRosterSlot {
                    position: position.code().to_string(),
                });
            }
        }
        if self.roster.total() == 0 {
            return Err(ConfigError::EmptyList { field: "roster" });
        }
        validate_names("conference_names", &self.conference_names)?;
        validate_names("division_names", &self.division_names)?;
        if self.teams_per_division == 0 {
            return Err(ConfigError::MinViolation {
                field: "teams_per_division",
                min: 1,
                value: 0,
            });
        }
        let needed = self.league_layout().team_count();
        if needed > FRANCHISES.len() {
            return Err(ConfigError::TooManyTeams {
                needed,
                available: FRANCHISES.len(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn league_layout(&self) -> LeagueLayout {
        LeagueLayout {
            conference_names: self.conference_names.clone(),
            division_names: self.division_names.clone(),
            teams_per_division: self.teams_per_division,
        }
    }

    /// The clock implied by `current_year`.
    #[must_use]
    pub fn clock(&self) -> Box<dyn Clock> {
        match self.current_year {
            Some(year) => Box::new(FixedClock(year)),
            None => Box::new(SystemClock),
        }
    }
}

fn validate_names(field: &'static str, names: &[String]) -> Result<(), ConfigError> {
    if names.is_empty() {
        return Err(ConfigError::EmptyList { field });
    }
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::DuplicateName {
                field,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            games_per_season: Self::default_games_per_season(),
            roster: RosterComposition::default(),
            current_year: None,
            conference_names: Self::default_conference_names(),
            division_names: Self::default_division_names(),
            teams_per_division: Self::default_teams_per_division(),
        }
    }
}
