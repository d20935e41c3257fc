//! Position codes and their parsing.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Roster positions the generator knows how to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "PK")]
    Kicker,
}

impl Position {
    /// Every position in roster order.
    pub const ALL: [Self; 5] = [
        Self::Quarterback,
        Self::RunningBack,
        Self::WideReceiver,
        Self::TightEnd,
        Self::Kicker,
    ];

    /// Abbreviation used in the corpus and in persisted records.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Quarterback => "QB",
            Self::RunningBack => "RB",
            Self::WideReceiver => "WR",
            Self::TightEnd => "TE",
            Self::Kicker => "PK",
        }
    }

    /// Parse an abbreviation, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|position| position.code().eq_ignore_ascii_case(code))
    }

    /// Multiplier applied to the age-based per-game injury rate.
    #[must_use]
    pub const fn injury_factor(self) -> f64 {
        match self {
            Self::Quarterback => 0.5,
            Self::RunningBack => 1.0,
            Self::WideReceiver | Self::TightEnd => 0.8,
            Self::Kicker => 0.25,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
