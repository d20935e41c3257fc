//! League structure: conferences, divisions and teams drawn from a franchise pool.
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SynthError;
use crate::player::IdSource;

/// A team identity available for assignment to a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Franchise {
    pub city: &'static str,
    pub state: &'static str,
    pub name: &'static str,
    pub abbr: &'static str,
}

const fn franchise(
    city: &'static str,
    state: &'static str,
    name: &'static str,
    abbr: &'static str,
) -> Franchise {
    Franchise {
        city,
        state,
        name,
        abbr,
    }
}

pub const FRANCHISES: [Franchise; 32] = [
    franchise("Austin", "TX", "Desperados", "AUS"),
    franchise("Portland", "OR", "Lumberjacks", "POR"),
    franchise("Salt Lake", "UT", "Peaks", "SLC"),
    franchise("Orlando", "FL", "Orbit", "ORL"),
    franchise("San Diego", "CA", "Destroyers", "SD"),
    franchise("Columbus", "OH", "Aviators", "COL"),
    franchise("Sacramento", "CA", "Miners", "SAC"),
    franchise("San Antonio", "TX", "Marshals", "SA"),
    franchise("Memphis", "TN", "Pharaohs", "MEM"),
    franchise("Oklahoma City", "OK", "Twisters", "OKC"),
    franchise("Las Vegas", "NV", "High Rollers", "LV"),
    franchise("Raleigh", "NC", "Capitals", "RAL"),
    franchise("Birmingham", "AL", "Vulcans", "BHM"),
    franchise("Louisville", "KY", "Jockeys", "LOU"),
    franchise("Virginia Beach", "VA", "Neptunes", "VB"),
    franchise("Omaha", "NE", "Mammoths", "OMA"),
    franchise("Brooklyn", "NY", "Barons", "BKN"),
    franchise("Boston", "MA", "Colonials", "BOS"),
    franchise("Philadelphia", "PA", "Liberty", "PHI"),
    franchise("Washington", "DC", "Sentinels", "DC"),
    franchise("Chicago", "IL", "Wind", "CHI"),
    franchise("Detroit", "MI", "Gears", "DET"),
    franchise("Milwaukee", "WI", "Hunters", "MIL"),
    franchise("Minneapolis", "MN", "Blizzard", "MIN"),
    franchise("Atlanta", "GA", "Phoenixes", "ATL"),
    franchise("Miami", "FL", "Sharks", "MIA"),
    franchise("New Orleans", "LA", "Deltas", "NO"),
    franchise("Nashville", "TN", "Strings", "NSH"),
    franchise("Seattle", "WA", "Emeralds", "SEA"),
    franchise("San Francisco", "CA", "Fog", "SF"),
    franchise("Los Angeles", "CA", "Stars", "LA"),
    franchise("Denver", "CO", "Summits", "DEN"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: Uuid,
    pub name: String,
    pub conference_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub city: String,
    pub state: String,
    pub name: String,
    pub abbr: String,
    pub division_id: Uuid,
}

impl Team {
    fn from_franchise(id: Uuid, franchise: &Franchise, division_id: Uuid) -> Self {
        Self {
            id,
            city: franchise.city.to_string(),
            state: franchise.state.to_string(),
            name: franchise.name.to_string(),
            abbr: franchise.abbr.to_string(),
            division_id,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }
}

/// Shape of the league to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueLayout {
    pub conference_names: Vec<String>,
    pub division_names: Vec<String>,
    pub teams_per_division: usize,
}

impl Default for LeagueLayout {
    fn default() -> Self {
        Self {
            conference_names: vec![
                "Union Conference".to_string(),
                "Alliance Conference".to_string(),
            ],
            division_names: ["North", "South", "East", "West"]
                .into_iter()
                .map(String::from)
                .collect(),
            teams_per_division: 4,
        }
    }
}

impl LeagueLayout {
    /// Saturates at `usize::MAX` so an absurd layout still fails the franchise check.
    #[must_use]
    pub fn division_count(&self) -> usize {
        self.conference_names.len().saturating_mul(self.division_names.len())
    }

    #[must_use]
    pub fn team_count(&self) -> usize {
        self.division_count().saturating_mul(self.teams_per_division)
    }
}

/// A flat league: every division references its conference, every team its division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub conferences: Vec<Conference>,
    pub divisions: Vec<Division>,
    pub teams: Vec<Team>,
}

impl League {
    pub fn divisions_in<'a>(
        &'a self,
        conference: &'a Conference,
    ) -> impl Iterator<Item = &'a Division> {
        self.divisions
            .iter()
            .filter(move |division| division.conference_id == conference.id)
    }

    pub fn teams_in<'a>(&'a self, division: &'a Division) -> impl Iterator<Item = &'a Team> {
        self.teams
            .iter()
            .filter(move |team| team.division_id == division.id)
    }
}

/// Build conferences, then divisions per conference, then draw teams for each
/// division from [`FRANCHISES`] without replacement.
///
/// # Errors
///
/// Returns [`SynthError::FranchisePoolExhausted`] when the layout needs more
/// teams than there are franchises.
pub fn generate_league(
    layout: &LeagueLayout,
    ids: &dyn IdSource,
    rng: &mut dyn RngCore,
) -> Result<League, SynthError> {
    let needed = layout.team_count();
    if needed > FRANCHISES.len() {
        return Err(SynthError::FranchisePoolExhausted {
            needed,
            available: FRANCHISES.len(),
        });
    }

    let conferences: Vec<Conference> = layout
        .conference_names
        .iter()
        .map(|name| Conference {
            id: ids.next_id(rng),
            name: name.clone(),
        })
        .collect();

    let mut divisions = Vec::with_capacity(layout.division_count());
    for conference in &conferences {
        for name in &layout.division_names {
            divisions.push(Division {
                id: ids.next_id(rng),
                name: name.clone(),
                conference_id: conference.id,
            });
        }
    }

    let mut pool: Vec<&Franchise> = FRANCHISES.iter().collect();
    let mut teams = Vec::with_capacity(needed);
    for division in &divisions {
        for _ in 0..layout.teams_per_division {
            let franchise = pool.remove(rng.gen_range(0..pool.len()));
            teams.push(Team::from_franchise(ids.next_id(rng), franchise, division.id));
        }
    }

    log::info!(
        "generated league: {} conferences, {} divisions, {} teams",
        conferences.len(),
        divisions.len(),
        teams.len()
    );
    Ok(League {
        conferences,
        divisions,
        teams,
    })
}
