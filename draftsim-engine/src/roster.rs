//! Team rosters assembled in depth-chart order.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::SynthError;
use crate::player::{PlayerFactory, PlayerProfile};
use crate::position::Position;
use crate::rng::RngBundle;
use crate::skill::DepthChartSkill;

/// How many players each position carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterComposition(BTreeMap<Position, usize>);

impl Default for RosterComposition {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Position::Quarterback, 3),
            (Position::RunningBack, 4),
            (Position::WideReceiver, 6),
            (Position::TightEnd, 3),
            (Position::Kicker, 1),
        ]))
    }
}

impl RosterComposition {
    #[must_use]
    pub fn new(counts: impl IntoIterator<Item = (Position, usize)>) -> Self {
        Self(counts.into_iter().collect())
    }

    /// Players carried at `position` (0 when absent).
    #[must_use]
    pub fn count(&self, position: Position) -> usize {
        self.0.get(&position).copied().unwrap_or(0)
    }

    /// `(position, count)` in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, usize)> + '_ {
        self.0.iter().map(|(position, count)| (*position, *count))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

/// One team's players grouped by position, each group ordered starter first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team_id: Uuid,
    pub depth_chart: BTreeMap<Position, Vec<PlayerProfile>>,
}

impl TeamRoster {
    /// Every player in QB, RB, WR, TE, PK order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerProfile> {
        self.depth_chart.values().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.depth_chart.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn at(&self, position: Position) -> &[PlayerProfile] {
        self.depth_chart
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Create a full roster; slot `i` of a group of `n` gets `DepthChartSkill::new(i, n)`.
///
/// # Errors
///
/// Returns [`SynthError::UnknownPosition`] when a composition position has no profile.
pub fn build_roster(
    team_id: Uuid,
    composition: &RosterComposition,
    factory: &PlayerFactory<'_>,
    rngs: &RngBundle,
) -> Result<TeamRoster, SynthError> {
    let mut depth_chart = BTreeMap::new();
    for (position, count) in composition.iter() {
        let group = (0..count)
            .map(|slot| {
                let skill = DepthChartSkill::new(slot, count);
                factory.create_player_from_streams(position, team_id, &skill, rngs)
            })
            .collect::<Result<Vec<_>, _>>()?;
        depth_chart.insert(position, group);
    }
    log::debug!(
        "built roster of {} for team {team_id}",
        depth_chart.values().map(Vec::len).sum::<usize>()
    );
    Ok(TeamRoster {
        team_id,
        depth_chart,
    })
}
