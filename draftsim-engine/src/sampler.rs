//! CDF samplers built from aggregated stats, plus the compute-once cache.
use once_cell::sync::OnceCell;
use rand::Rng;
use std::collections::BTreeMap;

use crate::aggregate::{AggregatedPlayerStats, PositionProfile, StatsAggregator};
use crate::cdf::{EmpiricalCdf, FrequencyTable};
use crate::error::SynthError;
use crate::position::Position;

/// The five attribute distributions for one position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSamplers {
    pub jerseys: EmpiricalCdf<u32>,
    pub heights: EmpiricalCdf<u32>,
    pub weights: EmpiricalCdf<u32>,
    pub ages: EmpiricalCdf<u32>,
    pub years_of_experience: EmpiricalCdf<u32>,
}

impl PositionSamplers {
    /// # Errors
    ///
    /// Returns [`SynthError::InvalidDistribution`] naming the first empty table.
    pub fn from_profile(code: &str, profile: &PositionProfile) -> Result<Self, SynthError> {
        let build = |name: &str, table: &FrequencyTable<u32>| {
            EmpiricalCdf::build(&format!("{code}.{name}"), table)
        };
        Ok(Self {
            jerseys: build("jerseys", &profile.jerseys)?,
            heights: build("heights", &profile.heights)?,
            weights: build("weights", &profile.weights)?,
            ages: build("ages", &profile.ages)?,
            years_of_experience: build("years_of_experience", &profile.years_of_experience)?,
        })
    }
}

/// One sampled set of physical attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDraw {
    pub jersey: u32,
    pub height: u32,
    pub weight: u32,
    pub age: u32,
    pub years_of_experience: u32,
}

impl PositionSamplers {
    /// Draw each attribute independently.
    pub fn draw<R>(&self, rng: &mut R) -> AttributeDraw
    where
        R: Rng + ?Sized,
    {
        AttributeDraw {
            jersey: *self.jerseys.sample_with(rng),
            height: *self.heights.sample_with(rng),
            weight: *self.weights.sample_with(rng),
            age: *self.ages.sample_with(rng),
            years_of_experience: *self.years_of_experience.sample_with(rng),
        }
    }
}

/// Every distribution the player generator draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerBundle {
    positions: BTreeMap<Position, PositionSamplers>,
    first_names: EmpiricalCdf<String>,
    last_names: EmpiricalCdf<String>,
}

impl SamplerBundle {
    /// Build all CDFs from aggregated stats.
    ///
    /// Profiles keyed by codes outside [`Position`] are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::EmptyAggregation`] when no usable profile or name
    /// table exists, or [`SynthError::InvalidDistribution`] for a zero-total table.
    pub fn from_stats(stats: &AggregatedPlayerStats) -> Result<Self, SynthError> {
        let mut positions = BTreeMap::new();
        for (code, profile) in &stats.position_profile {
            let Some(position) = Position::from_code(code) else {
                log::debug!("ignoring profile for unsupported position {code:?}");
                continue;
            };
            positions.insert(position, PositionSamplers::from_profile(code, profile)?);
        }
        if positions.is_empty() {
            return Err(SynthError::EmptyAggregation {
                what: "position profiles",
            });
        }
        if stats.first_names.is_empty() {
            return Err(SynthError::EmptyAggregation {
                what: "first names",
            });
        }
        if stats.last_names.is_empty() {
            return Err(SynthError::EmptyAggregation { what: "last names" });
        }

        Ok(Self {
            positions,
            first_names: EmpiricalCdf::build("first_names", &stats.first_names)?,
            last_names: EmpiricalCdf::build("last_names", &stats.last_names)?,
        })
    }

    #[must_use]
    pub fn position(&self, position: Position) -> Option<&PositionSamplers> {
        self.positions.get(&position)
    }

    /// Positions that have a usable profile, in enum order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.keys().copied()
    }

    #[must_use]
    pub const fn first_names(&self) -> &EmpiricalCdf<String> {
        &self.first_names
    }

    #[must_use]
    pub const fn last_names(&self) -> &EmpiricalCdf<String> {
        &self.last_names
    }
}

/// Lazily builds a [`SamplerBundle`] exactly once from its aggregator.
///
/// Concurrent first callers block until the winner finishes; a failed build is
/// returned to the caller and retried on the next access.
#[derive(Debug)]
pub struct SamplerCache<A> {
    aggregator: A,
    bundle: OnceCell<SamplerBundle>,
}

impl<A: StatsAggregator> SamplerCache<A> {
    #[must_use]
    pub const fn new(aggregator: A) -> Self {
        Self {
            aggregator,
            bundle: OnceCell::new(),
        }
    }

    /// Get the cached bundle, building it on first use.
    ///
    /// # Errors
    ///
    /// Propagates aggregation and CDF construction failures.
    pub fn bundle(&self) -> Result<&SamplerBundle, SynthError> {
        self.bundle.get_or_try_init(|| {
            log::debug!("building sampler bundle");
            let stats = self.aggregator.aggregate()?;
            SamplerBundle::from_stats(&stats)
        })
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.bundle.get().is_some()
    }

    #[must_use]
    pub const fn aggregator(&self) -> &A {
        &self.aggregator
    }
}
