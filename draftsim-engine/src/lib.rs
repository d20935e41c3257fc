//! Draftsim Engine
//!
//! Synthetic football player and career generation. Attribute frequencies from a
//! real-world corpus become empirical distributions; players drawn from them are
//! walked season by season through injuries and skill-scaled per-game stats.
//! No I/O happens here beyond the `log` facade; persistence goes through [`SeedStore`].

pub mod adjust;
pub mod aggregate;
pub mod career;
pub mod cdf;
pub mod config;
pub mod error;
pub mod generators;
pub mod league;
pub mod numbers;
pub mod player;
pub mod position;
pub mod ranges;
pub mod rng;
pub mod roster;
pub mod sampler;
pub mod seeder;
pub mod skill;
pub mod stats;

pub use adjust::{adjust_stat, adjust_stat_line};
pub use aggregate::{
    AggregatedPlayerStats, CorpusAggregator, NormalizedAthlete, PositionProfile, SkipReason,
    StaticStats, StatsAggregator, normalize_athlete,
};
pub use career::{
    CareerRecord, CareerSimulator, InjuryState, SeasonRecord, SeasonSummary, roll_for_injury,
};
pub use cdf::{EmpiricalCdf, FrequencyTable};
pub use config::{ConfigError, GenerationConfig};
pub use error::SynthError;
pub use generators::{game_stats_for_code, generate_game_stats};
pub use league::{Conference, Division, FRANCHISES, Franchise, League, LeagueLayout, Team};
pub use player::{
    Clock, FixedClock, IdSource, PlayerFactory, PlayerProfile, PlayerStatus, RandomIds,
    SequentialIds, SystemClock,
};
pub use position::Position;
pub use rng::RngBundle;
pub use roster::{RosterComposition, TeamRoster, build_roster};
pub use sampler::{SamplerBundle, SamplerCache};
pub use seeder::{
    LeagueDocument, LeagueSeeder, MemoryStore, MemoryStoreError, SeedError, SeedReport,
    SeedStore, Stage, persist,
};
pub use skill::{BellCurveSkill, DepthChartSkill, FixedSkill, SkillSource};
pub use stats::SeasonStatLine;

use uuid::Uuid;

/// One generated player together with their simulated career.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayerCareer {
    pub player: PlayerProfile,
    pub career: CareerRecord,
}

/// Main entry point tying an aggregator, its cached samplers and the
/// generation settings together.
pub struct DraftsimEngine<A>
where
    A: StatsAggregator,
{
    samplers: SamplerCache<A>,
    config: GenerationConfig,
}

impl<A> DraftsimEngine<A>
where
    A: StatsAggregator,
{
    /// Create an engine; nothing is aggregated until first use.
    pub const fn new(aggregator: A, config: GenerationConfig) -> Self {
        Self {
            samplers: SamplerCache::new(aggregator),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Cached distributions, built on first call.
    ///
    /// # Errors
    ///
    /// Returns an error if aggregation fails or yields unusable tables.
    pub fn samplers(&self) -> Result<&SamplerBundle, SynthError> {
        self.samplers.bundle()
    }

    /// Generate a full league document for `seed` without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or generation fails.
    pub fn generate_league(&self, seed: u64) -> Result<LeagueDocument, SynthError> {
        self.config.validate()?;
        LeagueSeeder::new(self.samplers()?, &self.config, seed).generate()
    }

    /// Generate a league for `seed` and write it into `store`.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] for generation failures or the first failing store stage.
    pub fn seed_league<S: SeedStore>(
        &self,
        seed: u64,
        store: &mut S,
    ) -> Result<(LeagueDocument, SeedReport), SeedError<S::Error>> {
        self.config.validate().map_err(SynthError::from)?;
        LeagueSeeder::new(self.samplers()?, &self.config, seed).run(store)
    }

    /// Generate a single bell-curve-skilled player and simulate their career.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::UnknownPosition`] if the position has no profile.
    pub fn generate_player(
        &self,
        position: Position,
        team_id: Option<Uuid>,
        seed: u64,
    ) -> Result<PlayerCareer, SynthError> {
        let rngs = RngBundle::from_user_seed(seed);
        let clock = FixedClock(self.config.clock().current_year());
        let ids = RandomIds;
        let team_id = team_id.unwrap_or_else(|| ids.next_id(&mut *rngs.ids()));

        let factory = PlayerFactory::new(self.samplers()?, &clock, &ids);
        let player = factory.create_player_from_streams(
            position,
            team_id,
            &BellCurveSkill::default(),
            &rngs,
        )?;
        let career = CareerSimulator::new()
            .with_clock(clock)
            .with_games_per_season(self.config.games_per_season)
            .create_career(&player, &mut *rngs.career());
        Ok(PlayerCareer { player, career })
    }
}
