//! League generation end to end, persisted through an abstract store stage by stage.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::career::{CareerSimulator, SeasonRecord};
use crate::config::GenerationConfig;
use crate::error::SynthError;
use crate::league::{Conference, Division, League, Team, generate_league};
use crate::player::{FixedClock, IdSource, PlayerFactory, PlayerProfile, RandomIds};
use crate::rng::RngBundle;
use crate::roster::{TeamRoster, build_roster};
use crate::sampler::SamplerBundle;

/// Persistence steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Purge,
    Conferences,
    Divisions,
    Teams,
    Players,
    YearlyStats,
    Commit,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purge => "purge",
            Self::Conferences => "conferences",
            Self::Divisions => "divisions",
            Self::Teams => "teams",
            Self::Players => "players",
            Self::YearlyStats => "yearly-stats",
            Self::Commit => "commit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for generated records. Implementations decide what a
/// transaction means; the seeder only promises to call `commit` after every
/// insert succeeded and `rollback` otherwise.
pub trait SeedStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn purge(&mut self) -> Result<(), Self::Error>;
    fn insert_conference(&mut self, conference: &Conference) -> Result<(), Self::Error>;
    fn insert_division(&mut self, division: &Division) -> Result<(), Self::Error>;
    fn insert_team(&mut self, team: &Team) -> Result<(), Self::Error>;
    fn insert_player(&mut self, player: &PlayerProfile) -> Result<(), Self::Error>;
    fn insert_season(&mut self, season: &SeasonRecord) -> Result<(), Self::Error>;
    fn commit(&mut self) -> Result<(), Self::Error>;
    fn rollback(&mut self) -> Result<(), Self::Error>;
}

/// Why a seeding run stopped.
#[derive(Debug, Error)]
pub enum SeedError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Generation(#[from] SynthError),
    #[error("{stage} stage failed on {record}: {source}")]
    Store {
        stage: Stage,
        record: String,
        #[source]
        source: E,
    },
}

impl<E: std::error::Error + 'static> SeedError<E> {
    fn store(stage: Stage, record: impl Into<String>, source: E) -> Self {
        Self::Store {
            stage,
            record: record.into(),
            source,
        }
    }

    /// Stage that failed, if the failure came from the store.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Generation(_) => None,
            Self::Store { stage, .. } => Some(*stage),
        }
    }
}

/// Record counts written per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedReport {
    pub conferences: usize,
    pub divisions: usize,
    pub teams: usize,
    pub players: usize,
    pub seasons: usize,
}

/// Everything one run generates, before it touches a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueDocument {
    pub seed: u64,
    pub current_year: i32,
    pub league: League,
    pub rosters: Vec<TeamRoster>,
    pub seasons: Vec<SeasonRecord>,
}

impl LeagueDocument {
    pub fn players(&self) -> impl Iterator<Item = &PlayerProfile> {
        self.rosters.iter().flat_map(TeamRoster::players)
    }
}

/// Generates a league with rosters and careers, then writes it to a [`SeedStore`].
pub struct LeagueSeeder<'a> {
    bundle: &'a SamplerBundle,
    config: &'a GenerationConfig,
    ids: &'a dyn IdSource,
    seed: u64,
}

impl<'a> LeagueSeeder<'a> {
    #[must_use]
    pub fn new(bundle: &'a SamplerBundle, config: &'a GenerationConfig, seed: u64) -> Self {
        Self {
            bundle,
            config,
            ids: &RandomIds,
            seed,
        }
    }

    #[must_use]
    pub fn with_ids(mut self, ids: &'a dyn IdSource) -> Self {
        self.ids = ids;
        self
    }

    /// Build the full document from the seed; no store is involved.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError`] when the league or a roster cannot be generated.
    pub fn generate(&self) -> Result<LeagueDocument, SynthError> {
        let rngs = RngBundle::from_user_seed(self.seed);
        let current_year = self.config.clock().current_year();
        let clock = FixedClock(current_year);

        let league = generate_league(
            &self.config.league_layout(),
            self.ids,
            &mut *rngs.league(),
        )?;
        let factory = PlayerFactory::new(self.bundle, &clock, self.ids);
        let simulator = CareerSimulator::new()
            .with_clock(clock)
            .with_games_per_season(self.config.games_per_season);

        let mut rosters = Vec::with_capacity(league.teams.len());
        let mut seasons = Vec::new();
        for team in &league.teams {
            let roster = build_roster(team.id, &self.config.roster, &factory, &rngs)?;
            for player in roster.players() {
                seasons.extend(simulator.create_career(player, &mut *rngs.career()));
            }
            log::debug!("{}: {} players", team.display_name(), roster.len());
            rosters.push(roster);
        }

        log::info!(
            "generated {} teams, {} seasons for {current_year} (seed {:#x})",
            rosters.len(),
            seasons.len(),
            self.seed
        );
        Ok(LeagueDocument {
            seed: self.seed,
            current_year,
            league,
            rosters,
            seasons,
        })
    }

    /// Generate, then persist; the store is only touched once generation succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Generation`] or the first store failure.
    pub fn run<S: SeedStore>(
        &self,
        store: &mut S,
    ) -> Result<(LeagueDocument, SeedReport), SeedError<S::Error>> {
        let document = self.generate()?;
        let report = persist(&document, store)?;
        Ok((document, report))
    }
}

/// Write a document stage by stage and commit; on any failure roll back and
/// report the stage and record that failed.
///
/// # Errors
///
/// Returns [`SeedError::Store`] naming the failing stage and record.
pub fn persist<S: SeedStore>(
    document: &LeagueDocument,
    store: &mut S,
) -> Result<SeedReport, SeedError<S::Error>> {
    let outcome = insert_all(document, store).and_then(|report| {
        store
            .commit()
            .map_err(|source| SeedError::store(Stage::Commit, "transaction", source))?;
        Ok(report)
    });

    match outcome {
        Ok(report) => {
            log::info!(
                "seeded {} conferences, {} divisions, {} teams, {} players, {} seasons",
                report.conferences,
                report.divisions,
                report.teams,
                report.players,
                report.seasons
            );
            Ok(report)
        }
        Err(err) => {
            log::warn!("seeding failed, rolling back: {err}");
            if let Err(rollback) = store.rollback() {
                log::error!("rollback failed: {rollback}");
            }
            Err(err)
        }
    }
}

fn insert_all<S: SeedStore>(
    document: &LeagueDocument,
    store: &mut S,
) -> Result<SeedReport, SeedError<S::Error>> {
    let mut report = SeedReport::default();

    log::info!("stage {}", Stage::Purge);
    store
        .purge()
        .map_err(|source| SeedError::store(Stage::Purge, "all tables", source))?;

    log::info!("stage {}", Stage::Conferences);
    for conference in &document.league.conferences {
        store.insert_conference(conference).map_err(|source| {
            SeedError::store(Stage::Conferences, conference_label(conference), source)
        })?;
        report.conferences += 1;
    }

    log::info!("stage {}", Stage::Divisions);
    for division in &document.league.divisions {
        store.insert_division(division).map_err(|source| {
            SeedError::store(Stage::Divisions, format!("division {}", division.id), source)
        })?;
        report.divisions += 1;
    }

    log::info!("stage {}", Stage::Teams);
    for team in &document.league.teams {
        store.insert_team(team).map_err(|source| {
            SeedError::store(Stage::Teams, format!("team {} ({})", team.abbr, team.id), source)
        })?;
        report.teams += 1;
    }

    log::info!("stage {}", Stage::Players);
    for player in document.players() {
        store.insert_player(player).map_err(|source| {
            SeedError::store(
                Stage::Players,
                format!("player {} ({})", player.full_name(), player.id),
                source,
            )
        })?;
        report.players += 1;
    }

    log::info!("stage {}", Stage::YearlyStats);
    for season in &document.seasons {
        store.insert_season(season).map_err(|source| {
            SeedError::store(
                Stage::YearlyStats,
                format!("season {} for player {}", season.year, season.player_id),
                source,
            )
        })?;
        report.seasons += 1;
    }

    Ok(report)
}

fn conference_label(conference: &Conference) -> String {
    format!("conference {:?} ({})", conference.name, conference.id)
}

/// Rows held by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreTables {
    pub conferences: Vec<Conference>,
    pub divisions: Vec<Division>,
    pub teams: Vec<Team>,
    pub players: Vec<PlayerProfile>,
    pub seasons: Vec<SeasonRecord>,
}

impl StoreTables {
    fn is_empty(&self) -> bool {
        self.conferences.is_empty()
            && self.divisions.is_empty()
            && self.teams.is_empty()
            && self.players.is_empty()
            && self.seasons.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    #[error("injected failure on {stage} insert #{index}")]
    Injected { stage: Stage, index: usize },
    #[error("duplicate key {key} in {table}")]
    Duplicate { table: &'static str, key: String },
    #[error("{table} row references missing parent {parent}")]
    MissingParent { table: &'static str, parent: Uuid },
}

/// In-process transactional store.
///
/// Inserts land in a pending set that `commit` publishes and `rollback`
/// discards. Keys must be unique and parents must exist in the same
/// transaction or in committed data that was not purged.
#[derive(Debug, Default)]
pub struct MemoryStore {
    committed: StoreTables,
    pending: StoreTables,
    purge_pending: bool,
    keys: HashSet<Uuid>,
    season_keys: HashSet<(Uuid, i32)>,
    inserts: Vec<(Stage, usize)>,
    fail_at: Option<(Stage, usize)>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `index`-th (zero based) insert of `stage`.
    #[must_use]
    pub fn failing_at(stage: Stage, index: usize) -> Self {
        Self {
            fail_at: Some((stage, index)),
            ..Self::default()
        }
    }

    /// Committed rows.
    #[must_use]
    pub const fn tables(&self) -> &StoreTables {
        &self.committed
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.purge_pending || !self.pending.is_empty()
    }

    fn visible_keys(&self) -> HashSet<Uuid> {
        if self.purge_pending {
            return HashSet::new();
        }
        let committed = &self.committed;
        committed
            .conferences
            .iter()
            .map(|row| row.id)
            .chain(committed.divisions.iter().map(|row| row.id))
            .chain(committed.teams.iter().map(|row| row.id))
            .chain(committed.players.iter().map(|row| row.id))
            .collect()
    }

    fn check_injected(&mut self, stage: Stage) -> Result<(), MemoryStoreError> {
        let index = match self.inserts.iter_mut().find(|(seen, _)| *seen == stage) {
            Some((_, count)) => {
                *count += 1;
                *count - 1
            }
            None => {
                self.inserts.push((stage, 1));
                0
            }
        };
        if self.fail_at == Some((stage, index)) {
            return Err(MemoryStoreError::Injected { stage, index });
        }
        Ok(())
    }

    fn claim(&mut self, table: &'static str, id: Uuid) -> Result<(), MemoryStoreError> {
        if !self.keys.insert(id) {
            return Err(MemoryStoreError::Duplicate {
                table,
                key: id.to_string(),
            });
        }
        Ok(())
    }

    fn require(&self, table: &'static str, parent: Uuid) -> Result<(), MemoryStoreError> {
        if self.keys.contains(&parent) {
            Ok(())
        } else {
            Err(MemoryStoreError::MissingParent { table, parent })
        }
    }
}

impl SeedStore for MemoryStore {
    type Error = MemoryStoreError;

    fn purge(&mut self) -> Result<(), Self::Error> {
        self.check_injected(Stage::Purge)?;
        self.pending = StoreTables::default();
        self.purge_pending = true;
        self.keys.clear();
        self.season_keys.clear();
        Ok(())
    }

    fn insert_conference(&mut self, conference: &Conference) -> Result<(), Self::Error> {
        self.check_injected(Stage::Conferences)?;
        self.claim("conferences", conference.id)?;
        self.pending.conferences.push(conference.clone());
        Ok(())
    }

    fn insert_division(&mut self, division: &Division) -> Result<(), Self::Error> {
        self.check_injected(Stage::Divisions)?;
        self.require("divisions", division.conference_id)?;
        self.claim("divisions", division.id)?;
        self.pending.divisions.push(division.clone());
        Ok(())
    }

    fn insert_team(&mut self, team: &Team) -> Result<(), Self::Error> {
        self.check_injected(Stage::Teams)?;
        self.require("teams", team.division_id)?;
        self.claim("teams", team.id)?;
        self.pending.teams.push(team.clone());
        Ok(())
    }

    fn insert_player(&mut self, player: &PlayerProfile) -> Result<(), Self::Error> {
        self.check_injected(Stage::Players)?;
        self.require("players", player.team_id)?;
        self.claim("players", player.id)?;
        self.pending.players.push(player.clone());
        Ok(())
    }

    fn insert_season(&mut self, season: &SeasonRecord) -> Result<(), Self::Error> {
        self.check_injected(Stage::YearlyStats)?;
        self.require("yearly_stats", season.player_id)?;
        if !self.season_keys.insert((season.player_id, season.year)) {
            return Err(MemoryStoreError::Duplicate {
                table: "yearly_stats",
                key: format!("{}/{}", season.player_id, season.year),
            });
        }
        self.pending.seasons.push(season.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        self.check_injected(Stage::Commit)?;
        let pending = std::mem::take(&mut self.pending);
        if std::mem::take(&mut self.purge_pending) {
            self.committed = pending;
        } else {
            self.committed.conferences.extend(pending.conferences);
            self.committed.divisions.extend(pending.divisions);
            self.committed.teams.extend(pending.teams);
            self.committed.players.extend(pending.players);
            self.committed.seasons.extend(pending.seasons);
        }
        self.inserts.clear();
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), Self::Error> {
        self.pending = StoreTables::default();
        self.purge_pending = false;
        self.keys = self.visible_keys();
        self.season_keys = self
            .committed
            .seasons
            .iter()
            .map(|season| (season.player_id, season.year))
            .collect();
        self.inserts.clear();
        Ok(())
    }
}
