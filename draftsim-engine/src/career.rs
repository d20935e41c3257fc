//! Season and career simulation with a per-game injury state machine.
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adjust::adjust_stat_line;
use crate::generators::generate_game_stats;
use crate::player::{Clock, PlayerProfile, SystemClock};
use crate::position::Position;
use crate::ranges::normal_int_in_range;
use crate::stats::SeasonStatLine;

pub const DEFAULT_GAMES_PER_SEASON: u32 = 18;
pub const MIN_GAMES_MISSED: u32 = 1;
pub const MAX_GAMES_MISSED: u32 = 20;

/// `(age, position, rng)` → games missed if an injury happens this game.
pub type InjuryRoller = Box<dyn Fn(u32, Position, &mut dyn RngCore) -> Option<u32> + Send + Sync>;
/// `(player, years_of_experience, rng)` → raw stats for one game.
pub type StatGenerator =
    Box<dyn Fn(&PlayerProfile, u32, &mut dyn RngCore) -> SeasonStatLine + Send + Sync>;
/// `(player, years_of_experience, raw)` → adjusted stats for one game.
pub type StatMultiplier =
    Box<dyn Fn(&PlayerProfile, u32, &SeasonStatLine) -> SeasonStatLine + Send + Sync>;

/// Per-game availability within a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjuryState {
    #[default]
    Healthy,
    Injured { remaining_games: u32 },
}

impl InjuryState {
    /// Spend one game on the sideline.
    #[must_use]
    pub const fn sit_out(self) -> Self {
        match self {
            Self::Healthy => Self::Healthy,
            Self::Injured { remaining_games } if remaining_games <= 1 => Self::Healthy,
            Self::Injured { remaining_games } => Self::Injured {
                remaining_games: remaining_games - 1,
            },
        }
    }

    #[must_use]
    pub const fn is_injured(self) -> bool {
        matches!(self, Self::Injured { .. })
    }
}

/// Per-game injury probability for an age bracket, before the position factor.
#[must_use]
pub const fn base_injury_rate(age: u32) -> f64 {
    match age {
        0..25 => 0.04,
        25..30 => 0.06,
        30..35 => 0.10,
        _ => 0.12,
    }
}

#[must_use]
pub fn injury_probability(age: u32, position: Position) -> f64 {
    base_injury_rate(age) * position.injury_factor()
}

/// Roll once for an injury; on a hit, sample how many games are missed.
pub fn roll_for_injury(age: u32, position: Position, rng: &mut dyn RngCore) -> Option<u32> {
    let draw: f64 = rng.r#gen();
    (draw < injury_probability(age, position))
        .then(|| normal_int_in_range(MIN_GAMES_MISSED, MAX_GAMES_MISSED, rng))
}

/// One simulated year for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub player_id: Uuid,
    pub year: i32,
    pub stats: SeasonStatLine,
}

/// Seasons in ascending, contiguous year order.
pub type CareerRecord = Vec<SeasonRecord>;

/// Season totals plus availability counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub stats: SeasonStatLine,
    pub games_played: u32,
    pub games_missed: u32,
    pub injuries: u32,
}

/// Walks players through seasons; every collaborator can be swapped out.
pub struct CareerSimulator {
    clock: Box<dyn Clock>,
    games_per_season: u32,
    injury_roller: InjuryRoller,
    stat_generator: StatGenerator,
    stat_multiplier: StatMultiplier,
}

impl Default for CareerSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CareerSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CareerSimulator")
            .field("current_year", &self.clock.current_year())
            .field("games_per_season", &self.games_per_season)
            .finish_non_exhaustive()
    }
}

impl CareerSimulator {
    /// Production defaults: system clock, 18 games, the real roller, generators and adjustment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Box::new(SystemClock),
            games_per_season: DEFAULT_GAMES_PER_SEASON,
            injury_roller: Box::new(roll_for_injury),
            stat_generator: Box::new(|player: &PlayerProfile, _yoe: u32, rng: &mut dyn RngCore| {
                generate_game_stats(player.position, rng)
            }),
            stat_multiplier: Box::new(|player: &PlayerProfile, yoe: u32, raw: &SeasonStatLine| {
                adjust_stat_line(raw, player.skill, yoe)
            }),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// A zero game count is ignored.
    #[must_use]
    pub fn with_games_per_season(mut self, games: u32) -> Self {
        if games > 0 {
            self.games_per_season = games;
        }
        self
    }

    #[must_use]
    pub fn with_injury_roller(
        mut self,
        roller: impl Fn(u32, Position, &mut dyn RngCore) -> Option<u32> + Send + Sync + 'static,
    ) -> Self {
        self.injury_roller = Box::new(roller);
        self
    }

    #[must_use]
    pub fn with_stat_generator(
        mut self,
        generator: impl Fn(&PlayerProfile, u32, &mut dyn RngCore) -> SeasonStatLine
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.stat_generator = Box::new(generator);
        self
    }

    #[must_use]
    pub fn with_stat_multiplier(
        mut self,
        multiplier: impl Fn(&PlayerProfile, u32, &SeasonStatLine) -> SeasonStatLine
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.stat_multiplier = Box::new(multiplier);
        self
    }

    #[must_use]
    pub const fn games_per_season(&self) -> u32 {
        self.games_per_season
    }

    #[must_use]
    pub fn current_year(&self) -> i32 {
        self.clock.current_year()
    }

    /// Simulate every season from the draft year up to, not including, the current year.
    ///
    /// A player drafted this year (or later) gets a single all-zero season for the
    /// current year.
    pub fn create_career(&self, player: &PlayerProfile, rng: &mut dyn RngCore) -> CareerRecord {
        let current_year = self.clock.current_year();
        if player.draft_year >= current_year {
            log::debug!("{} is a rookie; no seasons simulated", player.full_name());
            return vec![SeasonRecord {
                player_id: player.id,
                year: current_year,
                stats: SeasonStatLine::zero(),
            }];
        }

        let career: CareerRecord = (player.draft_year..current_year)
            .map(|year| self.create_year(player, year, rng))
            .collect();
        log::debug!(
            "simulated {} seasons for {} ({})",
            career.len(),
            player.full_name(),
            player.position
        );
        career
    }

    pub fn create_year(
        &self,
        player: &PlayerProfile,
        year: i32,
        rng: &mut dyn RngCore,
    ) -> SeasonRecord {
        SeasonRecord {
            player_id: player.id,
            year,
            stats: self.simulate_year(player, year, rng),
        }
    }

    /// Accumulated stats for `year`.
    pub fn simulate_year(
        &self,
        player: &PlayerProfile,
        year: i32,
        rng: &mut dyn RngCore,
    ) -> SeasonStatLine {
        self.simulate_season(player, year, rng).stats
    }

    /// Play out one season game by game.
    ///
    /// The game in which an injury is rolled still counts; the player sits out
    /// the following `remaining_games` games. Injury state does not carry into
    /// the next season.
    pub fn simulate_season(
        &self,
        player: &PlayerProfile,
        year: i32,
        rng: &mut dyn RngCore,
    ) -> SeasonSummary {
        let years_of_experience = u32::try_from(year - player.draft_year).unwrap_or(0);
        let mut state = InjuryState::Healthy;
        let mut summary = SeasonSummary::default();

        for _ in 0..self.games_per_season {
            if state.is_injured() {
                state = state.sit_out();
                summary.games_missed += 1;
                continue;
            }

            if let Some(games) = (self.injury_roller)(player.age, player.position, &mut *rng)
                && games > 0
            {
                state = InjuryState::Injured {
                    remaining_games: games,
                };
                summary.injuries += 1;
            }

            let raw = (self.stat_generator)(player, years_of_experience, &mut *rng);
            let adjusted = (self.stat_multiplier)(player, years_of_experience, &raw);
            summary.stats.accumulate(&adjusted);
            summary.games_played += 1;
        }

        log::debug!(
            "{} {year}: played {}, missed {}",
            player.full_name(),
            summary.games_played,
            summary.games_missed
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{FixedClock, PlayerStatus};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn player(draft_year: i32) -> PlayerProfile {
        PlayerProfile {
            id: Uuid::from_u64_pair(1, 1),
            first_name: "Test".to_string(),
            last_name: "Player".to_string(),
            position: Position::Quarterback,
            team_id: Uuid::nil(),
            jersey: 9,
            height: 75,
            weight: 220,
            age: 27,
            years_of_experience: 5,
            draft_year,
            status: PlayerStatus::Active,
            skill: 0.8,
        }
    }

    fn per_game() -> SeasonStatLine {
        SeasonStatLine {
            passing_yards: 250,
            passing_tds: 2,
            ..SeasonStatLine::default()
        }
    }

    fn stubbed(calls: &Arc<AtomicU32>) -> CareerSimulator {
        let counter = Arc::clone(calls);
        CareerSimulator::new()
            .with_clock(FixedClock(2025))
            .with_injury_roller(|_, _, _| None)
            .with_stat_generator(move |_, _, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                per_game()
            })
            .with_stat_multiplier(|_, _, raw| *raw)
    }

    #[test]
    fn rookie_gets_one_empty_season() {
        let calls = Arc::new(AtomicU32::new(0));
        let sim = stubbed(&calls);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let career = sim.create_career(&player(2025), &mut rng);
        assert_eq!(career.len(), 1);
        assert_eq!(career[0].year, 2025);
        assert!(career[0].stats.is_zero());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn veteran_gets_one_season_per_year() {
        let calls = Arc::new(AtomicU32::new(0));
        let sim = stubbed(&calls);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let career = sim.create_career(&player(2020), &mut rng);
        let years: Vec<i32> = career.iter().map(|season| season.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022, 2023, 2024]);
        assert!(career.iter().all(|season| season.player_id == Uuid::from_u64_pair(1, 1)));
        assert_eq!(calls.load(Ordering::SeqCst), 5 * 18);
    }

    #[test]
    fn healthy_season_is_per_game_times_games() {
        let calls = Arc::new(AtomicU32::new(0));
        let sim = stubbed(&calls);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let stats = sim.simulate_year(&player(2020), 2024, &mut rng);
        assert_eq!(stats, per_game().times(18));
        assert_eq!(stats.passing_yards, 250 * 18);
    }

    #[test]
    fn injury_removes_games_from_the_season() {
        for missed in [1_u32, 5, 12, 17] {
            let calls = Arc::new(AtomicU32::new(0));
            let played = Arc::clone(&calls);
            let sim = stubbed(&calls).with_injury_roller(move |_, _, _| {
                // First roll of the season happens before the first game's stats.
                (played.load(Ordering::SeqCst) == 0).then_some(missed)
            });
            let mut rng = ChaCha8Rng::seed_from_u64(4);
            let summary = sim.simulate_season(&player(2020), 2024, &mut rng);
            assert_eq!(calls.load(Ordering::SeqCst), 18 - missed);
            assert_eq!(summary.games_played, 18 - missed);
            assert_eq!(summary.games_missed, missed);
            assert_eq!(summary.injuries, 1);
            assert_eq!(summary.stats.passing_yards, 250 * (18 - missed));
        }
    }

    #[test]
    fn mid_season_injury_counts_the_injury_game() {
        let calls = Arc::new(AtomicU32::new(0));
        let played = Arc::clone(&calls);
        let sim = stubbed(&calls)
            .with_injury_roller(move |_, _, _| (played.load(Ordering::SeqCst) == 10).then_some(5));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let summary = sim.simulate_season(&player(2020), 2025, &mut rng);
        assert_eq!(summary.games_played, 13);
        assert_eq!(summary.stats.passing_yards, 250 * 13);
    }

    #[test]
    fn injury_longer_than_season_ends_it() {
        let calls = Arc::new(AtomicU32::new(0));
        let sim = stubbed(&calls).with_injury_roller(|_, _, _| Some(20));
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let summary = sim.simulate_season(&player(2020), 2024, &mut rng);
        assert_eq!(summary.games_played, 1);
        assert_eq!(summary.games_missed, 17);
    }

    #[test]
    fn multiplier_sees_experience_since_draft() {
        let seen = Arc::new(AtomicU32::new(u32::MAX));
        let recorder = Arc::clone(&seen);
        let sim = CareerSimulator::new()
            .with_clock(FixedClock(2025))
            .with_games_per_season(1)
            .with_injury_roller(|_, _, _| None)
            .with_stat_multiplier(move |_, yoe, raw| {
                recorder.store(yoe, Ordering::SeqCst);
                *raw
            });
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let _ = sim.simulate_year(&player(2019), 2023, &mut rng);
        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn default_pipeline_produces_position_shaped_stats() {
        let sim = CareerSimulator::new()
            .with_clock(FixedClock(2025))
            .with_injury_roller(|_, _, _| None);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut kicker = player(2022);
        kicker.position = Position::Kicker;
        kicker.skill = 1.0;
        let stats = sim.simulate_year(&kicker, 2022, &mut rng);
        assert!(stats.field_goals > 0);
        assert_eq!(stats.passing_yards, 0);
        assert_eq!(stats.rushing_attempts, 0);
    }

    #[test]
    fn injury_state_counts_down() {
        let state = InjuryState::Injured { remaining_games: 2 };
        let state = state.sit_out();
        assert_eq!(state, InjuryState::Injured { remaining_games: 1 });
        assert_eq!(state.sit_out(), InjuryState::Healthy);
        assert_eq!(InjuryState::Healthy.sit_out(), InjuryState::Healthy);
    }

    #[test]
    fn injury_rates_follow_age_and_position() {
        assert!((base_injury_rate(24) - 0.04).abs() < f64::EPSILON);
        assert!((base_injury_rate(25) - 0.06).abs() < f64::EPSILON);
        assert!((base_injury_rate(34) - 0.10).abs() < f64::EPSILON);
        assert!((base_injury_rate(35) - 0.12).abs() < f64::EPSILON);
        assert!((injury_probability(40, Position::Kicker) - 0.03).abs() < 1e-12);
        assert!((injury_probability(22, Position::Quarterback) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn rolled_injuries_miss_one_to_twenty_games() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut hits = 0;
        for _ in 0..20_000 {
            if let Some(games) = roll_for_injury(36, Position::RunningBack, &mut rng) {
                hits += 1;
                assert!((MIN_GAMES_MISSED..=MAX_GAMES_MISSED).contains(&games));
            }
        }
        let rate = f64::from(hits) / 20_000.0;
        assert!((rate - 0.12).abs() < 0.015, "rate {rate}");
    }
}
