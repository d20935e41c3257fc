//! Raw per-game stat sampling for each position.
//!
//! Each generator is a pure function of the RNG; dispatch goes through
//! [`STAT_GENERATORS`], so supporting a new position means adding a variant and a row.
use rand::RngCore;

use crate::position::Position;
use crate::ranges::normal_int_in_range;
use crate::stats::SeasonStatLine;

/// Signature shared by every per-position generator.
pub type GameStatFn = fn(&mut dyn RngCore) -> SeasonStatLine;

/// Position → generator lookup table.
pub const STAT_GENERATORS: [(Position, GameStatFn); 5] = [
    (Position::Quarterback, quarterback_game),
    (Position::RunningBack, running_back_game),
    (Position::WideReceiver, wide_receiver_game),
    (Position::TightEnd, tight_end_game),
    (Position::Kicker, kicker_game),
];

/// Look up the generator registered for `position`.
#[must_use]
pub fn generator_for(position: Position) -> Option<GameStatFn> {
    STAT_GENERATORS
        .iter()
        .find(|(candidate, _)| *candidate == position)
        .map(|(_, generator)| *generator)
}

/// Sample one game's raw stats for `position`.
///
/// A position without a registered generator yields an all-zero line.
pub fn generate_game_stats(position: Position, rng: &mut dyn RngCore) -> SeasonStatLine {
    generator_for(position).map_or_else(SeasonStatLine::zero, |generate| generate(rng))
}

/// Sample one game's raw stats from a position abbreviation.
///
/// Unrecognized codes yield an all-zero line rather than an error.
pub fn game_stats_for_code(code: &str, rng: &mut dyn RngCore) -> SeasonStatLine {
    match Position::from_code(code) {
        Some(position) => generate_game_stats(position, rng),
        None => {
            log::debug!("no stat generator for position code {code:?}; returning zero line");
            SeasonStatLine::zero()
        }
    }
}

fn fumbles(rng: &mut dyn RngCore) -> (u32, u32) {
    let fumbles = normal_int_in_range(0, 1, rng);
    let lost = normal_int_in_range(0, fumbles, rng);
    (fumbles, lost)
}

pub fn quarterback_game(rng: &mut dyn RngCore) -> SeasonStatLine {
    let passing_tds = normal_int_in_range(0, 4, rng);
    let passing_interceptions = normal_int_in_range(0, 2, rng);
    let passing_attempts = normal_int_in_range(25, 45, rng);
    let passing_completions = normal_int_in_range(15, 32, rng);
    let yards_per_completion = normal_int_in_range(8, 14, rng);
    let rushing_attempts = normal_int_in_range(1, 6, rng);
    let rushing_yards = normal_int_in_range(5, 35, rng);
    let rushing_tds = normal_int_in_range(0, 1, rng);
    let (fumbles, fumbles_lost) = fumbles(rng);

    SeasonStatLine {
        passing_attempts,
        passing_completions,
        passing_interceptions,
        passing_tds,
        passing_yards: passing_completions.saturating_mul(yards_per_completion),
        rushing_attempts,
        rushing_yards,
        rushing_tds,
        fumbles,
        fumbles_lost,
        ..SeasonStatLine::zero()
    }
}

pub fn running_back_game(rng: &mut dyn RngCore) -> SeasonStatLine {
    let rushing_attempts = normal_int_in_range(12, 25, rng);
    let yards_per_carry = normal_int_in_range(4, 6, rng);
    let rushing_tds = normal_int_in_range(0, 2, rng);
    let (fumbles, fumbles_lost) = fumbles(rng);
    let receiving_receptions = normal_int_in_range(2, 6, rng);
    let receiving_targets = normal_int_in_range(3, 8, rng);
    let yards_per_catch = normal_int_in_range(6, 12, rng);
    let receiving_tds = normal_int_in_range(0, 1, rng);

    SeasonStatLine {
        rushing_attempts,
        rushing_yards: rushing_attempts.saturating_mul(yards_per_carry),
        rushing_tds,
        receiving_receptions,
        receiving_targets,
        receiving_yards: receiving_receptions.saturating_mul(yards_per_catch),
        receiving_tds,
        fumbles,
        fumbles_lost,
        ..SeasonStatLine::zero()
    }
}

pub fn wide_receiver_game(rng: &mut dyn RngCore) -> SeasonStatLine {
    let receiving_receptions = normal_int_in_range(4, 10, rng);
    let receiving_targets = normal_int_in_range(6, 14, rng);
    let yards_per_catch = normal_int_in_range(12, 18, rng);
    let rushing_attempts = normal_int_in_range(0, 2, rng);
    let yards_per_carry = normal_int_in_range(5, 14, rng);
    let rushing_tds = normal_int_in_range(0, 1, rng);
    let receiving_tds = normal_int_in_range(0, 2, rng);
    let (fumbles, fumbles_lost) = fumbles(rng);

    SeasonStatLine {
        rushing_attempts,
        rushing_yards: rushing_attempts.saturating_mul(yards_per_carry),
        rushing_tds,
        receiving_receptions,
        receiving_targets,
        receiving_yards: receiving_receptions.saturating_mul(yards_per_catch),
        receiving_tds,
        fumbles,
        fumbles_lost,
        ..SeasonStatLine::zero()
    }
}

pub fn tight_end_game(rng: &mut dyn RngCore) -> SeasonStatLine {
    let receiving_receptions = normal_int_in_range(3, 8, rng);
    let receiving_targets = normal_int_in_range(5, 11, rng);
    let yards_per_catch = normal_int_in_range(10, 14, rng);
    let rushing_attempts = normal_int_in_range(0, 1, rng);
    let yards_per_carry = normal_int_in_range(4, 10, rng);
    let rushing_tds = normal_int_in_range(0, 1, rng);
    let receiving_tds = normal_int_in_range(0, 1, rng);
    let (fumbles, fumbles_lost) = fumbles(rng);

    SeasonStatLine {
        rushing_attempts,
        rushing_yards: rushing_attempts.saturating_mul(yards_per_carry),
        rushing_tds,
        receiving_receptions,
        receiving_targets,
        receiving_yards: receiving_receptions.saturating_mul(yards_per_catch),
        receiving_tds,
        fumbles,
        fumbles_lost,
        ..SeasonStatLine::zero()
    }
}

pub fn kicker_game(rng: &mut dyn RngCore) -> SeasonStatLine {
    let field_goals = normal_int_in_range(0, 50, rng);
    let field_goals_made = normal_int_in_range(0, field_goals, rng);
    let field_goals_blocked = normal_int_in_range(0, 5, rng);
    let field_goals_blocked_made = normal_int_in_range(0, field_goals_blocked, rng);
    let extra_points = normal_int_in_range(0, 2, rng);
    let extra_points_made = normal_int_in_range(0, extra_points, rng);

    SeasonStatLine {
        field_goals,
        field_goals_made,
        field_goals_missed: field_goals - field_goals_made,
        field_goals_blocked,
        field_goals_blocked_made,
        extra_points,
        extra_points_made,
        extra_points_missed: extra_points - extra_points_made,
        ..SeasonStatLine::zero()
    }
}
