//! Skill and experience scaling of raw game stats.
use crate::numbers::{floor_f64_to_u32, u32_to_f64};
use crate::stats::SeasonStatLine;

/// `floor(raw × (1 + years_of_experience / 100) × skill)`.
///
/// Negative products (an unclamped bell-curve skill can dip below zero) floor to 0.
#[must_use]
pub fn adjust_stat(raw: u32, skill: f64, years_of_experience: u32) -> u32 {
    if raw == 0 {
        return 0;
    }
    let experience_boost = 1.0 + u32_to_f64(years_of_experience) / 100.0;
    floor_f64_to_u32(u32_to_f64(raw) * experience_boost * skill)
}

/// Apply [`adjust_stat`] to every counter of a line.
#[must_use]
pub fn adjust_stat_line(
    line: &SeasonStatLine,
    skill: f64,
    years_of_experience: u32,
) -> SeasonStatLine {
    line.map(|raw| adjust_stat(raw, skill, years_of_experience))
}
