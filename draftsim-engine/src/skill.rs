//! Skill factor sources: an open bell curve and a depth-chart model.
use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::numbers::usize_to_f64;

pub const DEPTH_SKILL_MIN: f64 = 0.15;
pub const DEPTH_SKILL_MAX: f64 = 0.95;
const DEPTH_STARTER_MEAN: f64 = 0.80;
const DEPTH_MEAN_SPREAD: f64 = 0.45;
const DEPTH_STD_DEV: f64 = 0.08;

/// Anything that can hand out a skill factor for a new player.
pub trait SkillSource {
    fn draw_skill(&self, rng: &mut dyn RngCore) -> f64;
}

/// Normal skill draw with no clamping; values outside `[0, 1]` are possible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BellCurveSkill {
    pub mean: f64,
    pub std_dev: f64,
}

impl Default for BellCurveSkill {
    fn default() -> Self {
        Self {
            mean: 0.5,
            std_dev: 0.2,
        }
    }
}

impl SkillSource for BellCurveSkill {
    fn draw_skill(&self, rng: &mut dyn RngCore) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        z.mul_add(self.std_dev, self.mean)
    }
}

/// Skill for the player in `slot` (0 = starter) of a position group of `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthChartSkill {
    pub slot: usize,
    pub total: usize,
}

impl DepthChartSkill {
    #[must_use]
    pub const fn new(slot: usize, total: usize) -> Self {
        Self { slot, total }
    }

    /// `slot / max(total - 1, 1)`; 0.0 for the starter, 1.0 for the deepest backup.
    #[must_use]
    pub fn depth_ratio(&self) -> f64 {
        let denominator = self.total.saturating_sub(1).max(1);
        usize_to_f64(self.slot) / usize_to_f64(denominator)
    }

    /// Centre of the skill distribution for this slot.
    #[must_use]
    pub fn base_mean(&self) -> f64 {
        DEPTH_STARTER_MEAN - self.depth_ratio() * DEPTH_MEAN_SPREAD
    }
}

impl SkillSource for DepthChartSkill {
    fn draw_skill(&self, rng: &mut dyn RngCore) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        z.mul_add(DEPTH_STD_DEV, self.base_mean())
            .clamp(DEPTH_SKILL_MIN, DEPTH_SKILL_MAX)
    }
}

/// Always returns the same skill; useful when a caller wants to pin the factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedSkill(pub f64);

impl SkillSource for FixedSkill {
    fn draw_skill(&self, _rng: &mut dyn RngCore) -> f64 {
        self.0
    }
}
