//! Counting statistics for a single game or an accumulated season.
use serde::{Deserialize, Serialize};

macro_rules! stat_line {
    ($($field:ident),+ $(,)?) => {
        /// Per-game or per-season counting statistics.
        ///
        /// Serializes to a flat object of snake_case integer counters, which is the
        /// payload stored alongside a player id and year.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub struct SeasonStatLine {
            $(
                #[serde(default)]
                pub $field: u32,
            )+
        }

        impl SeasonStatLine {
            /// Counter names in declaration order.
            pub const FIELD_NAMES: &'static [&'static str] = &[$(stringify!($field)),+];

            /// Apply `f` to every counter independently.
            #[must_use]
            pub fn map(&self, mut f: impl FnMut(u32) -> u32) -> Self {
                Self {
                    $($field: f(self.$field),)+
                }
            }

            /// Combine two lines counter by counter.
            #[must_use]
            pub fn zip_with(&self, other: &Self, mut f: impl FnMut(u32, u32) -> u32) -> Self {
                Self {
                    $($field: f(self.$field, other.$field),)+
                }
            }

            /// `(name, value)` pairs in declaration order.
            #[must_use]
            pub fn fields(&self) -> Vec<(&'static str, u32)> {
                vec![$((stringify!($field), self.$field)),+]
            }
        }
    };
}

stat_line!(
    passing_attempts,
    passing_completions,
    passing_interceptions,
    passing_tds,
    passing_yards,
    rushing_attempts,
    rushing_yards,
    rushing_tds,
    receiving_receptions,
    receiving_targets,
    receiving_yards,
    receiving_tds,
    fumbles,
    fumbles_lost,
    field_goals,
    field_goals_made,
    field_goals_missed,
    field_goals_blocked,
    field_goals_blocked_made,
    extra_points,
    extra_points_made,
    extra_points_missed,
);

impl SeasonStatLine {
    /// A line with every counter at zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Add another line into this one, saturating at `u32::MAX`.
    pub fn accumulate(&mut self, other: &Self) {
        *self = self.zip_with(other, u32::saturating_add);
    }

    /// Multiply every counter by `factor`, saturating at `u32::MAX`.
    #[must_use]
    pub fn times(&self, factor: u32) -> Self {
        self.map(|value| value.saturating_mul(factor))
    }

    /// Sum of every counter; handy for coarse "did anything happen" checks.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.fields()
            .into_iter()
            .map(|(_, value)| u64::from(value))
            .sum()
    }
}
