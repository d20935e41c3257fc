//! Empirical cumulative distributions built from observed frequency tables.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SynthError;
use crate::numbers::u64_to_f64;

/// Observed value → occurrence count. Ordered keys keep CDF construction deterministic.
pub type FrequencyTable<T> = BTreeMap<T, u32>;

/// Sorted values paired with their cumulative probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalCdf<T> {
    values: Vec<T>,
    cumulative: Vec<f64>,
}

impl<T: Ord + Clone> EmpiricalCdf<T> {
    /// Build a CDF from a frequency table.
    ///
    /// Zero-count entries are dropped so they can never be drawn.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::InvalidDistribution`] when the table's total count is zero.
    pub fn build(attribute: &str, table: &FrequencyTable<T>) -> Result<Self, SynthError> {
        let total: u64 = table.values().map(|count| u64::from(*count)).sum();
        if total == 0 {
            return Err(SynthError::invalid_distribution(attribute));
        }

        let mut values = Vec::with_capacity(table.len());
        let mut cumulative = Vec::with_capacity(table.len());
        let mut running = 0_u64;
        for (value, count) in table {
            if *count == 0 {
                continue;
            }
            running += u64::from(*count);
            values.push(value.clone());
            cumulative.push(u64_to_f64(running) / u64_to_f64(total));
        }
        // Float division can leave the tail a hair under 1.0.
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }

        Ok(Self { values, cumulative })
    }

    /// Map a draw in `[0, 1)` to a value.
    ///
    /// Returns the value at the smallest index whose cumulative probability is
    /// `>= draw`. A draw landing exactly on a boundary selects the value that owns
    /// that boundary (the lower neighbor); draws at or past the final boundary
    /// select the last value.
    #[must_use]
    pub fn sample(&self, draw: f64) -> &T {
        let idx = self.cumulative.partition_point(|p| *p < draw);
        let last = self.values.len().saturating_sub(1);
        &self.values[idx.min(last)]
    }

    /// Draw a value using the supplied RNG.
    pub fn sample_with<R>(&self, rng: &mut R) -> &T
    where
        R: Rng + ?Sized,
    {
        self.sample(rng.r#gen::<f64>())
    }

    /// Probability mass of a single value (0.0 when absent).
    #[must_use]
    pub fn probability_of(&self, value: &T) -> f64 {
        match self.values.binary_search(value) {
            Ok(0) => self.cumulative[0],
            Ok(idx) => self.cumulative[idx] - self.cumulative[idx - 1],
            Err(_) => 0.0,
        }
    }

    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.cumulative
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a successfully built CDF.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
