//! Bounded pseudo-normal sampling over closed ranges.
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::numbers::{round_f64_to_u32, u32_to_f64};

/// Draw from a normal centred on the midpoint of `[low, high]` with a standard
/// deviation of one sixth of the width, clamped back into the range.
pub fn normal_in_range<R>(low: f64, high: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    if high <= low {
        return low;
    }
    let mean = (low + high) / 2.0;
    let std_dev = (high - low) / 6.0;
    let z: f64 = StandardNormal.sample(rng);
    (z.mul_add(std_dev, mean)).clamp(low, high)
}

/// Integer flavour of [`normal_in_range`], rounded to the nearest whole value.
pub fn normal_int_in_range<R>(low: u32, high: u32, rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    if high <= low {
        return low;
    }
    let value = normal_in_range(u32_to_f64(low), u32_to_f64(high), rng);
    round_f64_to_u32(value).clamp(low, high)
}
