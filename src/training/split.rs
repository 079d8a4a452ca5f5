//! Deterministic train/validation split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{Error, Result};

/// Smallest dataset the split accepts.
pub const MIN_SAMPLES: usize = 5;

/// Clamp range for the validation fraction.
pub const VAL_FRACTION_RANGE: (f64, f64) = (0.05, 0.5);

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Training row indices.
    pub train: Vec<usize>,
    /// Validation row indices.
    pub val: Vec<usize>,
}

impl Split {
    /// Whether training re-uses the validation rows (tiny datasets only).
    #[must_use]
    pub fn overlaps(&self) -> bool {
        self.train == self.val
    }
}

/// Round to nearest, ties to even.
fn round_half_even(x: f64) -> f64 {
    let r = x.round();
    if (x - x.trunc()).abs() == 0.5 && r % 2.0 != 0.0 {
        r - x.signum()
    } else {
        r
    }
}

/// Number of validation rows: `round(n * fraction)` with the fraction
/// clamped, and at least one.
#[must_use]
pub fn validation_size(n: usize, val_fraction: f64) -> usize {
    let (lo, hi) = VAL_FRACTION_RANGE;
    let fraction = if val_fraction.is_nan() { lo } else { val_fraction.clamp(lo, hi) };
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = round_half_even(n as f64 * fraction) as usize;
    rounded.max(1)
}

/// Shuffle `0..n` with `seed` and cut off the validation prefix.
///
/// # Errors
/// Returns `InsufficientData` for fewer than 5 samples
pub fn split_indices(n: usize, val_fraction: f64, seed: u64) -> Result<Split> {
    if n < MIN_SAMPLES {
        return Err(Error::InsufficientData(format!(
            "Need at least {MIN_SAMPLES} samples for training, got {n}"
        )));
    }
    let n_val = validation_size(n, val_fraction);

    let mut idx: Vec<usize> = (0..n).collect();
    idx.shuffle(&mut StdRng::seed_from_u64(seed));

    let train = idx.split_off(n_val.min(n));
    let val = idx;
    let train = if train.is_empty() { val.clone() } else { train };
    Ok(Split { train, val })
}
