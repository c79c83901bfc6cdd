//! Selection of the best scoring part of a sample batch.

use crate::sample::Sample;
use crate::spvar_error::{SpvarError, SpvarResult};
use std::cmp::Ordering;

/// Which direction of the objective counts as better.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

impl ObjectiveSense {
    /// Orders two objective values best first.
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        match self {
            Self::Minimize => a.total_cmp(&b),
            Self::Maximize => b.total_cmp(&a),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Minimize" => Some(Self::Minimize),
            "Maximize" => Some(Self::Maximize),
            _ => None,
        }
    }
}

/// Number of samples kept from a batch of `batch_size` for a given elite fraction.
pub fn elite_size(batch_size: usize, elite_fraction: f64) -> SpvarResult<usize> {
    if !(elite_fraction > 0.0 && elite_fraction <= 1.0) {
        return Err(SpvarError::InvalidParameter(format!(
            "elite fraction must lie in (0, 1], got {elite_fraction}"
        )));
    }

    let k = (batch_size as f64 * elite_fraction).floor() as usize;
    if k == 0 {
        return Err(SpvarError::InvalidParameter(format!(
            "elite fraction {elite_fraction} of a batch of {batch_size} selects no samples"
        )));
    }

    Ok(k)
}

/// Returns the best `floor(len * elite_fraction)` samples, best first.
///
/// The sort is stable, so equal objective values keep their order in the batch and the result is
/// deterministic for a given batch.
///
/// # Errors
///
/// `InvalidParameter` if the batch is empty, the fraction is outside (0, 1] or the elite set would
/// be empty.
pub fn select_elite<'a>(
    samples: &'a [Sample],
    elite_fraction: f64,
    sense: ObjectiveSense,
) -> SpvarResult<Vec<&'a Sample>> {
    if samples.is_empty() {
        return Err(SpvarError::InvalidParameter(
            "cannot select an elite set from an empty batch".to_string(),
        ));
    }

    let k = elite_size(samples.len(), elite_fraction)?;

    let mut ordered: Vec<&Sample> = samples.iter().collect();
    ordered.sort_by(|a, b| sense.compare(a.energy, b.energy));
    ordered.truncate(k);

    Ok(ordered)
}

/// The best sample of a batch, the earliest one wins ties.
pub fn best_sample(samples: &[Sample], sense: ObjectiveSense) -> Option<&Sample> {
    samples
        .iter()
        .reduce(|best, x| match sense.compare(x.energy, best.energy) {
            Ordering::Less => x,
            _ => best,
        })
}
