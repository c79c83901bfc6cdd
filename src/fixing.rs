//! Turns variable statistics into fixed spins.

use crate::spvar_error::{SpvarError, SpvarResult};
use crate::statistics::VariableStatistics;
use std::collections::BTreeMap;

/// Numerical slack added to the fixing threshold.
pub const FIXING_TOLERANCE: f64 = 1e-3;

/// Variables that are fixed to a spin. A variable can only be fixed once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedVariables {
    spins: BTreeMap<usize, i8>,
}

impl FixedVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes `variable` to `spin`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `spin` is not +1 or -1 and `InconsistentModel` if the variable is
    /// already fixed.
    pub fn insert(&mut self, variable: usize, spin: i8) -> SpvarResult<()> {
        if spin != 1 && spin != -1 {
            return Err(SpvarError::InvalidParameter(format!(
                "variable {variable} cannot be fixed to {spin}"
            )));
        }

        if self.spins.contains_key(&variable) {
            return Err(SpvarError::InconsistentModel(format!(
                "variable {variable} is fixed more than once"
            )));
        }

        self.spins.insert(variable, spin);
        Ok(())
    }

    /// Builds the map from `(variable, spin)` pairs, rejecting duplicates.
    pub fn from_pairs<I: IntoIterator<Item = (usize, i8)>>(pairs: I) -> SpvarResult<Self> {
        let mut fixed = Self::new();
        for (variable, spin) in pairs {
            fixed.insert(variable, spin)?;
        }
        Ok(fixed)
    }

    pub fn get(&self, variable: usize) -> Option<i8> {
        self.spins.get(&variable).copied()
    }

    pub fn contains(&self, variable: usize) -> bool {
        self.spins.contains_key(&variable)
    }

    pub fn len(&self) -> usize {
        self.spins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, i8)> + '_ {
        self.spins.iter().map(|(&i, &s)| (i, s))
    }

    pub const fn as_map(&self) -> &BTreeMap<usize, i8> {
        &self.spins
    }
}

/// Sign given to a fixed variable. A perfectly balanced variable (mean exactly 0) has no natural
/// sign and gets -1.
pub fn fixed_sign(mean: f64) -> i8 {
    if mean > 0.0 {
        1
    } else {
        -1
    }
}

/// Fixes every variable whose dispersion is below `threshold + FIXING_TOLERANCE`, using the
/// comparison of the metric the statistics were computed with.
///
/// # Errors
///
/// `InvalidParameter` if the threshold is negative or not finite.
pub fn decide_fixed(stats: &VariableStatistics, threshold: f64) -> SpvarResult<FixedVariables> {
    if !(threshold >= 0.0 && threshold.is_finite()) {
        return Err(SpvarError::InvalidParameter(format!(
            "fixing threshold must be a finite non-negative number, got {threshold}"
        )));
    }

    let mut fixed = FixedVariables::new();

    for ((&i, &mean), &dispersion) in stats
        .variables
        .iter()
        .zip(stats.mean.iter())
        .zip(stats.dispersion.iter())
    {
        if stats.metric.fixes(dispersion, threshold, FIXING_TOLERANCE) {
            fixed.insert(i, fixed_sign(mean))?;
        }
    }

    Ok(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::DispersionMetric;
    use ndarray::Array1;

    fn stats(mean: Vec<f64>, dispersion: Vec<f64>, metric: DispersionMetric) -> VariableStatistics {
        VariableStatistics {
            variables: (0..mean.len()).collect(),
            mean: Array1::from_vec(mean),
            dispersion: Array1::from_vec(dispersion),
            metric,
        }
    }

    #[test]
    fn test_threshold_boundary() {
        let t = 0.2;
        let delta = 1e-6;
        let s = stats(
            vec![0.9, -0.9],
            vec![t + FIXING_TOLERANCE - delta, t + FIXING_TOLERANCE + delta],
            DispersionMetric::StdDev,
        );
        let fixed = decide_fixed(&s, t).unwrap();
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed.get(0), Some(1));
        assert!(!fixed.contains(1));
    }

    #[test]
    fn test_threshold_boundary_disagreement() {
        let t = 0.2;
        let delta = 1e-6;
        let s = stats(
            vec![-0.8, 0.8],
            vec![t + FIXING_TOLERANCE - delta, t + FIXING_TOLERANCE + delta],
            DispersionMetric::DisagreementFraction,
        );
        let fixed = decide_fixed(&s, t).unwrap();
        assert_eq!(fixed.get(0), Some(-1));
        assert!(!fixed.contains(1));
    }

    #[test]
    fn test_balanced_variable_gets_minus_one() {
        let s = stats(vec![0.0], vec![0.0], DispersionMetric::StdDev);
        let fixed = decide_fixed(&s, 0.0).unwrap();
        assert_eq!(fixed.get(0), Some(-1));
    }

    #[test]
    fn test_negative_threshold() {
        let s = stats(vec![1.0], vec![0.0], DispersionMetric::StdDev);
        assert!(matches!(
            decide_fixed(&s, -0.1),
            Err(SpvarError::InvalidParameter(_))
        ));
        assert!(matches!(
            decide_fixed(&s, f64::NAN),
            Err(SpvarError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_fixing_twice() {
        let mut fixed = FixedVariables::new();
        fixed.insert(3, 1).unwrap();
        assert!(matches!(
            fixed.insert(3, -1),
            Err(SpvarError::InconsistentModel(_))
        ));
        assert!(matches!(
            FixedVariables::from_pairs(vec![(0, 1), (1, 0)]),
            Err(SpvarError::InvalidParameter(_))
        ));
    }
}
