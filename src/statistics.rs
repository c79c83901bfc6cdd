//! Per variable polarization statistics over an elite set.
//!
//! For every variable the spins of the elite samples are stacked into one column of a k x m
//! matrix, the mean of the column is the polarization and its spread is the dispersion.

use crate::sample::Sample;
use crate::spvar_error::{SpvarError, SpvarResult};
use ndarray::{Array1, Array2, Axis};

/// How the spread of a variable across the elite set is measured. Both measures are 0 when every
/// elite sample agrees, and both fix a variable when the dispersion is below `t + eps`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispersionMetric {
    /// Sample standard deviation (ddof = 1) of the spins, in [0, sqrt(k / (k - 1))].
    /// A single-sample elite set has dispersion 0.
    StdDev,
    /// `1 - |sum(s)| / k`, in [0, 1]. Its complement `1 - d` is the agreement, so the fixing rule
    /// `d < t + eps` reads as "agreement above `1 - t - eps`".
    DisagreementFraction,
}

impl DispersionMetric {
    /// Whether a variable with this dispersion is confident enough to be fixed.
    pub fn fixes(&self, dispersion: f64, threshold: f64, tolerance: f64) -> bool {
        match self {
            Self::StdDev => dispersion < threshold + tolerance,
            Self::DisagreementFraction => 1.0 - dispersion > 1.0 - (threshold + tolerance),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "StdDev" => Some(Self::StdDev),
            "DisagreementFraction" => Some(Self::DisagreementFraction),
            _ => None,
        }
    }
}

/// Mean polarization and dispersion per variable, `mean[p]` and `dispersion[p]` belong to
/// `variables[p]`.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableStatistics {
    pub variables: Vec<usize>,
    pub mean: Array1<f64>,
    pub dispersion: Array1<f64>,
    pub metric: DispersionMetric,
}

impl VariableStatistics {
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Stacks the spins of the elite samples into a k x m matrix, one column per variable.
pub fn spin_matrix(elite: &[&Sample], variables: &[usize]) -> SpvarResult<Array2<f64>> {
    let mut spins = Array2::<f64>::zeros((elite.len(), variables.len()));

    for (row, sample) in elite.iter().enumerate() {
        for (col, &i) in variables.iter().enumerate() {
            spins[[row, col]] = f64::from(sample.spin(i)?);
        }
    }

    Ok(spins)
}

/// Computes the statistics of `variables` over the elite set.
///
/// # Errors
///
/// `InvalidParameter` for an empty elite set or a non-spin value, `MissingVariable` if an elite
/// sample does not assign one of the variables.
pub fn estimate_statistics(
    elite: &[&Sample],
    variables: &[usize],
    metric: DispersionMetric,
) -> SpvarResult<VariableStatistics> {
    let k = elite.len();
    if k == 0 {
        return Err(SpvarError::InvalidParameter(
            "statistics need at least one elite sample".to_string(),
        ));
    }

    let spins = spin_matrix(elite, variables)?;

    let mean = spins
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(variables.len()));

    let dispersion = match metric {
        DispersionMetric::StdDev if k > 1 => spins.std_axis(Axis(0), 1.0),
        DispersionMetric::StdDev => Array1::zeros(variables.len()),
        DispersionMetric::DisagreementFraction => spins
            .sum_axis(Axis(0))
            .mapv(|total| 1.0 - total.abs() / k as f64),
    };

    Ok(VariableStatistics {
        variables: variables.to_vec(),
        mean,
        dispersion,
        metric,
    })
}
