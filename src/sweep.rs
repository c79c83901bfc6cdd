//! Parameter sweeps of the honest evaluation.
//!
//! Every grid point gets its own oracle from a factory keyed by the index of the point, so a
//! seeded factory makes the whole sweep reproducible no matter how rayon schedules it.

use crate::evaluation::{honest_evaluation, EvaluationReport, HonestConfig};
use crate::ising::IsingModel;
use crate::sample::SampleOracle;
use crate::spvar_error::{SpvarError, SpvarResult};
use crate::spvar_options::SpvarOptions;
use rayon::prelude::*;

/// SPVAR budgets `start, start + step, ...` strictly below `end`.
pub fn spvar_sample_range(start: usize, end: usize, step: usize) -> SpvarResult<Vec<usize>> {
    if step == 0 {
        return Err(SpvarError::InvalidParameter(
            "sweep step must be positive".to_string(),
        ));
    }
    Ok((start..end).step_by(step).collect())
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweepGrid {
    pub total_samples: usize,
    pub spvar_samples: Vec<usize>,
    pub fixing_thresholds: Vec<f64>,
    pub elite_fractions: Vec<f64>,
    /// Supplies every option the grid does not vary.
    pub base: SpvarOptions,
}

impl SweepGrid {
    /// All combinations, SPVAR budget outermost and elite fraction innermost.
    pub fn configs(&self) -> Vec<HonestConfig> {
        let mut configs = Vec::with_capacity(
            self.spvar_samples.len() * self.fixing_thresholds.len() * self.elite_fractions.len(),
        );

        for &sample_size in &self.spvar_samples {
            for &fixing_threshold in &self.fixing_thresholds {
                for &elite_fraction in &self.elite_fractions {
                    let mut options = self.base.clone();
                    options.sample_size = sample_size;
                    options.fixing_threshold = fixing_threshold;
                    options.elite_fraction = elite_fraction;
                    configs.push(HonestConfig::new(self.total_samples, options));
                }
            }
        }

        configs
    }
}

/// Outcome of one grid point. A point with an invalid budget split fails on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepResult {
    pub config: HonestConfig,
    pub report: SpvarResult<EvaluationReport>,
}

/// Runs the honest evaluation at every grid point in parallel, results are in grid order.
pub fn run_sweep<O, F>(model: &IsingModel, grid: &SweepGrid, make_oracle: F) -> Vec<SweepResult>
where
    O: SampleOracle,
    F: Fn(usize) -> O + Sync,
{
    let configs = grid.configs();
    log::debug!("sweeping {} configurations", configs.len());

    configs
        .into_par_iter()
        .enumerate()
        .map(|(index, config)| {
            let mut oracle = make_oracle(index);
            let report = honest_evaluation(model, &config, &mut oracle);
            if let Err(err) = &report {
                log::warn!("configuration {index} failed: {err}");
            }
            SweepResult { config, report }
        })
        .collect()
}
