//! Honest evaluation of SPVAR under a fixed sampling budget.
//!
//! The baseline spends the whole budget on the original model. The SPVAR run spends part of the
//! same budget on the statistics and the remainder on the reduced model, so the cost of the
//! reduction is charged against its own benefit. Both results are evaluated on the original
//! coefficients.

use crate::elite::{best_sample, ObjectiveSense};
use crate::evaluation_logger::EvaluationLogger;
use crate::ising::IsingModel;
use crate::reduction::Reduction;
use crate::sample::{Assignment, Encoding, Sample, SampleOracle};
use crate::spvar::spvar;
use crate::spvar_error::{SpvarError, SpvarResult};
use crate::spvar_options::SpvarOptions;

/// The stages an evaluation passes through, in order. There are no retries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationStage {
    BaselineSample,
    Reduce,
    ReducedSample,
    Reconstruct,
    Compare,
}

/// Budget and SPVAR options of one honest evaluation. `options.sample_size` is the part of
/// `total_samples` spent on SPVAR.
#[derive(Clone, Debug, PartialEq)]
pub struct HonestConfig {
    pub total_samples: usize,
    pub options: SpvarOptions,
    pub verbose: usize,
}

impl HonestConfig {
    pub fn new(total_samples: usize, options: SpvarOptions) -> Self {
        Self {
            total_samples,
            options,
            verbose: 0,
        }
    }

    pub fn validate(&self) -> SpvarResult<()> {
        if self.total_samples == 0 {
            return Err(SpvarError::InvalidParameter(
                "total sample budget must be positive".to_string(),
            ));
        }

        self.options.validate()?;

        if self.options.sample_size >= self.total_samples {
            return Err(SpvarError::InvalidParameter(format!(
                "SPVAR budget {} leaves nothing of the total budget {}",
                self.options.sample_size, self.total_samples
            )));
        }

        Ok(())
    }
}

/// The four numbers reported per evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvaluationReport {
    pub objective_without_reduction: f64,
    pub objective_with_reduction: f64,
    pub count_fixed: usize,
    pub fixed_fraction: f64,
}

impl EvaluationReport {
    /// `(with - without) / |without| * 100`, undefined for a zero baseline.
    pub fn relative_change_percent(&self) -> Option<f64> {
        let without = self.objective_without_reduction;
        if without == 0.0 {
            return None;
        }
        Some((self.objective_with_reduction - without) / without.abs() * 100.0)
    }

    pub fn fixed_percent(&self) -> f64 {
        self.fixed_fraction * 100.0
    }
}

/// Runs the baseline and the SPVAR pipeline on the same total budget and compares them.
///
/// # Errors
///
/// `InvalidParameter` for an invalid budget split before any sample is drawn, or if the oracle
/// returns an empty batch. Errors of the reduction and reconstruction are passed through.
pub fn honest_evaluation<O: SampleOracle>(
    model: &IsingModel,
    config: &HonestConfig,
    oracle: &mut O,
) -> SpvarResult<EvaluationReport> {
    config.validate()?;

    let logger = EvaluationLogger::new(config.verbose);
    logger.output_header(model, config);

    let options = &config.options;
    let remaining = config.total_samples - options.sample_size;

    let baseline = oracle.sample(model, config.total_samples, options.duration_hint);
    let without = baseline_objective(model, &baseline, options.sense)?;
    logger.output_stage(
        EvaluationStage::BaselineSample,
        &format!("{} samples, best objective {without}", baseline.len()),
    );

    let report = reduce_and_compare(
        model,
        options,
        remaining,
        options.duration_hint,
        without,
        oracle,
        &logger,
    )?;
    logger.output_report(&report);

    Ok(report)
}

/// Compares a single baseline sample against SPVAR followed by a single sample of the reduced
/// model. SPVAR itself draws `options.sample_size` samples with `options.duration_hint`, the two
/// single samples use `duration_hint`.
pub fn single_shot_evaluation<O: SampleOracle>(
    model: &IsingModel,
    options: &SpvarOptions,
    duration_hint: usize,
    oracle: &mut O,
) -> SpvarResult<EvaluationReport> {
    options.validate()?;

    let logger = EvaluationLogger::new(0);

    let baseline = oracle.sample(model, 1, duration_hint);
    let without = baseline_objective(model, &baseline, options.sense)?;

    reduce_and_compare(model, options, 1, duration_hint, without, oracle, &logger)
}

fn reduce_and_compare<O: SampleOracle>(
    model: &IsingModel,
    options: &SpvarOptions,
    reduced_samples: usize,
    reduced_duration_hint: usize,
    without: f64,
    oracle: &mut O,
    logger: &EvaluationLogger,
) -> SpvarResult<EvaluationReport> {
    let reduction = spvar(model, options, oracle)?;
    logger.output_stage(
        EvaluationStage::Reduce,
        &format!(
            "fixed {} of {} variables",
            reduction.count_fixed(),
            model.num_variables()
        ),
    );

    let free = solve_reduced(
        &reduction,
        reduced_samples,
        reduced_duration_hint,
        options.sense,
        oracle,
    )?;
    logger.output_stage(
        EvaluationStage::ReducedSample,
        &format!("{} free variables", reduction.model.num_variables()),
    );

    // never trust the reduced objective, evaluate on the original coefficients
    let full = reduction.reconstruct(&free, Encoding::Spin)?;
    let with = model.energy(&full)?;
    logger.output_stage(EvaluationStage::Reconstruct, &format!("objective {with}"));

    let report = EvaluationReport {
        objective_without_reduction: without,
        objective_with_reduction: with,
        count_fixed: reduction.count_fixed(),
        fixed_fraction: reduction.fixed_fraction(),
    };
    logger.output_stage(EvaluationStage::Compare, &format!("{report:?}"));

    Ok(report)
}

/// Best objective of the batch, re-evaluated on the model.
fn baseline_objective(model: &IsingModel, samples: &[Sample], sense: ObjectiveSense) -> SpvarResult<f64> {
    let best = best_sample(samples, sense).ok_or_else(|| {
        SpvarError::InvalidParameter("the oracle returned no samples".to_string())
    })?;
    model.energy(&best.state)
}

/// Best assignment of the reduced model. With nothing left to sample the fixed spins alone are
/// the answer and the oracle is not called.
fn solve_reduced<O: SampleOracle>(
    reduction: &Reduction,
    count: usize,
    duration_hint: usize,
    sense: ObjectiveSense,
    oracle: &mut O,
) -> SpvarResult<Assignment> {
    if reduction.model.num_variables() == 0 {
        return Ok(Assignment::new());
    }

    let samples = oracle.sample(&reduction.model, count, duration_hint);
    let best = best_sample(&samples, sense).ok_or_else(|| {
        SpvarError::InvalidParameter("the oracle returned no samples for the reduced model".to_string())
    })?;

    Ok(best.state.clone())
}
