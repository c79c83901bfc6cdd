//! Acts as the interface to rust code from python. Supports reducing a model from a sample batch the
//! caller drew with their own sampler, reconstructing full assignments, and running the honest
//! evaluation with the built in local search sampler.
use std::collections::{BTreeSet, HashMap};

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use smolprng::{JsfLarge, PRNG};

use crate::evaluation::{honest_evaluation, HonestConfig};
use crate::fixing::FixedVariables;
use crate::ising::IsingModel;
use crate::local_search::LocalSearchSampler;
use crate::reconstruct::reconstruct;
use crate::sample::{Assignment, Encoding, Sample};
use crate::spvar::spvar_from_samples;
use crate::spvar_error::SpvarError;
use crate::spvar_options::SpvarOptions;

// type alias for the model data object from python, (h, J, constant)
type IsingData = (HashMap<usize, f64>, HashMap<(usize, usize), f64>, f64);

// type alias for a reduced model, (h, J, fixed spins, offset)
type ReducedData = (
    HashMap<usize, f64>,
    HashMap<(usize, usize), f64>,
    HashMap<usize, i8>,
    f64,
);

impl From<SpvarError> for PyErr {
    fn from(err: SpvarError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

fn read_model(problem: IsingData) -> Result<IsingModel, SpvarError> {
    let (h, j, constant) = problem;

    let mut variables: BTreeSet<usize> = h.keys().copied().collect();
    for &(a, b) in j.keys() {
        variables.insert(a);
        variables.insert(b);
    }

    IsingModel::with_variables(variables, h, j)?.with_constant(constant)
}

fn read_options(
    sample_size: usize,
    fixing_threshold: Option<f64>,
    elite_fraction: Option<f64>,
    metric: Option<String>,
    sense: Option<String>,
) -> SpvarOptions {
    let mut options = SpvarOptions::new();
    options.sample_size = sample_size;
    if let Some(threshold) = fixing_threshold {
        options.fixing_threshold = threshold;
    }
    if let Some(fraction) = elite_fraction {
        options.elite_fraction = fraction;
    }
    options.set_metric(metric);
    options.set_sense(sense);
    options
}

/// Reduces the model with a batch of samples drawn by the caller.
///
/// Example
/// ``` python
/// import spvar
///
/// h = {0: 1.0, 1: -1.0, 2: 0.0}
/// J = {(0, 1): 2.0, (1, 2): -3.0}
/// samples = [{0: 1, 1: 1, 2: 1}, {0: 1, 1: -1, 2: 1}]
/// energies = [0.0, 1.0]
///
/// h_r, J_r, fixed, offset = spvar.reduce((h, J, 0.0), samples, energies, fixing_threshold=0.0)
/// ```
///
/// # Errors
///
/// Raises a ValueError if the samples or the parameters are invalid.
#[pyfunction]
#[pyo3(signature = (problem, samples, energies, fixing_threshold=None, elite_fraction=None, metric=None, sense=None, encoding=None))]
#[allow(clippy::too_many_arguments)]
pub fn reduce(
    problem: IsingData,
    samples: Vec<HashMap<usize, i8>>,
    energies: Vec<f64>,
    fixing_threshold: Option<f64>,
    elite_fraction: Option<f64>,
    metric: Option<String>,
    sense: Option<String>,
    encoding: Option<String>,
) -> PyResult<ReducedData> {
    let model = read_model(problem)?;

    if samples.len() != energies.len() {
        return Err(SpvarError::InvalidParameter(format!(
            "{} samples but {} energies",
            samples.len(),
            energies.len()
        ))
        .into());
    }

    let encoding = read_encoding(encoding)?;
    let batch = samples
        .into_iter()
        .zip(energies)
        .map(|(state, energy)| {
            let state: Assignment = state.into_iter().collect();
            Ok(Sample::new(encoding.decode(&state)?, energy))
        })
        .collect::<Result<Vec<Sample>, SpvarError>>()?;

    let options = read_options(
        batch.len(),
        fixing_threshold,
        elite_fraction,
        metric,
        sense,
    );
    let reduction = spvar_from_samples(&model, &batch, &options)?;

    let h = reduction.model.linear().iter().map(|(&i, &v)| (i, v)).collect();
    let j = reduction.model.couplings().iter().map(|(&e, &v)| (e, v)).collect();
    let fixed = reduction.fixed.iter().collect();
    let offset = reduction.offset + reduction.model.constant();

    Ok((h, j, fixed, offset))
}

/// Merges a sample of the reduced model with the fixed spins into a full assignment.
///
/// Example
/// ``` python
/// import spvar
///
/// full = spvar.reconstruct_sample((h_r, J_r, 0.0), {1: -1, 2: -1}, fixed)
/// ```
///
/// # Errors
///
/// Raises a ValueError if a free variable is missing, the assignment names unknown variables or a
/// fixed variable is still free in the reduced model.
#[pyfunction]
#[pyo3(signature = (reduced, free, fixed, encoding=None))]
pub fn reconstruct_sample(
    reduced: IsingData,
    free: HashMap<usize, i8>,
    fixed: HashMap<usize, i8>,
    encoding: Option<String>,
) -> PyResult<HashMap<usize, i8>> {
    let model = read_model(reduced)?;
    let fixed = FixedVariables::from_pairs(fixed)?;
    let free: Assignment = free.into_iter().collect();
    let encoding = read_encoding(encoding)?;

    let full = reconstruct(&model, &free, &fixed, encoding)?;
    Ok(full.into_iter().collect())
}

/// Runs the honest evaluation with the local search sampler, returns
/// (objective without reduction, objective with reduction, fixed count, fixed fraction).
///
/// Example
/// ``` python
/// import logging
/// import spvar
///
/// # verbose output is logged at INFO level
/// logging.basicConfig(level=logging.INFO)
///
/// without, with_, count, fraction = spvar.honest_test((h, J, 0.0), 1000, 100, fixing_threshold=0.2, seed=7, verbose=2)
/// ```
///
/// # Errors
///
/// Raises a ValueError if the budget or the parameters are invalid.
#[pyfunction]
#[pyo3(signature = (problem, total_samples, spvar_samples, fixing_threshold=None, elite_fraction=None, duration_hint=None, metric=None, sense=None, seed=None, verbose=None))]
#[allow(clippy::too_many_arguments)]
pub fn honest_test(
    problem: IsingData,
    total_samples: usize,
    spvar_samples: usize,
    fixing_threshold: Option<f64>,
    elite_fraction: Option<f64>,
    duration_hint: Option<usize>,
    metric: Option<String>,
    sense: Option<String>,
    seed: Option<usize>,
    verbose: Option<usize>,
) -> PyResult<(f64, f64, usize, f64)> {
    let model = read_model(problem)?;

    let mut options = read_options(
        spvar_samples,
        fixing_threshold,
        elite_fraction,
        metric,
        sense,
    );
    if let Some(duration) = duration_hint {
        options.duration_hint = duration;
    }

    let mut config = HonestConfig::new(total_samples, options);
    config.verbose = verbose.unwrap_or(0);

    let mut oracle = LocalSearchSampler::new(PRNG {
        generator: JsfLarge::from(seed.unwrap_or(12_345_679usize) as u64),
    });

    let report = honest_evaluation(&model, &config, &mut oracle)?;

    Ok((
        report.objective_without_reduction,
        report.objective_with_reduction,
        report.count_fixed,
        report.fixed_fraction,
    ))
}

fn read_encoding(encoding: Option<String>) -> Result<Encoding, SpvarError> {
    match encoding {
        None => Ok(Encoding::Spin),
        Some(name) => Encoding::from_name(&name)
            .ok_or_else(|| SpvarError::InvalidParameter(format!("unknown encoding {name}"))),
    }
}

/// Harness output goes through the `log` facade, which is forwarded to python's `logging` here.
#[pymodule]
fn spvar(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_function(wrap_pyfunction!(reduce, m)?)?;
    m.add_function(wrap_pyfunction!(reconstruct_sample, m)?)?;
    m.add_function(wrap_pyfunction!(honest_test, m)?)?;
    Ok(())
}
