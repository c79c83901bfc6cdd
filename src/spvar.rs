//! The SPVAR reduction: sample, keep the elite, measure how polarized each variable is, fix the
//! confident ones and fold them out of the model.

use crate::elite::select_elite;
use crate::fixing::decide_fixed;
use crate::ising::IsingModel;
use crate::reduction::{reduce_model, Reduction};
use crate::sample::{Sample, SampleOracle};
use crate::spvar_error::SpvarResult;
use crate::spvar_options::SpvarOptions;
use crate::statistics::estimate_statistics;

/// Runs SPVAR on an existing sample batch. This is a pure function of its inputs, the batch
/// size is whatever the caller drew, `options.sample_size` is not consulted.
pub fn spvar_from_samples(
    model: &IsingModel,
    samples: &[Sample],
    options: &SpvarOptions,
) -> SpvarResult<Reduction> {
    let elite = select_elite(samples, options.elite_fraction, options.sense)?;

    let variables: Vec<usize> = model.variables().iter().copied().collect();
    let stats = estimate_statistics(&elite, &variables, options.metric)?;

    let fixed = decide_fixed(&stats, options.fixing_threshold)?;

    reduce_model(model, &fixed)
}

/// Draws `options.sample_size` samples of `model` from the oracle and reduces the model with them.
///
/// Example:
/// ```rust
/// use smolprng::{JsfLarge, PRNG};
/// use spvar::ising::IsingModel;
/// use spvar::local_search::LocalSearchSampler;
/// use spvar::spvar::spvar;
/// use spvar::spvar_options::SpvarOptions;
///
/// let mut prng = PRNG { generator: JsfLarge::default() };
/// let model = IsingModel::make_random(50, &mut prng, 0.1);
/// let mut oracle = LocalSearchSampler::new(PRNG { generator: JsfLarge::from(1u64) });
///
/// let reduction = spvar(&model, &SpvarOptions::new(), &mut oracle).unwrap();
/// assert_eq!(reduction.model.num_variables() + reduction.count_fixed(), 50);
/// ```
pub fn spvar<O: SampleOracle>(
    model: &IsingModel,
    options: &SpvarOptions,
    oracle: &mut O,
) -> SpvarResult<Reduction> {
    options.validate()?;

    let samples = oracle.sample(model, options.sample_size, options.duration_hint);

    spvar_from_samples(model, &samples, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixing::FixedVariables;
    use crate::sample::Assignment;
    use crate::spvar_error::SpvarError;
    use crate::statistics::DispersionMetric;
    use smolprng::{JsfLarge, PRNG};

    fn small_model() -> IsingModel {
        IsingModel::new(
            3,
            vec![(0, 1.0), (1, -1.0), (2, 0.0)],
            vec![((0, 1), 2.0), ((1, 2), -3.0)],
        )
        .unwrap()
    }

    fn evaluated(model: &IsingModel, states: &[[i8; 3]]) -> Vec<Sample> {
        states
            .iter()
            .map(|row| {
                let state: Assignment = row.iter().enumerate().map(|(i, &s)| (i, s)).collect();
                let energy = model.energy(&state).unwrap();
                Sample::new(state, energy)
            })
            .collect()
    }

    fn random_batch(prng: &mut PRNG<JsfLarge>, size: usize, num_variables: usize) -> Vec<Sample> {
        (0..size)
            .map(|_| {
                let state: Assignment = (0..num_variables)
                    .map(|i| (i, if prng.gen_f64() < 0.7 { 1 } else { -1 }))
                    .collect();
                Sample::new(state, prng.gen_f64())
            })
            .collect()
    }

    #[test]
    fn test_only_the_agreed_variable_fixes() {
        let model = small_model();
        let samples = evaluated(
            &model,
            &[[1, 1, 1], [1, -1, 1], [1, 1, -1], [1, -1, -1], [1, 1, 1]],
        );

        let mut options = SpvarOptions::new();
        options.elite_fraction = 1.0;
        options.fixing_threshold = 0.0;

        let reduction = spvar_from_samples(&model, &samples, &options).unwrap();

        assert_eq!(reduction.count_fixed(), 1);
        assert_eq!(reduction.fixed, FixedVariables::from_pairs(vec![(0, 1)]).unwrap());
        assert_eq!(reduction.model.num_variables(), 2);
        assert_eq!(reduction.model.bias(1), -1.0 + 2.0);
        assert_eq!(reduction.offset, 1.0);
    }

    #[test]
    fn test_everything_fixes() {
        let model = small_model();
        let samples = evaluated(
            &model,
            &[[1, 1, 1], [1, -1, 1], [-1, 1, -1], [1, -1, -1], [-1, 1, 1]],
        );

        let mut options = SpvarOptions::new();
        options.elite_fraction = 0.2;
        options.fixing_threshold = 1e6;

        let reduction = spvar_from_samples(&model, &samples, &options).unwrap();
        assert_eq!(reduction.model.num_variables(), 0);
        assert_eq!(reduction.count_fixed(), 3);

        let full = reduction.reconstruct(&Assignment::new(), crate::sample::Encoding::Spin).unwrap();
        let expected = model.energy(&full).unwrap();
        let got = reduction.energy(&Assignment::new()).unwrap();
        assert!((expected - got).abs() < 1e-9);
        // the best sample is the single elite member
        let best = crate::elite::best_sample(&samples, options.sense).unwrap();
        assert_eq!(full, best.state);
    }

    #[test]
    fn test_more_selective_elite_fixes_more_at_zero_threshold() {
        let mut prng = PRNG {
            generator: JsfLarge::from(3u64),
        };

        for metric in [DispersionMetric::StdDev, DispersionMetric::DisagreementFraction] {
            for _ in 0..20 {
                let samples = random_batch(&mut prng, 50, 12);
                let model = IsingModel::new(12, vec![], vec![]).unwrap();

                let mut previous = 0;
                for fraction in [1.0, 0.8, 0.6, 0.4, 0.2, 0.1, 0.04] {
                    let mut options = SpvarOptions::new();
                    options.metric = metric;
                    options.fixing_threshold = 0.0;
                    options.elite_fraction = fraction;

                    let fixed = spvar_from_samples(&model, &samples, &options)
                        .unwrap()
                        .count_fixed();
                    assert!(fixed >= previous, "{fraction}: {fixed} < {previous}");
                    previous = fixed;
                }
            }
        }
    }

    #[test]
    fn test_elite_fraction_monotonicity_breaks_above_zero_threshold() {
        // the two best samples disagree completely, the third tips the balance
        let model = IsingModel::new(1, vec![(0, 1.0)], vec![]).unwrap();
        let samples = vec![
            Sample::new(Assignment::from([(0, 1)]), 0.0),
            Sample::new(Assignment::from([(0, -1)]), 1.0),
            Sample::new(Assignment::from([(0, -1)]), 2.0),
        ];

        let mut options = SpvarOptions::new();
        options.fixing_threshold = 1.2;

        options.elite_fraction = 1.0;
        let wide = spvar_from_samples(&model, &samples, &options).unwrap();
        options.elite_fraction = 0.7;
        let narrow = spvar_from_samples(&model, &samples, &options).unwrap();

        assert_eq!(wide.count_fixed(), 1);
        assert_eq!(narrow.count_fixed(), 0);
    }

    #[test]
    fn test_oracle_is_called_with_options() {
        let model = small_model();
        let mut calls = Vec::new();
        let mut oracle = |m: &IsingModel, count: usize, duration: usize| -> Vec<Sample> {
            calls.push((m.num_variables(), count, duration));
            evaluated(m, &[[1, 1, -1]]).into_iter().cycle().take(count).collect()
        };

        let mut options = SpvarOptions::new();
        options.sample_size = 10;
        options.duration_hint = 77;
        options.elite_fraction = 0.5;

        let reduction = spvar(&model, &options, &mut oracle).unwrap();
        assert_eq!(reduction.count_fixed(), 3);
        assert_eq!(calls, vec![(3, 10, 77)]);
    }

    #[test]
    fn test_invalid_options_spend_no_samples() {
        let model = small_model();
        let mut calls = 0;
        let mut oracle = |_: &IsingModel, _: usize, _: usize| -> Vec<Sample> {
            calls += 1;
            Vec::new()
        };

        let mut options = SpvarOptions::new();
        options.sample_size = 3;
        options.elite_fraction = 0.1;

        assert!(matches!(
            spvar(&model, &options, &mut oracle),
            Err(SpvarError::InvalidParameter(_))
        ));
        assert_eq!(calls, 0);
    }
}
