//! # Local Search, the reference sampler
//!
//! Random restarts followed by single flip descent on the spin vector. Each restart is one
//! sample, restarts run in parallel. This stands in for an annealer wherever the crate needs an
//! oracle of its own: tests, benchmarks and the python bindings.

use crate::initial_points::generate_random_spin_points;
use crate::ising::{DenseIsing, IsingModel};
use crate::sample::{Sample, SampleOracle};
use ndarray::Array1;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use smolprng::{Algorithm, PRNG};

/// Flips the single spin that lowers the energy the most, if any flip does.
/// This takes O(|J|) + O(n) time, where |J| is the number of couplings.
pub fn one_step_local_search(ising: &DenseIsing, s_0: &Array1<f64>) -> Array1<f64> {
    let field = ising.local_field(s_0);

    // flipping s_i changes the energy by -2 s_i field_i
    let best_neighbor = s_0
        .iter()
        .zip(field.iter())
        .map(|(s_i, f_i)| -2.0 * s_i * f_i)
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b));

    match best_neighbor {
        Some((i, delta)) if delta < 0.0 => {
            let mut s_1 = s_0.clone();
            s_1[i] = -s_1[i];
            s_1
        }
        _ => s_0.clone(),
    }
}

/// Runs single flip descent until the point converges or `max_steps` flips have been made.
pub fn simple_local_search(ising: &DenseIsing, s_0: &Array1<f64>, max_steps: usize) -> Array1<f64> {
    let mut s = s_0.clone();

    for _ in 0..max_steps {
        let s_1 = one_step_local_search(ising, &s);
        if s_1 == s {
            break;
        }
        s = s_1;
    }

    s
}

/// Given a vector of initial points, run simple local search on each of them in parallel.
pub fn multi_simple_local_search(
    ising: &DenseIsing,
    xs: &Vec<Array1<f64>>,
    max_steps: usize,
) -> Vec<Array1<f64>> {
    xs.par_iter()
        .map(|x| simple_local_search(ising, x, max_steps))
        .collect()
}

/// Sample oracle backed by multi start local search. The duration hint is the step limit of each
/// descent.
pub struct LocalSearchSampler<T: Algorithm> {
    pub prng: PRNG<T>,
}

impl<T: Algorithm> LocalSearchSampler<T> {
    pub fn new(prng: PRNG<T>) -> Self {
        Self { prng }
    }
}

impl<T: Algorithm> SampleOracle for LocalSearchSampler<T> {
    fn sample(&mut self, model: &IsingModel, count: usize, duration_hint: usize) -> Vec<Sample> {
        let ising = model.to_dense();

        let starts = generate_random_spin_points(ising.num_x(), count, &mut self.prng);
        let solutions = multi_simple_local_search(&ising, &starts, duration_hint);

        solutions
            .iter()
            .map(|s| Sample::new(ising.to_assignment(s), ising.eval(s)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Assignment;
    use smolprng::JsfLarge;

    fn is_local_minimum(ising: &DenseIsing, s: &Array1<f64>) -> bool {
        let field = ising.local_field(s);
        s.iter()
            .zip(field.iter())
            .all(|(s_i, f_i)| -2.0 * s_i * f_i >= -1e-12)
    }

    #[test]
    fn test_descent_ends_in_local_minimum() {
        let mut prng = PRNG {
            generator: JsfLarge::default(),
        };
        let model = IsingModel::make_random(60, &mut prng, 0.2);
        let ising = model.to_dense();

        let starts = generate_random_spin_points(ising.num_x(), 8, &mut prng);
        let solutions = multi_simple_local_search(&ising, &starts, usize::MAX);

        for (start, solution) in starts.iter().zip(solutions.iter()) {
            assert!(is_local_minimum(&ising, solution));
            assert!(ising.eval(solution) <= ising.eval(start));
        }
    }

    #[test]
    fn test_step_limit() {
        let model = IsingModel::new(3, vec![(0, 1.0), (1, 1.0), (2, 1.0)], vec![]).unwrap();
        let ising = model.to_dense();
        let s_0 = Array1::from_vec(vec![1.0, 1.0, 1.0]);

        assert_eq!(simple_local_search(&ising, &s_0, 0), s_0);
        for steps in 1..=3 {
            let s = simple_local_search(&ising, &s_0, steps);
            assert_eq!(s.iter().filter(|&&s_i| s_i < 0.0).count(), steps);
        }
        assert_eq!(
            simple_local_search(&ising, &s_0, 10),
            Array1::from_vec(vec![-1.0, -1.0, -1.0])
        );
    }

    #[test]
    fn test_sampler_finds_field_dominated_ground_state() {
        // the field outweighs the ferromagnetic chain, every descent ends in all spins down
        let couplings: Vec<((usize, usize), f64)> = (0..9).map(|i| ((i, i + 1), -0.5)).collect();
        let model = IsingModel::new(10, (0..10).map(|i| (i, 2.0)), couplings).unwrap();

        let mut sampler = LocalSearchSampler::new(PRNG {
            generator: JsfLarge::from(2u64),
        });
        let samples = sampler.sample(&model, 16, 1000);
        assert_eq!(samples.len(), 16);

        for sample in &samples {
            assert!((sample.energy - (-24.5)).abs() < 1e-12);
            assert!(sample.state.values().all(|&s| s == -1));

            let energy = model.energy(&sample.state).unwrap();
            assert!((energy - sample.energy).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sampler_on_empty_model() {
        let model = IsingModel::new(0, vec![], vec![]).unwrap();
        let mut sampler = LocalSearchSampler::new(PRNG {
            generator: JsfLarge::default(),
        });
        let samples = sampler.sample(&model, 4, 10);
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|s| s.state == Assignment::new() && s.energy == 0.0));
    }
}
