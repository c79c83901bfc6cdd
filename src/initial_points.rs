use ndarray::Array1;
use smolprng::{Algorithm, PRNG};

/// Generates a uniformly random spin vector in {-1, +1}^num_x.
pub fn make_spin_point<T: Algorithm>(num_x: usize, prng: &mut PRNG<T>) -> Array1<f64> {
    let mut s = Array1::<f64>::ones(num_x);
    for i in 0..num_x {
        if prng.gen_f64() < 0.5 {
            s[i] = -1.0;
        }
    }
    s
}

pub fn generate_random_spin_points<T: Algorithm>(
    num_x: usize,
    num_points: usize,
    prng: &mut PRNG<T>,
) -> Vec<Array1<f64>> {
    // Generate num_points number of random starting points, drawn in order so a seed fixes all of them
    (0..num_points)
        .map(|_| make_spin_point(num_x, prng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smolprng::JsfLarge;

    #[test]
    fn test_points_are_spins() {
        let mut prng = PRNG {
            generator: JsfLarge::default(),
        };
        let xs = generate_random_spin_points(64, 4, &mut prng);
        assert_eq!(xs.len(), 4);
        for x in &xs {
            assert_eq!(x.len(), 64);
            assert!(x.iter().all(|&s| s == 1.0 || s == -1.0));
        }
    }

    #[test]
    fn test_same_seed_same_points() {
        let mut a = PRNG {
            generator: JsfLarge::from(5u64),
        };
        let mut b = PRNG {
            generator: JsfLarge::from(5u64),
        };
        assert_eq!(
            generate_random_spin_points(10, 3, &mut a),
            generate_random_spin_points(10, 3, &mut b)
        );
    }
}
