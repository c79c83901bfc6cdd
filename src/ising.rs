//! The weighted graph the heuristic works on.
//!
//! The energy of a spin assignment s is
//!
//! $$E(s) = c + \sum_i h_i s_i + \sum_{i<j} J_{ij} s_i s_j$$
//!
//! Couplings are stored once per undirected edge keyed by `(min(i, j), max(i, j))`. When a caller
//! supplies both halves `(i, j)` and `(j, i)` they are summed into that single entry.

use crate::sample::{Assignment, Encoding};
use crate::spvar_error::{SpvarError, SpvarResult};
use ndarray::Array1;
use smolprng::{Algorithm, PRNG};
use sprs::{CsMat, TriMat};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Ising model over a sparse set of variable labels.
#[derive(Clone, Debug, PartialEq)]
pub struct IsingModel {
    variables: BTreeSet<usize>,
    h: BTreeMap<usize, f64>,
    j: BTreeMap<(usize, usize), f64>,
    constant: f64,
}

/// Canonical key of the undirected edge between i and j.
pub const fn edge(i: usize, j: usize) -> (usize, usize) {
    if i < j {
        (i, j)
    } else {
        (j, i)
    }
}

impl IsingModel {
    /// Creates a model over the variables `0..num_variables`.
    ///
    /// Self couplings `(i, i)` multiply `s_i * s_i = 1`, so they are moved into the constant term
    /// here and never coexist with `h`. Any index outside `0..num_variables` or any non-finite
    /// coefficient is rejected with `InconsistentModel`.
    ///
    /// Example:
    /// ```rust
    /// use spvar::ising::IsingModel;
    ///
    /// let model = IsingModel::new(3, vec![(0, 1.0), (1, -1.0)], vec![((0, 1), 2.0), ((2, 1), -3.0)]).unwrap();
    /// assert_eq!(model.coupling(1, 2), -3.0);
    /// ```
    pub fn new<H, J>(num_variables: usize, h: H, j: J) -> SpvarResult<Self>
    where
        H: IntoIterator<Item = (usize, f64)>,
        J: IntoIterator<Item = ((usize, usize), f64)>,
    {
        Self::with_variables((0..num_variables).collect(), h, j)
    }

    /// Creates a model over an explicit, not necessarily contiguous, set of variable labels.
    pub fn with_variables<H, J>(variables: BTreeSet<usize>, h: H, j: J) -> SpvarResult<Self>
    where
        H: IntoIterator<Item = (usize, f64)>,
        J: IntoIterator<Item = ((usize, usize), f64)>,
    {
        let mut linear = BTreeMap::new();
        let mut couplings = BTreeMap::new();
        let mut constant = 0.0;

        for (i, value) in h {
            check_variable(&variables, i)?;
            check_finite(value, || format!("bias of variable {i}"))?;
            *linear.entry(i).or_insert(0.0) += value;
        }

        for ((i, k), value) in j {
            check_variable(&variables, i)?;
            check_variable(&variables, k)?;
            check_finite(value, || format!("coupling ({i}, {k})"))?;

            if i == k {
                constant += value;
            } else {
                *couplings.entry(edge(i, k)).or_insert(0.0) += value;
            }
        }

        Ok(Self::from_parts(variables, linear, couplings, constant))
    }

    /// Assembles a model from parts that are already canonical and validated.
    pub(crate) fn from_parts(
        variables: BTreeSet<usize>,
        h: BTreeMap<usize, f64>,
        j: BTreeMap<(usize, usize), f64>,
        constant: f64,
    ) -> Self {
        Self {
            variables,
            h,
            j,
            constant,
        }
    }

    /// Makes a random model over `0..num_variables`, each edge is present with probability `density`.
    pub fn make_random<T: Algorithm>(num_variables: usize, prng: &mut PRNG<T>, density: f64) -> Self {
        let mut j = BTreeMap::new();
        for i in 0..num_variables {
            for k in (i + 1)..num_variables {
                if prng.gen_f64() < density {
                    j.insert((i, k), prng.gen_f64() - 0.5f64);
                }
            }
        }

        // generate random h
        let h = (0..num_variables)
            .map(|i| (i, prng.gen_f64() - 0.5f64))
            .collect();

        Self::from_parts((0..num_variables).collect(), h, j, 0.0)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub const fn variables(&self) -> &BTreeSet<usize> {
        &self.variables
    }

    pub fn contains(&self, variable: usize) -> bool {
        self.variables.contains(&variable)
    }

    /// Linear biases that are explicitly tracked. An absent variable has bias 0.
    pub const fn linear(&self) -> &BTreeMap<usize, f64> {
        &self.h
    }

    pub fn bias(&self, variable: usize) -> f64 {
        self.h.get(&variable).copied().unwrap_or(0.0)
    }

    /// Couplings keyed by canonical edge.
    pub const fn couplings(&self) -> &BTreeMap<(usize, usize), f64> {
        &self.j
    }

    /// The coupling between i and j regardless of the order they are given in.
    pub fn coupling(&self, i: usize, j: usize) -> f64 {
        self.j.get(&edge(i, j)).copied().unwrap_or(0.0)
    }

    pub const fn constant(&self) -> f64 {
        self.constant
    }

    /// Adds `offset` to the constant term.
    pub fn with_constant(mut self, offset: f64) -> SpvarResult<Self> {
        check_finite(offset, || "constant".to_string())?;
        self.constant += offset;
        Ok(self)
    }

    /// Evaluates the energy of a spin assignment that covers exactly the variables of the model.
    ///
    /// # Errors
    ///
    /// `MissingVariable` if a variable of the model is not assigned, `InconsistentModel` if the
    /// assignment carries a variable the model does not have and `InvalidParameter` for a value
    /// that is not a spin.
    pub fn energy(&self, spins: &Assignment) -> SpvarResult<f64> {
        for (&i, &value) in spins {
            if !self.contains(i) {
                return Err(SpvarError::InconsistentModel(format!(
                    "variable {i} is assigned but is not part of the model"
                )));
            }
            Encoding::Spin.to_spin(value)?;
        }

        if let Some(&missing) = self.variables.iter().find(|&&i| !spins.contains_key(&i)) {
            return Err(SpvarError::MissingVariable(missing));
        }

        let linear: f64 = self
            .h
            .iter()
            .map(|(i, &h_i)| h_i * f64::from(spins[i]))
            .sum();

        let quadratic: f64 = self
            .j
            .iter()
            .map(|((i, k), &j_ik)| j_ik * f64::from(spins[i]) * f64::from(spins[k]))
            .sum();

        Ok(self.constant + linear + quadratic)
    }

    /// Builds the dense-vector, sparse-matrix form of the model used by the local searches.
    pub fn to_dense(&self) -> DenseIsing {
        let variables: Vec<usize> = self.variables.iter().copied().collect();
        let positions: HashMap<usize, usize> = variables
            .iter()
            .enumerate()
            .map(|(position, &i)| (i, position))
            .collect();

        let num_x = variables.len();
        let mut h = Array1::<f64>::zeros(num_x);
        for (i, &h_i) in &self.h {
            h[positions[i]] += h_i;
        }

        // store both halves so the matrix is symmetric
        let mut j = TriMat::<f64>::new((num_x, num_x));
        for (&(a, b), &j_ab) in &self.j {
            j.add_triplet(positions[&a], positions[&b], j_ab);
            j.add_triplet(positions[&b], positions[&a], j_ab);
        }

        DenseIsing {
            variables,
            h,
            j: j.to_csr(),
            constant: self.constant,
        }
    }
}

fn check_variable(variables: &BTreeSet<usize>, i: usize) -> SpvarResult<()> {
    if variables.contains(&i) {
        Ok(())
    } else {
        Err(SpvarError::InconsistentModel(format!(
            "index {i} does not name a variable of the model"
        )))
    }
}

fn check_finite(value: f64, what: impl FnOnce() -> String) -> SpvarResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SpvarError::InconsistentModel(format!(
            "{} is not finite ({value})",
            what()
        )))
    }
}

/// Positional form of a model. Position `p` holds the variable `variables[p]`, and `j` is the
/// symmetric coupling matrix, so the energy of a spin vector s is `c + <h, s> + 0.5 <s, Js>`.
pub struct DenseIsing {
    pub variables: Vec<usize>,
    pub h: Array1<f64>,
    pub j: CsMat<f64>,
    pub constant: f64,
}

impl DenseIsing {
    pub fn num_x(&self) -> usize {
        self.variables.len()
    }

    pub fn eval(&self, s: &Array1<f64>) -> f64 {
        let temp = &self.j * s;
        self.constant + self.h.dot(s) + 0.5 * s.dot(&temp)
    }

    /// The local field h + Js, flipping s_i changes the energy by -2 s_i field_i.
    pub fn local_field(&self, s: &Array1<f64>) -> Array1<f64> {
        &self.j * s + &self.h
    }

    /// Converts a spin vector back into a labelled assignment.
    pub fn to_assignment(&self, s: &Array1<f64>) -> Assignment {
        self.variables
            .iter()
            .zip(s.iter())
            .map(|(&i, &s_i)| (i, if s_i > 0.0 { 1 } else { -1 }))
            .collect()
    }
}
