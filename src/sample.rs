//! Samples, assignments and the contract of the external sampler.
//!
//! An assignment maps variable labels to values. Inside the crate values are always spins in
//! {-1, +1}; the binary encoding {0, 1} is only used at the edges, when a caller asks for it.

use crate::ising::IsingModel;
use crate::spvar_error::{SpvarError, SpvarResult};
use std::collections::BTreeMap;

/// Variable label to value. Sparse, so it also describes assignments over reduced models.
pub type Assignment = BTreeMap<usize, i8>;

/// The value domain an assignment is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// values in {-1, +1}
    Spin,
    /// values in {0, 1}, with 0 <-> -1 and 1 <-> +1
    Binary,
}

impl Encoding {
    /// Converts a spin into this encoding.
    pub fn from_spin(&self, spin: i8) -> i8 {
        match self {
            Self::Spin => spin,
            Self::Binary => {
                if spin > 0 {
                    1
                } else {
                    0
                }
            }
        }
    }

    /// Converts a value of this encoding into a spin, rejecting values outside the domain.
    pub fn to_spin(&self, value: i8) -> SpvarResult<i8> {
        match (self, value) {
            (Self::Spin, -1 | 1) => Ok(value),
            (Self::Binary, 0) => Ok(-1),
            (Self::Binary, 1) => Ok(1),
            _ => Err(SpvarError::InvalidParameter(format!(
                "value {value} is not valid under the {self:?} encoding"
            ))),
        }
    }

    /// Re-expresses a whole assignment given in this encoding as spins.
    pub fn decode(&self, assignment: &Assignment) -> SpvarResult<Assignment> {
        assignment
            .iter()
            .map(|(&i, &value)| Ok((i, self.to_spin(value)?)))
            .collect()
    }

    /// Re-expresses a spin assignment in this encoding.
    pub fn encode(&self, spins: &Assignment) -> Assignment {
        spins
            .iter()
            .map(|(&i, &spin)| (i, self.from_spin(spin)))
            .collect()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Spin" => Some(Self::Spin),
            "Binary" => Some(Self::Binary),
            _ => None,
        }
    }
}

/// One spin assignment returned by the sampler together with the objective it realized.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub state: Assignment,
    pub energy: f64,
}

impl Sample {
    pub fn new(state: Assignment, energy: f64) -> Self {
        Self { state, energy }
    }

    /// Builds a sample from a {0, 1} state, as returned by QUBO based samplers.
    pub fn from_binary(state: &Assignment, energy: f64) -> SpvarResult<Self> {
        Ok(Self::new(Encoding::Binary.decode(state)?, energy))
    }

    /// Returns the spin of a variable, which must be +1 or -1.
    pub fn spin(&self, variable: usize) -> SpvarResult<i8> {
        let value = *self
            .state
            .get(&variable)
            .ok_or(SpvarError::MissingVariable(variable))?;
        Encoding::Spin.to_spin(value)
    }
}

/// The sampler the heuristic is wrapped around. Given a model and a sample count it blocks until
/// it returns a complete batch of independent samples over the model's variables.
///
/// `duration_hint` is an opaque cost parameter that is passed through untouched.
pub trait SampleOracle {
    fn sample(&mut self, model: &IsingModel, count: usize, duration_hint: usize) -> Vec<Sample>;
}

impl<F> SampleOracle for F
where
    F: FnMut(&IsingModel, usize, usize) -> Vec<Sample>,
{
    fn sample(&mut self, model: &IsingModel, count: usize, duration_hint: usize) -> Vec<Sample> {
        self(model, count, duration_hint)
    }
}
