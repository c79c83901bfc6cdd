//! Removes fixed variables from a model.
//!
//! For every edge touching a fixed variable the coupling is folded either into the bias of the
//! free endpoint or, when both endpoints are fixed, into a scalar offset. The fixed variables' own
//! biases also go into the offset, so for any assignment consistent with the fixed spins
//!
//! $$E_{original}(s) = E_{reduced}(s_{free}) + offset$$

use crate::fixing::FixedVariables;
use crate::ising::IsingModel;
use crate::sample::{Assignment, Encoding};
use crate::spvar_error::{SpvarError, SpvarResult};
use std::collections::{BTreeMap, BTreeSet};

/// A reduced model together with what is needed to get back to the original one.
#[derive(Clone, Debug, PartialEq)]
pub struct Reduction {
    pub model: IsingModel,
    pub fixed: FixedVariables,
    pub offset: f64,
}

impl Reduction {
    pub fn count_fixed(&self) -> usize {
        self.fixed.len()
    }

    /// Share of the original variables that were fixed.
    pub fn fixed_fraction(&self) -> f64 {
        let total = self.model.num_variables() + self.fixed.len();
        if total == 0 {
            return 0.0;
        }
        self.fixed.len() as f64 / total as f64
    }

    /// Energy on the original model of the assignment made of `free` plus the fixed spins.
    pub fn energy(&self, free: &Assignment) -> SpvarResult<f64> {
        Ok(self.model.energy(free)? + self.offset)
    }

    /// Substitutes the fixed spins back into a solution of the reduced model.
    pub fn reconstruct(&self, free: &Assignment, encoding: Encoding) -> SpvarResult<Assignment> {
        crate::reconstruct::reconstruct(&self.model, free, &self.fixed, encoding)
    }
}

/// Builds the reduced model of `model` under `fixed`. The input model is left untouched and an
/// empty `fixed` gives back an identical model with offset 0.
///
/// Only edges that exist are visited, so the cost is linear in the number of biases and couplings.
///
/// # Errors
///
/// `InconsistentModel` if a fixed variable is not a variable of the model.
pub fn reduce_model(model: &IsingModel, fixed: &FixedVariables) -> SpvarResult<Reduction> {
    if let Some((i, _)) = fixed.iter().find(|&(i, _)| !model.contains(i)) {
        return Err(SpvarError::InconsistentModel(format!(
            "fixed variable {i} is not a variable of the model"
        )));
    }

    let spin = |i: usize| fixed.get(i).map(f64::from);

    let variables: BTreeSet<usize> = model
        .variables()
        .iter()
        .copied()
        .filter(|&i| !fixed.contains(i))
        .collect();

    let mut offset = 0.0;
    let mut h = BTreeMap::new();

    for (&i, &h_i) in model.linear() {
        match spin(i) {
            Some(s_i) => offset += h_i * s_i,
            None => {
                h.insert(i, h_i);
            }
        }
    }

    let mut j = BTreeMap::new();

    for (&(a, b), &j_ab) in model.couplings() {
        match (spin(a), spin(b)) {
            // both fixed, the edge is a constant
            (Some(s_a), Some(s_b)) => offset += j_ab * s_a * s_b,
            // a is fixed and b is not
            (Some(s_a), None) => *h.entry(b).or_insert(0.0) += j_ab * s_a,
            // b is fixed and a is not
            (None, Some(s_b)) => *h.entry(a).or_insert(0.0) += j_ab * s_b,
            (None, None) => {
                j.insert((a, b), j_ab);
            }
        }
    }

    Ok(Reduction {
        model: IsingModel::from_parts(variables, h, j, model.constant()),
        fixed: fixed.clone(),
        offset,
    })
}

impl IsingModel {
    /// Replaces the model by its reduction under `fixed` and returns the offset. On error the
    /// model is unchanged.
    pub fn fix_in_place(&mut self, fixed: &FixedVariables) -> SpvarResult<f64> {
        let reduction = reduce_model(self, fixed)?;
        *self = reduction.model;
        Ok(reduction.offset)
    }
}
