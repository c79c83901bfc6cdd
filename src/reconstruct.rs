//! Maps a solution of a reduced model back onto the original variables.

use crate::fixing::FixedVariables;
use crate::ising::IsingModel;
use crate::sample::{Assignment, Encoding};
use crate::spvar_error::{SpvarError, SpvarResult};

/// Combines an assignment of the free variables of `reduced` with the fixed spins.
///
/// `free` is read in `encoding` and copied through unchanged, the fixed spins are converted to
/// `encoding`, so the result is expressed entirely in the caller's encoding.
///
/// # Errors
///
/// `MissingVariable` if a free variable is not assigned, `InconsistentModel` if `free` assigns a
/// variable that is not free in `reduced` or a fixed variable is still free in `reduced`, and
/// `InvalidParameter` if a value is outside `encoding`.
pub fn reconstruct(
    reduced: &IsingModel,
    free: &Assignment,
    fixed: &FixedVariables,
    encoding: Encoding,
) -> SpvarResult<Assignment> {
    if let Some(&missing) = reduced.variables().iter().find(|&&i| !free.contains_key(&i)) {
        return Err(SpvarError::MissingVariable(missing));
    }

    if let Some((i, _)) = fixed.iter().find(|&(i, _)| reduced.contains(i)) {
        return Err(SpvarError::InconsistentModel(format!(
            "variable {i} is both fixed and free in the reduced model"
        )));
    }

    let mut full = Assignment::new();

    for (&i, &value) in free {
        if !reduced.contains(i) {
            return Err(SpvarError::InconsistentModel(format!(
                "variable {i} is not a free variable of the reduced model"
            )));
        }
        encoding.to_spin(value)?;
        full.insert(i, value);
    }

    full.extend(encoding.encode(fixed.as_map()));

    Ok(full)
}
