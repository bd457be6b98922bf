use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{EsErr, ParameterSet, Result};

/// Reconstructs the fitness gradient as the noise-weighted average `noise^T . fitness / n`.
///
/// # Arguments
/// * `noise` - One scaled noise chunk per row, row `i` belonging to worker `i`.
/// * `fitness` - The fitness difference of each worker, aligned with the rows of `noise`.
///
/// # Returns
/// The flat gradient, or an error if `noise` is empty or its rows don't match `fitness`.
pub fn estimate(noise: ArrayView2<f32>, fitness: ArrayView1<f32>) -> Result<Array1<f32>> {
    let rows = noise.nrows();
    if rows != fitness.len() {
        return Err(EsErr::SizeMismatch {
            what: "fitness differences",
            got: fitness.len(),
            expected: rows,
        });
    }

    if rows == 0 {
        return Err(EsErr::SizeMismatch {
            what: "noise rows",
            got: 0,
            expected: 1,
        });
    }

    Ok(noise.t().dot(&fitness) / rows as f32)
}

/// Reconstructs the gradient and reshapes it into the layout of `params`.
///
/// # Arguments
/// * `params` - The parameters the gradient belongs to.
/// * `noise` - One scaled noise chunk per row, each of length `params.dim()`.
/// * `fitness` - The fitness difference of each row.
///
/// # Returns
/// The gradient as a `ParameterSet` or an error if any size doesn't match.
pub fn estimate_like(
    params: &ParameterSet,
    noise: ArrayView2<f32>,
    fitness: ArrayView1<f32>,
) -> Result<ParameterSet> {
    if noise.ncols() != params.dim() {
        return Err(EsErr::SizeMismatch {
            what: "noise columns",
            got: noise.ncols(),
            expected: params.dim(),
        });
    }

    let flat = estimate(noise, fitness)?;
    params.reshape_like(flat.view())
}
