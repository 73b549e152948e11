//! Kinetic-energy reduction.
//!
//! The total is the stability signal for the whole run, so it must be
//! reproducible: the cell sums are accumulated over fixed-size blocks and
//! the block sums combined in index order. The result is bit-identical
//! for any rayon worker count, and identical to a serial pass over the
//! same blocks.

use rayon::prelude::*;

use vf_core::{Geometry, PhaseCoefficients};

use crate::solver::CellSample;

/// Cells per summation block. Fixed: changing it changes the rounding of
/// the total, which would make runs incomparable across versions.
pub const ENERGY_BLOCK: usize = 4096;

/// Total kinetic energy of the sampled cells.
pub fn kinetic_energy(
    samples: &[CellSample],
    coefficients: &PhaseCoefficients,
    geometry: Geometry,
) -> f64 {
    let block_sums: Vec<f64> = samples
        .par_chunks(ENERGY_BLOCK)
        .map(|block| {
            block
                .iter()
                .map(|cell| cell_energy(cell, coefficients, geometry))
                .sum::<f64>()
        })
        .collect();
    block_sums.iter().sum()
}

/// Contribution of one cell: 0.5 * rho(f) * |u|^2 * volume.
fn cell_energy(cell: &CellSample, coefficients: &PhaseCoefficients, geometry: Geometry) -> f64 {
    let rho = coefficients.density(cell.fraction);
    0.5 * rho * cell.velocity.norm_squared() * geometry.cell_volume(cell.delta, cell.radius)
}
