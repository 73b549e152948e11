//! Dimensionless groups -> per-phase transport coefficients.
//!
//! The configuration speaks Weber/Ohnesorge/Deborah/elasto-capillary; the
//! solver speaks densities, viscosities, moduli, relaxation times and a
//! surface-tension coefficient. The translation happens exactly once, here,
//! before the first step.

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::{ConfigError, CoreResult};
use crate::numeric::clamp_unit;

/// Transport coefficients handed to the solver, one set per run.
///
/// Unit system: gas density 1, initial interface length 1, inertial
/// velocity scale 1. All values are non-negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseCoefficients {
    pub rho_liquid: f64,
    pub rho_gas: f64,
    pub mu_liquid: f64,
    pub mu_gas: f64,
    /// Elastic modulus of the liquid; 0 for a Newtonian run.
    pub modulus_liquid: f64,
    /// The gas carries no elastic stress.
    pub modulus_gas: f64,
    /// Relaxation time of the liquid polymer stress.
    pub relaxation_liquid: f64,
    pub relaxation_gas: f64,
    pub surface_tension: f64,
}

impl PhaseCoefficients {
    /// Arithmetic (one-fluid) density at a local liquid fraction.
    pub fn density(&self, fraction: f64) -> f64 {
        let f = clamp_unit(fraction);
        f * self.rho_liquid + (1.0 - f) * self.rho_gas
    }
}

/// Derive the per-phase coefficients from the dimensionless groups.
///
/// The Ohnesorge and elasto-capillary numbers are conventionally built on
/// the liquid density while the Weber number here is gas-scaled, so the
/// viscosities and the modulus pick up a square-root density-ratio factor
/// when moved into gas-scale units. The relaxation time is a pure
/// timescale and needs no density factor.
///
/// Pure and deterministic; fails only on a non-positive density ratio or
/// Weber number, or a negative dimensionless group.
pub fn derive_coefficients(config: &SimulationConfig) -> CoreResult<PhaseCoefficients> {
    let we = require_positive_group(config.weber, "weber")?;
    let ratio = require_positive_group(config.density_ratio, "density_ratio")?;
    let oh = require_group(config.ohnesorge, "ohnesorge")?;
    let oh_gas = require_group(config.ohnesorge_gas, "ohnesorge_gas")?;
    let de = require_group(config.deborah, "deborah")?;
    let ec = require_group(config.elasto_capillary, "elasto_capillary")?;

    let density_scale = ratio.sqrt();

    Ok(PhaseCoefficients {
        rho_liquid: ratio,
        rho_gas: 1.0,
        mu_liquid: density_scale * oh / we.sqrt(),
        mu_gas: density_scale * oh_gas / we.sqrt(),
        modulus_liquid: density_scale * ec / we,
        modulus_gas: 0.0,
        relaxation_liquid: de * we.sqrt(),
        relaxation_gas: 0.0,
        surface_tension: 1.0 / we,
    })
}

fn require_group(value: f64, field: &'static str) -> CoreResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::NonPhysical {
            field,
            value,
            reason: "dimensionless groups cannot be negative",
        });
    }
    Ok(value)
}

fn require_positive_group(value: f64, field: &'static str) -> CoreResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NonPhysical {
            field,
            value,
            reason: "must be strictly positive",
        });
    }
    Ok(value)
}
