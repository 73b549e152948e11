//! Initial-condition scenarios.
//!
//! A scenario is an implicit interface plus a velocity policy. The
//! initializer refines a band around the zero level set, fills the
//! volume fraction from the sign of the shape function, then sets the
//! velocity field.

use nalgebra::{Point3, Vector3};

/// Initial condition for a fresh run.
pub trait Scenario {
    fn name(&self) -> &str;

    /// Signed implicit interface function: positive inside the liquid.
    fn interface(&self, point: Point3<f64>) -> f64;

    /// Initial velocity at a point. `fraction` is the local liquid
    /// fraction, so velocity can be confined to the liquid.
    fn initial_velocity(&self, point: Point3<f64>, fraction: f64) -> Vector3<f64>;

    /// Half-width of the band refined around the interface, measured on
    /// the shape function value.
    fn refinement_band(&self) -> f64 {
        0.1
    }
}

/// Unit-radius drop approaching the left wall at constant speed.
///
/// The shape function is quadratic in the distance from the center, so
/// the default band (|shape| < 0.1) spans squared radii 0.9..1.1.
#[derive(Debug, Clone)]
pub struct SphericalDrop {
    pub center: Point3<f64>,
    pub impact_speed: f64,
}

impl SphericalDrop {
    /// Drop resting `gap` away from the wall at x = 0, moving toward it.
    pub fn near_wall(gap: f64, impact_speed: f64) -> Self {
        Self {
            center: Point3::new(1.0 + gap, 0.0, 0.0),
            impact_speed,
        }
    }
}

impl Default for SphericalDrop {
    fn default() -> Self {
        Self::near_wall(5e-2, 1.0)
    }
}

impl Scenario for SphericalDrop {
    fn name(&self) -> &str {
        "spherical-drop"
    }

    fn interface(&self, point: Point3<f64>) -> f64 {
        1.0 - (point - self.center).norm_squared()
    }

    fn initial_velocity(&self, _point: Point3<f64>, fraction: f64) -> Vector3<f64> {
        // Fraction-weighted so mixed cells carry proportional momentum.
        Vector3::new(-self.impact_speed * fraction, 0.0, 0.0)
    }
}

/// Unit-radius liquid filament with a sinusoidal radius perturbation,
/// at rest. Surface tension drives the subsequent pinch-off.
#[derive(Debug, Clone)]
pub struct PerturbedFilament {
    pub amplitude: f64,
    pub wavenumber: f64,
}

impl Default for PerturbedFilament {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            wavenumber: 0.25,
        }
    }
}

impl Scenario for PerturbedFilament {
    fn name(&self) -> &str {
        "perturbed-filament"
    }

    fn interface(&self, point: Point3<f64>) -> f64 {
        let radial = (point.y * point.y + point.z * point.z).sqrt();
        1.0 - radial - self.amplitude * (self.wavenumber * point.x).sin()
    }

    fn initial_velocity(&self, _point: Point3<f64>, _fraction: f64) -> Vector3<f64> {
        Vector3::zeros()
    }

    fn refinement_band(&self) -> f64 {
        self.amplitude
    }
}
