//! Validated simulation configuration.
//!
//! One immutable [`SimulationConfig`] drives a whole run: dimensionless
//! groups, grid levels, snapshot cadence, refinement tolerances and the
//! stability bounds. Loaded from YAML, validated once, never mutated after.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CoreResult};

/// Spatial setting of the run.
///
/// The original solver family compiles separate planar, axisymmetric and
/// fully 3-D binaries; here it is a runtime choice that controls the
/// velocity-component count and the cell-volume rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    Planar,
    Axisymmetric,
    ThreeDimensional,
}

impl Geometry {
    /// Number of velocity components carried by the solver.
    pub fn velocity_components(self) -> usize {
        match self {
            Geometry::Planar | Geometry::Axisymmetric => 2,
            Geometry::ThreeDimensional => 3,
        }
    }

    /// Volume represented by a cell of edge `delta`.
    ///
    /// Axisymmetric cells are rings: `radius` is the distance of the cell
    /// center from the symmetry axis. The other geometries ignore it.
    pub fn cell_volume(self, delta: f64, radius: f64) -> f64 {
        match self {
            Geometry::Planar => delta * delta,
            Geometry::Axisymmetric => std::f64::consts::TAU * radius * delta * delta,
            Geometry::ThreeDimensional => delta * delta * delta,
        }
    }
}

/// Complete description of a run.
///
/// Physics enters only through the dimensionless groups (gas-scaled Weber,
/// solvent/gas Ohnesorge, Deborah, elasto-capillary number and the
/// liquid/gas density ratio); everything else is numerics and output
/// control. Fields with serde defaults match the reference drop-impact
/// setup, so a minimal YAML file needs only the physics and the run window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub geometry: Geometry,

    /// Weber number in gas-scale units. Must be positive: the surface
    /// tension coefficient is its reciprocal.
    pub weber: f64,
    /// Solvent (liquid) Ohnesorge number.
    pub ohnesorge: f64,
    /// Gas-phase Ohnesorge number.
    #[serde(default)]
    pub ohnesorge_gas: f64,
    /// Deborah number; 0 switches elasticity off.
    #[serde(default)]
    pub deborah: f64,
    /// Elasto-capillary number; 0 switches elasticity off.
    #[serde(default)]
    pub elasto_capillary: f64,
    /// Liquid density over gas density.
    pub density_ratio: f64,

    /// Edge length of the (square/cubic) domain.
    #[serde(default = "default_domain_size")]
    pub domain_size: f64,
    /// Refinement level of the initial uniform grid.
    #[serde(default = "default_base_level")]
    pub base_level: u8,
    /// Hard ceiling on the refinement level, everywhere, always.
    pub max_level: u8,

    /// Simulation time at which the run completes.
    pub t_end: f64,
    /// Interval between persistence points, anchored at time zero.
    pub snapshot_interval: f64,
    /// Optional ceiling on the solver timestep.
    #[serde(default)]
    pub dt_max: Option<f64>,

    /// Wavelet error tolerance on the volume fraction.
    #[serde(default = "default_fraction_tol")]
    pub fraction_tol: f64,
    /// Wavelet error tolerance on the interface curvature.
    #[serde(default = "default_curvature_tol")]
    pub curvature_tol: f64,
    /// Wavelet error tolerance on each velocity component.
    #[serde(default = "default_velocity_tol")]
    pub velocity_tol: f64,

    /// Kinetic energy above this is a blow-up.
    #[serde(default = "default_energy_ceiling")]
    pub energy_ceiling: f64,
    /// Kinetic energy below this is a collapse (static death).
    #[serde(default = "default_energy_floor")]
    pub energy_floor: f64,
    /// Steps exempt from divergence checks while startup transients decay.
    #[serde(default = "default_warmup_steps")]
    pub warmup_steps: u64,
    /// Safety bound on the step count, independent of simulation time.
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    /// Directory receiving the restart slot, archives and logs.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_domain_size() -> f64 {
    4.0
}
fn default_base_level() -> u8 {
    4
}
fn default_fraction_tol() -> f64 {
    1e-3
}
fn default_curvature_tol() -> f64 {
    1e-6
}
fn default_velocity_tol() -> f64 {
    1e-2
}
fn default_energy_ceiling() -> f64 {
    1e2
}
fn default_energy_floor() -> f64 {
    1e-8
}
fn default_warmup_steps() -> u64 {
    10
}
fn default_max_steps() -> u64 {
    1_000_000
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl SimulationConfig {
    /// Check every field once, before anything touches the solver.
    pub fn validate(&self) -> CoreResult<()> {
        require_positive(self.weber, "weber", "surface tension is 1/We")?;
        require_non_negative(self.ohnesorge, "ohnesorge")?;
        require_non_negative(self.ohnesorge_gas, "ohnesorge_gas")?;
        require_non_negative(self.deborah, "deborah")?;
        require_non_negative(self.elasto_capillary, "elasto_capillary")?;
        require_positive(self.density_ratio, "density_ratio", "densities must be positive")?;
        require_positive(self.domain_size, "domain_size", "domain must have extent")?;
        require_positive(self.t_end, "t_end", "run window must be non-empty")?;
        require_positive(
            self.snapshot_interval,
            "snapshot_interval",
            "persistence must recur",
        )?;
        require_positive(self.fraction_tol, "fraction_tol", "tolerance must be positive")?;
        require_positive(self.curvature_tol, "curvature_tol", "tolerance must be positive")?;
        require_positive(self.velocity_tol, "velocity_tol", "tolerance must be positive")?;
        require_positive(self.energy_ceiling, "energy_ceiling", "bound must be positive")?;
        require_positive(self.energy_floor, "energy_floor", "bound must be positive")?;

        if let Some(dt_max) = self.dt_max {
            require_positive(dt_max, "dt_max", "timestep ceiling must be positive")?;
        }
        if self.base_level == 0 {
            return Err(ConfigError::Inconsistent {
                what: "base_level must be at least 1".to_string(),
            });
        }
        if self.max_level < self.base_level {
            return Err(ConfigError::Inconsistent {
                what: format!(
                    "max_level {} is below base_level {}",
                    self.max_level, self.base_level
                ),
            });
        }
        if self.snapshot_interval > self.t_end {
            return Err(ConfigError::Inconsistent {
                what: format!(
                    "snapshot_interval {} exceeds t_end {}",
                    self.snapshot_interval, self.t_end
                ),
            });
        }
        if self.energy_floor >= self.energy_ceiling {
            return Err(ConfigError::Inconsistent {
                what: format!(
                    "energy_floor {} is not below energy_ceiling {}",
                    self.energy_floor, self.energy_ceiling
                ),
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::Inconsistent {
                what: "max_steps must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// One-line run descriptor. Doubles as the run-log header line and the
    /// end-of-run console summary.
    pub fn summary_line(&self) -> String {
        format!(
            "Level {}, Oh {:.1e}, We {:.1e}, Oha {:.1e}, De {:.1e}, Ec {:.1e}",
            self.max_level,
            self.ohnesorge,
            self.weber,
            self.ohnesorge_gas,
            self.deborah,
            self.elasto_capillary
        )
    }
}

fn require_positive(value: f64, field: &'static str, reason: &'static str) -> CoreResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NonPhysical {
            field,
            value,
            reason,
        });
    }
    Ok(())
}

fn require_non_negative(value: f64, field: &'static str) -> CoreResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::NonPhysical {
            field,
            value,
            reason: "dimensionless groups cannot be negative",
        });
    }
    Ok(())
}

pub fn load_yaml(path: &Path) -> CoreResult<SimulationConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: SimulationConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &SimulationConfig) -> CoreResult<()> {
    config.validate()?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_impact_config() -> SimulationConfig {
        SimulationConfig {
            geometry: Geometry::Axisymmetric,
            weber: 1e3,
            ohnesorge: 1e-2,
            ohnesorge_gas: 1e-4,
            deborah: 0.5,
            elasto_capillary: 0.1,
            density_ratio: 830.0,
            domain_size: 4.0,
            base_level: 4,
            max_level: 6,
            t_end: 3.0,
            snapshot_interval: 1e-2,
            dt_max: Some(1e-5),
            fraction_tol: 1e-3,
            curvature_tol: 1e-6,
            velocity_tol: 1e-2,
            energy_ceiling: 1e2,
            energy_floor: 1e-8,
            warmup_steps: 10,
            max_steps: 1_000_000,
            output_dir: PathBuf::from("."),
        }
    }

    #[test]
    fn valid_config_passes() {
        drop_impact_config().validate().unwrap();
    }

    #[test]
    fn zero_weber_rejected() {
        let mut config = drop_impact_config();
        config.weber = 0.0;
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("weber"));
    }

    #[test]
    fn negative_deborah_rejected() {
        let mut config = drop_impact_config();
        config.deborah = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_values_rejected() {
        let mut config = drop_impact_config();
        config.t_end = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = drop_impact_config();
        config.ohnesorge = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn level_ordering_enforced() {
        let mut config = drop_impact_config();
        config.max_level = 3;
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("base_level"));
    }

    #[test]
    fn interval_must_fit_run_window() {
        let mut config = drop_impact_config();
        config.snapshot_interval = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn energy_bounds_ordered() {
        let mut config = drop_impact_config();
        config.energy_floor = 1e3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let yaml = r#"
geometry: axisymmetric
weber: 1000.0
ohnesorge: 0.01
density_ratio: 830.0
max_level: 6
t_end: 1.0
snapshot_interval: 0.1
"#;
        let config: SimulationConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.base_level, 4);
        assert_eq!(config.fraction_tol, 1e-3);
        assert_eq!(config.warmup_steps, 10);
        assert_eq!(config.dt_max, None);
        assert_eq!(config.ohnesorge_gas, 0.0);
    }

    #[test]
    fn yaml_round_trip() {
        let config = drop_impact_config();
        let text = serde_yaml::to_string(&config).unwrap();
        let back: SimulationConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn cell_volume_rules() {
        let tau = std::f64::consts::TAU;
        assert_eq!(Geometry::Planar.cell_volume(0.5, 2.0), 0.25);
        assert_eq!(Geometry::ThreeDimensional.cell_volume(0.5, 2.0), 0.125);
        let ring = Geometry::Axisymmetric.cell_volume(0.5, 2.0);
        assert!((ring - tau * 2.0 * 0.25).abs() < 1e-15);
    }

    #[test]
    fn velocity_component_counts() {
        assert_eq!(Geometry::Planar.velocity_components(), 2);
        assert_eq!(Geometry::Axisymmetric.velocity_components(), 2);
        assert_eq!(Geometry::ThreeDimensional.velocity_components(), 3);
    }

    #[test]
    fn summary_line_shape() {
        let line = drop_impact_config().summary_line();
        assert!(line.starts_with("Level 6, Oh 1.0e-2"));
        assert!(line.contains("We 1.0e3"));
    }
}
