//! Run initialization: restore the rolling checkpoint or build fresh
//! fields from a scenario.
//!
//! The decision is made exactly once per run. A restart slot that exists
//! and loads cleanly wins; anything else falls through to a fresh start.

use nalgebra::Point3;

use vf_core::SimulationConfig;
use vf_dump::DumpStore;

use crate::error::SimResult;
use crate::scenario::Scenario;
use crate::sim::RunState;
use crate::solver::FlowSolver;

/// How the run entered the time loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    Fresh,
    Restored,
}

pub struct InitReport {
    pub mode: StartMode,
    pub state: RunState,
}

/// Restore from the rolling slot if possible, otherwise initialize from
/// the scenario.
///
/// A restart written under a different configuration is only warned
/// about: extending `t_end` of a finished run is the normal restart
/// workflow and must not be blocked. A slot that fails to parse, or that
/// the solver refuses to import, is also only warned about; the run then
/// starts fresh.
pub fn initialize<S: FlowSolver>(
    solver: &mut S,
    scenario: &dyn Scenario,
    config: &SimulationConfig,
    store: &DumpStore,
    expected_hash: &str,
) -> SimResult<InitReport> {
    if store.has_restart() {
        match restore(solver, store, expected_hash) {
            Ok(state) => {
                tracing::info!(
                    time = state.time,
                    step = state.step,
                    "resumed from restart slot"
                );
                return Ok(InitReport {
                    mode: StartMode::Restored,
                    state,
                });
            }
            Err(e) => {
                tracing::warn!("restart slot unusable ({e}); starting fresh");
            }
        }
    }

    fresh(solver, scenario, config)?;
    tracing::info!(scenario = scenario.name(), "fresh fields initialized");
    Ok(InitReport {
        mode: StartMode::Fresh,
        state: RunState::default(),
    })
}

fn restore<S: FlowSolver>(
    solver: &mut S,
    store: &DumpStore,
    expected_hash: &str,
) -> SimResult<RunState> {
    let checkpoint = store.read_restart::<S::State>()?;
    if checkpoint.config_hash != expected_hash {
        tracing::warn!(
            "restart slot was written under a different configuration; resuming anyway"
        );
    }
    solver.import_state(checkpoint.state)?;
    Ok(RunState {
        step: checkpoint.step,
        time: checkpoint.time,
        dt: checkpoint.dt,
        last_energy: 0.0,
        stop: None,
    })
}

fn fresh<S: FlowSolver>(
    solver: &mut S,
    scenario: &dyn Scenario,
    config: &SimulationConfig,
) -> SimResult<()> {
    let shape = |p: Point3<f64>| scenario.interface(p);
    solver.refine_interface_band(&shape, scenario.refinement_band(), config.max_level)?;
    solver.init_volume_fraction(&shape)?;
    solver.init_velocity(&|p, fraction| scenario.initial_velocity(p, fraction))?;
    Ok(())
}
