//! Simulation runner.
//!
//! One fixed per-step order, documented here and nowhere else: advance the
//! solver (timestep clipped to the next persistence point, the end time
//! and the optional dt ceiling), adapt the grid, persist if due, then let
//! the stability monitor account for the step. Termination: end time
//! reached, monitor verdict, or the step-count safety bound.

use vf_core::{SimulationConfig, derive_coefficients};
use vf_dump::{DumpStore, config_hash};

use crate::adapt::RefinementController;
use crate::error::{SimError, SimResult};
use crate::init::{StartMode, initialize};
use crate::monitor::{StabilityMonitor, StopReason, Verdict};
use crate::scenario::Scenario;
use crate::schedule::TIME_EPS;
use crate::snapshot::SnapshotManager;
use crate::solver::{CellSample, FlowSolver};

/// Mutable bookkeeping for one run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunState {
    /// Steps executed so far.
    pub step: u64,
    /// Simulation time reached.
    pub time: f64,
    /// Last timestep taken.
    pub dt: f64,
    /// Energy from the last monitor pass.
    pub last_energy: f64,
    /// Set once the monitor has stopped the run.
    pub stop: Option<StopReason>,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Reached the configured end time.
    Completed,
    /// The stability monitor stopped the run early.
    Stopped(StopReason),
    /// The step-count safety bound tripped before the end time.
    StepLimit,
}

/// Summary handed back when the loop exits.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub start: StartMode,
    pub steps: u64,
    pub time: f64,
    pub final_energy: f64,
}

/// Drive a run from initialization to termination.
pub fn run_sim<S: FlowSolver>(
    solver: &mut S,
    scenario: &dyn Scenario,
    config: &SimulationConfig,
) -> SimResult<RunReport> {
    config.validate()?;
    let coefficients = derive_coefficients(config)?;
    solver.apply_coefficients(&coefficients)?;

    let store = DumpStore::open(&config.output_dir)?;
    let hash = config_hash(config);

    let init = initialize(solver, scenario, config, &store, &hash)?;
    let mut state = init.state;

    let controller = RefinementController::new(config);
    let mut snapshots = SnapshotManager::new(store, config.snapshot_interval, config.t_end, hash);
    snapshots.fast_forward(state.time);
    let mut monitor = StabilityMonitor::new(config, coefficients, init.mode);

    let mut samples: Vec<CellSample> = Vec::new();

    while state.stop.is_none() && state.time < config.t_end && state.step < config.max_steps {
        let dt_limit = step_limit(&state, &snapshots, config);
        let dt = solver.advance(dt_limit)?;
        if !(dt > 0.0) || dt > dt_limit + TIME_EPS {
            return Err(SimError::solver(format!(
                "solver stepped dt={dt} outside (0, {dt_limit}]"
            )));
        }
        state.step += 1;
        state.dt = dt;
        state.time += dt;
        snap_time(&mut state, &snapshots, config);

        let adapt = controller.apply(solver)?;
        tracing::trace!(
            refined = adapt.refined,
            coarsened = adapt.coarsened,
            deepest = adapt.deepest_level,
            "adapted grid"
        );

        match snapshots.persist_if_due(solver, &state) {
            Ok(_) => {}
            Err(SimError::Dump(e)) => {
                // Storage trouble must not kill the physics.
                tracing::error!("scheduled checkpoint write failed: {e}");
            }
            Err(e) => return Err(e),
        }

        solver.sample_cells(&mut samples);
        if let Verdict::Stop(reason) = monitor.observe(&samples, &state) {
            state.stop = Some(reason);
            match snapshots.force_restart(solver, &state) {
                Ok(()) => {}
                Err(SimError::Dump(e)) => {
                    tracing::error!("final checkpoint write failed: {e}");
                }
                Err(e) => return Err(e),
            }
        }
        state.last_energy = monitor.last_energy();
    }

    let outcome = match state.stop {
        Some(reason) => RunOutcome::Stopped(reason),
        None if state.time + TIME_EPS >= config.t_end => RunOutcome::Completed,
        None => RunOutcome::StepLimit,
    };

    eprintln!("{}", config.summary_line());
    tracing::info!(?outcome, steps = state.step, time = state.time, "run finished");

    Ok(RunReport {
        outcome,
        start: init.mode,
        steps: state.step,
        time: state.time,
        final_energy: state.last_energy,
    })
}

/// Longest step the solver may take right now.
fn step_limit(state: &RunState, snapshots: &SnapshotManager, config: &SimulationConfig) -> f64 {
    let mut limit = config.t_end - state.time;
    if let Some(due) = snapshots.next_due() {
        limit = limit.min(due - state.time);
    }
    if let Some(dt_max) = config.dt_max {
        limit = limit.min(dt_max);
    }
    limit.max(TIME_EPS)
}

/// Land accumulated time exactly on due points and the end time, so
/// archive tags and the termination check are never off by an ulp.
fn snap_time(state: &mut RunState, snapshots: &SnapshotManager, config: &SimulationConfig) {
    if let Some(due) = snapshots.next_due()
        && (state.time - due).abs() <= TIME_EPS
    {
        state.time = due;
    }
    if (state.time - config.t_end).abs() <= TIME_EPS {
        state.time = config.t_end;
    }
}
