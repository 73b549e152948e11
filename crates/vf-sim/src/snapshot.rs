//! Snapshot persistence driver.
//!
//! Every due point writes a pair: the rolling restart slot (overwritten)
//! and a permanent time-tagged archive. The two writes are individually
//! complete-or-absent but not atomic together; the restart slot is
//! self-contained, so a crash between them still leaves a usable resume
//! point.

use vf_dump::{Checkpoint, DumpStore};

use crate::error::SimResult;
use crate::schedule::{IntervalTrigger, TIME_EPS};
use crate::sim::RunState;
use crate::solver::FlowSolver;

pub struct SnapshotManager {
    store: DumpStore,
    trigger: IntervalTrigger,
    config_hash: String,
}

impl SnapshotManager {
    pub fn new(store: DumpStore, interval: f64, t_end: f64, config_hash: String) -> Self {
        Self {
            store,
            trigger: IntervalTrigger::new(interval, t_end),
            config_hash,
        }
    }

    /// Skip due points already persisted before a restore.
    pub fn fast_forward(&mut self, time: f64) {
        self.trigger.fast_forward(time);
    }

    /// Next scheduled persistence time, if any remains.
    pub fn next_due(&self) -> Option<f64> {
        self.trigger.next_due()
    }

    /// Write the restart slot and the archive if a due point has been
    /// reached. At most one due point fires per call; the loop clips the
    /// timestep so time lands on due points exactly.
    pub fn persist_if_due<S: FlowSolver>(
        &mut self,
        solver: &S,
        state: &RunState,
    ) -> SimResult<Option<f64>> {
        let Some(due) = self.trigger.next_due() else {
            return Ok(None);
        };
        if state.time + TIME_EPS < due {
            return Ok(None);
        }
        self.trigger.mark_fired();

        let checkpoint = self.checkpoint(solver, state)?;
        // Attempt both writes even if the first fails; each file is
        // complete-or-absent on its own.
        let restart = self.store.write_restart(&checkpoint);
        let archive = self.store.write_archive(&checkpoint);
        restart?;
        archive?;
        tracing::debug!(time = state.time, step = state.step, "persisted checkpoint pair");
        Ok(Some(due))
    }

    /// Overwrite the restart slot outside the schedule. Used when the
    /// monitor stops a run so the freshest state survives.
    pub fn force_restart<S: FlowSolver>(&self, solver: &S, state: &RunState) -> SimResult<()> {
        let checkpoint = self.checkpoint(solver, state)?;
        self.store.write_restart(&checkpoint)?;
        Ok(())
    }

    fn checkpoint<S: FlowSolver>(
        &self,
        solver: &S,
        state: &RunState,
    ) -> SimResult<Checkpoint<S::State>> {
        let dump = solver.export_state()?;
        Ok(Checkpoint::new(
            state.time,
            state.step,
            state.dt,
            self.config_hash.clone(),
            dump,
        ))
    }
}
