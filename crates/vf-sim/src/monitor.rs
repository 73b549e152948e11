//! Stability monitoring: energy accounting, the run log, and divergence
//! detection.
//!
//! One line per executed step goes to the run log and to stderr. The log
//! file is opened, flushed and closed on every write; a crash mid-run
//! loses at most the line being written. Log I/O failures are reported
//! loudly but never stop the physics.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use vf_core::{Geometry, PhaseCoefficients, SimulationConfig};

use crate::energy::kinetic_energy;
use crate::init::StartMode;
use crate::sim::RunState;
use crate::solver::CellSample;

/// Fixed run-log name inside the output directory.
pub const RUN_LOG_FILE: &str = "energy.dat";
/// Always-appended top-level diagnostics file. Divergence messages land
/// here so they survive across restarts.
pub const DIAGNOSTIC_LOG_FILE: &str = "log";

/// Totals this far below zero are arithmetic corruption, not physics.
const NEGATIVE_ENERGY_TOLERANCE: f64 = -1e-10;

const COLUMN_HEADER: &str = "i dt t ke";

/// Why the monitor stopped a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Energy climbed above the ceiling.
    BlowUp,
    /// Energy decayed below the floor; nothing is moving anymore.
    Collapse,
}

/// Monitor decision for the step just observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Stop(StopReason),
}

pub struct StabilityMonitor {
    run_log: PathBuf,
    diagnostic_log: PathBuf,
    header: String,
    console_header_pending: bool,
    file_header_pending: bool,
    coefficients: PhaseCoefficients,
    geometry: Geometry,
    ceiling: f64,
    floor: f64,
    warmup_steps: u64,
    tripped: bool,
    last_energy: f64,
}

impl StabilityMonitor {
    pub fn new(
        config: &SimulationConfig,
        coefficients: PhaseCoefficients,
        start: StartMode,
    ) -> Self {
        // Restored runs append to the existing log; the header is written
        // once per file, not once per process. The console copy has its
        // own flag: a failed file write still owes the file its header,
        // but the console must not see it twice.
        let fresh = start == StartMode::Fresh;
        Self {
            run_log: config.output_dir.join(RUN_LOG_FILE),
            diagnostic_log: config.output_dir.join(DIAGNOSTIC_LOG_FILE),
            header: config.summary_line(),
            console_header_pending: fresh,
            file_header_pending: fresh,
            coefficients,
            geometry: config.geometry,
            ceiling: config.energy_ceiling,
            floor: config.energy_floor,
            warmup_steps: config.warmup_steps,
            tripped: false,
            last_energy: 0.0,
        }
    }

    /// Energy computed for the most recent observed step.
    pub fn last_energy(&self) -> f64 {
        self.last_energy
    }

    /// Account for one executed step: reduce the energy, log it, and
    /// decide whether the run may continue.
    pub fn observe(&mut self, samples: &[CellSample], state: &RunState) -> Verdict {
        let energy = kinetic_energy(samples, &self.coefficients, self.geometry);
        self.last_energy = energy;

        assert!(
            energy > NEGATIVE_ENERGY_TOLERANCE,
            "total kinetic energy went negative: {energy}"
        );

        self.write_step_line(state, energy);

        if self.tripped || state.step <= self.warmup_steps {
            return Verdict::Continue;
        }

        let reason = if energy > self.ceiling {
            StopReason::BlowUp
        } else if energy < self.floor {
            StopReason::Collapse
        } else {
            return Verdict::Continue;
        };

        self.tripped = true;
        let message = match reason {
            StopReason::BlowUp => "The kinetic energy blew up. Stopping simulation",
            StopReason::Collapse => "kinetic energy too small now! Stopping!",
        };
        eprintln!("{message}");
        if let Err(e) = self.append_diagnostic(message) {
            tracing::error!(
                path = %self.diagnostic_log.display(),
                "diagnostic log write failed: {e}"
            );
        }
        Verdict::Stop(reason)
    }

    fn write_step_line(&mut self, state: &RunState, energy: f64) {
        if self.console_header_pending {
            eprintln!("{}", self.header);
            eprintln!("{COLUMN_HEADER}");
            self.console_header_pending = false;
        }
        let line = format!(
            "{} {:.6e} {:.4} {:.6e}",
            state.step, state.dt, state.time, energy
        );
        eprintln!("{line}");
        if let Err(e) = self.append_run_log(&line) {
            tracing::error!(path = %self.run_log.display(), "run log write failed: {e}");
        }
    }

    fn append_run_log(&mut self, line: &str) -> std::io::Result<()> {
        let mut file = if self.file_header_pending {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.run_log)?
        } else {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.run_log)?
        };
        if self.file_header_pending {
            writeln!(file, "{}", self.header)?;
            writeln!(file, "{COLUMN_HEADER}")?;
            self.file_header_pending = false;
        }
        writeln!(file, "{line}")?;
        file.flush()
    }

    fn append_diagnostic(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.diagnostic_log)?;
        writeln!(file, "{message}")?;
        file.flush()
    }
}
