//! Persistence schedule.
//!
//! Due points are exact multiples of the interval, anchored at simulation
//! time zero and running through the end time inclusive. Each due time is
//! computed as `interval * k`, never by accumulation, so the schedule
//! cannot drift over long runs.

/// Slack for comparing accumulated simulation time against exact due
/// points.
pub const TIME_EPS: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct IntervalTrigger {
    interval: f64,
    t_end: f64,
    /// Multiple of the interval that fires next. Starts at 1: nothing is
    /// due at the anchor itself.
    next_index: u64,
}

impl IntervalTrigger {
    pub fn new(interval: f64, t_end: f64) -> Self {
        Self {
            interval,
            t_end,
            next_index: 1,
        }
    }

    /// Next scheduled time not yet fired, if any remains within the run.
    pub fn next_due(&self) -> Option<f64> {
        let due = self.interval * self.next_index as f64;
        if due <= self.t_end + TIME_EPS {
            Some(due)
        } else {
            None
        }
    }

    /// Consume the pending due point after it has been served.
    pub fn mark_fired(&mut self) {
        self.next_index += 1;
    }

    /// Skip every due point at or before `time`. Used after a restore so
    /// already-persisted points do not fire again.
    pub fn fast_forward(&mut self, time: f64) {
        while let Some(due) = self.next_due() {
            if due > time + TIME_EPS {
                break;
            }
            self.mark_fired();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_points_cover_the_window_inclusive() {
        let mut trigger = IntervalTrigger::new(0.1, 1.0);
        let mut fired = Vec::new();
        while let Some(due) = trigger.next_due() {
            fired.push(due);
            trigger.mark_fired();
        }
        assert_eq!(fired.len(), 10);
        assert!((fired[0] - 0.1).abs() < 1e-12);
        assert!((fired[9] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nothing_due_at_the_anchor() {
        let trigger = IntervalTrigger::new(0.1, 1.0);
        let due = trigger.next_due().unwrap();
        assert!(due > 0.0);
    }

    #[test]
    fn partial_final_interval_never_fires() {
        let mut trigger = IntervalTrigger::new(0.1, 0.95);
        let mut count = 0;
        while trigger.next_due().is_some() {
            trigger.mark_fired();
            count += 1;
        }
        assert_eq!(count, 9);
    }

    #[test]
    fn fast_forward_skips_persisted_points() {
        let mut trigger = IntervalTrigger::new(0.1, 1.0);
        trigger.fast_forward(0.4);
        let due = trigger.next_due().unwrap();
        assert!((due - 0.5).abs() < 1e-12);

        // Fast-forward to exactly a due point consumes it too.
        let mut at_due = IntervalTrigger::new(0.1, 1.0);
        at_due.fast_forward(0.4 + 1e-16);
        assert!((at_due.next_due().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn fast_forward_at_zero_is_a_no_op() {
        let mut trigger = IntervalTrigger::new(0.1, 1.0);
        trigger.fast_forward(0.0);
        assert!((trigger.next_due().unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn due_times_are_exact_multiples_not_accumulated() {
        let mut trigger = IntervalTrigger::new(0.1, 100.0);
        let mut last = 0.0;
        while let Some(due) = trigger.next_due() {
            last = due;
            trigger.mark_fired();
        }
        // 1000 accumulated additions of 0.1 would drift; multiples do not.
        assert_eq!(last, 0.1 * 1000.0);
    }
}
