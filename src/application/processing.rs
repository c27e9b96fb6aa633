use crate::domain::ports::Clock;
use std::time::Duration;

/// Names of the simulated verification stages, in order.
pub const STEPS: [&str; 4] = [
    "Validating links...",
    "Verifying country availability...",
    "Calculating fees...",
    "Preparing payment...",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingState {
    /// Currently on `STEPS[step]`.
    Running { step: usize },
    Complete,
}

/// Timer-driven pass over the fixed verification steps. Non-interactive and
/// always succeeds; there is no failure path.
#[derive(Debug)]
pub struct ProcessingSimulator {
    state: ProcessingState,
}

impl Default for ProcessingSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingSimulator {
    pub fn new() -> Self {
        Self {
            state: ProcessingState::Running { step: 0 },
        }
    }

    pub fn state(&self) -> ProcessingState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == ProcessingState::Complete
    }

    /// Name of the step currently in progress, if any.
    pub fn current_step(&self) -> Option<&'static str> {
        match self.state {
            ProcessingState::Running { step } => Some(STEPS[step]),
            ProcessingState::Complete => None,
        }
    }

    /// Advances one timer interval. The tick after the last step reaches the
    /// terminal state; further ticks are no-ops.
    pub fn tick(&mut self) -> ProcessingState {
        match self.state {
            ProcessingState::Running { step } if step + 1 < STEPS.len() => {
                self.state = ProcessingState::Running { step: step + 1 };
            }
            ProcessingState::Running { .. } => {
                self.state = ProcessingState::Complete;
            }
            ProcessingState::Complete => {}
        }
        self.state
    }

    /// Drives the simulator to completion, sleeping `interval` before each
    /// advance.
    pub async fn run(&mut self, clock: &dyn Clock, interval: Duration) {
        while !self.is_complete() {
            if let Some(step) = self.current_step() {
                tracing::info!(step, "verification step");
            }
            clock.sleep(interval).await;
            self.tick();
        }
        tracing::info!("processing complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InstantClock;

    #[test]
    fn test_advances_through_every_step_then_completes() {
        let mut sim = ProcessingSimulator::new();
        assert_eq!(sim.current_step(), Some("Validating links..."));

        assert_eq!(sim.tick(), ProcessingState::Running { step: 1 });
        assert_eq!(sim.tick(), ProcessingState::Running { step: 2 });
        assert_eq!(sim.tick(), ProcessingState::Running { step: 3 });
        assert_eq!(sim.current_step(), Some("Preparing payment..."));

        // One further interval past the last step reaches the terminal state.
        assert_eq!(sim.tick(), ProcessingState::Complete);
        assert!(sim.is_complete());
    }

    #[test]
    fn test_tick_after_complete_is_noop() {
        let mut sim = ProcessingSimulator::new();
        for _ in 0..STEPS.len() {
            sim.tick();
        }
        assert!(sim.is_complete());
        assert_eq!(sim.tick(), ProcessingState::Complete);
    }

    #[tokio::test]
    async fn test_run_consumes_one_interval_per_tick() {
        let clock = InstantClock::new();
        let mut sim = ProcessingSimulator::new();
        sim.run(&clock, Duration::from_millis(800)).await;
        assert!(sim.is_complete());
        assert_eq!(clock.slept_ms(), 800 * STEPS.len() as u64);
    }
}
