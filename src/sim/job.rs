use crate::core::{JobId, Priority, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSpec {
    pub id: JobId,
    pub arrival: Ticks,
    pub run_length: Ticks,
    pub priority: Priority,
}

/// What the driver observed for one job over the run.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub spec: JobSpec,
    pub first_run: Option<Ticks>,
    pub completion: Option<Ticks>,
}

impl JobOutcome {
    pub fn new(spec: JobSpec) -> Self {
        Self {
            spec,
            first_run: None,
            completion: None,
        }
    }

    pub fn turnaround(&self) -> Option<Ticks> {
        Some(self.completion? - self.spec.arrival)
    }

    pub fn waiting(&self) -> Option<Ticks> {
        Some(self.turnaround()? - self.spec.run_length)
    }

    pub fn response(&self) -> Option<Ticks> {
        Some(self.first_run? - self.spec.arrival)
    }
}
