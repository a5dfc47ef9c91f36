use crate::core::{CoreId, JobId};

/// One scheduler call made by the driver, with the decision it got back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Arrival {
        job: JobId,
        placed: Option<CoreId>,
        // Job displaced from `placed`, if the arrival preempted
        preempted: Option<JobId>,
    },
    Completion {
        core: CoreId,
        job: JobId,
        next: Option<JobId>,
    },
    QuantumExpiry {
        core: CoreId,
        job: JobId,
        next: Option<JobId>,
    },
}
