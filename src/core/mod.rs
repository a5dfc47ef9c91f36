pub mod engine;
pub mod observer;
pub mod priqueue;
pub mod scheme;
pub mod state;
pub mod stats;

pub use engine::{QueueView, Scheduler};
pub use priqueue::{Comparator, PriQueue};
pub use scheme::{ParseSchemeError, Rank, Scheme};
pub use state::{CoreId, Job, JobId, JobKey, JobState, Priority, SchedCtx, Ticks};
pub use stats::{JobMetrics, SchedStats};
