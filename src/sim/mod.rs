pub mod config;
pub mod driver;
pub mod event;
pub mod job;
pub mod report;
pub mod trace;
pub mod workload;

pub use config::SimConfig;
pub use driver::Sim;
pub use event::SimEvent;
pub use job::{JobOutcome, JobSpec};
pub use report::SimReport;
pub use trace::{load_trace, parse_trace};
pub use workload::{WorkloadParams, bernoulli_jobs};
