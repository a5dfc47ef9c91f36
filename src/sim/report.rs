use average::{Estimate, Max, Mean};
use std::fmt;

use super::{config::SimConfig, job::JobOutcome};
use crate::core::{Scheduler, Scheme, Ticks};

/// End-of-run summary. The three averages come from the scheduler's running
/// totals; the per-job helpers recompute them from what the driver observed.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub scheme: Scheme,
    pub cores: usize,
    pub jobs: Vec<JobOutcome>,
    pub completed: u64,
    pub average_waiting: f64,
    pub average_turnaround: f64,
    pub average_response: f64,
    pub makespan: Ticks,
}

impl SimReport {
    pub fn new(config: &SimConfig, scheduler: &Scheduler, jobs: Vec<JobOutcome>) -> Self {
        let stats = scheduler.stats();
        let (average_waiting, average_turnaround, average_response) = if stats.completed > 0 {
            (
                stats.average_waiting_time(),
                stats.average_turnaround_time(),
                stats.average_response_time(),
            )
        } else {
            (f64::NAN, f64::NAN, f64::NAN)
        };

        Self {
            scheme: config.scheme,
            cores: config.cores,
            makespan: jobs.iter().filter_map(|job| job.completion).max().unwrap_or(0),
            jobs,
            completed: stats.completed,
            average_waiting,
            average_turnaround,
            average_response,
        }
    }

    pub fn mean_of<F>(&self, metric: F) -> f64
    where
        F: Fn(&JobOutcome) -> Option<Ticks>,
    {
        self.jobs
            .iter()
            .filter_map(metric)
            .map(|ticks| ticks as f64)
            .collect::<Mean>()
            .estimate()
    }

    pub fn max_waiting(&self) -> f64 {
        let mut max = Max::new();
        for waiting in self.jobs.iter().filter_map(JobOutcome::waiting) {
            max.add(waiting as f64);
        }
        max.max()
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scheme: {} on {} core(s)", self.scheme, self.cores)?;
        writeln!(
            f,
            "Jobs completed: {} (makespan {} ticks)",
            self.completed, self.makespan
        )?;
        writeln!(f, "Average waiting time: {:.2}", self.average_waiting)?;
        writeln!(f, "Average turnaround time: {:.2}", self.average_turnaround)?;
        writeln!(f, "Average response time: {:.2}", self.average_response)?;
        write!(f, "Longest wait: {:.0} ticks", self.max_waiting())
    }
}
