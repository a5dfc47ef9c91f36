use super::state::{Job, Ticks};

/// Per-job timing figures, computed once at completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobMetrics {
    pub waiting: Ticks,
    pub turnaround: Ticks,
    pub response: Ticks,
}

impl JobMetrics {
    pub fn of(job: &Job, finish: Ticks) -> Self {
        let first_start = job.first_start_time.unwrap_or(finish);
        debug_assert!(
            first_start >= job.arrival_time,
            "Job {} started before it arrived",
            job.id
        );

        let turnaround = finish.saturating_sub(job.arrival_time);
        Self {
            waiting: turnaround.saturating_sub(job.total_length),
            turnaround,
            response: first_start.saturating_sub(job.arrival_time),
        }
    }
}

/// Running totals folded in at each completion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SchedStats {
    pub total_waiting: Ticks,
    pub total_turnaround: Ticks,
    pub total_response: Ticks,
    pub completed: u64,
}

impl SchedStats {
    pub fn record(&mut self, metrics: JobMetrics) {
        self.total_waiting = self.total_waiting.saturating_add(metrics.waiting);
        self.total_turnaround = self.total_turnaround.saturating_add(metrics.turnaround);
        self.total_response = self.total_response.saturating_add(metrics.response);
        self.completed += 1;
    }

    pub fn average_waiting_time(&self) -> f64 {
        self.average(self.total_waiting)
    }

    pub fn average_turnaround_time(&self) -> f64 {
        self.average(self.total_turnaround)
    }

    pub fn average_response_time(&self) -> f64 {
        self.average(self.total_response)
    }

    fn average(&self, total: Ticks) -> f64 {
        debug_assert!(self.completed > 0, "Averages queried before any completion");
        total as f64 / self.completed as f64
    }
}
