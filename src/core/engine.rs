use std::fmt;

use tracing::{Level, debug, trace};

use super::{
    observer::Observer,
    scheme::{Rank, Scheme},
    state::{CoreId, Job, JobId, JobKey, Priority, SchedCtx, Ticks},
    stats::{JobMetrics, SchedStats},
};

/// Event-driven policy engine. The caller delivers arrivals, completions and
/// quantum expiries in non-decreasing time order; every handler returns the
/// resulting placement decision, or `None` when nothing changes hands.
#[derive(Debug)]
pub struct Scheduler {
    scheme: Scheme,
    ctx: SchedCtx,
    stats: SchedStats,
    observer: Observer,
}

impl Scheduler {
    pub fn start_up(num_cores: usize, scheme: Scheme) -> Self {
        assert!(num_cores > 0, "Scheduler requires at least one core");
        debug!(cores = num_cores, %scheme, "scheduler started");

        Self {
            scheme,
            ctx: SchedCtx::new(num_cores, scheme),
            stats: SchedStats::default(),
            observer: Observer::new(),
        }
    }

    /// Returns the core the new job should run on, which may preempt that
    /// core's current job under PSJF and PPRI.
    pub fn job_arrival(
        &mut self,
        job_id: JobId,
        time: Ticks,
        run_length: Ticks,
        priority: Priority,
    ) -> Option<CoreId> {
        self.ctx.refresh_running(time);
        let key = self.ctx.jobs.create(job_id, time, run_length, priority);

        let placed = if let Some(core) = self.ctx.pick_idle_core() {
            self.ctx.set_running(core, key, time);
            debug!(job = job_id, core, time, "job placed on idle core");
            Some(core)
        } else if self.scheme.is_preemptive() {
            self.preempt_for(key, time)
        } else {
            self.park(key, time);
            None
        };

        self.observe();
        placed
    }

    /// Returns the job that takes over `core`, or `None` if it goes idle.
    pub fn job_finished(&mut self, core: CoreId, job_id: JobId, time: Ticks) -> Option<JobId> {
        self.ctx.refresh_running(time);

        match self.ctx.clear_core(core).and_then(|key| self.ctx.jobs.destroy(key)) {
            Some(job) => {
                debug_assert_eq!(job.id, job_id, "Core {core} was running a different job");
                let metrics = JobMetrics::of(&job, time);
                self.stats.record(metrics);
                debug!(
                    job = job.id,
                    core,
                    time,
                    waiting = metrics.waiting,
                    turnaround = metrics.turnaround,
                    response = metrics.response,
                    "job finished"
                );
            }
            None => debug_assert!(false, "Job {job_id} finished on idle core {core}"),
        }

        let next = self.dispatch_next(core, time);
        self.observe();
        next
    }

    /// Round-robin only: rotate the core's job to the queue tail and hand the
    /// core to the queue head (possibly the same job).
    pub fn quantum_expired(&mut self, core: CoreId, time: Ticks) -> Option<JobId> {
        debug_assert!(
            self.scheme.is_round_robin(),
            "Quantum expiry delivered under {}",
            self.scheme
        );
        self.ctx.refresh_running(time);

        if let Some(key) = self.ctx.clear_core(core) {
            self.park(key, time);
        }

        let next = self.dispatch_next(core, time);
        self.observe();
        next
    }

    pub fn average_waiting_time(&self) -> f64 {
        self.stats.average_waiting_time()
    }

    pub fn average_turnaround_time(&self) -> f64 {
        self.stats.average_turnaround_time()
    }

    pub fn average_response_time(&self) -> f64 {
        self.stats.average_response_time()
    }

    /// Release every job and return the final totals.
    pub fn clean_up(mut self) -> SchedStats {
        if !self.ctx.jobs.is_empty() {
            debug!(abandoned = self.ctx.jobs.len(), "jobs still live at clean up");
        }
        self.ctx.clear();
        self.stats
    }

    pub fn stats(&self) -> &SchedStats {
        &self.stats
    }

    /// Number of arrivals, completions and quantum expiries handled so far.
    pub fn events_observed(&self) -> u64 {
        self.observer.steps()
    }

    pub fn job(&self, job_id: JobId) -> Option<&Job> {
        self.ctx.jobs.key_of(job_id).and_then(|key| self.ctx.jobs.get(key))
    }

    pub fn running_job(&self, core: CoreId) -> Option<JobId> {
        self.ctx
            .cores
            .get(core)?
            .current
            .map(|key| self.ctx.job(key).id)
    }

    /// Waiting job ids, head first.
    pub fn waiting_jobs(&self) -> Vec<JobId> {
        self.ctx
            .wait
            .iter()
            .map(|entry| self.ctx.job(entry.key).id)
            .collect()
    }

    pub fn queue_view(&self) -> QueueView {
        let running = self
            .ctx
            .occupied_cores()
            .map(|(core, key)| (self.ctx.job(key).id, Some(core)));
        let waiting = (0..self.ctx.wait.len())
            .filter_map(|index| self.ctx.wait.at(index))
            .map(|entry| (self.ctx.job(entry.key).id, None));

        QueueView {
            entries: running.chain(waiting).collect(),
        }
    }

    fn preempt_for(&mut self, key: JobKey, time: Ticks) -> Option<CoreId> {
        let incoming = self.ctx.job(key).rank();
        let Some(core) = self.preemption_target(&incoming) else {
            self.park(key, time);
            return None;
        };

        if let Some(displaced) = self.ctx.clear_core(core) {
            debug!(
                job = self.ctx.job(key).id,
                displaced = self.ctx.job(displaced).id,
                core,
                time,
                "preempting"
            );
            self.park(displaced, time);
        }
        self.ctx.set_running(core, key, time);
        Some(core)
    }

    // The running job that ranks behind `incoming` by the widest margin.
    // Equal margins go to the later arrival.
    fn preemption_target(&self, incoming: &Rank) -> Option<CoreId> {
        self.ctx
            .occupied_cores()
            .map(|(core, key)| {
                let running = self.ctx.job(key).rank();
                (core, self.scheme.margin(&running, incoming), running.arrival)
            })
            .filter(|&(_, margin, _)| margin > 0)
            .max_by_key(|&(_, margin, arrival)| (margin, arrival))
            .map(|(core, _, _)| core)
    }

    fn park(&mut self, key: JobKey, time: Ticks) {
        let index = self.ctx.enqueue(key, time);
        debug!(job = self.ctx.job(key).id, index, time, "job queued");
    }

    fn dispatch_next(&mut self, core: CoreId, time: Ticks) -> Option<JobId> {
        let Some(key) = self.ctx.poll_waiting() else {
            debug!(core, time, "core idle");
            return None;
        };

        self.ctx.set_running(core, key, time);
        let job_id = self.ctx.job(key).id;
        debug!(job = job_id, core, time, "job dispatched from queue");
        Some(job_id)
    }

    fn observe(&mut self) {
        self.observer.observe(&self.ctx);
        if tracing::enabled!(Level::TRACE) {
            trace!(queue = %self.queue_view(), "scheduler state");
        }
    }
}

/// Running jobs as `id(core)` in core order, then waiting jobs as `id(-1)`
/// in queue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueView {
    pub entries: Vec<(JobId, Option<CoreId>)>,
}

impl fmt::Display for QueueView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (job, core)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match core {
                Some(core) => write!(f, "{job}({core})")?,
                None => write!(f, "{job}(-1)")?,
            }
        }
        Ok(())
    }
}
