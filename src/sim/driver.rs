use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use tracing::{Level, trace};

use super::{
    config::SimConfig,
    event::SimEvent,
    job::{JobOutcome, JobSpec},
    report::SimReport,
};
use crate::{
    core::{CoreId, JobId, Scheduler, Ticks},
    error::SimError,
};

// Completions sort ahead of quantum expiries at the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum DeadlineKind {
    Completion,
    Quantum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Deadline {
    time: Ticks,
    kind: DeadlineKind,
    core: CoreId,
}

// KeyedPriorityQueue is a max-heap, so the earliest deadline must compare greatest
impl PartialOrd for Deadline {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Deadline {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.time, other.kind, other.core).cmp(&(self.time, self.kind, self.core))
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    job: JobId,
    since: Ticks,
}

/// Replays a workload against a [`Scheduler`], generating arrivals,
/// completions and quantum expiries in time order.
pub struct Sim {
    pub scheduler: Scheduler,
    config: SimConfig,
    jobs: Vec<JobOutcome>,
    // Remaining run time as the driver sees it, parallel to `jobs`
    remaining: Vec<Ticks>,
    // JobId --> jobs[index]
    index_of: FxHashMap<JobId, usize>,
    job_cursor: usize,
    slots: Vec<Option<Slot>>,
    // At most one pending deadline per busy core
    deadlines: KeyedPriorityQueue<CoreId, Deadline>,
    now: Ticks,
}

impl Sim {
    pub fn new(mut jobs: Vec<JobSpec>, config: SimConfig) -> Result<Self, SimError> {
        let config = SimConfig::new(config.cores, config.scheme, config.quantum)?;
        if jobs.is_empty() {
            return Err(SimError::EmptyWorkload);
        }

        jobs.sort_by(|a, b| a.arrival.cmp(&b.arrival).then_with(|| a.id.cmp(&b.id)));

        let mut index_of = FxHashMap::default();
        // Latest instant any deadline can fall on: every job runs back to back
        let mut horizon: Ticks = 0;
        for (index, job) in jobs.iter().enumerate() {
            if job.run_length == 0 {
                return Err(SimError::ZeroRunLength { job: job.id });
            }
            horizon = horizon
                .max(job.arrival)
                .checked_add(job.run_length)
                .ok_or(SimError::TimeOverflow { job: job.id })?;
            if index_of.insert(job.id, index).is_some() {
                return Err(SimError::DuplicateJobId(job.id));
            }
        }
        if let Some(pair) = jobs.windows(2).find(|pair| pair[0].arrival == pair[1].arrival) {
            return Err(SimError::DuplicateArrival {
                time: pair[0].arrival,
                first: pair[0].id,
                second: pair[1].id,
            });
        }

        Ok(Self {
            scheduler: Scheduler::start_up(config.cores, config.scheme),
            config,
            remaining: jobs.iter().map(|job| job.run_length).collect(),
            jobs: jobs.into_iter().map(JobOutcome::new).collect(),
            index_of,
            job_cursor: 0,
            slots: vec![None; config.cores],
            deadlines: KeyedPriorityQueue::new(),
            now: 0,
        })
    }

    /// Advance to the next instant with pending work and deliver everything
    /// due then: completions, quantum expiries, then arrivals. Returns an
    /// empty list once the workload is exhausted.
    pub fn step(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();

        let next_arrival = self.jobs.get(self.job_cursor).map(|job| job.spec.arrival);
        let next_deadline = self.deadlines.peek().map(|(_, deadline)| deadline.time);
        let now = match (next_arrival, next_deadline) {
            (Some(arrival), Some(deadline)) => arrival.min(deadline),
            (Some(time), None) | (None, Some(time)) => time,
            (None, None) => return events,
        };
        debug_assert!(now >= self.now, "Simulation time went backwards");
        self.now = now;

        while self
            .deadlines
            .peek()
            .is_some_and(|(_, deadline)| deadline.time == now)
        {
            let Some((core, deadline)) = self.deadlines.pop() else {
                break;
            };
            let event = match deadline.kind {
                DeadlineKind::Completion => self.complete(core),
                DeadlineKind::Quantum => self.expire(core),
            };
            events.extend(event);
        }

        while self
            .jobs
            .get(self.job_cursor)
            .is_some_and(|job| job.spec.arrival == now)
        {
            let spec = self.jobs[self.job_cursor].spec;
            self.job_cursor += 1;
            events.push(self.arrive(spec));
        }

        if tracing::enabled!(Level::TRACE) {
            trace!(time = now, queue = %self.scheduler.queue_view(), "after step");
        }
        events
    }

    /// Drive the workload to completion.
    pub fn run(&mut self) -> SimReport {
        while !self.all_jobs_completed() {
            if self.step().is_empty() {
                break;
            }
        }
        self.report()
    }

    pub fn report(&self) -> SimReport {
        SimReport::new(&self.config, &self.scheduler, self.jobs.clone())
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn jobs(&self) -> &[JobOutcome] {
        &self.jobs
    }

    pub fn running_on(&self, core: CoreId) -> Option<JobId> {
        self.slots.get(core).copied().flatten().map(|slot| slot.job)
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.jobs.iter().all(|job| job.completion.is_some())
    }

    fn arrive(&mut self, spec: JobSpec) -> SimEvent {
        let placed =
            self.scheduler
                .job_arrival(spec.id, self.now, spec.run_length, spec.priority);

        let mut preempted = None;
        if let Some(core) = placed {
            if let Some(slot) = self.slots[core].take() {
                self.charge(slot);
                preempted = Some(slot.job);
            }
            self.start(core, spec.id);
        }

        SimEvent::Arrival {
            job: spec.id,
            placed,
            preempted,
        }
    }

    fn complete(&mut self, core: CoreId) -> Option<SimEvent> {
        let slot = self.slots[core].take()?;
        let index = self.index(slot.job);
        self.remaining[index] = 0;
        self.jobs[index].completion = Some(self.now);

        let next = self.scheduler.job_finished(core, slot.job, self.now);
        if let Some(next) = next {
            self.start(core, next);
        }

        Some(SimEvent::Completion {
            core,
            job: slot.job,
            next,
        })
    }

    fn expire(&mut self, core: CoreId) -> Option<SimEvent> {
        let slot = self.slots[core].take()?;
        self.charge(slot);

        let next = self.scheduler.quantum_expired(core, self.now);
        if let Some(next) = next {
            self.start(core, next);
        }

        Some(SimEvent::QuantumExpiry {
            core,
            job: slot.job,
            next,
        })
    }

    fn start(&mut self, core: CoreId, job: JobId) {
        let index = self.index(job);
        let remaining = self.remaining[index];
        debug_assert!(remaining > 0, "Job {job} dispatched with no work left");

        self.jobs[index].first_run.get_or_insert(self.now);
        self.slots[core] = Some(Slot {
            job,
            since: self.now,
        });

        let deadline = match self.config.quantum {
            Some(quantum) if quantum < remaining => Deadline {
                time: self.now + quantum,
                kind: DeadlineKind::Quantum,
                core,
            },
            _ => Deadline {
                time: self.now + remaining,
                kind: DeadlineKind::Completion,
                core,
            },
        };
        self.deadlines.push(core, deadline);
    }

    fn charge(&mut self, slot: Slot) {
        let index = self.index(slot.job);
        let elapsed = self.now - slot.since;
        self.remaining[index] = self.remaining[index].saturating_sub(elapsed);
    }

    fn index(&self, job: JobId) -> usize {
        *self
            .index_of
            .get(&job)
            .expect("Scheduler returned a job the driver never submitted")
    }
}
