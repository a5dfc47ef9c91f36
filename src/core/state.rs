use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::cmp::Ordering;

use super::{
    priqueue::{Comparator, PriQueue},
    scheme::{Rank, Scheme},
};

/// Caller-assigned job identifier, never reused.
pub type JobId = u64;
pub type CoreId = usize;
pub type Ticks = u64;
/// Lower value means higher priority.
pub type Priority = i32;

new_key_type! {
    pub struct JobKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    New,
    Running(CoreId),
    Waiting,
}

#[derive(Debug)]
pub struct Job {
    pub id: JobId,
    pub priority: Priority,
    pub arrival_time: Ticks,
    pub total_length: Ticks,
    pub remaining_length: Ticks,
    pub last_core_entry_time: Ticks,
    pub first_start_time: Option<Ticks>,
    pub queue_enqueue_time: Option<Ticks>,
    pub state: JobState,
    // Time up to which `remaining_length` already accounts for core usage
    progress_mark: Ticks,
}

impl Job {
    pub fn rank(&self) -> Rank {
        Rank {
            arrival: self.arrival_time,
            total: self.total_length,
            remaining: self.remaining_length,
            priority: self.priority,
        }
    }

    fn charge_progress(&mut self, now: Ticks) {
        let elapsed = now.saturating_sub(self.progress_mark);
        self.remaining_length = self.remaining_length.saturating_sub(elapsed);
        self.progress_mark = now;
    }
}

/// Sole owner of job records. Cores and the wait queue only hold `JobKey`s.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: SlotMap<JobKey, Job>,
    by_id: FxHashMap<JobId, JobKey>,
}

impl JobRegistry {
    pub fn create(
        &mut self,
        id: JobId,
        arrival_time: Ticks,
        total_length: Ticks,
        priority: Priority,
    ) -> JobKey {
        debug_assert!(
            !self.by_id.contains_key(&id),
            "Job {id} already registered"
        );

        let key = self.jobs.insert(Job {
            id,
            priority,
            arrival_time,
            total_length,
            remaining_length: total_length,
            last_core_entry_time: arrival_time,
            first_start_time: None,
            queue_enqueue_time: None,
            state: JobState::New,
            progress_mark: arrival_time,
        });
        self.by_id.insert(id, key);
        key
    }

    pub fn destroy(&mut self, key: JobKey) -> Option<Job> {
        let job = self.jobs.remove(key)?;
        self.by_id.remove(&job.id);
        Some(job)
    }

    pub fn key_of(&self, id: JobId) -> Option<JobKey> {
        self.by_id.get(&id).copied()
    }

    pub fn get(&self, key: JobKey) -> Option<&Job> {
        self.jobs.get(key)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
        self.by_id.clear();
    }
}

/// Wait-queue entry: the job handle plus the rank it had when it was enqueued.
/// Waiting jobs are never mutated, so the rank stays exact while queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waiting {
    pub key: JobKey,
    pub rank: Rank,
}

impl Comparator<Waiting> for Scheme {
    fn compare(&self, a: &Waiting, b: &Waiting) -> Ordering {
        self.order(&a.rank, &b.rank)
    }
}

#[derive(Debug)]
pub struct CoreState {
    pub id: CoreId,
    pub current: Option<JobKey>,
}

#[derive(Debug)]
pub struct SchedCtx {
    pub cores: Vec<CoreState>,
    pub jobs: JobRegistry,
    pub wait: PriQueue<Waiting, Scheme>,
}

impl SchedCtx {
    pub fn new(num_cores: usize, scheme: Scheme) -> Self {
        Self {
            cores: (0..num_cores)
                .map(|id| CoreState { id, current: None })
                .collect(),
            jobs: JobRegistry::default(),
            wait: PriQueue::new(scheme),
        }
    }

    pub fn job(&self, key: JobKey) -> &Job {
        &self.jobs.jobs[key]
    }

    pub fn job_mut(&mut self, key: JobKey) -> &mut Job {
        &mut self.jobs.jobs[key]
    }

    pub fn core_is_idle(&self, core: CoreId) -> bool {
        self.cores[core].current.is_none()
    }

    pub fn pick_idle_core(&self) -> Option<CoreId> {
        self.cores
            .iter()
            .find(|core| core.current.is_none())
            .map(|core| core.id)
    }

    pub fn occupied_cores(&self) -> impl Iterator<Item = (CoreId, JobKey)> + '_ {
        self.cores
            .iter()
            .filter_map(|core| core.current.map(|key| (core.id, key)))
    }

    /// Bring every running job's remaining time up to date with `now`.
    pub fn refresh_running(&mut self, now: Ticks) {
        for core in &self.cores {
            if let Some(key) = core.current {
                self.jobs.jobs[key].charge_progress(now);
            }
        }
    }

    pub fn set_running(&mut self, core: CoreId, key: JobKey, now: Ticks) {
        debug_assert!(
            self.cores[core].current.is_none(),
            "Core {core} already running a job"
        );
        debug_assert!(
            self.wait.iter().all(|entry| entry.key != key),
            "Running job must not be queued"
        );

        self.cores[core].current = Some(key);
        let job = self.job_mut(key);
        job.state = JobState::Running(core);
        job.last_core_entry_time = now;
        job.progress_mark = now;
        job.first_start_time.get_or_insert(now);
    }

    pub fn clear_core(&mut self, core: CoreId) -> Option<JobKey> {
        self.cores[core].current.take()
    }

    /// Returns the queue index the job landed at.
    pub fn enqueue(&mut self, key: JobKey, now: Ticks) -> usize {
        debug_assert!(
            self.cores.iter().all(|core| core.current != Some(key)),
            "Job must leave its core before being queued"
        );
        let job = self.job_mut(key);
        job.state = JobState::Waiting;
        job.queue_enqueue_time = Some(now);
        let rank = job.rank();
        self.wait.offer(Waiting { key, rank })
    }

    pub fn poll_waiting(&mut self) -> Option<JobKey> {
        self.wait.poll().map(|entry| entry.key)
    }

    pub fn clear(&mut self) {
        for core in &mut self.cores {
            core.current = None;
        }
        self.wait.clear();
        self.jobs.clear();
    }
}
