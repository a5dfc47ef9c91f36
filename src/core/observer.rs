use rustc_hash::FxHashSet;

use super::state::{JobState, SchedCtx};

/// Debug-build consistency checks run after every scheduler event.
#[derive(Debug)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SchedCtx) {
        self.step += 1;

        if !cfg!(debug_assertions) {
            return;
        }

        let mut running = 0;
        for core in &ctx.cores {
            if let Some(key) = core.current {
                let job = ctx.job(key);
                debug_assert_eq!(
                    job.state,
                    JobState::Running(core.id),
                    "core.current job {} metadata mismatch",
                    job.id
                );
                running += 1;
            }
        }

        let mut queued = FxHashSet::default();
        for entry in ctx.wait.iter() {
            let Some(job) = ctx.jobs.get(entry.key) else {
                debug_assert!(false, "Wait queue references a destroyed job");
                continue;
            };
            debug_assert_eq!(
                job.state,
                JobState::Waiting,
                "Queued job {} must not be running",
                job.id
            );
            debug_assert_eq!(
                job.rank(),
                entry.rank,
                "Queued job {} changed while waiting",
                job.id
            );
            let first_sighting = queued.insert(entry.key);
            debug_assert!(first_sighting, "Job {} queued more than once", job.id);
        }

        debug_assert_eq!(
            running + queued.len(),
            ctx.jobs.len(),
            "Every live job must be on exactly one core or in the queue"
        );
    }
}
