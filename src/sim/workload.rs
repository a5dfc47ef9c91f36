use rand::prelude::*;

use super::job::JobSpec;
use crate::{
    core::{Priority, Ticks},
    error::SimError,
};

/// Bernoulli arrival process: at most one arrival per tick, so arrival
/// times are unique.
#[derive(Debug, Clone, Copy)]
pub struct WorkloadParams {
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_len: Ticks,
    pub long_len: Ticks,
    pub max_priority: Priority,
}

impl Default for WorkloadParams {
    fn default() -> Self {
        Self {
            ticks: 500,
            p_arrival: 0.3,
            p_short: 0.3,
            short_len: 2,
            long_len: 6,
            max_priority: 4,
        }
    }
}

impl WorkloadParams {
    pub fn validate(&self) -> Result<(), SimError> {
        for (name, p) in [("p_arrival", self.p_arrival), ("p_short", self.p_short)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::InvalidParam {
                    name,
                    message: format!("{p} is not a probability"),
                });
            }
        }
        if self.short_len == 0 || self.long_len == 0 {
            return Err(SimError::InvalidParam {
                name: "run length",
                message: "job lengths must be positive".to_string(),
            });
        }
        if self.max_priority < 0 {
            return Err(SimError::InvalidParam {
                name: "max_priority",
                message: format!("{} is negative", self.max_priority),
            });
        }
        Ok(())
    }
}

pub fn bernoulli_jobs(params: &WorkloadParams, seed: u64) -> Result<Vec<JobSpec>, SimError> {
    params.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jobs = Vec::new();

    for t in 0..params.ticks {
        if rng.random::<f64>() < params.p_arrival {
            let run_length = if rng.random::<f64>() < params.p_short {
                params.short_len
            } else {
                params.long_len
            };

            jobs.push(JobSpec {
                id: jobs.len() as u64,
                arrival: t,
                run_length,
                priority: rng.random_range(0..=params.max_priority),
            });
        }
    }

    Ok(jobs)
}
