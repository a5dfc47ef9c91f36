use std::path::PathBuf;

use clap::Parser;
use coresched::{
    Scheme, SimConfig, SimError,
    core::{Priority, Ticks},
    sim::WorkloadParams,
};

/// Replay a job trace (or a random workload) through the CPU scheduler and
/// report waiting, turnaround and response times.
#[derive(Parser, Debug)]
#[command(name = "coresched", version, about)]
pub struct CliArgs {
    /// Trace file with one `arrival run_length priority` line per job.
    /// A seeded random workload is generated when omitted.
    pub trace: Option<PathBuf>,

    /// Number of cores
    #[arg(short, long, env = "CORESCHED_CORES", default_value_t = 1)]
    pub cores: usize,

    /// Scheduling scheme: fcfs, sjf, psjf, pri, ppri or rr
    #[arg(short, long, env = "CORESCHED_SCHEME", default_value = "fcfs")]
    pub scheme: Scheme,

    /// Round-robin time slice
    #[arg(short, long, env = "CORESCHED_QUANTUM", default_value_t = 2)]
    pub quantum: Ticks,

    /// Print every job's timings after the summary
    #[arg(long)]
    pub per_job: bool,

    /// Random workload: ticks over which jobs may arrive
    #[arg(long, default_value_t = 500)]
    pub ticks: Ticks,

    /// Random workload: arrival probability per tick
    #[arg(long, default_value_t = 0.3, value_parser = parse_probability)]
    pub p_arrival: f64,

    /// Random workload: probability a job is short
    #[arg(long, default_value_t = 0.3, value_parser = parse_probability)]
    pub p_short: f64,

    /// Random workload: run length of short jobs
    #[arg(long, default_value_t = 2)]
    pub short_len: Ticks,

    /// Random workload: run length of long jobs
    #[arg(long, default_value_t = 6)]
    pub long_len: Ticks,

    /// Random workload: largest priority value drawn
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(i32).range(0..))]
    pub max_priority: Priority,

    /// Random workload: RNG seed
    #[arg(long, env = "CORESCHED_SEED", default_value_t = 0)]
    pub seed: u64,
}

impl CliArgs {
    pub fn sim_config(&self) -> Result<SimConfig, SimError> {
        SimConfig::new(self.cores, self.scheme, Some(self.quantum))
    }

    pub fn workload_params(&self) -> WorkloadParams {
        WorkloadParams {
            ticks: self.ticks,
            p_arrival: self.p_arrival,
            p_short: self.p_short,
            short_len: self.short_len,
            long_len: self.long_len,
            max_priority: self.max_priority,
        }
    }
}

fn parse_probability(raw: &str) -> Result<f64, String> {
    let p: f64 = raw.parse().map_err(|err| format!("{err}"))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{p} is not in [0, 1]"))
    }
}
