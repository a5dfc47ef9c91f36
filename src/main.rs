mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use coresched::{
    Sim,
    sim::{JobOutcome, SimEvent, bernoulli_jobs, load_trace},
};
use tracing::{debug, info};

use crate::cli::CliArgs;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = args.sim_config().context("invalid scheduler settings")?;

    let jobs = match &args.trace {
        Some(path) => {
            load_trace(path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => bernoulli_jobs(&args.workload_params(), args.seed)
            .context("invalid workload parameters")?,
    };
    info!(
        jobs = jobs.len(),
        cores = config.cores,
        scheme = %config.scheme,
        "starting simulation"
    );

    let mut sim = Sim::new(jobs, config).context("invalid workload")?;
    let mut preemptions = 0;
    while !sim.all_jobs_completed() {
        let events = sim.step();
        if events.is_empty() {
            break;
        }
        for event in events {
            debug!(t = sim.now(), ?event);
            if let SimEvent::Arrival {
                preempted: Some(_), ..
            } = event
            {
                preemptions += 1;
            }
        }
    }

    let report = sim.report();
    println!("{report}");
    println!("Preemptions: {preemptions}");
    println!("Scheduler events: {}", sim.scheduler.events_observed());
    println!(
        "Per-job average response: {:.2}",
        report.mean_of(JobOutcome::response)
    );

    if args.per_job {
        println!();
        println!(
            "{:>6} {:>8} {:>6} {:>5} {:>8} {:>8}",
            "job", "arrival", "run", "prio", "start", "finish"
        );
        for job in &report.jobs {
            println!(
                "{:>6} {:>8} {:>6} {:>5} {:>8} {:>8}",
                job.spec.id,
                job.spec.arrival,
                job.spec.run_length,
                job.spec.priority,
                job.first_run.map_or("-".to_string(), |t| t.to_string()),
                job.completion.map_or("-".to_string(), |t| t.to_string()),
            );
        }
    }

    Ok(())
}
