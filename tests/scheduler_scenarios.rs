use coresched::{
    Scheduler, Scheme, Sim, SimConfig,
    sim::{JobSpec, SimEvent},
};

fn spec(id: u64, arrival: u64, run_length: u64, priority: i32) -> JobSpec {
    JobSpec {
        id,
        arrival,
        run_length,
        priority,
    }
}

#[test]
fn fcfs_single_core_hands_over_on_completion() {
    let mut sched = Scheduler::start_up(1, Scheme::Fcfs);
    assert_eq!(sched.job_arrival(1, 0, 10, 0), Some(0));
    assert_eq!(sched.job_arrival(2, 1, 3, 0), None);
    assert_eq!(sched.job_finished(0, 1, 10), Some(2));
    assert_eq!(sched.job_finished(0, 2, 13), None);

    // waiting: 0 and 9, turnaround: 10 and 12, response: 0 and 9
    assert_eq!(sched.average_waiting_time(), 4.5);
    assert_eq!(sched.average_turnaround_time(), 11.0);
    assert_eq!(sched.average_response_time(), 4.5);

    let stats = sched.clean_up();
    assert_eq!(stats.completed, 2);
}

#[test]
fn single_job_has_no_wait() {
    let mut sched = Scheduler::start_up(1, Scheme::Psjf);
    assert_eq!(sched.job_arrival(0, 0, 5, 0), Some(0));
    assert_eq!(sched.job_finished(0, 0, 5), None);
    assert_eq!(sched.average_waiting_time(), 0.0);
    assert_eq!(sched.average_turnaround_time(), 5.0);
    assert_eq!(sched.average_response_time(), 0.0);
}

#[test]
fn fcfs_queue_follows_arrival_order() {
    let mut sched = Scheduler::start_up(1, Scheme::Fcfs);
    sched.job_arrival(10, 0, 50, 3);
    for (id, arrival, run, prio) in [(11, 2, 1, 0), (12, 3, 40, 9), (13, 7, 2, -4)] {
        assert_eq!(sched.job_arrival(id, arrival, run, prio), None);
    }
    assert_eq!(sched.waiting_jobs(), vec![11, 12, 13]);
}

#[test]
fn pri_orders_waiting_jobs_by_priority_then_arrival() {
    let mut sched = Scheduler::start_up(1, Scheme::Pri);
    sched.job_arrival(1, 0, 10, 0);
    sched.job_arrival(2, 1, 10, 3);
    sched.job_arrival(3, 2, 10, 1);
    sched.job_arrival(4, 3, 10, 3);
    sched.job_arrival(5, 4, 10, 1);
    assert_eq!(sched.waiting_jobs(), vec![3, 5, 2, 4]);
    assert_eq!(sched.queue_view().to_string(), "1(0) 3(-1) 5(-1) 2(-1) 4(-1)");
}

#[test]
fn ppri_preempts_largest_margin_then_later_arrival() {
    let mut sched = Scheduler::start_up(3, Scheme::Ppri);
    sched.job_arrival(1, 0, 20, 6);
    sched.job_arrival(2, 1, 20, 2);
    sched.job_arrival(3, 2, 20, 4);

    // Margins against priority 1: core 0 -> 5, core 1 -> 1, core 2 -> 3
    assert_eq!(sched.job_arrival(4, 3, 20, 1), Some(0));
    assert_eq!(sched.waiting_jobs(), vec![1]);

    // Cores now hold priorities 1, 2, 4; a priority-0 arrival has margins 1, 2, 4
    assert_eq!(sched.job_arrival(5, 4, 20, 0), Some(2));
    assert_eq!(sched.waiting_jobs(), vec![3, 1]);

    let mut tied = Scheduler::start_up(3, Scheme::Ppri);
    tied.job_arrival(1, 0, 20, 5);
    tied.job_arrival(2, 1, 20, 5);
    tied.job_arrival(3, 2, 20, 2);
    assert_eq!(tied.job_arrival(4, 3, 20, 0), Some(1));
    assert_eq!(tied.running_job(0), Some(1));
    assert_eq!(tied.running_job(1), Some(4));
}

#[test]
fn preempted_job_keeps_first_start_for_response() {
    let mut sched = Scheduler::start_up(1, Scheme::Ppri);
    sched.job_arrival(1, 0, 10, 5);
    assert_eq!(sched.job_arrival(2, 2, 3, 1), Some(0));
    assert_eq!(sched.job_finished(0, 2, 5), Some(1));
    assert_eq!(sched.job(1).and_then(|job| job.first_start_time), Some(0));
    assert_eq!(sched.job(1).map(|job| job.remaining_length), Some(8));
    assert_eq!(sched.job_finished(0, 1, 13), None);

    // job 1: waiting 3, response 0; job 2: waiting 0, response 0
    assert_eq!(sched.stats().total_waiting, 3);
    assert_eq!(sched.stats().total_response, 0);
}

#[test]
fn round_robin_shares_core_in_two_unit_slices() {
    let jobs = vec![spec(1, 0, 4, 0), spec(2, 1, 4, 0)];
    let config = SimConfig::new(1, Scheme::Rr, Some(2)).expect("valid config");
    let mut sim = Sim::new(jobs, config).expect("valid workload");

    let mut slices = 0;
    while !sim.all_jobs_completed() {
        for event in sim.step() {
            if matches!(event, SimEvent::QuantumExpiry { .. }) {
                slices += 1;
            }
        }
    }

    assert_eq!(slices, 2);
    assert_eq!(sim.now(), 8);
    let completions: Vec<_> = sim.jobs().iter().map(|job| job.completion).collect();
    assert_eq!(completions, vec![Some(6), Some(8)]);
}

#[test]
fn multi_core_psjf_report_matches_per_job_figures() {
    let jobs = vec![
        spec(0, 0, 9, 0),
        spec(1, 1, 7, 0),
        spec(2, 2, 2, 0),
        spec(3, 3, 1, 0),
        spec(4, 5, 6, 0),
        spec(5, 6, 3, 0),
    ];
    let config = SimConfig::new(2, Scheme::Psjf, None).expect("valid config");
    let mut sim = Sim::new(jobs, config).expect("valid workload");
    let report = sim.run();

    assert_eq!(report.completed, 6);
    assert!((report.average_waiting - report.mean_of(|job| job.waiting())).abs() < 1e-9);
    assert!((report.average_turnaround - report.mean_of(|job| job.turnaround())).abs() < 1e-9);
    assert!((report.average_response - report.mean_of(|job| job.response())).abs() < 1e-9);

    // 28 units of work; core 1 sits idle for the first tick only
    assert_eq!(report.makespan, 15);
}
