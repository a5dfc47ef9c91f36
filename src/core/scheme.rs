use std::{cmp::Ordering, fmt, str::FromStr};

use thiserror::Error;

use super::state::{Priority, Ticks};

/// Scheduling discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// First come, first served.
    Fcfs,
    /// Shortest job first, non-preemptive.
    Sjf,
    /// Preemptive shortest remaining time first.
    Psjf,
    /// Priority, non-preemptive.
    Pri,
    /// Preemptive priority.
    Ppri,
    /// Round robin; all jobs rank equal so the queue degenerates to FIFO.
    Rr,
}

/// Snapshot of the job fields a scheme may order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub arrival: Ticks,
    pub total: Ticks,
    pub remaining: Ticks,
    pub priority: Priority,
}

impl Scheme {
    pub const ALL: [Scheme; 6] = [
        Scheme::Fcfs,
        Scheme::Sjf,
        Scheme::Psjf,
        Scheme::Pri,
        Scheme::Ppri,
        Scheme::Rr,
    ];

    pub fn is_preemptive(self) -> bool {
        matches!(self, Scheme::Psjf | Scheme::Ppri)
    }

    pub fn is_round_robin(self) -> bool {
        self == Scheme::Rr
    }

    pub fn name(self) -> &'static str {
        match self {
            Scheme::Fcfs => "FCFS",
            Scheme::Sjf => "SJF",
            Scheme::Psjf => "PSJF",
            Scheme::Pri => "PRI",
            Scheme::Ppri => "PPRI",
            Scheme::Rr => "RR",
        }
    }

    /// Signed ranking distance between `a` and `b`. Negative means `a` runs
    /// first. The magnitude matters for preemption: the running job with the
    /// largest positive margin against an arrival is the one displaced.
    pub fn margin(self, a: &Rank, b: &Rank) -> i64 {
        let by_arrival = diff(a.arrival, b.arrival);
        let primary = match self {
            Scheme::Fcfs => return by_arrival,
            Scheme::Rr => return 0,
            Scheme::Sjf => diff(a.total, b.total),
            Scheme::Psjf => diff(a.remaining, b.remaining),
            Scheme::Pri | Scheme::Ppri => i64::from(a.priority) - i64::from(b.priority),
        };

        if primary != 0 { primary } else { by_arrival }
    }

    pub fn order(self, a: &Rank, b: &Rank) -> Ordering {
        self.margin(a, b).cmp(&0)
    }
}

fn diff(a: Ticks, b: Ticks) -> i64 {
    if a >= b {
        i64::try_from(a - b).unwrap_or(i64::MAX)
    } else {
        i64::try_from(b - a).map_or(i64::MIN, |d| -d)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scheduling scheme `{0}` (expected one of fcfs, sjf, psjf, pri, ppri, rr)")]
pub struct ParseSchemeError(pub String);

impl FromStr for Scheme {
    type Err = ParseSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSchemeError(s.to_string()))
    }
}
