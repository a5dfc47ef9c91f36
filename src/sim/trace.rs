//! Plain-text workload traces.
//!
//! One job per line: `arrival run_length priority`, whitespace separated.
//! Blank lines and anything after `#` are ignored. Job ids are assigned in
//! file order starting at 0.

use std::{fs, path::Path};

use super::job::JobSpec;
use crate::{core::JobId, error::SimError};

pub fn load_trace(path: &Path) -> Result<Vec<JobSpec>, SimError> {
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&text)
}

pub fn parse_trace(text: &str) -> Result<Vec<JobSpec>, SimError> {
    let mut jobs = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or_default();
        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }

        let line = index + 1;
        let parse_err = |message: String| SimError::Parse { line, message };
        let [arrival, run_length, priority] = fields[..] else {
            return Err(parse_err(format!(
                "expected `arrival run_length priority`, found {} field(s)",
                fields.len()
            )));
        };

        jobs.push(JobSpec {
            id: jobs.len() as JobId,
            arrival: arrival
                .parse()
                .map_err(|e| parse_err(format!("bad arrival `{arrival}`: {e}")))?,
            run_length: run_length
                .parse()
                .map_err(|e| parse_err(format!("bad run length `{run_length}`: {e}")))?,
            priority: priority
                .parse()
                .map_err(|e| parse_err(format!("bad priority `{priority}`: {e}")))?,
        });
    }

    Ok(jobs)
}
