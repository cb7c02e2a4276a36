//! Error taxonomy for scenario validation and simulation runs.

use std::fmt;

use crate::types::{Pid, Tick};

/// Errors produced while building a scenario or running a simulation.
#[derive(Debug)]
pub enum SimError {
    /// The scenario has no processes.
    EmptyScenario,
    /// More processes than the configured bound.
    TooManyProcesses { count: usize, max: usize },
    /// A process was declared with a zero CPU burst.
    ZeroBurst { pid: Pid },
    /// A configuration value is out of range or unparsable.
    InvalidConfig(String),
    /// A report was requested for a process that never completed.
    Incomplete { pid: Pid },
    /// The tick ceiling was reached before every process completed.
    DidNotConverge {
        policy: &'static str,
        tick: Tick,
        completed: usize,
        total: usize,
    },
    /// Workload JSON could not be parsed.
    Json(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::EmptyScenario => write!(f, "scenario must have at least one process"),
            SimError::TooManyProcesses { count, max } => {
                write!(f, "too many processes: {count} (max {max})")
            }
            SimError::ZeroBurst { pid } => {
                write!(f, "process {pid} has a zero burst time")
            }
            SimError::Incomplete { pid } => write!(f, "process {pid} did not complete"),
            SimError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            SimError::DidNotConverge {
                policy,
                tick,
                completed,
                total,
            } => write!(
                f,
                "{policy} did not converge: {completed}/{total} processes completed by tick {tick}"
            ),
            SimError::Json(e) => write!(f, "workload JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Json(e)
    }
}
