//! Per-run metrics: waiting time, turnaround time and their averages.

use std::fmt;

use serde::Serialize;

use crate::error::SimError;
use crate::process::Process;
use crate::types::{Pid, Tick};

/// Timing results for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub pid: Pid,
    pub burst_time: Tick,
    pub arrival_time: Tick,
    pub completion_tick: Tick,
    pub waiting_time: Tick,
    pub turnaround_time: Tick,
}

/// Summary of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Name of the policy that produced this run.
    pub scheduler: String,
    /// One entry per process, in original input order.
    pub processes: Vec<ProcessReport>,
    pub average_waiting_time: f64,
    pub average_turnaround_time: f64,
    /// Tick at which the last process completed.
    pub makespan: Tick,
    /// Ticks in which no process was charged, I/O-block ticks excluded.
    pub idle_ticks: Tick,
}

impl Report {
    /// Build a report from a set of completed processes.
    ///
    /// `idle_ticks` comes from the run's trace. Fails on an empty set, or if
    /// any process has not completed.
    pub fn summarize(
        scheduler: &str,
        processes: &[Process],
        idle_ticks: Tick,
    ) -> Result<Self, SimError> {
        if processes.is_empty() {
            return Err(SimError::EmptyScenario);
        }

        let entries = processes
            .iter()
            .map(|p| match (p.completion_tick, p.waiting_time, p.turnaround_time) {
                (Some(completion_tick), Some(waiting_time), Some(turnaround_time)) => {
                    Ok(ProcessReport {
                        pid: p.pid,
                        burst_time: p.burst_time,
                        arrival_time: p.arrival_time,
                        completion_tick,
                        waiting_time,
                        turnaround_time,
                    })
                }
                _ => Err(SimError::Incomplete { pid: p.pid }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let n = entries.len() as f64;
        let total_waiting: Tick = entries.iter().map(|e| e.waiting_time).sum();
        let total_turnaround: Tick = entries.iter().map(|e| e.turnaround_time).sum();
        let makespan = entries
            .iter()
            .map(|e| e.completion_tick)
            .max()
            .unwrap_or(0);

        Ok(Report {
            scheduler: scheduler.to_string(),
            processes: entries,
            average_waiting_time: total_waiting as f64 / n,
            average_turnaround_time: total_turnaround as f64 / n,
            makespan,
            idle_ticks,
        })
    }

    /// Fraction of the makespan during which the CPU was doing useful work.
    pub fn cpu_utilization(&self) -> f64 {
        if self.makespan == 0 {
            return 0.0;
        }
        let busy: Tick = self.processes.iter().map(|p| p.burst_time).sum();
        busy as f64 / self.makespan as f64
    }

    /// Look up the entry for a PID.
    pub fn process(&self, pid: Pid) -> Option<&ProcessReport> {
        self.processes.iter().find(|p| p.pid == pid)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Scheduling:", self.scheduler)?;
        for p in &self.processes {
            writeln!(
                f,
                "Process {} - Waiting Time: {}, Turnaround Time: {}",
                p.pid, p.waiting_time, p.turnaround_time
            )?;
        }
        writeln!(f, "Average Waiting Time: {:.2}", self.average_waiting_time)?;
        writeln!(
            f,
            "Average Turnaround Time: {:.2}",
            self.average_turnaround_time
        )
    }
}
