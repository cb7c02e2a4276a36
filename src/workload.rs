//! JSON workload files.
//!
//! A workload file lists processes in PID order and may override the
//! simulation parameters in an optional `global` section:
//!
//! ```json
//! {
//!     "global": { "time_slice": 2, "io_duration": 3 },
//!     "processes": [
//!         { "burst": 4, "arrival": 0, "priority": 1 },
//!         { "burst": 2, "arrival": 1, "io_interrupt": 2, "priority": 2 }
//!     ]
//! }
//! ```
//!
//! `arrival` and `priority` default to 0. `io_interrupt` may be omitted,
//! `null`, or negative; all three mean the process never blocks on I/O.

use serde::Deserialize;

use crate::error::SimError;
use crate::scenario::{Scenario, SimConfig};
use crate::types::{Priority, Tick};

/// A parsed workload file, not yet validated against a configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workload {
    #[serde(default)]
    global: GlobalSection,
    processes: Vec<ProcessEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GlobalSection {
    max_processes: Option<usize>,
    time_slice: Option<Tick>,
    io_duration: Option<Tick>,
    max_ticks: Option<Tick>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProcessEntry {
    burst: Tick,
    #[serde(default)]
    arrival: Tick,
    #[serde(default)]
    io_interrupt: Option<i64>,
    #[serde(default)]
    priority: Priority,
}

impl Workload {
    pub fn parse(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// `base` with the file's `global` section applied on top.
    pub fn config(&self, base: SimConfig) -> SimConfig {
        let mut config = base;
        let global = &self.global;
        if let Some(v) = global.max_processes {
            config.max_processes = v;
        }
        if let Some(v) = global.time_slice {
            config.time_slice = v;
        }
        if let Some(v) = global.io_duration {
            config.io_duration = v;
        }
        if let Some(v) = global.max_ticks {
            config.max_ticks = (v > 0).then_some(v);
        }
        config
    }

    /// Validate the processes against the final `config`.
    pub fn into_scenario(self, config: SimConfig) -> Result<Scenario, SimError> {
        self.processes
            .into_iter()
            .fold(Scenario::builder().config(config), |b, e| {
                let io = e.io_interrupt.and_then(|t| Tick::try_from(t).ok());
                b.process_with_io(e.burst, e.arrival, io, e.priority)
            })
            .build()
    }
}

/// Parse a workload file into a validated scenario.
///
/// `base` supplies every parameter the file's `global` section leaves out.
/// Callers that layer further overrides on top of the file should use
/// [`Workload`] directly so the process count is checked against the final
/// configuration.
pub fn load_workload(json: &str, base: SimConfig) -> Result<Scenario, SimError> {
    let workload = Workload::parse(json)?;
    let config = workload.config(base);
    workload.into_scenario(config)
}
