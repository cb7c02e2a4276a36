//! Scenario definition, builder API and simulation configuration.

use crate::error::SimError;
use crate::process::ProcessDef;
use crate::types::{Pid, Priority, Tick};

/// Default upper bound on the number of processes in a scenario.
pub const DEFAULT_MAX_PROCESSES: usize = 10;

/// Default Round Robin quantum, in ticks.
pub const DEFAULT_TIME_SLICE: Tick = 2;

/// Default length of every I/O block, in ticks.
pub const DEFAULT_IO_DURATION: Tick = 3;

/// Tunable simulation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Largest accepted process count.
    pub max_processes: usize,
    /// Round Robin quantum. Must be at least 1.
    pub time_slice: Tick,
    /// I/O block length, identical for every process. Must be at least 1.
    pub io_duration: Tick,
    /// Abort a run that has not finished by this tick. `None` runs unbounded.
    pub max_ticks: Option<Tick>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            max_processes: DEFAULT_MAX_PROCESSES,
            time_slice: DEFAULT_TIME_SLICE,
            io_duration: DEFAULT_IO_DURATION,
            max_ticks: None,
        }
    }
}

impl SimConfig {
    /// Create a config with defaults overridden by environment variables.
    ///
    /// - `SCHEDSIM_MAX_PROCESSES`: process count bound.
    /// - `SCHEDSIM_TIME_SLICE`: Round Robin quantum.
    /// - `SCHEDSIM_IO_DURATION`: I/O block length.
    /// - `SCHEDSIM_MAX_TICKS`: tick ceiling; `0` or empty disables it.
    pub fn from_env() -> Result<Self, SimError> {
        let mut config = Self::default();
        if let Some(v) = env_u64("SCHEDSIM_MAX_PROCESSES")? {
            config.max_processes = max_processes_from(v)?;
        }
        if let Some(v) = env_u64("SCHEDSIM_TIME_SLICE")? {
            config.time_slice = v;
        }
        if let Some(v) = env_u64("SCHEDSIM_IO_DURATION")? {
            config.io_duration = v;
        }
        if let Some(v) = env_u64("SCHEDSIM_MAX_TICKS")? {
            config.max_ticks = (v > 0).then_some(v);
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.max_processes == 0 {
            return Err(SimError::InvalidConfig(
                "max_processes must be at least 1".into(),
            ));
        }
        if self.time_slice == 0 {
            return Err(SimError::InvalidConfig(
                "time_slice must be at least 1".into(),
            ));
        }
        if self.io_duration == 0 {
            return Err(SimError::InvalidConfig(
                "io_duration must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn max_processes_from(v: u64) -> Result<usize, SimError> {
    usize::try_from(v).map_err(|_| {
        SimError::InvalidConfig(format!("SCHEDSIM_MAX_PROCESSES={v}: out of range"))
    })
}

fn env_u64(name: &str) -> Result<Option<u64>, SimError> {
    match std::env::var(name).ok().as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| SimError::InvalidConfig(format!("{name}={s:?}: expected an integer"))),
    }
}

/// A validated set of processes plus the configuration to run them with.
///
/// The scenario is the immutable template: every simulation run builds its
/// own process records from it.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub processes: Vec<ProcessDef>,
    pub config: SimConfig,
}

/// Builder for constructing scenarios.
pub struct ScenarioBuilder {
    processes: Vec<ProcessDef>,
    config: SimConfig,
    next_pid: Pid,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder {
            processes: Vec::new(),
            config: SimConfig::default(),
            next_pid: Pid(1),
        }
    }

    /// Number of processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Total CPU ticks demanded by all processes.
    pub fn total_burst(&self) -> Tick {
        self.processes.iter().map(|p| p.burst_time).sum()
    }
}

impl ScenarioBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the Round Robin quantum.
    pub fn time_slice(mut self, ticks: Tick) -> Self {
        self.config.time_slice = ticks;
        self
    }

    /// Set the I/O block length.
    pub fn io_duration(mut self, ticks: Tick) -> Self {
        self.config.io_duration = ticks;
        self
    }

    /// Set the tick ceiling.
    pub fn max_ticks(mut self, ticks: Option<Tick>) -> Self {
        self.config.max_ticks = ticks;
        self
    }

    /// Add a process without an I/O interrupt. PIDs are assigned in call order.
    pub fn process(self, burst_time: Tick, arrival_time: Tick, priority: Priority) -> Self {
        self.process_with_io(burst_time, arrival_time, None, priority)
    }

    /// Add a process that may block on I/O at `io_interrupt`.
    pub fn process_with_io(
        mut self,
        burst_time: Tick,
        arrival_time: Tick,
        io_interrupt: Option<Tick>,
        priority: Priority,
    ) -> Self {
        let pid = self.next_pid;
        self.next_pid = Pid(pid.0 + 1);
        self.processes.push(ProcessDef {
            pid,
            burst_time,
            arrival_time,
            io_interrupt,
            priority,
        });
        self
    }

    /// Validate and build the scenario.
    pub fn build(self) -> Result<Scenario, SimError> {
        self.config.validate()?;
        if self.processes.is_empty() {
            return Err(SimError::EmptyScenario);
        }
        if self.processes.len() > self.config.max_processes {
            return Err(SimError::TooManyProcesses {
                count: self.processes.len(),
                max: self.config.max_processes,
            });
        }
        if let Some(p) = self.processes.iter().find(|p| p.burst_time == 0) {
            return Err(SimError::ZeroBurst { pid: p.pid });
        }
        Ok(Scenario {
            processes: self.processes,
            config: self.config,
        })
    }
}
