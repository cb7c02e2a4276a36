//! Tick-driven simulation engine.
//!
//! The engine owns the clock and the run's process vector. Each tick it asks
//! the policy for a process, then either blocks that process on I/O or
//! charges it one CPU tick, steps the I/O blocks, and records completions.
//! Policies only choose; all state transitions happen here and in
//! [`crate::io::step`].

use tracing::{debug, info, trace, warn};

use crate::error::SimError;
use crate::fmt::set_sim_tick;
use crate::io;
use crate::policy::{Policy, PolicyKind};
use crate::process::Process;
use crate::report::Report;
use crate::scenario::Scenario;
use crate::trace::{Trace, TraceKind};
use crate::types::Tick;

/// Everything a completed run produces.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Final process records, in input order.
    pub processes: Vec<Process>,
    pub report: Report,
    pub trace: Trace,
}

/// The main simulator, parameterized by its dispatch policy.
pub struct Simulator<P: Policy> {
    policy: P,
}

impl<P: Policy> Simulator<P> {
    pub fn new(policy: P) -> Self {
        Simulator { policy }
    }

    /// The policy driving this simulator.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Run a scenario to completion.
    ///
    /// The scenario is not modified; the run works on its own copy of the
    /// process set. Fails with [`SimError::DidNotConverge`] if the
    /// scenario's `max_ticks` is reached first.
    pub fn run(&mut self, scenario: &Scenario) -> Result<SimulationResult, SimError> {
        if scenario.is_empty() {
            return Err(SimError::EmptyScenario);
        }

        self.policy.reset();
        let config = &scenario.config;
        let name = self.policy.name();
        let honors_io = self.policy.honors_io_interrupt();
        let mut processes: Vec<Process> = scenario.processes.iter().map(Process::new).collect();
        let total = processes.len();
        let mut trace = Trace::new();
        let mut completed = 0;
        let mut tick: Tick = 0;

        info!(
            policy = name,
            processes = total,
            time_slice = config.time_slice,
            io_duration = config.io_duration,
            "simulation start"
        );

        while completed < total {
            if config.max_ticks.is_some_and(|max| tick >= max) {
                set_sim_tick(None);
                warn!(policy = name, tick, completed, total, "tick ceiling reached");
                return Err(SimError::DidNotConverge {
                    policy: name,
                    tick,
                    completed,
                    total,
                });
            }
            set_sim_tick(Some(tick));

            match self.policy.select(&processes, tick) {
                Some(idx) if honors_io && processes[idx].io_due(tick) => {
                    let p = &mut processes[idx];
                    p.block_on_io(config.io_duration);
                    debug!(pid = p.pid.0, remaining = p.remaining_time, "I/O block");
                    trace.record(tick, TraceKind::IoBlocked { pid: p.pid });
                    self.policy.io_blocked(&processes, idx);
                }
                Some(idx) => {
                    let p = &mut processes[idx];
                    let pid = p.pid;
                    let done = p.charge(tick);
                    trace!(pid = pid.0, remaining = p.remaining_time, "run");
                    trace.record(tick, TraceKind::Dispatched { pid });
                    if done {
                        completed += 1;
                        debug!(
                            pid = pid.0,
                            turnaround = p.turnaround_time,
                            waiting = p.waiting_time,
                            "completed"
                        );
                        trace.record(tick, TraceKind::Completed { pid });
                    }
                    self.policy.charged(&processes, idx);
                }
                None => {
                    trace!("idle");
                    trace.record(tick, TraceKind::Idle);
                }
            }

            io::step(&mut processes, tick, &mut trace);

            tick += 1;
        }
        set_sim_tick(None);

        let report = Report::summarize(name, &processes, trace.idle_count())?;
        info!(
            policy = name,
            makespan = report.makespan,
            avg_waiting = report.average_waiting_time,
            avg_turnaround = report.average_turnaround_time,
            "simulation complete"
        );

        Ok(SimulationResult {
            processes,
            report,
            trace,
        })
    }
}

/// Run a single built-in policy on a scenario.
pub fn run_policy(kind: PolicyKind, scenario: &Scenario) -> Result<SimulationResult, SimError> {
    Simulator::new(kind.build(&scenario.config)).run(scenario)
}

/// Run every built-in policy on the same scenario, in menu order.
///
/// Each run starts from the untouched scenario, so results are independent
/// of the order in which policies are evaluated.
pub fn run_all(scenario: &Scenario) -> Result<Vec<SimulationResult>, SimError> {
    PolicyKind::ALL
        .iter()
        .map(|&kind| run_policy(kind, scenario))
        .collect()
}
