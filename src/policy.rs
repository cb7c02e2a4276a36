//! Dispatch policies.
//!
//! Each policy answers one question per tick: which process (by index into
//! the run's process vector) gets the CPU for the next unit of time. The
//! engine owns everything else: charging CPU time, I/O transitions and
//! completion bookkeeping.
//!
//! All policies break ties first-found-wins: among equally ranked eligible
//! processes, the one with the lowest index is chosen. `Iterator::min_by_key`
//! returns the first minimum, which gives exactly that rule.
//!
//! # Non-preemptive vs. preemptive
//!
//! [`Sjf`] and [`PriorityFirst`] in their non-preemptive form still re-rank
//! every tick, so a newly arrived shorter (or more urgent) process takes the
//! CPU immediately. The only behavioural difference from the preemptive form
//! is that the non-preemptive variants honor a process's `io_interrupt`,
//! while the preemptive variants never trigger I/O blocks.

use std::fmt;
use std::str::FromStr;

use crate::process::Process;
use crate::scenario::SimConfig;
use crate::types::Tick;

/// A dispatch strategy driven by the simulation engine.
pub trait Policy {
    /// Human-readable name used in reports.
    fn name(&self) -> &'static str;

    /// Forget any state left over from a previous run.
    fn reset(&mut self) {}

    /// Choose the process that runs during `tick`, or `None` to idle.
    fn select(&mut self, processes: &[Process], tick: Tick) -> Option<usize>;

    /// Whether selecting a process at its `io_interrupt` tick blocks it.
    fn honors_io_interrupt(&self) -> bool {
        true
    }

    /// The process at `idx` was charged one CPU tick.
    fn charged(&mut self, _processes: &[Process], _idx: usize) {}

    /// The process at `idx` entered an I/O block instead of running.
    fn io_blocked(&mut self, _processes: &[Process], _idx: usize) {}
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn select(&mut self, processes: &[Process], tick: Tick) -> Option<usize> {
        (**self).select(processes, tick)
    }

    fn honors_io_interrupt(&self) -> bool {
        (**self).honors_io_interrupt()
    }

    fn charged(&mut self, processes: &[Process], idx: usize) {
        (**self).charged(processes, idx)
    }

    fn io_blocked(&mut self, processes: &[Process], idx: usize) {
        (**self).io_blocked(processes, idx)
    }
}

/// Indices and records of processes eligible at `tick`, in index order.
fn eligible(processes: &[Process], tick: Tick) -> impl Iterator<Item = (usize, &Process)> {
    processes
        .iter()
        .enumerate()
        .filter(move |(_, p)| p.is_eligible(tick))
}

/// First come, first served: the first eligible process in index order.
///
/// Without preemption the scan keeps landing on the same process until it
/// blocks or completes.
#[derive(Debug, Default, Clone)]
pub struct Fcfs;

impl Policy for Fcfs {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn select(&mut self, processes: &[Process], tick: Tick) -> Option<usize> {
        eligible(processes, tick).next().map(|(i, _)| i)
    }
}

/// Shortest job first, ranked by remaining CPU time.
#[derive(Debug, Default, Clone)]
pub struct Sjf {
    pub preemptive: bool,
}

impl Policy for Sjf {
    fn name(&self) -> &'static str {
        if self.preemptive {
            "Preemptive SJF"
        } else {
            "SJF"
        }
    }

    fn select(&mut self, processes: &[Process], tick: Tick) -> Option<usize> {
        eligible(processes, tick)
            .min_by_key(|(_, p)| p.remaining_time)
            .map(|(i, _)| i)
    }

    fn honors_io_interrupt(&self) -> bool {
        !self.preemptive
    }
}

/// Highest priority (lowest numeric value) first.
#[derive(Debug, Default, Clone)]
pub struct PriorityFirst {
    pub preemptive: bool,
}

impl Policy for PriorityFirst {
    fn name(&self) -> &'static str {
        if self.preemptive {
            "Preemptive Priority"
        } else {
            "Priority"
        }
    }

    fn select(&mut self, processes: &[Process], tick: Tick) -> Option<usize> {
        eligible(processes, tick)
            .min_by_key(|(_, p)| p.priority)
            .map(|(i, _)| i)
    }

    fn honors_io_interrupt(&self) -> bool {
        !self.preemptive
    }
}

/// Round robin over the process vector with a fixed time slice.
///
/// The pointer only looks at `current`: if that process is not eligible the
/// tick idles and the pointer moves on, even when another process could
/// run. The slice is not reset on such a skip, so a partially used slice
/// carries over to the next process.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    time_slice: Tick,
    current: usize,
    slice_remaining: Tick,
}

impl RoundRobin {
    pub fn new(time_slice: Tick) -> Self {
        RoundRobin {
            time_slice,
            current: 0,
            slice_remaining: time_slice,
        }
    }

    /// Index the pointer currently rests on.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slice_remaining(&self) -> Tick {
        self.slice_remaining
    }

    fn advance(&mut self, nr: usize) {
        self.current = (self.current + 1) % nr;
    }
}

impl Policy for RoundRobin {
    fn name(&self) -> &'static str {
        "Round Robin"
    }

    fn reset(&mut self) {
        self.current = 0;
        self.slice_remaining = self.time_slice;
    }

    fn select(&mut self, processes: &[Process], tick: Tick) -> Option<usize> {
        if processes.is_empty() {
            return None;
        }
        if processes[self.current].is_eligible(tick) {
            Some(self.current)
        } else {
            self.advance(processes.len());
            None
        }
    }

    fn charged(&mut self, processes: &[Process], _idx: usize) {
        self.slice_remaining = self.slice_remaining.saturating_sub(1);
        if self.slice_remaining == 0 {
            self.advance(processes.len());
            self.slice_remaining = self.time_slice;
        }
    }

    fn io_blocked(&mut self, _processes: &[Process], _idx: usize) {
        self.slice_remaining = self.time_slice;
    }
}

/// The six built-in policies, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Fcfs,
    Sjf,
    Priority,
    RoundRobin,
    PreemptiveSjf,
    PreemptivePriority,
}

impl PolicyKind {
    /// All policies, in classic menu order.
    pub const ALL: [PolicyKind; 6] = [
        PolicyKind::Fcfs,
        PolicyKind::Sjf,
        PolicyKind::Priority,
        PolicyKind::RoundRobin,
        PolicyKind::PreemptiveSjf,
        PolicyKind::PreemptivePriority,
    ];

    /// Instantiate the policy with parameters from `config`.
    pub fn build(self, config: &SimConfig) -> Box<dyn Policy> {
        match self {
            PolicyKind::Fcfs => Box::new(Fcfs),
            PolicyKind::Sjf => Box::new(Sjf { preemptive: false }),
            PolicyKind::Priority => Box::new(PriorityFirst { preemptive: false }),
            PolicyKind::RoundRobin => Box::new(RoundRobin::new(config.time_slice)),
            PolicyKind::PreemptiveSjf => Box::new(Sjf { preemptive: true }),
            PolicyKind::PreemptivePriority => Box::new(PriorityFirst { preemptive: true }),
        }
    }

    /// Short name accepted by [`FromStr`].
    pub fn short_name(self) -> &'static str {
        match self {
            PolicyKind::Fcfs => "fcfs",
            PolicyKind::Sjf => "sjf",
            PolicyKind::Priority => "priority",
            PolicyKind::RoundRobin => "rr",
            PolicyKind::PreemptiveSjf => "psjf",
            PolicyKind::PreemptivePriority => "ppriority",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    /// Accepts short names, long names, or the classic menu number (1-6).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "1" | "fcfs" => PolicyKind::Fcfs,
            "2" | "sjf" => PolicyKind::Sjf,
            "3" | "priority" | "prio" => PolicyKind::Priority,
            "4" | "rr" | "round-robin" => PolicyKind::RoundRobin,
            "5" | "psjf" | "preemptive-sjf" | "srtf" => PolicyKind::PreemptiveSjf,
            "6" | "ppriority" | "preemptive-priority" => PolicyKind::PreemptivePriority,
            other => {
                return Err(format!(
                    "unknown policy {other:?}; expected one of fcfs, sjf, priority, rr, psjf, ppriority (or 1-6)"
                ))
            }
        };
        Ok(kind)
    }
}
