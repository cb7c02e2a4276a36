//! Process model for the simulator.
//!
//! A [`ProcessDef`] is the immutable template supplied by the scenario; a
//! [`Process`] is the per-run record built from it. Every simulation run
//! builds its own `Process` vector, so runs never observe each other's state.

use crate::types::{Pid, Priority, Tick};

/// Static parameters of a process, as declared in the scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDef {
    pub pid: Pid,
    /// Total CPU ticks the process needs.
    pub burst_time: Tick,
    /// First tick at which the process may be selected.
    pub arrival_time: Tick,
    /// Tick at which the process blocks on I/O, if any.
    pub io_interrupt: Option<Tick>,
    pub priority: Priority,
}

/// A process at runtime: its static parameters plus simulation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub pid: Pid,
    pub burst_time: Tick,
    pub arrival_time: Tick,
    pub io_interrupt: Option<Tick>,
    pub priority: Priority,

    /// CPU ticks still owed. Zero means complete.
    pub remaining_time: Tick,
    /// Currently blocked on I/O.
    pub in_io: bool,
    /// Ticks left in the current I/O block.
    pub io_waiting_time: Tick,
    /// Tick at which the last CPU unit finished (last charged tick + 1).
    pub completion_tick: Option<Tick>,
    pub waiting_time: Option<Tick>,
    pub turnaround_time: Option<Tick>,
}

impl Process {
    /// Create a fresh runtime record from a definition.
    pub fn new(def: &ProcessDef) -> Self {
        Process {
            pid: def.pid,
            burst_time: def.burst_time,
            arrival_time: def.arrival_time,
            io_interrupt: def.io_interrupt,
            priority: def.priority,
            remaining_time: def.burst_time,
            in_io: false,
            io_waiting_time: 0,
            completion_tick: None,
            waiting_time: None,
            turnaround_time: None,
        }
    }

    /// Whether a policy may select this process at `tick`.
    pub fn is_eligible(&self, tick: Tick) -> bool {
        self.arrival_time <= tick && self.remaining_time > 0 && !self.in_io
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_time == 0
    }

    /// Whether selecting this process at `tick` triggers its I/O block.
    ///
    /// Ticks only move forward, so this is true for at most one tick of a run.
    pub fn io_due(&self, tick: Tick) -> bool {
        self.io_interrupt == Some(tick)
    }

    /// Enter the I/O-blocked state for `duration` ticks.
    pub(crate) fn block_on_io(&mut self, duration: Tick) {
        self.in_io = true;
        self.io_waiting_time = duration;
    }

    /// Charge one CPU tick consumed during `tick`.
    ///
    /// Returns true if this charge completed the process, in which case the
    /// timing fields have been filled in.
    pub(crate) fn charge(&mut self, tick: Tick) -> bool {
        debug_assert!(self.remaining_time > 0, "charging a completed process");
        self.remaining_time -= 1;
        if self.remaining_time > 0 {
            return false;
        }
        let completion = tick + 1;
        let turnaround = completion - self.arrival_time;
        self.completion_tick = Some(completion);
        self.turnaround_time = Some(turnaround);
        self.waiting_time = Some(turnaround - self.burst_time);
        true
    }
}
