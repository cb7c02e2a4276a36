//! Trace event recording for the simulator.
//!
//! Every tick produces exactly one CPU event (`Dispatched`, `IoBlocked` or
//! `Idle`). `Completed` and `IoCompleted` are recorded alongside it in the
//! tick where they happen.

use serde::Serialize;

use crate::types::{Pid, Tick};

/// A single trace event produced by the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    /// Tick during which this event occurred.
    pub tick: Tick,
    /// The kind of event.
    pub kind: TraceKind,
}

/// The type of scheduling event recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceKind {
    /// The process was charged one CPU tick.
    Dispatched { pid: Pid },
    /// The process was selected at its I/O interrupt tick and blocked.
    IoBlocked { pid: Pid },
    /// The process finished its I/O block and is eligible again.
    IoCompleted { pid: Pid },
    /// The process charged its last CPU tick.
    Completed { pid: Pid },
    /// No process ran during this tick.
    Idle,
}

impl TraceKind {
    /// Whether this event occupies the CPU slot of its tick.
    pub fn is_cpu_slot(&self) -> bool {
        matches!(
            self,
            TraceKind::Dispatched { .. } | TraceKind::IoBlocked { .. } | TraceKind::Idle
        )
    }
}

/// A complete simulation trace, containing all events in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub(crate) fn record(&mut self, tick: Tick, kind: TraceKind) {
        self.events.push(TraceEvent { tick, kind });
    }

    /// Get all events in chronological order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// CPU events only, one per simulated tick.
    pub fn cpu_slots(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(|e| e.kind.is_cpu_slot())
    }

    /// Number of ticks the given process was charged.
    pub fn cpu_ticks(&self, pid: Pid) -> u64 {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Dispatched { pid: p } if p == pid))
            .count() as u64
    }

    /// Number of ticks charged to any process.
    pub fn total_cpu_ticks(&self) -> u64 {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Dispatched { .. }))
            .count() as u64
    }

    /// Number of ticks during which the CPU idled.
    pub fn idle_count(&self) -> u64 {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Idle))
            .count() as u64
    }

    /// Number of separate stretches of CPU time the process received.
    pub fn dispatch_count(&self, pid: Pid) -> usize {
        self.runs().iter().filter(|&&(p, _)| p == pid).count()
    }

    /// Longest stretch of consecutive CPU ticks the process received.
    pub fn longest_run(&self, pid: Pid) -> u64 {
        self.runs()
            .into_iter()
            .filter(|&(p, _)| p == pid)
            .map(|(_, len)| len)
            .max()
            .unwrap_or(0)
    }

    /// Consecutive-tick runs as `(pid, length)`, in order.
    fn runs(&self) -> Vec<(Pid, u64)> {
        let mut runs: Vec<(Pid, u64)> = Vec::new();
        let mut prev_tick: Option<Tick> = None;
        for event in self.cpu_slots() {
            if let TraceKind::Dispatched { pid } = event.kind {
                let extends = matches!(runs.last(), Some(&(p, _)) if p == pid)
                    && prev_tick.is_some_and(|t| t + 1 == event.tick);
                if extends {
                    if let Some(last) = runs.last_mut() {
                        last.1 += 1;
                    }
                } else {
                    runs.push((pid, 1));
                }
                prev_tick = Some(event.tick);
            } else {
                prev_tick = None;
            }
        }
        runs
    }

    /// Gantt-style timeline with one token per tick.
    ///
    /// `P<n>` means process n ran, `I<n>` means process n blocked on I/O in
    /// that tick, and `--` is an idle tick.
    pub fn timeline(&self) -> String {
        self.cpu_slots()
            .map(|e| match e.kind {
                TraceKind::Dispatched { pid } => format!("P{pid}"),
                TraceKind::IoBlocked { pid } => format!("I{pid}"),
                _ => "--".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Pretty-print the trace for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            let desc = match &event.kind {
                TraceKind::Dispatched { pid } => format!("RUN      pid={pid}"),
                TraceKind::IoBlocked { pid } => format!("IO-BLOCK pid={pid}"),
                TraceKind::IoCompleted { pid } => format!("IO-DONE  pid={pid}"),
                TraceKind::Completed { pid } => format!("COMPLETE pid={pid}"),
                TraceKind::Idle => "IDLE".to_string(),
            };
            eprintln!("[tick {:>6}] {}", event.tick, desc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trace {
        let mut t = Trace::new();
        t.record(0, TraceKind::Dispatched { pid: Pid(1) });
        t.record(1, TraceKind::Dispatched { pid: Pid(1) });
        t.record(2, TraceKind::IoBlocked { pid: Pid(1) });
        t.record(3, TraceKind::Dispatched { pid: Pid(2) });
        t.record(3, TraceKind::Completed { pid: Pid(2) });
        t.record(4, TraceKind::Idle);
        t.record(4, TraceKind::IoCompleted { pid: Pid(1) });
        t.record(5, TraceKind::Dispatched { pid: Pid(1) });
        t
    }

    #[test]
    fn test_counts() {
        let t = sample();
        assert_eq!(t.cpu_ticks(Pid(1)), 3);
        assert_eq!(t.cpu_ticks(Pid(2)), 1);
        assert_eq!(t.total_cpu_ticks(), 4);
        assert_eq!(t.idle_count(), 1);
        assert_eq!(t.cpu_slots().count(), 6);
    }

    #[test]
    fn test_runs() {
        let t = sample();
        assert_eq!(t.dispatch_count(Pid(1)), 2);
        assert_eq!(t.longest_run(Pid(1)), 2);
        assert_eq!(t.longest_run(Pid(2)), 1);
        assert_eq!(t.longest_run(Pid(9)), 0);
    }

    #[test]
    fn test_timeline() {
        assert_eq!(sample().timeline(), "P1 P1 I1 P2 -- P1");
    }
}
