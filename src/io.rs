//! I/O interrupt stepper.
//!
//! Blocking on I/O is a purely simulated state: a blocked process sits out
//! `io_duration` ticks and becomes eligible again once the countdown drains.

use tracing::debug;

use crate::process::Process;
use crate::trace::{Trace, TraceKind};
use crate::types::Tick;

/// Advance every I/O-blocked process by one tick.
///
/// Called once per tick, after CPU time for that tick has been charged.
/// Each wake-up is recorded in `trace` as `IoCompleted` at `tick`.
/// Processes that are not blocked are untouched.
pub fn step(processes: &mut [Process], tick: Tick, trace: &mut Trace) {
    for p in processes.iter_mut().filter(|p| p.in_io) {
        p.io_waiting_time = p.io_waiting_time.saturating_sub(1);
        if p.io_waiting_time == 0 {
            p.in_io = false;
            debug!(pid = p.pid.0, tick, "I/O complete");
            trace.record(tick, TraceKind::IoCompleted { pid: p.pid });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessDef;
    use crate::trace::TraceEvent;
    use crate::types::Pid;

    fn proc(pid: u32) -> Process {
        Process::new(&ProcessDef {
            pid: Pid(pid),
            burst_time: 4,
            arrival_time: 0,
            io_interrupt: None,
            priority: 0,
        })
    }

    #[test]
    fn test_step_drains_block() {
        let mut procs = vec![proc(1), proc(2)];
        let mut trace = Trace::new();
        procs[0].block_on_io(3);

        step(&mut procs, 0, &mut trace);
        step(&mut procs, 1, &mut trace);
        assert!(procs[0].in_io);
        assert_eq!(procs[0].io_waiting_time, 1);
        assert!(trace.events().is_empty());

        step(&mut procs, 2, &mut trace);
        assert!(!procs[0].in_io);
        assert_eq!(procs[0].io_waiting_time, 0);
        assert_eq!(procs[0].remaining_time, 4);
        assert_eq!(
            trace.events(),
            [TraceEvent {
                tick: 2,
                kind: TraceKind::IoCompleted { pid: Pid(1) }
            }]
        );
    }

    #[test]
    fn test_step_ignores_unblocked() {
        let mut procs = vec![proc(1)];
        let mut trace = Trace::new();
        let before = procs.clone();
        step(&mut procs, 7, &mut trace);
        assert_eq!(procs, before);
        assert!(trace.events().is_empty());
    }
}
