//! sched_sim - Deterministic tick-driven simulator for CPU scheduling policies.
//!
//! Given a fixed set of processes (arrival time, CPU burst, priority and an
//! optional single I/O interrupt point), the simulator steps a single CPU one
//! tick at a time under a chosen dispatch policy and reports per-process
//! waiting and turnaround times.
//!
//! # Architecture
//!
//! - **Process**: static parameters plus per-run simulation state
//! - **I/O stepper**: drains I/O blocks one tick at a time
//! - **Policies**: FCFS, SJF, Priority, Round Robin, Preemptive SJF and
//!   Preemptive Priority behind the [`Policy`] trait
//! - **Engine**: the shared tick loop that charges CPU time, triggers I/O
//!   blocks and records completions
//! - **Report**: waiting/turnaround per process and their averages
//!
//! # Usage
//!
//! ```rust
//! use sched_sim::*;
//!
//! let scenario = Scenario::builder()
//!     .process(4, 0, 1)
//!     .process(2, 1, 2)
//!     .build()
//!     .unwrap();
//!
//! let result = Simulator::new(Fcfs).run(&scenario).unwrap();
//! assert_eq!(result.report.average_waiting_time, 1.5);
//! print!("{}", result.report);
//! ```

pub mod engine;
pub mod error;
pub mod fmt;
pub mod io;
pub mod policy;
pub mod process;
pub mod report;
pub mod scenario;
pub mod trace;
pub mod types;
pub mod workload;

// Re-export the main public types for convenience.
pub use engine::{run_all, run_policy, SimulationResult, Simulator};
pub use error::SimError;
pub use fmt::{sim_tick, FmtTick, SimFormat};
pub use policy::{Fcfs, Policy, PolicyKind, PriorityFirst, RoundRobin, Sjf};
pub use process::{Process, ProcessDef};
pub use report::{ProcessReport, Report};
pub use scenario::{
    Scenario, ScenarioBuilder, SimConfig, DEFAULT_IO_DURATION, DEFAULT_MAX_PROCESSES,
    DEFAULT_TIME_SLICE,
};
pub use trace::{Trace, TraceEvent, TraceKind};
pub use types::{Pid, Priority, Tick};
pub use workload::{load_workload, Workload};
