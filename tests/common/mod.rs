#![allow(dead_code, unused_macros)]

use sched_sim::{Scenario, SimConfig, SimFormat, Tick};

/// Initialize tracing from `RUST_LOG`.
///
/// `try_init()` is idempotent: first call in the process succeeds,
/// subsequent calls are silently ignored.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .event_format(SimFormat)
        .try_init();
}

/// Simple xorshift32 PRNG for deterministic randomization.
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        min + (self.next_u32() % (max - min + 1))
    }

    pub fn bool(&mut self) -> bool {
        self.next_u32() % 2 == 0
    }
}

/// Build a random but valid scenario with between `min_procs` and 6 processes.
pub fn random_scenario(rng: &mut Rng, min_procs: u32, config: SimConfig) -> Scenario {
    let n = rng.range(min_procs, 6);
    let mut builder = Scenario::builder().config(config);
    for _ in 0..n {
        let burst = rng.range(1, 8) as Tick;
        let arrival = rng.range(0, 10) as Tick;
        let io = if rng.bool() {
            Some(rng.range(0, 14) as Tick)
        } else {
            None
        };
        let priority = rng.range(0, 7) as i32 - 2;
        builder = builder.process_with_io(burst, arrival, io, priority);
    }
    builder.build().expect("random scenario must be valid")
}

/// Seeds used by the randomized property suites.
pub fn seeds() -> impl Iterator<Item = u32> {
    (1..=64u32).map(|i| i.wrapping_mul(2_654_435_761))
}

/// Generate a suite of policy-generic property tests.
///
/// `$kind` is the `PolicyKind` under test.
///
/// Usage:
/// ```ignore
/// #[macro_use]
/// mod common;
/// mod fcfs {
///     use super::*;
///     policy_tests!(PolicyKind::Fcfs);
/// }
/// ```
macro_rules! policy_tests {
    ($kind:expr) => {
        use sched_sim::{run_policy, Pid, Scenario, SimConfig, TraceKind};

        /// Turnaround is waiting plus burst, and completion follows arrival.
        #[test]
        fn test_turnaround_is_waiting_plus_burst() {
            crate::common::setup_test();
            for seed in crate::common::seeds() {
                let mut rng = crate::common::Rng::new(seed);
                let scenario = crate::common::random_scenario(&mut rng, 1, SimConfig::default());
                let result = run_policy($kind, &scenario).unwrap();
                for p in &result.report.processes {
                    assert_eq!(
                        p.turnaround_time,
                        p.waiting_time + p.burst_time,
                        "seed={seed} pid={}",
                        p.pid
                    );
                    assert_eq!(p.completion_tick, p.arrival_time + p.turnaround_time);
                }
            }
        }

        /// No CPU time is invented or lost, and I/O ticks are not CPU ticks.
        #[test]
        fn test_cpu_ticks_match_bursts() {
            crate::common::setup_test();
            for seed in crate::common::seeds() {
                let mut rng = crate::common::Rng::new(seed);
                let scenario = crate::common::random_scenario(&mut rng, 1, SimConfig::default());
                let result = run_policy($kind, &scenario).unwrap();
                assert_eq!(result.trace.total_cpu_ticks(), scenario.total_burst(), "seed={seed}");
                for def in &scenario.processes {
                    assert_eq!(result.trace.cpu_ticks(def.pid), def.burst_time, "seed={seed}");
                }
                assert!(result.processes.iter().all(|p| p.remaining_time == 0 && !p.in_io));
                let slots = result.trace.cpu_slots().count() as u64;
                assert_eq!(slots, result.report.makespan, "one CPU event per tick");
            }
        }

        /// Each process blocks on I/O at most once, and only at its interrupt tick.
        #[test]
        fn test_io_fires_at_most_once() {
            crate::common::setup_test();
            for seed in crate::common::seeds() {
                let mut rng = crate::common::Rng::new(seed);
                let scenario = crate::common::random_scenario(&mut rng, 1, SimConfig::default());
                let result = run_policy($kind, &scenario).unwrap();
                for def in &scenario.processes {
                    let blocks: Vec<_> = result
                        .trace
                        .events()
                        .iter()
                        .filter(|e| matches!(e.kind, TraceKind::IoBlocked { pid } if pid == def.pid))
                        .collect();
                    assert!(blocks.len() <= 1, "seed={seed} pid={}", def.pid);
                    if let Some(event) = blocks.first() {
                        assert_eq!(Some(event.tick), def.io_interrupt);
                    }
                }
            }
        }

        /// Two runs on the same scenario produce identical results.
        #[test]
        fn test_idempotent() {
            crate::common::setup_test();
            for seed in crate::common::seeds().take(16) {
                let mut rng = crate::common::Rng::new(seed);
                let scenario = crate::common::random_scenario(&mut rng, 1, SimConfig::default());
                let copy = scenario.clone();
                let a = run_policy($kind, &scenario).unwrap();
                let b = run_policy($kind, &copy).unwrap();
                assert_eq!(a.report, b.report, "seed={seed}");
                assert_eq!(a.trace, b.trace, "seed={seed}");
            }
        }

        /// A lone process never waits, whatever its arrival.
        #[test]
        fn test_single_process_never_waits() {
            crate::common::setup_test();
            for (burst, arrival) in [(1, 0), (5, 0), (3, 4), (7, 2)] {
                let scenario = Scenario::builder().process(burst, arrival, 0).build().unwrap();
                let result = run_policy($kind, &scenario).unwrap();
                let p = result.report.process(Pid(1)).unwrap();
                assert_eq!(p.waiting_time, 0);
                assert_eq!(p.turnaround_time, burst);
                assert_eq!(result.report.idle_ticks, arrival);
            }
        }
    };
}
