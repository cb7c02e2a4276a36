//! Newtype wrappers and type aliases for domain concepts.
//!
//! Process identifiers get a newtype so they cannot be confused with array
//! indices: policies return indices into the process vector, while reports
//! and traces speak in PIDs. Plain quantities (ticks, priorities) are type
//! aliases.

use std::fmt;

use serde::Serialize;

/// Process identifier, assigned in input order starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One discrete unit of simulated time.
pub type Tick = u64;

/// Scheduling priority. Lower values are more urgent.
pub type Priority = i32;
