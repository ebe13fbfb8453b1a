//! Task identifiers and their generator.
//!
//! A [`TaskId`] is the caller-facing handle for a scheduled task: opaque,
//! `Copy`, totally ordered by issuance, and usable as a map key. Ids are
//! produced by an [`IdGenerator`], a lock-free monotone sequence shared by
//! every thread that schedules work.
//!
//! # Examples
//!
//! ```
//! use taskgrid_core::id::IdGenerator;
//!
//! let ids = IdGenerator::new();
//! let first = ids.next_id();
//! let second = ids.next_id();
//! assert!(first < second);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a scheduled task.
///
/// Ids are issued in strictly increasing order, are never reused, and never
/// change once handed to a caller. Comparing two ids compares their issuance
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    /// Create an id from its raw value.
    ///
    /// Intended for deserialization and tests; ids used with a scheduler
    /// must come from its own generator.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value of this id.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Issues unique, monotonically increasing task ids.
///
/// Backed by a single atomic fetch-and-increment, so issuing an id never
/// takes a lock and two threads can never observe the same id.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a generator starting at id zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next unique id.
    pub fn next_id(&self) -> TaskId {
        TaskId(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// How many ids have been issued so far.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}
