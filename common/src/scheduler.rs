use std::collections::BTreeMap;
use std::time::Duration;

use crate::ContinuationId;

/// Delayed invocation provided by whoever drives the engine.
///
/// When a scheduled delay elapses the driver calls `MatchEngine::resume` with
/// the id it was given. Cancelled handles must never fire.
pub trait Scheduler {
    type Handle;

    fn schedule(&mut self, id: ContinuationId, delay: Duration) -> Self::Handle;

    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ManualHandle {
    deadline: Duration,
    sequence: u64,
}

/// Scheduler driven by a virtual clock. Nothing fires until the owner advances it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    sequence: u64,
    queue: BTreeMap<ManualHandle, ContinuationId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Pop the earliest continuation due at or before `until`, moving the clock to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<ContinuationId> {
        let (handle, _) = self.queue.first_key_value()?;
        if handle.deadline > until {
            return None;
        }
        let (handle, id) = self.queue.pop_first()?;
        self.now = self.now.max(handle.deadline);
        Some(id)
    }

    /// Pop the earliest continuation regardless of its deadline.
    pub fn pop_next(&mut self) -> Option<ContinuationId> {
        let (handle, id) = self.queue.pop_first()?;
        self.now = self.now.max(handle.deadline);
        Some(id)
    }

    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&mut self, id: ContinuationId, delay: Duration) -> ManualHandle {
        let handle = ManualHandle {
            deadline: self.now + delay,
            sequence: self.sequence,
        };
        self.sequence += 1;
        self.queue.insert(handle, id);
        handle
    }

    fn cancel(&mut self, handle: ManualHandle) {
        self.queue.remove(&handle);
    }
}
