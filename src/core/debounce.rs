//! Cancellable debounce timer
//!
//! `DebouncedTrigger` only does the bookkeeping: it hands out a handle per
//! scheduled timer and decides whether a handle may settle. Waiting for the
//! deadline is left to the caller, which keeps the state machine testable
//! against any clock.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Identifies one scheduled timer. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    id: u64,
    deadline: Instant,
}

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Pending(TimerHandle),
    Settled(TimerHandle),
    Cancelled(TimerHandle),
}

#[derive(Debug)]
pub struct DebouncedTrigger {
    delay: Duration,
    next_id: u64,
    state: TriggerState,
}

impl DebouncedTrigger {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_id: 0,
            state: TriggerState::Idle,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn pending(&self) -> Option<TimerHandle> {
        match self.state {
            TriggerState::Pending(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending().is_some()
    }

    /// Starts a new timer expiring `delay` after `now`, cancelling the pending one.
    pub fn schedule(&mut self, now: Instant) -> TimerHandle {
        if let Some(previous) = self.cancel() {
            debug!(timer = previous.id, "Superseded pending evaluation");
        }
        self.next_id += 1;
        let handle = TimerHandle {
            id: self.next_id,
            deadline: now + self.delay,
        };
        debug!(timer = handle.id, delay_ms = self.delay.as_millis() as u64, "Scheduled evaluation");
        self.state = TriggerState::Pending(handle);
        handle
    }

    /// Cancels the pending timer, if any, and returns it.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        let handle = self.pending()?;
        self.state = TriggerState::Cancelled(handle);
        Some(handle)
    }

    /// Settles `handle` if it is still the pending timer and its deadline has
    /// passed. Returns whether the caller should run the evaluation.
    pub fn fire(&mut self, handle: TimerHandle, now: Instant) -> bool {
        match self.state {
            TriggerState::Pending(current) if current == handle && now >= handle.deadline => {
                debug!(timer = handle.id, "Debounce window elapsed");
                self.state = TriggerState::Settled(handle);
                true
            }
            _ => false,
        }
    }
}

impl Default for DebouncedTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
