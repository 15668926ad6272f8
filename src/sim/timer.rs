//! Fixed-step timer queue
//!
//! Intervals are quantised to whole simulation ticks so firing is exact and
//! reproducible: a 0.5 s timer at 120 Hz fires every 60 ticks, never 59 or
//! 61 because of float drift.

use serde::{Deserialize, Serialize};

use crate::host::TimerHandle;
use crate::secs_to_ticks;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    handle: TimerHandle,
    period_ticks: u64,
    next_fire: u64,
    repeating: bool,
}

/// Scheduled timers, ordered by handle for deterministic firing order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    now: u64,
    next_id: u32,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks elapsed since creation
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule a timer; it first fires one full interval from now
    pub fn schedule(&mut self, interval: f32, repeating: bool) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let period_ticks = secs_to_ticks(interval);
        self.timers.push(Timer {
            handle,
            period_ticks,
            next_fire: self.now.saturating_add(period_ticks),
            repeating,
        });
        handle
    }

    /// Drop a timer. Returns false if it was not scheduled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Number of live timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance one tick and return the timers that fired, in handle order.
    ///
    /// Repeating timers are re-armed; one-shot timers are removed.
    pub fn advance(&mut self) -> Vec<TimerHandle> {
        self.now += 1;
        let now = self.now;

        let mut fired = Vec::new();
        for timer in &mut self.timers {
            if timer.next_fire <= now {
                fired.push(timer.handle);
                timer.next_fire = now.saturating_add(timer.period_ticks);
            }
        }
        self.timers
            .retain(|t| t.repeating || !fired.contains(&t.handle));
        fired
    }
}
