//! Cancelable one-shot timers on a host-driven clock
//!
//! The widget runtime has exactly two suspension points, both timer based:
//! the blur grace delay and the keyboard idle watchdog. Instead of spawning
//! threads the queue is advanced by the host's frame loop, which keeps the
//! whole runtime single-threaded and makes timing deterministic in tests.
//!
//! ```rust
//! use spinwheel_core::timer::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let grace = timers.schedule(100, "grace");
//! let idle = timers.schedule(2500, "idle");
//!
//! // A superseding event cancels the pending timer
//! timers.cancel(grace);
//!
//! assert!(timers.advance(1000).is_empty());
//! let fired = timers.advance(1500);
//! assert_eq!(fired, vec![(idle, "idle")]);
//! assert!(timers.is_empty());
//! ```

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

/// A pending timer
struct TimerEntry<T> {
    /// Absolute deadline on the queue clock
    deadline_ms: u64,
    /// Scheduling order, breaks ties between equal deadlines
    seq: u64,
    payload: T,
}

/// Queue of one-shot timers keyed by [`TimerId`]
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, TimerEntry<T>>,
    /// Current time in milliseconds (moved forward by `advance`)
    now_ms: u64,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now_ms: 0,
            next_seq: 0,
        }
    }

    /// Current queue time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `payload` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(TimerEntry {
            deadline_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            payload,
        })
    }

    /// Cancel a pending timer, returning its payload if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|entry| entry.payload)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Move the clock forward by `dt_ms` and return every timer that came due
    ///
    /// Fired timers are removed and returned in deadline order (ties in
    /// scheduling order).
    pub fn advance(&mut self, dt_ms: u64) -> Vec<(TimerId, T)> {
        self.advance_to(self.now_ms.saturating_add(dt_ms))
    }

    /// Move the clock to an absolute time; earlier times leave it unchanged
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<(TimerId, T)> {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;

        let mut due: Vec<(TimerId, u64, u64)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline_ms <= now)
            .map(|(id, t)| (id, t.deadline_ms, t.seq))
            .collect();
        due.sort_by_key(|&(_, deadline, seq)| (deadline, seq));

        due.into_iter()
            .filter_map(|(id, _, _)| self.timers.remove(id).map(|t| (id, t.payload)))
            .collect()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now_ms", &self.now_ms)
            .field("pending", &self.timers.len())
            .finish()
    }
}
