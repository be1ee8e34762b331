//! `Clock<T>` — virtual-time event queue.
//!
//! Every pending resumption is keyed by `(time, seq)` where `seq` is a
//! monotonically increasing submission counter.  The heap pops the smallest
//! key first, so items scheduled for the same instant come out in the order
//! they were scheduled.  That tie-break is what makes two runs over the same
//! input produce identical logs.
//!
//! `T` is whatever the owner needs to resume; the station queues
//! `ProcessId`s.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use st_core::SimTime;
use tracing::trace;

use crate::{KernelError, KernelResult};

struct Scheduled<T> {
    at:   SimTime,
    seq:  u64,
    item: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap behaves as a min-heap on (at, seq).
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A deterministic discrete-event scheduler.
pub struct Clock<T> {
    now:        SimTime,
    next_seq:   u64,
    queue:      BinaryHeap<Scheduled<T>>,
    dispatched: u64,
}

impl<T> Default for Clock<T> {
    fn default() -> Self {
        Self {
            now:        SimTime::ZERO,
            next_seq:   0,
            queue:      BinaryHeap::new(),
            dispatched: 0,
        }
    }
}

impl<T> Clock<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `item` to resume `delay` units from now.
    ///
    /// Returns the absolute resumption time.  Negative or NaN delays are
    /// rejected with [`KernelError::InvalidDuration`] and nothing is queued.
    pub fn after(&mut self, delay: f64, item: T) -> KernelResult<SimTime> {
        if delay.is_nan() || delay < 0.0 {
            return Err(KernelError::InvalidDuration { duration: delay });
        }
        let at = self.now + delay;
        self.push(at, item);
        Ok(at)
    }

    /// Schedule `item` to resume at the current instant, after everything
    /// already queued for this instant.
    pub fn schedule_now(&mut self, item: T) {
        self.push(self.now, item);
    }

    /// Pop the earliest pending item and advance `now` to its time.
    pub fn pop_next(&mut self) -> Option<(SimTime, T)> {
        let next = self.queue.pop()?;
        debug_assert!(next.at >= self.now, "clock must never run backwards");
        self.now = next.at;
        self.dispatched += 1;
        Some((next.at, next.item))
    }

    /// Time of the earliest pending item without removing it.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.queue.peek().map(|s| s.at)
    }

    /// Dispatch pending items to `handler` until the queue is empty.
    ///
    /// The handler may schedule further items through the `&mut Clock` it
    /// receives; those are dispatched in the same call.  The first handler
    /// error stops the loop and is returned; items still queued stay queued.
    ///
    /// Returns the number of items dispatched by this call.
    pub fn run_until_idle<E, F>(&mut self, handler: F) -> Result<u64, E>
    where
        F: FnMut(&mut Self, T) -> Result<(), E>,
    {
        self.drain(None, handler)
    }

    /// Dispatch every item due at or before `limit`, then move `now` up to
    /// `limit` if it is still behind.
    pub fn run_until<E, F>(&mut self, limit: SimTime, handler: F) -> Result<u64, E>
    where
        F: FnMut(&mut Self, T) -> Result<(), E>,
    {
        let dispatched = self.drain(Some(limit), handler)?;
        if limit > self.now {
            self.now = limit;
        }
        Ok(dispatched)
    }

    /// Number of pending items.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total items dispatched since the clock was created.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    fn drain<E, F>(&mut self, limit: Option<SimTime>, mut handler: F) -> Result<u64, E>
    where
        F: FnMut(&mut Self, T) -> Result<(), E>,
    {
        let start = self.dispatched;
        while self
            .peek_time()
            .is_some_and(|at| limit.is_none_or(|limit| at <= limit))
        {
            let Some((_, item)) = self.pop_next() else {
                break;
            };
            handler(self, item)?;
        }
        Ok(self.dispatched - start)
    }

    fn push(&mut self, at: SimTime, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        trace!(now = %self.now, at = %at, seq, "schedule");
        self.queue.push(Scheduled { at, seq, item });
    }
}
