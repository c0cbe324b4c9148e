use std::collections::{BTreeMap, HashMap};

use crate::foundation::core::Millis;

/// Handle returned by [`Scheduler::schedule`], used to cancel a pending timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Virtual-clock timer queue.
///
/// Stands in for the browser's `setTimeout`: callers schedule a payload at an absolute
/// deadline and later drain whatever is due. Timers sharing a deadline fire in the order they
/// were scheduled.
#[derive(Debug)]
pub struct Scheduler<T> {
    next_seq: u64,
    queue: BTreeMap<(Millis, u64), T>,
    deadlines: HashMap<u64, Millis>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Empty queue.
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Queue `payload` to fire once the clock reaches `at`.
    pub fn schedule(&mut self, at: Millis, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((at, seq), payload);
        self.deadlines.insert(seq, at);
        TimerId(seq)
    }

    /// Cancel a pending timer. Cancelling a fired or unknown timer is a no-op.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let at = self.deadlines.remove(&id.0)?;
        self.queue.remove(&(at, id.0))
    }

    /// Cancel every pending timer whose payload matches, returning the payloads in firing
    /// order.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        let doomed: Vec<(Millis, u64)> = self
            .queue
            .iter()
            .filter(|(_, payload)| pred(*payload))
            .map(|(k, _)| *k)
            .collect();
        let mut out = Vec::with_capacity(doomed.len());
        for key in doomed {
            self.deadlines.remove(&key.1);
            out.extend(self.queue.remove(&key));
        }
        out
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, TimerId, T)> {
        let (&(at, seq), _) = self.queue.first_key_value()?;
        if at > now {
            return None;
        }
        let payload = self.queue.remove(&(at, seq))?;
        self.deadlines.remove(&seq);
        Some((at, TimerId(seq), payload))
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.queue.first_key_value().map(|(&(at, _), _)| at)
    }

    /// True until `id` fires or is cancelled.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id.0)
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
