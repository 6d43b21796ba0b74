//! Virtual-clock timers.
//!
//! Timers are ordered by due time, then by scheduling order, so two timers
//! due at the same instant fire in the order they were created.

use std::collections::{BTreeMap, HashMap};

/// Handle returned by [`Scheduler::set_timeout`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A one-shot callback run against the host when its timer fires.
pub type TimerCallback<H> = Box<dyn FnOnce(&mut H)>;

/// The scheduling seam used by rate limiters and delayed effects.
pub trait Scheduler: Sized + 'static {
    /// Run `callback` once, `delay_ms` after now. A zero delay runs on the next flush.
    fn set_timeout(&mut self, delay_ms: u64, callback: TimerCallback<Self>) -> TimerId;

    /// Cancel a pending timer. Unknown or already fired ids are ignored.
    fn clear_timeout(&mut self, id: TimerId);
}

/// Pending timers for one host.
pub struct TimerQueue<H> {
    next_id: u64,
    by_due: BTreeMap<(u64, TimerId), TimerCallback<H>>,
    due_of: HashMap<TimerId, u64>,
}

impl<H> Default for TimerQueue<H> {
    fn default() -> Self {
        Self {
            next_id: 1,
            by_due: BTreeMap::new(),
            due_of: HashMap::new(),
        }
    }
}

impl<H> TimerQueue<H> {
    /// Schedule `callback` at absolute time `due_ms`.
    pub fn schedule(&mut self, due_ms: u64, callback: TimerCallback<H>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.by_due.insert((due_ms, id), callback);
        self.due_of.insert(id, due_ms);
        id
    }

    /// Remove a pending timer, returning whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.due_of
            .remove(&id)
            .is_some_and(|due| self.by_due.remove(&(due, id)).is_some())
    }

    #[inline]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_of.contains_key(&id)
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<u64> {
        self.by_due.keys().next().map(|(due, _)| *due)
    }

    /// Take the earliest timer whose due time is at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<TimerCallback<H>> {
        let (&(due, id), _) = self.by_due.iter().next()?;
        if due > now_ms {
            return None;
        }
        self.due_of.remove(&id);
        self.by_due.remove(&(due, id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_due.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_due.is_empty()
    }
}
