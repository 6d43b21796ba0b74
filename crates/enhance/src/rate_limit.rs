//! Debounce and throttle wrappers over the host's timers.
//!
//! Each wrapper owns the state of one wrapped callback. Clones share that
//! state, so one instance can be captured by several listeners.

use core::cell::Cell;
use log::trace;
use page_host::{Scheduler, TimerId};
use std::rc::Rc;

type Callback<H, A> = Rc<dyn Fn(&mut H, A)>;

struct DebounceState<H, A> {
    wait_ms: u64,
    callback: Callback<H, A>,
    pending: Cell<Option<TimerId>>,
}

/// Runs the callback once, `wait_ms` after the last call, with the last arguments.
pub struct Debouncer<H, A> {
    state: Rc<DebounceState<H, A>>,
}

impl<H, A> Clone for Debouncer<H, A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<H: Scheduler, A: 'static> Debouncer<H, A> {
    pub fn new<F>(wait_ms: u64, callback: F) -> Self
    where
        F: Fn(&mut H, A) + 'static,
    {
        Self {
            state: Rc::new(DebounceState {
                wait_ms,
                callback: Rc::new(callback),
                pending: Cell::new(None),
            }),
        }
    }

    /// Cancel the pending run (if any) and schedule a new one with `args`.
    pub fn call(&self, host: &mut H, args: A) {
        if let Some(previous) = self.state.pending.take() {
            host.clear_timeout(previous);
        }
        let state = Rc::clone(&self.state);
        let id = host.set_timeout(
            self.state.wait_ms,
            Box::new(move |host: &mut H| {
                state.pending.set(None);
                (state.callback)(host, args);
            }),
        );
        self.state.pending.set(Some(id));
    }

    /// Whether a run is scheduled.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }
}

struct ThrottleState<H, A> {
    limit_ms: u64,
    callback: Callback<H, A>,
    suppressing: Cell<bool>,
    cooldown: Cell<Option<TimerId>>,
}

/// Runs the callback on the leading edge, then drops calls until `limit_ms` passed.
pub struct Throttler<H, A> {
    state: Rc<ThrottleState<H, A>>,
}

impl<H, A> Clone for Throttler<H, A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<H: Scheduler, A: 'static> Throttler<H, A> {
    pub fn new<F>(limit_ms: u64, callback: F) -> Self
    where
        F: Fn(&mut H, A) + 'static,
    {
        Self {
            state: Rc::new(ThrottleState {
                limit_ms,
                callback: Rc::new(callback),
                suppressing: Cell::new(false),
                cooldown: Cell::new(None),
            }),
        }
    }

    /// Run now unless inside the cooldown window. Returns whether the callback ran.
    pub fn call(&self, host: &mut H, args: A) -> bool {
        if self.state.suppressing.get() {
            trace!("throttled call dropped");
            return false;
        }
        self.state.suppressing.set(true);
        let state = Rc::clone(&self.state);
        let id = host.set_timeout(
            self.state.limit_ms,
            Box::new(move |_: &mut H| {
                state.suppressing.set(false);
                state.cooldown.set(None);
            }),
        );
        self.state.cooldown.set(Some(id));
        (self.state.callback)(host, args);
        true
    }

    /// Whether calls are currently being dropped.
    #[inline]
    pub fn is_suppressing(&self) -> bool {
        self.state.suppressing.get()
    }
}
