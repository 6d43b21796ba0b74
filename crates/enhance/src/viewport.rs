//! One visibility trigger shared by every viewport-driven enhancement.
//!
//! Registrations with an identical policy share one platform observer. A
//! one-shot registration is dropped before its callback runs, so it cannot fire
//! twice; a persistent one fires on every entry into the detection box.

use core::cell::RefCell;
use dom::NodeKey;
use log::trace;
use page_host::{ObserverId, Page, RootMargin, VisibilityEntry, VisibilityOptions};
use std::rc::Rc;

/// Detection box and threshold.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct VisibilityPolicy {
    pub margin: RootMargin,
    pub threshold: f64,
}

impl VisibilityPolicy {
    #[inline]
    pub const fn new(margin: RootMargin, threshold: f64) -> Self {
        Self { margin, threshold }
    }

    /// No margin, only a threshold.
    #[inline]
    pub const fn threshold(threshold: f64) -> Self {
        Self::new(RootMargin::ZERO, threshold)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObservationMode {
    /// Detach after the first visible report.
    OneShot,
    /// Report every time the target becomes visible.
    Persistent,
}

/// Called with the target that became visible.
pub type OnVisible = Rc<dyn Fn(&mut Page, NodeKey)>;

/// Handle of one registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationId(u64);

struct Registration {
    id: RegistrationId,
    target: NodeKey,
    mode: ObservationMode,
    on_visible: OnVisible,
}

struct SharedObserver {
    policy: VisibilityPolicy,
    observer: ObserverId,
    registrations: Vec<Registration>,
}

#[derive(Default)]
struct TriggerState {
    next_id: u64,
    observers: Vec<SharedObserver>,
}

/// Cloneable handle over the shared registration table.
#[derive(Clone, Default)]
pub struct ViewportTrigger {
    state: Rc<RefCell<TriggerState>>,
}

impl ViewportTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `on_visible` for `target` under `policy`.
    pub fn observe(
        &self,
        page: &mut Page,
        target: NodeKey,
        policy: VisibilityPolicy,
        mode: ObservationMode,
        on_visible: OnVisible,
    ) -> RegistrationId {
        let observer = self.observer_for(page, policy);
        let (id, already_observed) = {
            let mut state = self.state.borrow_mut();
            state.next_id = state.next_id.wrapping_add(1);
            let id = RegistrationId(state.next_id);
            let mut seen = false;
            if let Some(shared) = state
                .observers
                .iter_mut()
                .find(|shared| shared.observer == observer)
            {
                seen = shared.registrations.iter().any(|reg| reg.target == target);
                shared.registrations.push(Registration {
                    id,
                    target,
                    mode,
                    on_visible,
                });
            }
            (id, seen)
        };
        if already_observed {
            // Re-subscribe so the new registration gets a first report.
            page.unobserve_visibility(observer, target);
        }
        page.observe_visibility(observer, target);
        id
    }

    /// Drop a registration; the platform stops watching targets nobody wants.
    pub fn unobserve(&self, page: &mut Page, id: RegistrationId) {
        let mut orphaned = None;
        for shared in &mut self.state.borrow_mut().observers {
            let Some(position) = shared.registrations.iter().position(|reg| reg.id == id) else {
                continue;
            };
            let target = shared.registrations.remove(position).target;
            if !shared.registrations.iter().any(|reg| reg.target == target) {
                orphaned = Some((shared.observer, target));
            }
            break;
        }
        if let Some((observer, target)) = orphaned {
            page.unobserve_visibility(observer, target);
        }
    }

    /// Live registrations across all policies.
    pub fn registration_count(&self) -> usize {
        self.state
            .borrow()
            .observers
            .iter()
            .map(|shared| shared.registrations.len())
            .sum()
    }

    /// Platform observers created so far (one per distinct policy).
    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    fn observer_for(&self, page: &mut Page, policy: VisibilityPolicy) -> ObserverId {
        if let Some(shared) = self
            .state
            .borrow()
            .observers
            .iter()
            .find(|shared| shared.policy == policy)
        {
            return shared.observer;
        }
        let trigger = self.clone();
        let observer = page.create_visibility_observer(
            VisibilityOptions {
                margin: policy.margin,
                threshold: policy.threshold,
            },
            Rc::new(move |page: &mut Page, entries: &[VisibilityEntry]| {
                trigger.deliver(page, policy, entries);
            }),
        );
        self.state.borrow_mut().observers.push(SharedObserver {
            policy,
            observer,
            registrations: Vec::new(),
        });
        observer
    }

    fn deliver(&self, page: &mut Page, policy: VisibilityPolicy, entries: &[VisibilityEntry]) {
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            let (callbacks, detach) = self.take_callbacks(policy, entry.target);
            if let Some(observer) = detach {
                page.unobserve_visibility(observer, entry.target);
            }
            trace!("{:?} visible, {} callbacks", entry.target, callbacks.len());
            for callback in callbacks {
                callback(page, entry.target);
            }
        }
    }

    /// Callbacks to run for `target` under `policy`, with one-shot registrations
    /// removed, plus the observer to detach when nothing watches `target` anymore.
    fn take_callbacks(
        &self,
        policy: VisibilityPolicy,
        target: NodeKey,
    ) -> (Vec<OnVisible>, Option<ObserverId>) {
        let mut state = self.state.borrow_mut();
        let Some(shared) = state
            .observers
            .iter_mut()
            .find(|shared| shared.policy == policy)
        else {
            return (Vec::new(), None);
        };
        let mut callbacks = Vec::new();
        shared.registrations.retain(|reg| {
            if reg.target != target {
                return true;
            }
            callbacks.push(Rc::clone(&reg.on_visible));
            reg.mode == ObservationMode::Persistent
        });
        let watched = shared.registrations.iter().any(|reg| reg.target == target);
        (callbacks, (!watched).then_some(shared.observer))
    }
}
