//! Event types and listener bookkeeping.

use crate::Page;
use dom::NodeKey;
use std::rc::Rc;

/// Where a listener is attached or an event is dispatched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Document,
    Node(NodeKey),
}

/// The event types the host can dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    Input,
    Blur,
    Submit,
    MouseEnter,
    MouseLeave,
    Scroll,
    Resize,
    Load,
    DomContentLoaded,
}

impl EventKind {
    /// Whether the event propagates from the target up to the window.
    #[inline]
    pub const fn bubbles(self) -> bool {
        matches!(
            self,
            Self::Click | Self::KeyDown | Self::Input | Self::Submit
        )
    }
}

/// A dispatched event.
#[derive(Clone, Debug)]
pub struct Event {
    pub kind: EventKind,
    pub target: EventTarget,
    /// The target whose listeners are currently running.
    pub current_target: EventTarget,
    /// `KeyboardEvent.key` for key events.
    pub key: Option<String>,
    pub client_x: f64,
    pub client_y: f64,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub const fn new(kind: EventKind, target: EventTarget) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            key: None,
            client_x: 0.0,
            client_y: 0.0,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_owned());
        self
    }

    #[must_use]
    pub const fn with_client_position(mut self, client_x: f64, client_y: f64) -> Self {
        self.client_x = client_x;
        self.client_y = client_y;
        self
    }

    /// The node the event was dispatched to, if it was dispatched to a node.
    #[inline]
    pub const fn target_node(&self) -> Option<NodeKey> {
        match self.target {
            EventTarget::Node(node) => Some(node),
            EventTarget::Window | EventTarget::Document => None,
        }
    }

    #[inline]
    pub const fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[inline]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    #[inline]
    pub const fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    #[inline]
    pub const fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// An event handler. Handlers get the whole page so they can read and write the
/// document, schedule timers and dispatch follow-up events.
pub type Listener = Rc<dyn Fn(&mut Page, &mut Event)>;

/// Handle returned when a listener is attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    target: EventTarget,
    kind: EventKind,
    listener: Listener,
}

/// All attached listeners, in attachment order.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    entries: Vec<ListenerEntry>,
}

impl ListenerRegistry {
    pub fn add(&mut self, target: EventTarget, kind: EventKind, listener: Listener) -> ListenerId {
        self.next_id = self.next_id.wrapping_add(1);
        let id = ListenerId(self.next_id);
        self.entries.push(ListenerEntry {
            id,
            target,
            kind,
            listener,
        });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Snapshot of the listeners for one target and type.
    /// Listeners added while dispatching do not run for the current event.
    pub fn listeners_for(&self, target: EventTarget, kind: EventKind) -> Vec<Listener> {
        self.entries
            .iter()
            .filter(|entry| entry.target == target && entry.kind == kind)
            .map(|entry| Rc::clone(&entry.listener))
            .collect()
    }

    pub fn count_for(&self, target: EventTarget, kind: EventKind) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.target == target && entry.kind == kind)
            .count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
