//! Deterministic in-memory page host.
//!
//! A [`Page`] owns a [`dom::Document`] together with the window state and the
//! platform services page scripts use: event dispatch with bubbling, virtual
//! clock timers and animation frames, viewport visibility observers and
//! origin-scoped storage. Nothing runs on its own; callers drive the clock with
//! [`Page::advance_by`] and [`Page::flush`].

pub mod config;
pub mod events;
pub mod fixture;
pub mod state;
pub mod storage;
pub mod timers;
pub mod visibility;

pub use config::{HostConfig, env_number};
pub use events::{Event, EventKind, EventTarget, Listener, ListenerId};
pub use fixture::{ElementFixture, PageFixture};
pub use state::{Page, ReadyState, ScrollBehavior, ScrollBlock};
pub use timers::{Scheduler, TimerCallback, TimerId};
pub use visibility::{
    ObserverId, RootMargin, VisibilityCallback, VisibilityEntry, VisibilityOptions,
};
