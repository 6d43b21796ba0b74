//! The page: document, window, event loop and platform services.

use crate::config::HostConfig;
use crate::events::{Event, EventKind, EventTarget, Listener, ListenerId, ListenerRegistry};
use crate::storage::StorageRegistry;
use crate::timers::{Scheduler, TimerCallback, TimerId, TimerQueue};
use crate::visibility::{ObserverId, VisibilityCallback, VisibilityObservers, VisibilityOptions};
use anyhow::{Context as _, Result};
use core::mem;
use dom::{Document, NodeKey, Rect};
use log::{info, trace, warn};
use serde::Deserialize;
use std::rc::Rc;
use url::Url;

/// `document.readyState`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    #[default]
    Complete,
}

/// `ScrollToOptions.behavior`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// `ScrollIntoViewOptions.block`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
}

type FrameCallback = Box<dyn FnOnce(&mut Page)>;

/// Upper bound on back-to-back visibility rounds triggered by observer callbacks.
const MAX_VISIBILITY_ROUNDS: usize = 32;

/// A loaded page and everything scripts can reach from it.
pub struct Page {
    document: Document,
    location: Url,
    ready_state: ReadyState,
    config: HostConfig,
    scroll_y: f64,
    viewport_width: f64,
    viewport_height: f64,
    now_ms: u64,
    timers: TimerQueue<Self>,
    frames: Vec<FrameCallback>,
    next_frame_ms: Option<u64>,
    listeners: ListenerRegistry,
    observers: VisibilityObservers,
    visibility_dirty: bool,
    storage: StorageRegistry,
    focused: Option<NodeKey>,
    navigations: Vec<Url>,
    last_scroll_behavior: Option<ScrollBehavior>,
    /// Set while a task (user action, timer, frame or visibility batch) runs.
    in_task: bool,
}

impl Page {
    /// Wrap `document` in a page at `location` that has finished loading.
    pub fn new(document: Document, location: Url, config: HostConfig) -> Self {
        Self {
            document,
            location,
            ready_state: ReadyState::Complete,
            scroll_y: 0.0,
            viewport_width: f64::from(config.viewport_width),
            viewport_height: f64::from(config.viewport_height),
            config,
            now_ms: 0,
            timers: TimerQueue::default(),
            frames: Vec::new(),
            next_frame_ms: None,
            listeners: ListenerRegistry::default(),
            observers: VisibilityObservers::default(),
            visibility_dirty: false,
            storage: StorageRegistry::default(),
            focused: None,
            navigations: Vec::new(),
            last_scroll_behavior: None,
            in_task: false,
        }
    }

    // Accessors

    #[inline]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document access. Any write may move layout, so visibility is rechecked.
    #[inline]
    pub const fn document_mut(&mut self) -> &mut Document {
        self.visibility_dirty = true;
        &mut self.document
    }

    #[inline]
    pub const fn location(&self) -> &Url {
        &self.location
    }

    #[inline]
    pub const fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub(crate) const fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    #[inline]
    pub const fn config(&self) -> &HostConfig {
        &self.config
    }

    #[inline]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// `window.scrollY`.
    #[inline]
    pub const fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// `window.innerWidth`.
    #[inline]
    pub const fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// `window.innerHeight`.
    #[inline]
    pub const fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    #[inline]
    pub const fn focused(&self) -> Option<NodeKey> {
        self.focused
    }

    /// Every URL the page navigated to, oldest first.
    #[inline]
    pub fn navigations(&self) -> &[Url] {
        &self.navigations
    }

    #[inline]
    pub const fn last_scroll_behavior(&self) -> Option<ScrollBehavior> {
        self.last_scroll_behavior
    }

    /// Visible area in document coordinates.
    pub const fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.viewport_width, self.viewport_height)
    }

    /// `getBoundingClientRect()`: the layout box relative to the viewport.
    pub fn client_rect(&self, node: NodeKey) -> Rect {
        self.document.layout(node).translated(0.0, -self.scroll_y)
    }

    /// Update a node's layout box.
    pub fn set_layout(&mut self, node: NodeKey, rect: Rect) {
        self.document.set_layout(node, rect);
        self.visibility_dirty = true;
    }

    /// Bottom of the lowest layout box; the scrollable height of the page.
    pub fn scroll_height(&self) -> f64 {
        self.document
            .descendants(NodeKey::ROOT)
            .into_iter()
            .map(|node| self.document.layout(node).bottom())
            .fold(self.viewport_height, f64::max)
    }

    // Listeners

    pub fn add_event_listener(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        listener: Listener,
    ) -> ListenerId {
        self.listeners.add(target, kind, listener)
    }

    /// Attach a closure as a listener.
    pub fn on<F>(&mut self, target: EventTarget, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&mut Self, &mut Event) + 'static,
    {
        self.add_event_listener(target, kind, Rc::new(listener))
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Number of listeners for one target and event type.
    pub fn listener_count(&self, target: EventTarget, kind: EventKind) -> usize {
        self.listeners.count_for(target, kind)
    }

    #[inline]
    pub fn total_listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run the listeners along the propagation path of `event`.
    pub fn dispatch_event(&mut self, event: &mut Event) {
        let path = self.propagation_path(event.target, event.kind.bubbles());
        trace!("dispatch {:?} to {:?} ({} hops)", event.kind, event.target, path.len());
        for current in path {
            if event.propagation_stopped() {
                break;
            }
            event.current_target = current;
            for listener in self.listeners.listeners_for(current, event.kind) {
                listener(self, event);
            }
        }
    }

    fn propagation_path(&self, target: EventTarget, bubbles: bool) -> Vec<EventTarget> {
        let mut path = vec![target];
        if !bubbles {
            return path;
        }
        if let EventTarget::Node(node) = target {
            let mut current = self.document.parent_element(node);
            while let Some(ancestor) = current {
                path.push(EventTarget::Node(ancestor));
                current = self.document.parent_element(ancestor);
            }
            if self.document.is_connected(node) {
                path.push(EventTarget::Document);
            }
        }
        if target != EventTarget::Window {
            path.push(EventTarget::Window);
        }
        path
    }

    // User actions

    /// Click the center of `node`.
    pub fn click(&mut self, node: NodeKey) {
        let rect = self.client_rect(node);
        self.click_at(node, rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
    }

    /// Click `node` at a viewport position, then run the default action unless prevented.
    pub fn click_at(&mut self, node: NodeKey, client_x: f64, client_y: f64) {
        if self
            .document
            .closest(node, "button, input, select, textarea")
            .is_some_and(|control| self.document.is_disabled(control))
        {
            trace!("click on disabled control {node:?} ignored");
            return;
        }
        self.run_task(|page| {
            let mut event =
                Event::new(EventKind::Click, EventTarget::Node(node)).with_client_position(client_x, client_y);
            page.dispatch_event(&mut event);
            if !event.default_prevented() {
                page.click_default_action(node);
            }
        });
    }

    fn click_default_action(&mut self, node: NodeKey) {
        if let Some(anchor) = self.document.closest(node, "a[href]") {
            let href = self.document.attr(anchor, "href").unwrap_or_default().to_owned();
            if let Some(fragment) = href.strip_prefix('#') {
                self.location.set_fragment(Some(fragment));
                return;
            }
            if let Err(err) = self.navigate(&href) {
                warn!("link navigation failed: {err:#}");
            }
            return;
        }
        let Some(control) = self.document.closest(node, "button, input") else {
            return;
        };
        if self.document.input_type(control).as_deref() != Some("submit") {
            return;
        }
        if let Some(form) = self.document.closest(control, "form") {
            self.submit(form);
        }
    }

    /// Dispatch `submit` on `form`; unless prevented, navigate to its action.
    pub fn submit(&mut self, form: NodeKey) {
        self.run_task(|page| {
            let mut event = Event::new(EventKind::Submit, EventTarget::Node(form));
            page.dispatch_event(&mut event);
            if event.default_prevented() {
                return;
            }
            let action = page.document.attr(form, "action").unwrap_or_default().to_owned();
            if let Err(err) = page.navigate(&action) {
                warn!("form submission failed: {err:#}");
            }
        });
    }

    /// Key press on the focused element (or body), bubbling to the window.
    pub fn press_key(&mut self, key: &str) {
        let target = self.focused.unwrap_or_else(|| self.document.body());
        self.run_task(|page| {
            let mut event = Event::new(EventKind::KeyDown, EventTarget::Node(target)).with_key(key);
            page.dispatch_event(&mut event);
        });
    }

    /// Move focus to `node`, blurring the previously focused element.
    pub fn focus(&mut self, node: NodeKey) {
        if self.focused == Some(node) || !self.document.is_element(node) {
            return;
        }
        self.run_task(|page| {
            if let Some(previous) = page.focused.take() {
                page.dispatch_event(&mut Event::new(EventKind::Blur, EventTarget::Node(previous)));
            }
            page.focused = Some(node);
        });
    }

    /// Dispatch `blur` on `node` and drop focus if it held it.
    pub fn blur(&mut self, node: NodeKey) {
        self.run_task(|page| {
            if page.focused == Some(node) {
                page.focused = None;
            }
            page.dispatch_event(&mut Event::new(EventKind::Blur, EventTarget::Node(node)));
        });
    }

    /// Replace a control's value as typing would, firing `input`.
    pub fn input_text(&mut self, node: NodeKey, text: &str) {
        self.run_task(|page| {
            page.document.set_value(node, text);
            page.dispatch_event(&mut Event::new(EventKind::Input, EventTarget::Node(node)));
        });
    }

    /// Toggle a checkbox, firing `input`.
    pub fn set_checked(&mut self, node: NodeKey, checked: bool) {
        self.run_task(|page| {
            page.document.set_checked(node, checked);
            page.dispatch_event(&mut Event::new(EventKind::Input, EventTarget::Node(node)));
        });
    }

    /// `window.scrollTo`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let max_scroll = (self.scroll_height() - self.viewport_height).max(0.0);
        let top = top.clamp(0.0, max_scroll);
        self.last_scroll_behavior = Some(behavior);
        if (top - self.scroll_y).abs() < f64::EPSILON {
            return;
        }
        self.run_task(|page| {
            page.scroll_y = top;
            page.visibility_dirty = true;
            page.dispatch_event(&mut Event::new(EventKind::Scroll, EventTarget::Window));
        });
    }

    /// `Element.scrollIntoView`.
    pub fn scroll_into_view(&mut self, node: NodeKey, block: ScrollBlock, behavior: ScrollBehavior) {
        let rect = self.document.layout(node);
        let top = match block {
            ScrollBlock::Start => rect.y,
            ScrollBlock::Center => rect.y + rect.height / 2.0 - self.viewport_height / 2.0,
        };
        self.scroll_to(top, behavior);
    }

    /// Change the viewport size, firing `resize` on the window.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.run_task(|page| {
            page.viewport_width = width;
            page.viewport_height = height;
            page.visibility_dirty = true;
            page.dispatch_event(&mut Event::new(EventKind::Resize, EventTarget::Window));
        });
    }

    pub fn hover(&mut self, node: NodeKey) {
        self.run_task(|page| {
            page.dispatch_event(&mut Event::new(EventKind::MouseEnter, EventTarget::Node(node)));
        });
    }

    pub fn unhover(&mut self, node: NodeKey) {
        self.run_task(|page| {
            page.dispatch_event(&mut Event::new(EventKind::MouseLeave, EventTarget::Node(node)));
        });
    }

    /// Finish decoding an image and fire its `load` event.
    pub fn complete_image_load(&mut self, node: NodeKey) {
        self.run_task(|page| {
            page.document.set_complete(node, true);
            page.dispatch_event(&mut Event::new(EventKind::Load, EventTarget::Node(node)));
        });
    }

    /// Move a loading document to `interactive` (firing `DOMContentLoaded`) and then `complete`.
    pub fn finish_loading(&mut self) {
        if self.ready_state != ReadyState::Loading {
            return;
        }
        self.run_task(|page| {
            page.ready_state = ReadyState::Interactive;
            page.dispatch_event(&mut Event::new(
                EventKind::DomContentLoaded,
                EventTarget::Document,
            ));
            page.ready_state = ReadyState::Complete;
            page.dispatch_event(&mut Event::new(EventKind::Load, EventTarget::Window));
        });
    }

    // Navigation

    /// Resolve `href` against the current location and navigate there.
    ///
    /// # Errors
    /// Returns an error when `href` cannot be resolved to a URL.
    pub fn navigate(&mut self, href: &str) -> Result<Url> {
        let target = self
            .location
            .join(href)
            .with_context(|| format!("cannot resolve `{href}` against {}", self.location))?;
        info!("navigating to {target}");
        self.navigations.push(target.clone());
        self.location = target.clone();
        Ok(target)
    }

    // Storage

    fn origin(&self) -> String {
        self.location.origin().ascii_serialization()
    }

    /// `localStorage.getItem`.
    pub fn storage_get(&self, key: &str) -> Option<String> {
        self.storage.get_item(&self.origin(), key).map(str::to_owned)
    }

    /// `localStorage.setItem`.
    pub fn storage_set(&mut self, key: &str, value: &str) {
        let origin = self.origin();
        self.storage.set_item(&origin, key, value);
    }

    /// `localStorage.removeItem`.
    pub fn storage_remove(&mut self, key: &str) {
        let origin = self.origin();
        self.storage.remove_item(&origin, key);
    }

    // Visibility platform

    pub fn create_visibility_observer(
        &mut self,
        options: VisibilityOptions,
        callback: VisibilityCallback,
    ) -> ObserverId {
        self.observers.create(options, callback)
    }

    /// Start reporting `node` to `observer`; the first check always delivers an entry.
    pub fn observe_visibility(&mut self, observer: ObserverId, node: NodeKey) {
        if self.observers.observe(observer, node) {
            self.visibility_dirty = true;
        }
    }

    pub fn unobserve_visibility(&mut self, observer: ObserverId, node: NodeKey) {
        self.observers.unobserve(observer, node);
    }

    pub fn disconnect_visibility_observer(&mut self, observer: ObserverId) {
        self.observers.disconnect(observer);
    }

    #[inline]
    pub fn visibility_observer_count(&self) -> usize {
        self.observers.observer_count()
    }

    pub fn observed_target_count(&self, observer: ObserverId) -> usize {
        self.observers.target_count(observer)
    }

    fn run_visibility_checks(&mut self) {
        for _ in 0..MAX_VISIBILITY_ROUNDS {
            if !self.visibility_dirty {
                return;
            }
            self.visibility_dirty = false;
            let viewport = self.viewport_rect();
            let document = &self.document;
            let batches = self.observers.collect_changes(viewport, |node| {
                document.is_connected(node).then(|| document.layout(node))
            });
            for batch in batches {
                self.in_task = true;
                (batch.callback)(self, &batch.entries);
                self.in_task = false;
            }
        }
        warn!("visibility checks did not settle after {MAX_VISIBILITY_ROUNDS} rounds");
    }

    // Event loop

    /// Queue `callback` for the next animation frame.
    pub fn request_animation_frame<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut Self) + 'static,
    {
        self.frames.push(Box::new(callback));
        if self.next_frame_ms.is_none() {
            let interval = self.config.frame_interval_ms.max(1);
            self.next_frame_ms = Some((self.now_ms / interval + 1) * interval);
        }
    }

    #[inline]
    pub fn pending_frame_count(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    #[inline]
    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.timers.is_pending(id)
    }

    fn run_task<R>(&mut self, task: impl FnOnce(&mut Self) -> R) -> R {
        if self.in_task {
            return task(self);
        }
        self.in_task = true;
        let result = task(self);
        self.in_task = false;
        self.flush();
        result
    }

    fn run_timer(&mut self, callback: TimerCallback<Self>) {
        self.in_task = true;
        callback(self);
        self.in_task = false;
    }

    fn run_frame(&mut self) {
        self.next_frame_ms = None;
        let callbacks = mem::take(&mut self.frames);
        trace!("frame at {}ms: {} callbacks", self.now_ms, callbacks.len());
        self.in_task = true;
        for callback in callbacks {
            callback(self);
        }
        self.in_task = false;
    }

    /// Run pending visibility checks and every timer due now, without moving the clock.
    pub fn flush(&mut self) {
        if self.in_task {
            return;
        }
        loop {
            self.run_visibility_checks();
            let Some(callback) = self.timers.pop_due(self.now_ms) else {
                break;
            };
            self.run_timer(callback);
        }
    }

    /// Move the clock forward, running timers and frames in time order.
    pub fn advance_by(&mut self, ms: u64) {
        if self.in_task {
            warn!("advance_by called from inside a task; ignored");
            return;
        }
        let target = self.now_ms.saturating_add(ms);
        self.flush();
        loop {
            let timer_due = self.timers.next_due().filter(|due| *due <= target);
            let frame_due = self.next_frame_ms.filter(|due| *due <= target);
            match (timer_due, frame_due) {
                (Some(timer), frame) if frame.is_none_or(|frame| timer <= frame) => {
                    self.now_ms = self.now_ms.max(timer);
                    if let Some(callback) = self.timers.pop_due(self.now_ms) {
                        self.run_timer(callback);
                    }
                }
                (_, Some(frame)) => {
                    self.now_ms = self.now_ms.max(frame);
                    self.run_frame();
                }
                _ => break,
            }
            self.run_visibility_checks();
        }
        self.now_ms = target;
        self.flush();
    }
}

impl Scheduler for Page {
    fn set_timeout(&mut self, delay_ms: u64, callback: TimerCallback<Self>) -> TimerId {
        let due = self.now_ms.saturating_add(delay_ms);
        self.timers.schedule(due, callback)
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.cancel(id);
    }
}
