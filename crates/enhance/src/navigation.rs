//! Mobile navigation menu and the active-section marker.

use crate::config::EnhanceConfig;
use crate::rate_limit::Debouncer;
use anyhow::Result;
use core::cell::RefCell;
use dom::NodeKey;
use log::{debug, trace};
use page_host::{EventKind, EventTarget, Page};
use std::rc::Rc;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    Toggle,
    Escape,
    OutsideClick,
    LinkClick,
    /// Debounced resize to at least the desktop breakpoint.
    DesktopResize,
}

impl MenuState {
    /// Next state, or `None` when the event does not change anything.
    pub const fn on(self, event: MenuEvent) -> Option<Self> {
        match (self, event) {
            (Self::Closed, MenuEvent::Toggle) => Some(Self::Open),
            (
                Self::Open,
                MenuEvent::Toggle
                | MenuEvent::Escape
                | MenuEvent::OutsideClick
                | MenuEvent::LinkClick
                | MenuEvent::DesktopResize,
            ) => Some(Self::Closed),
            (Self::Closed, _) => None,
        }
    }

    #[inline]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Menu state plus the section the scroll spy last marked active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub menu: MenuState,
    pub active_section: Option<String>,
}

pub type SharedNavigation = Rc<RefCell<NavigationState>>;

#[derive(Copy, Clone)]
struct MenuMarkup {
    nav: NodeKey,
    toggle: NodeKey,
    list: NodeKey,
}

impl MenuMarkup {
    fn find(page: &Page) -> Option<Self> {
        let document = page.document();
        Some(Self {
            nav: document.query_selector(".c-nav")?,
            toggle: document.query_selector(".c-nav__toggle")?,
            list: document.query_selector(".c-nav__list")?,
        })
    }

    fn render(self, page: &mut Page, state: MenuState) {
        let document = page.document_mut();
        let body = document.body();
        if state.is_open() {
            document.add_class(self.nav, "is-open");
            document.set_attr(self.toggle, "aria-expanded", "true");
            document.add_class(body, "u-no-scroll");
            document.set_style(self.list, "height", "calc(100vh - var(--header-h))");
        } else {
            document.remove_class(self.nav, "is-open");
            document.set_attr(self.toggle, "aria-expanded", "false");
            document.remove_class(body, "u-no-scroll");
            document.set_style(self.list, "height", "0");
        }
    }
}

fn transition(page: &mut Page, markup: MenuMarkup, shared: &SharedNavigation, event: MenuEvent) {
    let next = {
        let mut navigation = shared.borrow_mut();
        let Some(next) = navigation.menu.on(event) else {
            return;
        };
        navigation.menu = next;
        next
    };
    trace!("menu: {event:?} -> {next:?}");
    markup.render(page, next);
}

/// Wire the burger menu. Missing nav, toggle or list disables the feature.
pub fn init(page: &mut Page, config: &EnhanceConfig, shared: &SharedNavigation) -> Result<()> {
    let Some(markup) = MenuMarkup::find(page) else {
        debug!("navigation: menu markup not found");
        return Ok(());
    };

    let state = Rc::clone(shared);
    page.on(EventTarget::Node(markup.toggle), EventKind::Click, move |page, event| {
        event.prevent_default();
        transition(page, markup, &state, MenuEvent::Toggle);
    });

    let state = Rc::clone(shared);
    page.on(EventTarget::Document, EventKind::KeyDown, move |page, event| {
        if event.key.as_deref() == Some("Escape") {
            transition(page, markup, &state, MenuEvent::Escape);
        }
    });

    let state = Rc::clone(shared);
    page.on(EventTarget::Document, EventKind::Click, move |page, event| {
        let inside = event
            .target_node()
            .is_some_and(|target| page.document().contains(markup.nav, target));
        if !inside {
            transition(page, markup, &state, MenuEvent::OutsideClick);
        }
    });

    for link in page.document().query_selector_all(".c-nav__link") {
        let state = Rc::clone(shared);
        page.on(EventTarget::Node(link), EventKind::Click, move |page, _| {
            transition(page, markup, &state, MenuEvent::LinkClick);
        });
    }

    let state = Rc::clone(shared);
    let breakpoint = config.desktop_breakpoint_px;
    let on_resize = Debouncer::new(config.resize_debounce_ms, move |page: &mut Page, (): ()| {
        if page.viewport_width() >= breakpoint {
            transition(page, markup, &state, MenuEvent::DesktopResize);
        }
    });
    page.on(EventTarget::Window, EventKind::Resize, move |page, _| {
        on_resize.call(page, ());
    });
    Ok(())
}
