//! Header elevation and hide-on-scroll-down.

use crate::config::EnhanceConfig;
use crate::rate_limit::Throttler;
use anyhow::Result;
use core::cell::RefCell;
use log::{debug, trace};
use page_host::{EventKind, EventTarget, Page};
use std::rc::Rc;

const ELEVATE_AFTER_PX: f64 = 100.0;
const HIDE_AFTER_PX: f64 = 300.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeaderState {
    pub last_offset: f64,
    pub visible: bool,
    pub elevated: bool,
}

impl Default for HeaderState {
    fn default() -> Self {
        Self {
            last_offset: 0.0,
            visible: true,
            elevated: false,
        }
    }
}

impl HeaderState {
    /// Step with the default thresholds.
    #[must_use]
    pub fn advance(self, offset: f64) -> Self {
        self.advance_with(offset, ELEVATE_AFTER_PX, HIDE_AFTER_PX)
    }

    /// Elevated past `elevate_after`; hidden while scrolling down past `hide_after`.
    #[must_use]
    pub fn advance_with(self, offset: f64, elevate_after: f64, hide_after: f64) -> Self {
        Self {
            last_offset: offset,
            visible: !(offset > self.last_offset && offset > hide_after),
            elevated: offset > elevate_after,
        }
    }
}

pub type SharedHeader = Rc<RefCell<HeaderState>>;

/// Wire the throttled scroll handler on `.l-header`.
pub fn init(page: &mut Page, config: &EnhanceConfig, shared: &SharedHeader) -> Result<()> {
    let Some(header) = page.document().query_selector(".l-header") else {
        debug!("header: .l-header not found");
        return Ok(());
    };
    page.document_mut()
        .set_style(header, "transition", "all 0.4s ease-out");

    let state = Rc::clone(shared);
    let (elevate_after, hide_after) = (config.header_elevate_after_px, config.header_hide_after_px);
    let on_scroll = Throttler::new(config.header_throttle_ms, move |page: &mut Page, (): ()| {
        let next = {
            let mut current = state.borrow_mut();
            *current = current.advance_with(page.scroll_y(), elevate_after, hide_after);
            *current
        };
        trace!("header: {next:?}");
        let document = page.document_mut();
        let shadow = if next.elevated {
            "var(--shadow-xl)"
        } else {
            "var(--shadow-md)"
        };
        document.set_style(header, "box-shadow", shadow);
        let transform = if next.visible {
            "translateY(0)"
        } else {
            "translateY(-100%)"
        };
        document.set_style(header, "transform", transform);
    });
    page.on(EventTarget::Window, EventKind::Scroll, move |page, _| {
        on_scroll.call(page, ());
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::HeaderState;

    #[test]
    fn offsets_sequence() {
        let mut state = HeaderState::default();
        let mut seen = Vec::new();
        for offset in [0.0, 50.0, 150.0, 400.0, 350.0] {
            state = state.advance(offset);
            seen.push((state.elevated, state.visible));
        }
        assert_eq!(
            seen,
            vec![(false, true), (false, true), (true, true), (true, false), (true, true)]
        );
    }
}
