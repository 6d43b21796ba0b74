//! Fade content up the first time it scrolls into view.

use crate::config::EnhanceConfig;
use crate::viewport::{ObservationMode, OnVisible, ViewportTrigger, VisibilityPolicy};
use anyhow::Result;
use dom::NodeKey;
use page_host::Page;
use std::rc::Rc;

pub const REVEAL_SELECTOR: &str = ".c-card, .c-button, .c-event, .c-testimonial, h1, h2, h3, p, \
     .l-hero__title, .l-hero__subtitle, .l-hero__description";

pub fn init(page: &mut Page, config: &EnhanceConfig, viewport: &ViewportTrigger) -> Result<()> {
    let policy = VisibilityPolicy::threshold(config.reveal_threshold);
    let on_visible: OnVisible = Rc::new(reveal);
    for target in page.document().query_selector_all(REVEAL_SELECTOR) {
        viewport.observe(
            page,
            target,
            policy,
            ObservationMode::OneShot,
            Rc::clone(&on_visible),
        );
    }
    Ok(())
}

fn reveal(page: &mut Page, target: NodeKey) {
    {
        let document = page.document_mut();
        document.set_style(target, "opacity", "0");
        document.set_style(target, "transform", "translateY(30px)");
        document.set_style(
            target,
            "transition",
            "opacity 0.8s ease-out, transform 0.8s ease-out",
        );
    }
    // Two frames so the start state is painted before the transition begins.
    page.request_animation_frame(move |page: &mut Page| {
        page.request_animation_frame(move |page: &mut Page| {
            let document = page.document_mut();
            document.set_style(target, "opacity", "1");
            document.set_style(target, "transform", "translateY(0)");
        });
    });
}
