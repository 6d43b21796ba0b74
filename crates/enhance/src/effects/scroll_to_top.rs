use crate::config::EnhanceConfig;
use crate::rate_limit::Throttler;
use anyhow::Result;
use dom::NodeKey;
use page_host::{EventKind, EventTarget, Page, ScrollBehavior};

pub const BUTTON_CLASS: &str = "c-scroll-top";

const BUTTON_CSS: &str = "position: fixed; bottom: 30px; right: 30px; width: 50px; height: 50px; \
     background: linear-gradient(135deg, var(--color-accent), var(--color-accent-dark)); \
     color: var(--color-text-dark); border: none; border-radius: 50%; font-size: 24px; \
     font-weight: bold; cursor: pointer; opacity: 0; visibility: hidden; \
     transition: all 0.4s ease-out; z-index: 999; box-shadow: var(--shadow-lg);";

fn append_button(page: &mut Page) -> NodeKey {
    let document = page.document_mut();
    let button = document.create_element("button");
    document.set_text_content(button, "↑");
    document.set_attr(button, "type", "button");
    document.set_attr(button, "class", BUTTON_CLASS);
    document.set_attr(button, "aria-label", "Nach oben scrollen");
    document.set_css_text(button, BUTTON_CSS);
    let body = document.body();
    document.append_child(body, button);
    button
}

/// Append the hidden button to body and wire its scroll, click and hover handlers.
pub fn init(page: &mut Page, config: &EnhanceConfig) -> Result<()> {
    let button = append_button(page);

    let show_after = config.scroll_to_top_offset_px;
    let on_scroll = Throttler::new(config.scroll_to_top_throttle_ms, move |page: &mut Page, (): ()| {
        let shown = page.scroll_y() > show_after;
        let document = page.document_mut();
        let (opacity, visibility, transform) = if shown {
            ("1", "visible", "translateY(0)")
        } else {
            ("0", "hidden", "translateY(20px)")
        };
        document.set_style(button, "opacity", opacity);
        document.set_style(button, "visibility", visibility);
        document.set_style(button, "transform", transform);
    });
    page.on(EventTarget::Window, EventKind::Scroll, move |page, _| {
        on_scroll.call(page, ());
    });

    page.on(EventTarget::Node(button), EventKind::Click, |page, _| {
        page.scroll_to(0.0, ScrollBehavior::Smooth);
    });
    page.on(EventTarget::Node(button), EventKind::MouseEnter, move |page, _| {
        let document = page.document_mut();
        document.set_style(button, "transform", "translateY(-5px) scale(1.1)");
        document.set_style(button, "box-shadow", "var(--shadow-hover)");
    });
    page.on(EventTarget::Node(button), EventKind::MouseLeave, move |page, _| {
        let document = page.document_mut();
        document.set_style(button, "transform", "translateY(0) scale(1)");
        document.set_style(button, "box-shadow", "var(--shadow-lg)");
    });
    Ok(())
}
