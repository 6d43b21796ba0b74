use crate::config::EnhanceConfig;
use anyhow::Result;
use log::trace;
use page_host::{EventKind, EventTarget, Page, ScrollBehavior};

/// Height of `.l-header`, or `fallback` when there is none.
pub fn header_offset(page: &Page, fallback: f64) -> f64 {
    page.document()
        .query_selector(".l-header")
        .map_or(fallback, |header| page.document().offset_height(header))
}

pub fn init(page: &mut Page, config: &EnhanceConfig) -> Result<()> {
    let fallback = config.default_header_height_px;
    for link in page.document().query_selector_all(r##"a[href^="#"]"##) {
        page.on(EventTarget::Node(link), EventKind::Click, move |page, event| {
            let Some(id) = page
                .document()
                .attr(link, "href")
                .and_then(|href| href.strip_prefix('#'))
            else {
                return;
            };
            if id.is_empty() || id == "!" {
                return;
            }
            let Some(target) = page.document().get_element_by_id(id) else {
                return;
            };
            event.prevent_default();
            let top = page.client_rect(target).y + page.scroll_y() - header_offset(page, fallback);
            trace!("smooth-scroll: {link:?} -> {top}");
            page.scroll_to(top, ScrollBehavior::Smooth);
        });
    }
    Ok(())
}
