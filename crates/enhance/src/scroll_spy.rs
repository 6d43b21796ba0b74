//! Highlight the nav link of the section in the detection band.

use crate::config::EnhanceConfig;
use crate::navigation::SharedNavigation;
use crate::viewport::{ObservationMode, ViewportTrigger, VisibilityPolicy};
use anyhow::{Context as _, Result};
use dom::NodeKey;
use log::{debug, trace};
use page_host::{Page, RootMargin};
use std::rc::Rc;

/// Observe every `[id]` section that a `.c-nav__link` points at.
pub fn init(
    page: &mut Page,
    config: &EnhanceConfig,
    viewport: &ViewportTrigger,
    shared: &SharedNavigation,
) -> Result<()> {
    let links = page.document().query_selector_all(".c-nav__link");
    if links.is_empty() {
        debug!("scroll-spy: no nav links");
        return Ok(());
    }
    let targeted: Vec<String> = links
        .iter()
        .filter_map(|link| page.document().attr(*link, "href")?.strip_prefix('#').map(str::to_owned))
        .collect();
    let sections: Vec<NodeKey> = page
        .document()
        .query_selector_all("[id]")
        .into_iter()
        .filter(|section| {
            page.document()
                .element_id(*section)
                .is_some_and(|id| !id.is_empty() && targeted.iter().any(|href| href == id))
        })
        .collect();
    if sections.is_empty() {
        debug!("scroll-spy: no linked sections");
        return Ok(());
    }

    let margin = RootMargin::parse(&config.scroll_spy_margin)
        .context("scroll-spy: invalid detection margin")?;
    let policy = VisibilityPolicy::new(margin, config.scroll_spy_threshold);
    let links = Rc::new(links);
    for section in sections {
        let links = Rc::clone(&links);
        let state = Rc::clone(shared);
        viewport.observe(
            page,
            section,
            policy,
            ObservationMode::Persistent,
            Rc::new(move |page: &mut Page, target: NodeKey| {
                let Some(id) = page.document().element_id(target).map(str::to_owned) else {
                    return;
                };
                let href = format!("#{id}");
                let document = page.document_mut();
                for link in links.iter().copied() {
                    document.remove_class(link, "is-active");
                    document.remove_attr(link, "aria-current");
                    if document.attr(link, "href") == Some(href.as_str()) {
                        document.add_class(link, "is-active");
                        document.set_attr(link, "aria-current", "page");
                    }
                }
                trace!("scroll-spy: active section {id}");
                state.borrow_mut().active_section = Some(id);
            }),
        );
    }
    Ok(())
}
