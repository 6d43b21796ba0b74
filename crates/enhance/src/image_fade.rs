//! Fade images in once they are visible and decoded.

use crate::config::EnhanceConfig;
use crate::viewport::{ObservationMode, ViewportTrigger, VisibilityPolicy};
use anyhow::Result;
use dom::NodeKey;
use page_host::{EventKind, EventTarget, Page};
use std::rc::Rc;

fn show(page: &mut Page, img: NodeKey) {
    let document = page.document_mut();
    document.set_style(img, "opacity", "1");
    document.set_style(img, "transform", "scale(1)");
}

pub fn init(page: &mut Page, config: &EnhanceConfig, viewport: &ViewportTrigger) -> Result<()> {
    let images = page.document().query_selector_all("img");
    for img in &images {
        let document = page.document_mut();
        document.set_style(*img, "opacity", "0");
        document.set_style(*img, "transform", "scale(0.95)");
        document.set_style(
            *img,
            "transition",
            "opacity 0.8s ease-out, transform 0.8s ease-out",
        );
    }
    let policy = VisibilityPolicy::threshold(config.image_fade_threshold);
    for img in images {
        viewport.observe(
            page,
            img,
            policy,
            ObservationMode::OneShot,
            Rc::new(|page: &mut Page, node: NodeKey| {
                if page.document().is_complete(node) {
                    show(page, node);
                } else {
                    page.on(EventTarget::Node(node), EventKind::Load, move |page, _| {
                        show(page, node);
                    });
                }
            }),
        );
    }
    Ok(())
}
