use crate::config::EnhanceConfig;
use anyhow::Result;
use dom::NodeKey;
use log::{debug, info};
use page_host::{EventKind, EventTarget, Page, Scheduler};

fn show(page: &mut Page, banner: NodeKey) {
    page.document_mut().set_style(banner, "display", "block");
    page.request_animation_frame(move |page: &mut Page| {
        page.document_mut()
            .set_style(banner, "transform", "translateY(0)");
    });
}

fn hide(page: &mut Page, banner: NodeKey, delay_ms: u64) {
    page.document_mut()
        .set_style(banner, "transform", "translateY(100%)");
    page.set_timeout(
        delay_ms,
        Box::new(move |page: &mut Page| {
            page.document_mut().set_style(banner, "display", "none");
        }),
    );
}

/// Show `#cookie-banner` until the visitor accepts or declines.
pub fn init(page: &mut Page, config: &EnhanceConfig) -> Result<()> {
    let Some(banner) = page.document().get_element_by_id("cookie-banner") else {
        debug!("cookie-banner: #cookie-banner not found");
        return Ok(());
    };
    let decided = page
        .storage_get(&config.consent_key)
        .is_some_and(|value| !value.is_empty());
    if !decided {
        page.set_timeout(
            config.cookie_show_delay_ms,
            Box::new(move |page: &mut Page| show(page, banner)),
        );
    }
    let hide_ms = config.cookie_hide_delay_ms;
    for (id, decision) in [("cookie-accept", "true"), ("cookie-decline", "false")] {
        let Some(button) = page.document().get_element_by_id(id) else {
            continue;
        };
        let key = config.consent_key.clone();
        page.on(EventTarget::Node(button), EventKind::Click, move |page, _| {
            info!("cookie-banner: consent {decision}");
            page.storage_set(&key, decision);
            hide(page, banner, hide_ms);
        });
    }
    Ok(())
}
