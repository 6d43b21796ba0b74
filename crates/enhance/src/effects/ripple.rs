use crate::config::EnhanceConfig;
use anyhow::Result;
use dom::NodeKey;
use page_host::{Event, EventKind, EventTarget, Page, Scheduler};

pub const RIPPLE_SELECTOR: &str = ".c-button, .btn, .c-nav__link";

fn spawn(page: &mut Page, host: NodeKey, event: &Event, duration_ms: u64) {
    let rect = page.client_rect(host);
    let (x, y) = (event.client_x - rect.x, event.client_y - rect.y);
    let ripple = append_ripple(page, host, x, y);
    let size = format!("{}px", rect.width.max(rect.height) * 2.0);
    page.request_animation_frame(move |page: &mut Page| {
        let document = page.document_mut();
        if document.exists(ripple) {
            document.set_style(ripple, "width", &size);
            document.set_style(ripple, "height", &size);
            document.set_style(ripple, "opacity", "0");
        }
    });
    page.set_timeout(
        duration_ms,
        Box::new(move |page: &mut Page| page.document_mut().remove(ripple)),
    );
}

fn append_ripple(page: &mut Page, host: NodeKey, x: f64, y: f64) -> NodeKey {
    let (left, top) = (format!("{x}px"), format!("{y}px"));
    let document = page.document_mut();
    let ripple = document.create_element("span");
    for (property, value) in [
        ("position", "absolute"),
        ("left", left.as_str()),
        ("top", top.as_str()),
        ("width", "0"),
        ("height", "0"),
        ("border-radius", "50%"),
        ("background", "rgba(255, 255, 255, 0.5)"),
        ("transform", "translate(-50%, -50%)"),
        ("pointer-events", "none"),
        (
            "transition",
            "width 0.6s ease-out, height 0.6s ease-out, opacity 0.6s ease-out",
        ),
        ("opacity", "1"),
    ] {
        document.set_style(ripple, property, value);
    }
    document.set_style(host, "position", "relative");
    document.set_style(host, "overflow", "hidden");
    document.append_child(host, ripple);
    ripple
}

pub fn init(page: &mut Page, config: &EnhanceConfig) -> Result<()> {
    let duration_ms = config.ripple_duration_ms;
    for host in page.document().query_selector_all(RIPPLE_SELECTOR) {
        page.on(EventTarget::Node(host), EventKind::Click, move |page, event| {
            spawn(page, host, event, duration_ms);
        });
    }
    Ok(())
}
