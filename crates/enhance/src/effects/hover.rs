use anyhow::Result;
use dom::NodeKey;
use page_host::{EventKind, EventTarget, Page};

const REST: &str = "translateY(0) scale(1)";

/// Enter sets `transition` and `transform`; leave returns to rest.
fn lift(page: &mut Page, node: NodeKey, transition: &'static str, transform: &'static str) {
    page.on(EventTarget::Node(node), EventKind::MouseEnter, move |page, _| {
        let document = page.document_mut();
        document.set_style(node, "transition", transition);
        document.set_style(node, "transform", transform);
    });
    page.on(EventTarget::Node(node), EventKind::MouseLeave, move |page, _| {
        page.document_mut().set_style(node, "transform", REST);
    });
}

pub fn init(page: &mut Page) -> Result<()> {
    for card in page.document().query_selector_all(".c-card, .card, .card-hover") {
        lift(
            page,
            card,
            "all 0.4s cubic-bezier(0.4, 0, 0.2, 1)",
            "translateY(-8px) scale(1.02)",
        );
    }
    for button in page.document().query_selector_all(".c-button, .btn") {
        lift(page, button, "all 0.3s ease-out", "translateY(-3px) scale(1.05)");
    }
    for link in page
        .document()
        .query_selector_all("a:not(.c-button):not(.btn)")
    {
        page.on(EventTarget::Node(link), EventKind::MouseEnter, move |page, _| {
            page.document_mut()
                .set_style(link, "transition", "all 0.3s ease-out");
        });
    }
    Ok(())
}
