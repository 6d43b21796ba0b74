use anyhow::Result;
use dom::{Document, NodeKey};
use log::debug;
use page_host::Page;

/// Logo images, hero images and `[data-critical]` images load eagerly.
pub fn is_critical(document: &Document, img: NodeKey) -> bool {
    document.has_class(img, "c-logo__img")
        || document.closest(img, ".l-hero").is_some()
        || document.has_attr(img, "data-critical")
}

pub fn init(page: &mut Page) -> Result<()> {
    let document = page.document();
    let mut deferred: Vec<NodeKey> = document
        .query_selector_all("img:not([loading])")
        .into_iter()
        .filter(|img| !is_critical(document, *img))
        .collect();
    deferred.extend(document.query_selector_all("video:not([loading])"));
    debug!("lazy-loading: deferring {} media elements", deferred.len());
    for node in deferred {
        page.document_mut().set_attr(node, "loading", "lazy");
    }
    Ok(())
}
