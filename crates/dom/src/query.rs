//! Selector queries over the document (`querySelectorAll`, `matches`, `closest`).

use crate::{Document, NodeKey};
use css_selectors::{ElementAdapter, SelectorList, matches_selector_list, parse_selector_list};

impl ElementAdapter for Document {
    type Handle = NodeKey;

    fn parent(&self, element: NodeKey) -> Option<NodeKey> {
        self.parent_element(element)
    }

    fn previous_sibling_element(&self, element: NodeKey) -> Option<NodeKey> {
        self.previous_element_sibling(element)
    }

    fn tag_name(&self, element: NodeKey) -> &str {
        Self::tag_name(self, element).unwrap_or_default()
    }

    fn element_id(&self, element: NodeKey) -> Option<&str> {
        Self::element_id(self, element)
    }

    fn has_class(&self, element: NodeKey, class: &str) -> bool {
        Self::has_class(self, element, class)
    }

    fn attr(&self, element: NodeKey, name: &str) -> Option<&str> {
        Self::attr(self, element, name)
    }
}

impl Document {
    /// All elements under `scope` matching `selectors`, in document order.
    pub fn query_selector_all_in(&self, scope: NodeKey, selectors: &str) -> Vec<NodeKey> {
        let list = parse_selector_list(selectors);
        self.select_in(scope, &list)
    }

    /// All elements in the document matching `selectors`, in document order.
    #[inline]
    pub fn query_selector_all(&self, selectors: &str) -> Vec<NodeKey> {
        self.query_selector_all_in(NodeKey::ROOT, selectors)
    }

    /// First match under `scope`.
    pub fn query_selector_in(&self, scope: NodeKey, selectors: &str) -> Option<NodeKey> {
        let list = parse_selector_list(selectors);
        self.descendants(scope)
            .into_iter()
            .find(|node| self.is_element(*node) && matches_selector_list(self, *node, &list))
    }

    /// First match in the document.
    #[inline]
    pub fn query_selector(&self, selectors: &str) -> Option<NodeKey> {
        self.query_selector_in(NodeKey::ROOT, selectors)
    }

    /// Match a pre-parsed selector list under `scope`.
    pub fn select_in(&self, scope: NodeKey, list: &SelectorList) -> Vec<NodeKey> {
        if list.is_empty() {
            return Vec::new();
        }
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.is_element(*node) && matches_selector_list(self, *node, list))
            .collect()
    }

    /// `Element.matches`.
    pub fn matches(&self, node: NodeKey, selectors: &str) -> bool {
        self.is_element(node) && matches_selector_list(self, node, &parse_selector_list(selectors))
    }

    /// `Element.closest`: the node itself or its nearest matching ancestor.
    pub fn closest(&self, node: NodeKey, selectors: &str) -> Option<NodeKey> {
        let list = parse_selector_list(selectors);
        let mut current = Some(node).filter(|candidate| self.is_element(*candidate));
        while let Some(candidate) = current {
            if matches_selector_list(self, candidate, &list) {
                return Some(candidate);
            }
            current = self.parent_element(candidate);
        }
        None
    }
}
