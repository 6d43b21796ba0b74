//! Element tree storage, id index and mutation journal.

use crate::{DOMUpdate, InlineStyle, NodeKey, NodeKind, Rect};
use core::mem;
use std::collections::{BTreeMap, HashMap};

/// Per-node state.
#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    attrs: BTreeMap<String, String>,
    style: InlineStyle,
    layout: Rect,
    /// Live `value` property; `None` falls back to the `value` attribute.
    value: Option<String>,
    /// Live `checked` property; `None` falls back to the `checked` attribute.
    checked: Option<bool>,
    /// Image decode state (`img.complete`).
    complete: bool,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attrs: BTreeMap::new(),
            style: InlineStyle::default(),
            layout: Rect::default(),
            value: None,
            checked: None,
            complete: true,
        }
    }

    fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            NodeKind::Document | NodeKind::Text { .. } => None,
        }
    }
}

/// The document: nodes by key plus lookup indices.
///
/// A fresh document already contains `html`, `head` and `body`. Mutations on
/// unknown keys are ignored so callers never have to guard every write.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: HashMap<NodeKey, NodeData>,
    next_key: u64,
    /// id attribute -> element, first connected-or-not writer wins until removed.
    id_index: HashMap<String, NodeKey>,
    html: NodeKey,
    head: NodeKey,
    body: NodeKey,
    journal: Vec<DOMUpdate>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodeKey::ROOT, NodeData::new(NodeKind::Document));
        let mut document = Self {
            nodes,
            next_key: 1,
            id_index: HashMap::new(),
            html: NodeKey::ROOT,
            head: NodeKey::ROOT,
            body: NodeKey::ROOT,
            journal: Vec::new(),
        };
        document.html = document.create_element("html");
        document.head = document.create_element("head");
        document.body = document.create_element("body");
        document.append_child(NodeKey::ROOT, document.html);
        document.append_child(document.html, document.head);
        document.append_child(document.html, document.body);
        document.journal.clear();
        document
    }

    #[inline]
    pub const fn head(&self) -> NodeKey {
        self.head
    }

    #[inline]
    pub const fn body(&self) -> NodeKey {
        self.body
    }

    #[inline]
    pub const fn document_element(&self) -> NodeKey {
        self.html
    }

    fn mint(&mut self) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1);
        key
    }

    /// Create a detached element. Tags are stored lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeKey {
        let key = self.mint();
        self.nodes.insert(
            key,
            NodeData::new(NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            }),
        );
        key
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeKey {
        let key = self.mint();
        self.nodes.insert(
            key,
            NodeData::new(NodeKind::Text {
                text: text.to_owned(),
            }),
        );
        key
    }

    #[inline]
    pub fn exists(&self, node: NodeKey) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn kind(&self, node: NodeKey) -> Option<&NodeKind> {
        self.nodes.get(&node).map(|data| &data.kind)
    }

    /// Lowercase tag name for elements.
    pub fn tag_name(&self, node: NodeKey) -> Option<&str> {
        self.nodes.get(&node).and_then(NodeData::tag)
    }

    #[inline]
    pub fn is_element(&self, node: NodeKey) -> bool {
        self.tag_name(node).is_some()
    }

    pub fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        self.nodes.get(&node).and_then(|data| data.parent)
    }

    /// Nearest ancestor that is an element.
    pub fn parent_element(&self, node: NodeKey) -> Option<NodeKey> {
        self.parent(node).filter(|parent| self.is_element(*parent))
    }

    pub fn children(&self, node: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(&node)
            .map_or(&[], |data| data.children.as_slice())
    }

    /// Element children only.
    pub fn element_children(&self, node: NodeKey) -> Vec<NodeKey> {
        self.children(node)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    pub fn previous_element_sibling(&self, node: NodeKey) -> Option<NodeKey> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|sibling| *sibling == node)?;
        siblings
            .get(..position)?
            .iter()
            .rev()
            .copied()
            .find(|sibling| self.is_element(*sibling))
    }

    /// Inclusive ancestry test (`Node.contains`).
    pub fn contains(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// True when the node is attached under the document node.
    #[inline]
    pub fn is_connected(&self, node: NodeKey) -> bool {
        self.exists(node) && self.contains(NodeKey::ROOT, node)
    }

    /// Descendants of `scope` in document (pre-)order, `scope` excluded.
    pub fn descendants(&self, scope: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Append `child` as the last child of `parent`, detaching it first if needed.
    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) {
        if parent == child || !self.exists(parent) || !self.exists(child) {
            return;
        }
        if self.contains(child, parent) {
            log::warn!("append_child: refusing to create a cycle ({child:?} contains {parent:?})");
            return;
        }
        self.detach(child);
        let pos = self.children(parent).len();
        if let Some(data) = self.nodes.get_mut(&parent) {
            data.children.push(child);
        }
        if let Some(data) = self.nodes.get_mut(&child) {
            data.parent = Some(parent);
        }
        let update = match self.kind(child) {
            Some(NodeKind::Element { tag }) => Some(DOMUpdate::InsertElement {
                parent,
                node: child,
                tag: tag.clone(),
                pos,
            }),
            Some(NodeKind::Text { text }) => Some(DOMUpdate::InsertText {
                parent,
                node: child,
                text: text.clone(),
                pos,
            }),
            Some(NodeKind::Document) | None => None,
        };
        if let Some(update) = update {
            self.journal.push(update);
        }
    }

    fn detach(&mut self, node: NodeKey) {
        if let Some(parent) = self.nodes.get_mut(&node).and_then(|data| data.parent.take())
            && let Some(parent_data) = self.nodes.get_mut(&parent)
        {
            parent_data.children.retain(|child| *child != node);
        }
    }

    /// Remove a node and its subtree from the document (`Element.remove`).
    pub fn remove(&mut self, node: NodeKey) {
        if node == NodeKey::ROOT || !self.exists(node) {
            return;
        }
        self.detach(node);
        self.remove_recursively(node);
        self.journal.push(DOMUpdate::RemoveNode { node });
    }

    fn remove_recursively(&mut self, node: NodeKey) {
        let Some(data) = self.nodes.remove(&node) else {
            return;
        };
        for child in data.children {
            self.remove_recursively(child);
        }
        if let Some(id) = data.attrs.get("id")
            && self.id_index.get(id) == Some(&node)
        {
            self.id_index.remove(id);
        }
    }

    // Attributes

    pub fn attr(&self, node: NodeKey, name: &str) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|data| data.attrs.get(name))
            .map(String::as_str)
    }

    #[inline]
    pub fn has_attr(&self, node: NodeKey, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn attributes(&self, node: NodeKey) -> Vec<(&str, &str)> {
        self.nodes.get(&node).map_or_else(Vec::new, |data| {
            data.attrs
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect()
        })
    }

    pub fn set_attr(&mut self, node: NodeKey, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        let Some(data) = self.nodes.get_mut(&node) else {
            return;
        };
        if data.tag().is_none() {
            return;
        }
        let previous = data.attrs.insert(name.clone(), value.to_owned());
        if name == "id" {
            if let Some(old) = previous
                && self.id_index.get(&old) == Some(&node)
            {
                self.id_index.remove(&old);
            }
            self.id_index.entry(value.to_owned()).or_insert(node);
        }
        self.journal.push(DOMUpdate::SetAttr {
            node,
            name,
            value: value.to_owned(),
        });
    }

    pub fn remove_attr(&mut self, node: NodeKey, name: &str) {
        let Some(previous) = self
            .nodes
            .get_mut(&node)
            .and_then(|data| data.attrs.remove(name))
        else {
            return;
        };
        if name == "id" && self.id_index.get(&previous) == Some(&node) {
            self.id_index.remove(&previous);
        }
        self.journal.push(DOMUpdate::RemoveAttr {
            node,
            name: name.to_owned(),
        });
    }

    #[inline]
    pub fn element_id(&self, node: NodeKey) -> Option<&str> {
        self.attr(node, "id")
    }

    /// `document.getElementById`; only connected elements are returned.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeKey> {
        self.id_index
            .get(id)
            .copied()
            .filter(|node| self.is_connected(*node))
    }

    // Classes

    pub fn has_class(&self, node: NodeKey, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|token| token == class))
    }

    pub fn add_class(&mut self, node: NodeKey, class: &str) {
        if !self.is_element(node) || self.has_class(node, class) {
            return;
        }
        let mut classes: Vec<&str> = self
            .attr(node, "class")
            .map(|existing| existing.split_ascii_whitespace().collect())
            .unwrap_or_default();
        classes.push(class);
        let joined = classes.join(" ");
        self.set_attr(node, "class", &joined);
    }

    pub fn remove_class(&mut self, node: NodeKey, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        let joined = self
            .attr(node, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
            .filter(|token| *token != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(node, "class", &joined);
    }

    // Inline style

    pub fn style(&self, node: NodeKey, property: &str) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|data| data.style.get(property))
    }

    pub fn inline_style(&self, node: NodeKey) -> Option<&InlineStyle> {
        self.nodes.get(&node).map(|data| &data.style)
    }

    pub fn set_style(&mut self, node: NodeKey, property: &str, value: &str) {
        let Some(data) = self.nodes.get_mut(&node) else {
            return;
        };
        data.style.set(property, value);
        self.journal.push(DOMUpdate::SetStyle {
            node,
            property: property.to_owned(),
            value: value.to_owned(),
        });
    }

    /// Replace all inline declarations (`style.cssText = ...`).
    pub fn set_css_text(&mut self, node: NodeKey, css_text: &str) {
        let Some(data) = self.nodes.get_mut(&node) else {
            return;
        };
        data.style.clear();
        for (property, value) in InlineStyle::parse_declarations(css_text) {
            self.set_style(node, &property, &value);
        }
    }

    // Text

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeKey) -> String {
        if let Some(NodeKind::Text { text }) = self.kind(node) {
            return text.clone();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|descendant| match self.kind(descendant) {
                Some(NodeKind::Text { text }) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Remove all children and insert a single text node at position 0.
    pub fn set_text_content(&mut self, node: NodeKey, text: &str) {
        if !self.is_element(node) {
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
    }

    pub fn clear_children(&mut self, node: NodeKey) {
        for child in self.children(node).to_vec() {
            self.remove(child);
        }
    }

    // Layout

    /// Layout box in document coordinates; detached or unknown nodes report an empty box.
    pub fn layout(&self, node: NodeKey) -> Rect {
        self.nodes
            .get(&node)
            .map(|data| data.layout)
            .unwrap_or_default()
    }

    pub fn set_layout(&mut self, node: NodeKey, rect: Rect) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.layout = rect;
        }
    }

    #[inline]
    pub fn offset_height(&self, node: NodeKey) -> f64 {
        self.layout(node).height
    }

    // Form controls and media

    /// `type` attribute, lowercased, defaulting to `text` for inputs.
    pub fn input_type(&self, node: NodeKey) -> Option<String> {
        let tag = self.tag_name(node)?;
        match self.attr(node, "type") {
            Some(kind) => Some(kind.to_ascii_lowercase()),
            None if tag == "input" => Some(String::from("text")),
            None if tag == "button" => Some(String::from("submit")),
            None => None,
        }
    }

    /// Current value; checkboxes and radios default to `on` like browsers do.
    pub fn value(&self, node: NodeKey) -> String {
        let Some(data) = self.nodes.get(&node) else {
            return String::new();
        };
        if let Some(value) = &data.value {
            return value.clone();
        }
        if let Some(value) = data.attrs.get("value") {
            return value.clone();
        }
        match data.tag() {
            Some("textarea") => return self.text_content(node),
            Some("select") => return self.selected_option_value(node),
            _ => {}
        }
        match self.input_type(node).as_deref() {
            Some("checkbox" | "radio") => String::from("on"),
            _ => String::new(),
        }
    }

    /// First `option[selected]`, else the first option; its `value` or trimmed text.
    fn selected_option_value(&self, select: NodeKey) -> String {
        let options: Vec<NodeKey> = self
            .descendants(select)
            .into_iter()
            .filter(|node| self.tag_name(*node) == Some("option"))
            .collect();
        let chosen = options
            .iter()
            .find(|option| self.has_attr(**option, "selected"))
            .or_else(|| options.first());
        chosen.map_or_else(String::new, |option| {
            self.attr(*option, "value").map_or_else(
                || self.text_content(*option).trim().to_owned(),
                str::to_owned,
            )
        })
    }

    pub fn set_value(&mut self, node: NodeKey, value: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.value = Some(value.to_owned());
        }
    }

    pub fn checked(&self, node: NodeKey) -> bool {
        self.nodes.get(&node).is_some_and(|data| {
            data.checked
                .unwrap_or_else(|| data.attrs.contains_key("checked"))
        })
    }

    pub fn set_checked(&mut self, node: NodeKey, checked: bool) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.checked = Some(checked);
        }
    }

    #[inline]
    pub fn is_disabled(&self, node: NodeKey) -> bool {
        self.has_attr(node, "disabled")
    }

    pub fn set_disabled(&mut self, node: NodeKey, disabled: bool) {
        if disabled {
            self.set_attr(node, "disabled", "");
        } else {
            self.remove_attr(node, "disabled");
        }
    }

    /// `img.complete`.
    pub fn is_complete(&self, node: NodeKey) -> bool {
        self.nodes.get(&node).is_some_and(|data| data.complete)
    }

    pub fn set_complete(&mut self, node: NodeKey, complete: bool) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.complete = complete;
        }
    }

    // Journal

    /// Every mutation since creation (or the last [`Document::take_updates`]).
    #[inline]
    pub fn updates(&self) -> &[DOMUpdate] {
        &self.journal
    }

    pub fn take_updates(&mut self) -> Vec<DOMUpdate> {
        mem::take(&mut self.journal)
    }
}
