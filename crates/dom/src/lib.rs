//! In-memory document model the page enhancements read and write.
//!
//! The document keeps an element tree with attributes, inline styles, text,
//! form control state and layout boxes. Every mutation is appended to a
//! journal of [`DOMUpdate`] values so callers can observe exactly which side
//! effects a piece of code produced.

mod document;
mod geometry;
mod query;
mod style;

pub use document::Document;
pub use geometry::Rect;
pub use style::InlineStyle;

/// A 64-bit stable key for DOM nodes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl NodeKey {
    /// The document node (always present).
    pub const ROOT: Self = Self(0);
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element { tag: String },
    Text { text: String },
}

/// A mutation applied to the document, recorded in order.
#[derive(Debug, Clone, PartialEq)]
pub enum DOMUpdate {
    InsertElement {
        parent: NodeKey,
        node: NodeKey,
        tag: String,
        pos: usize,
    },
    InsertText {
        parent: NodeKey,
        node: NodeKey,
        text: String,
        pos: usize,
    },
    SetAttr {
        node: NodeKey,
        name: String,
        value: String,
    },
    RemoveAttr {
        node: NodeKey,
        name: String,
    },
    /// An inline style write; an empty value removes the property.
    SetStyle {
        node: NodeKey,
        property: String,
        value: String,
    },
    RemoveNode {
        node: NodeKey,
    },
}
