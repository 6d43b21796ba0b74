//! Selectors Level 3 subset used by the page markup contract.
//! Reference: <https://www.w3.org/TR/selectors-3/>
//!
//! Supported:
//! - Type, class, id and universal selectors
//! - Attribute presence, `=`, `^=`, `*=` and `$=` matching
//! - `:not()` with a compound argument
//! - Combinators: descendant, child, adjacent sibling, general sibling
//!
//! Unknown pseudo-classes are parsed and treated as always matching so a
//! lenient selector never hides an element that the rest of the selector matches.

mod matcher;
mod parser;

pub use matcher::{matches_complex, matches_compound, matches_selector_list};
pub use parser::{parse_complex_selector, parse_selector_list};

/// An adapter that abstracts DOM access for selector matching.
/// Implement this for your DOM layer.
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Parent element if any.
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Previous sibling element (skip non-elements if your DOM has mixed nodes).
    fn previous_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Tag name in ASCII lowercase (per HTML parsing conventions).
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// Returns Some(id) if the element has an id attribute, else None.
    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    /// True if the element has the given class token.
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    /// Returns the attribute value if present.
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;
}

/// How an attribute selector compares the attribute value.
/// Selectors Level 3 §6.3.1 and §6.3.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrOperator {
    /// `[attr]`
    Exists,
    /// `[attr=value]`
    Equals,
    /// `[attr^=value]`
    Prefix,
    /// `[attr*=value]`
    Substring,
    /// `[attr$=value]`
    Suffix,
}

impl AttrOperator {
    /// Compare an attribute value against the selector operand.
    /// Empty operands never match for the substring family (§6.3.2).
    #[inline]
    pub fn test(self, actual: &str, expected: &str) -> bool {
        match self {
            Self::Exists => true,
            Self::Equals => actual == expected,
            Self::Prefix => !expected.is_empty() && actual.starts_with(expected),
            Self::Substring => !expected.is_empty() && actual.contains(expected),
            Self::Suffix => !expected.is_empty() && actual.ends_with(expected),
        }
    }
}

/// Simple selectors (subset).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// Type selector, lowercased.
    Type(String),
    /// Class selector.
    Class(String),
    /// ID selector.
    IdSelector(String),
    /// Attribute selector with its comparison operator.
    Attr {
        name: String,
        operator: AttrOperator,
        value: String,
    },
    /// `:not(compound)`.
    Negation(CompoundSelector),
    /// Universal selector `*`, also used for unsupported pseudo-classes.
    Universal,
}

/// A compound selector is a sequence of simple selectors (no combinators).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// Combinators between compounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// A complex selector is one or more compounds separated by combinators.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ComplexSelector {
    pub first: CompoundSelector,
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

/// A selector list separated by commas.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// True when parsing produced no selectors at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}
