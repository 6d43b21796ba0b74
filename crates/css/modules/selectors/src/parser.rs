//! Selector parsing.
//!
//! Parsing is permissive: malformed input yields the selectors that could be
//! read rather than an error, matching how the markup contract is queried.

use crate::{
    AttrOperator, Combinator, ComplexSelector, CompoundSelector, SelectorList, SimpleSelector,
};
use core::mem::take;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Internal tokenizer token kinds.
pub enum Tok {
    /// An explicit combinator (`>`, `+`, `~`).
    Combinator(Combinator),
    /// A run of whitespace, a descendant combinator unless next to an explicit one.
    Whitespace,
    /// A simple selector token.
    Simple(SimpleSelector),
}

/// Tokenizer over a selector string.
pub struct SelectorTokenizer<'input> {
    /// Underlying bytes for the selector.
    input_bytes: &'input [u8],
    /// Current cursor index into `input_bytes`.
    index: usize,
}

impl<'input> SelectorTokenizer<'input> {
    /// Construct a tokenizer from input.
    #[inline]
    pub(crate) const fn new(input: &'input str) -> Self {
        Self {
            input_bytes: input.as_bytes(),
            index: 0,
        }
    }

    /// Return the next selector token, if any.
    pub(crate) fn next_token(&mut self) -> Option<Tok> {
        let &current = self.input_bytes.get(self.index)?;
        if current.is_ascii_whitespace() {
            self.skip_spaces();
            return Some(Tok::Whitespace);
        }
        Some(match current {
            b'*' => {
                self.bump();
                Tok::Simple(SimpleSelector::Universal)
            }
            b'.' => {
                self.bump();
                Tok::Simple(SimpleSelector::Class(self.consume_ident(false)))
            }
            b'#' => {
                self.bump();
                Tok::Simple(SimpleSelector::IdSelector(self.consume_ident(false)))
            }
            b'[' => Tok::Simple(self.consume_attr()),
            b':' => Tok::Simple(self.consume_pseudo()),
            b'>' => {
                self.bump();
                Tok::Combinator(Combinator::Child)
            }
            b'+' => {
                self.bump();
                Tok::Combinator(Combinator::AdjacentSibling)
            }
            b'~' => {
                self.bump();
                Tok::Combinator(Combinator::GeneralSibling)
            }
            _ => {
                let ident = self.consume_ident(true);
                if ident.is_empty() {
                    // Unknown byte: skip it so the tokenizer always makes progress.
                    self.bump();
                    Tok::Simple(SimpleSelector::Universal)
                } else {
                    Tok::Simple(SimpleSelector::Type(ident))
                }
            }
        })
    }

    #[inline]
    fn bump(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input_bytes.get(self.index).copied()
    }

    /// Consume an identifier of ASCII alphanumerics, `-`, `_` and non-ASCII bytes.
    fn consume_ident(&mut self, lowercase: bool) -> String {
        let start = self.index;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || !byte.is_ascii() {
                self.bump();
            } else {
                break;
            }
        }
        let slice = self.input_bytes.get(start..self.index).unwrap_or(&[]);
        let ident = String::from_utf8_lossy(slice).into_owned();
        if lowercase {
            ident.to_ascii_lowercase()
        } else {
            ident
        }
    }

    /// Parse `[name]`, `[name=value]`, `[name^=value]`, `[name*=value]` or `[name$=value]`.
    fn consume_attr(&mut self) -> SimpleSelector {
        self.bump();
        self.skip_spaces();
        let name = self.consume_ident(true);
        self.skip_spaces();
        let operator = match self.peek() {
            Some(b'=') => Some(AttrOperator::Equals),
            Some(b'^') => Some(AttrOperator::Prefix),
            Some(b'*') => Some(AttrOperator::Substring),
            Some(b'$') => Some(AttrOperator::Suffix),
            _ => None,
        };
        let (operator, value) = match operator {
            None => (AttrOperator::Exists, String::new()),
            Some(op) => {
                if op != AttrOperator::Equals {
                    self.bump();
                }
                // '='
                self.bump();
                self.skip_spaces();
                let value = match self.peek() {
                    Some(quote @ (b'"' | b'\'')) => {
                        self.bump();
                        self.consume_quoted_attr_value(quote)
                    }
                    _ => self.consume_unquoted_attr_value(),
                };
                (op, value)
            }
        };
        self.skip_spaces();
        if self.peek() == Some(b']') {
            self.bump();
        }
        SimpleSelector::Attr {
            name,
            operator,
            value,
        }
    }

    /// Parse a pseudo-class. Only `:not()` carries meaning.
    fn consume_pseudo(&mut self) -> SimpleSelector {
        while self.peek() == Some(b':') {
            self.bump();
        }
        let name = self.consume_ident(true);
        if self.peek() != Some(b'(') {
            return SimpleSelector::Universal;
        }
        self.bump();
        let start = self.index;
        let mut depth = 1_usize;
        while let Some(byte) = self.peek() {
            match byte {
                b'(' => depth = depth.saturating_add(1),
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            self.bump();
        }
        let argument = self
            .input_bytes
            .get(start..self.index)
            .map(String::from_utf8_lossy)
            .unwrap_or_default()
            .into_owned();
        if self.peek() == Some(b')') {
            self.bump();
        }
        if name == "not" {
            SimpleSelector::Negation(parse_complex_selector(argument.trim()).first)
        } else {
            SimpleSelector::Universal
        }
    }

    /// Consume an unquoted attribute value until whitespace or a closing bracket.
    fn consume_unquoted_attr_value(&mut self) -> String {
        let start = self.index;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_whitespace() || byte == b']' {
                break;
            }
            self.bump();
        }
        let slice = self.input_bytes.get(start..self.index).unwrap_or(&[]);
        String::from_utf8_lossy(slice).into_owned()
    }

    /// Consume a quoted attribute value until the matching quote byte.
    fn consume_quoted_attr_value(&mut self, quote: u8) -> String {
        let start = self.index;
        while matches!(self.peek(), Some(byte) if byte != quote) {
            self.bump();
        }
        let slice = self.input_bytes.get(start..self.index).unwrap_or(&[]);
        let out = String::from_utf8_lossy(slice).into_owned();
        if self.peek().is_some() {
            self.bump();
        }
        out
    }

    /// Skip ASCII whitespace.
    #[inline]
    fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(byte) if byte.is_ascii_whitespace()) {
            self.bump();
        }
    }
}

/// Split a selector list on commas that are not nested in brackets, parentheses or quotes.
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (offset, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(' | '[') => depth = depth.saturating_add(1),
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(input.get(start..offset).unwrap_or_default());
                start = offset + 1;
            }
            _ => {}
        }
    }
    parts.push(input.get(start..).unwrap_or_default());
    parts
}

/// Parse a selector list from CSS text.
pub fn parse_selector_list(input: &str) -> SelectorList {
    let mut list = SelectorList::default();
    for part in split_top_level(input) {
        let sel = parse_complex_selector(part.trim());
        if !sel.first.simples.is_empty() || !sel.rest.is_empty() {
            list.selectors.push(sel);
        }
    }
    list
}

/// Builder state for one complex selector.
#[derive(Default)]
struct ComplexBuilder {
    first: Option<CompoundSelector>,
    rest: Vec<(Combinator, CompoundSelector)>,
    current: CompoundSelector,
    /// Combinator joining the previous compound to `current`.
    next_combinator: Option<Combinator>,
}

impl ComplexBuilder {
    fn close_current(&mut self) {
        if self.current.simples.is_empty() {
            return;
        }
        let compound = take(&mut self.current);
        if self.first.is_none() {
            self.first = Some(compound);
        } else {
            let combinator = self
                .next_combinator
                .take()
                .unwrap_or(Combinator::Descendant);
            self.rest.push((combinator, compound));
        }
    }

    fn finish(mut self) -> ComplexSelector {
        self.close_current();
        ComplexSelector {
            first: self.first.unwrap_or_default(),
            rest: self.rest,
        }
    }
}

/// Parse one complex selector.
pub fn parse_complex_selector(input: &str) -> ComplexSelector {
    let mut tokens = SelectorTokenizer::new(input.trim());
    let mut builder = ComplexBuilder::default();

    while let Some(token) = tokens.next_token() {
        match token {
            Tok::Whitespace => {
                if !builder.current.simples.is_empty() {
                    builder.close_current();
                    builder.next_combinator = Some(Combinator::Descendant);
                }
            }
            Tok::Combinator(comb) => {
                builder.close_current();
                builder.next_combinator = Some(comb);
            }
            Tok::Simple(simple) => builder.current.simples.push(simple),
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_child_combinator_survives_surrounding_whitespace() {
        let sel = parse_complex_selector(".c-nav > .c-nav__list");
        assert_eq!(sel.rest.len(), 1);
        assert_eq!(sel.rest.first().map(|pair| pair.0), Some(Combinator::Child));
    }

    #[test]
    fn attribute_operators_are_distinguished() {
        let list = parse_selector_list(r##"a[href^="#"], a[href*=privacy], [data-count]"##);
        let operators: Vec<AttrOperator> = list
            .selectors
            .iter()
            .filter_map(|sel| {
                sel.first.simples.iter().find_map(|simple| match simple {
                    SimpleSelector::Attr { operator, .. } => Some(*operator),
                    _ => None,
                })
            })
            .collect();
        assert_eq!(
            operators,
            vec![AttrOperator::Prefix, AttrOperator::Substring, AttrOperator::Exists]
        );
    }

    #[test]
    fn negation_holds_a_compound() {
        let sel = parse_complex_selector("a:not(.c-button):not(.btn)");
        assert_eq!(sel.first.simples.len(), 3);
        assert!(matches!(
            sel.first.simples.get(1),
            Some(SimpleSelector::Negation(inner)) if inner.simples == vec![SimpleSelector::Class("c-button".into())]
        ));
    }

    #[test]
    fn commas_inside_negation_do_not_split_the_list() {
        let list = parse_selector_list("img:not([loading], .x), video");
        assert_eq!(list.selectors.len(), 2);
    }
}
