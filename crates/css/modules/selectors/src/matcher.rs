//! Selector matching.
//!
//! Complex selectors are matched right-to-left. Descendant and general sibling
//! combinators backtrack, so `.a .b > .c` finds a `.b` parent whose ancestor is
//! `.a` even when a nearer `.a` ancestor is not under a `.b`.

use crate::{Combinator, ComplexSelector, CompoundSelector, ElementAdapter, SelectorList, SimpleSelector};

/// Match a selector list against an element.
pub fn matches_selector_list<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    list: &SelectorList,
) -> bool {
    list.selectors
        .iter()
        .any(|selector_item| matches_complex(adapter, element, selector_item))
}

/// Match a complex selector against an element.
pub fn matches_complex<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
) -> bool {
    let mut compounds: Vec<&CompoundSelector> = Vec::with_capacity(sel.rest.len() + 1);
    let mut combinators: Vec<Combinator> = Vec::with_capacity(sel.rest.len());
    compounds.push(&sel.first);
    for (combinator, compound) in &sel.rest {
        combinators.push(*combinator);
        compounds.push(compound);
    }
    match_tail(adapter, element, &compounds, &combinators)
}

/// Match `compounds` so that the last one matches `element` and every earlier
/// one is related to its right neighbour through `combinators`.
fn match_tail<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compounds: &[&CompoundSelector],
    combinators: &[Combinator],
) -> bool {
    let Some((last, leading)) = compounds.split_last() else {
        return false;
    };
    if !matches_compound(adapter, element, last) {
        return false;
    }
    let Some((combinator, leading_combinators)) = combinators.split_last() else {
        return true;
    };
    match combinator {
        Combinator::Descendant => {
            let mut current = adapter.parent(element);
            while let Some(ancestor) = current {
                if match_tail(adapter, ancestor, leading, leading_combinators) {
                    return true;
                }
                current = adapter.parent(ancestor);
            }
            false
        }
        Combinator::Child => adapter
            .parent(element)
            .is_some_and(|parent| match_tail(adapter, parent, leading, leading_combinators)),
        Combinator::AdjacentSibling => adapter
            .previous_sibling_element(element)
            .is_some_and(|sibling| match_tail(adapter, sibling, leading, leading_combinators)),
        Combinator::GeneralSibling => {
            let mut current = adapter.previous_sibling_element(element);
            while let Some(sibling) = current {
                if match_tail(adapter, sibling, leading, leading_combinators) {
                    return true;
                }
                current = adapter.previous_sibling_element(sibling);
            }
            false
        }
    }
}

/// Match a compound selector against a single element.
pub fn matches_compound<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compound: &CompoundSelector,
) -> bool {
    compound
        .simples
        .iter()
        .all(|simple| matches_simple(adapter, element, simple))
}

fn matches_simple<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    simple: &SimpleSelector,
) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(type_name) => {
            type_name.is_empty() || adapter.tag_name(element) == type_name.as_str()
        }
        SimpleSelector::Class(class_name) => adapter.has_class(element, class_name),
        SimpleSelector::IdSelector(id_value) => adapter
            .element_id(element)
            .is_some_and(|value| value == id_value.as_str()),
        SimpleSelector::Attr {
            name,
            operator,
            value,
        } => adapter
            .attr(element, name)
            .is_some_and(|actual| operator.test(actual, value)),
        SimpleSelector::Negation(inner) => !matches_compound(adapter, element, inner),
    }
}
