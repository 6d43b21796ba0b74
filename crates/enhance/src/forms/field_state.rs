//! Error message nodes owned by the validation engine.
//!
//! Each field has at most one error node. Clearing fades it out and removes it
//! after a delay; showing an error again before that cancels the removal and
//! reuses the node.

use core::cell::RefCell;
use dom::NodeKey;
use page_host::{Page, Scheduler, TimerId};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldValidationState {
    pub has_error: bool,
    pub error_node: Option<NodeKey>,
    pending_removal: Option<TimerId>,
}

/// Per-field state for every field of every form.
#[derive(Clone, Default)]
pub struct FieldStates {
    inner: Rc<RefCell<HashMap<NodeKey, FieldValidationState>>>,
}

impl FieldStates {
    pub fn get(&self, field: NodeKey) -> FieldValidationState {
        self.inner.borrow().get(&field).copied().unwrap_or_default()
    }

    /// Mark `field` invalid and show `message` in its owned error node.
    pub fn show_error(&self, page: &mut Page, field: NodeKey, message: &str) {
        let mut state = self.get(field);
        if let Some(timer) = state.pending_removal.take() {
            page.clear_timeout(timer);
        }
        let reusable = state
            .error_node
            .filter(|node| page.document().is_connected(*node));
        let node = Self::render_error(page, field, reusable, message);
        let states = self.clone();
        page.request_animation_frame(move |page: &mut Page| {
            if !states.get(field).has_error {
                return;
            }
            let document = page.document_mut();
            document.set_style(node, "opacity", "1");
            document.set_style(node, "transform", "translateY(0)");
        });
        state.has_error = true;
        state.error_node = Some(node);
        self.inner.borrow_mut().insert(field, state);
    }

    fn render_error(
        page: &mut Page,
        field: NodeKey,
        reusable: Option<NodeKey>,
        message: &str,
    ) -> NodeKey {
        let document = page.document_mut();
        document.set_attr(field, "aria-invalid", "true");
        document.set_style(field, "border-color", "var(--color-error)");
        let node = reusable.unwrap_or_else(|| {
            let created = document.create_element("span");
            document.set_attr(created, "class", "c-form__error");
            document.set_attr(created, "role", "alert");
            let parent = document.parent(field).unwrap_or_else(|| document.body());
            document.append_child(parent, created);
            created
        });
        document.set_text_content(node, message);
        document.set_style(node, "opacity", "0");
        document.set_style(node, "transform", "translateY(-10px)");
        document.set_style(node, "transition", "all 0.3s ease-out");
        node
    }

    /// Mark `field` valid and fade out its error node, removing it after `fade_ms`.
    pub fn clear_error(&self, page: &mut Page, field: NodeKey, fade_ms: u64) {
        let mut state = self.get(field);
        let document = page.document_mut();
        document.remove_attr(field, "aria-invalid");
        document.set_style(field, "border-color", "");
        state.has_error = false;
        if let Some(node) = state.error_node
            && state.pending_removal.is_none()
        {
            document.set_style(node, "opacity", "0");
            document.set_style(node, "transform", "translateY(-10px)");
            let states = self.clone();
            let timer = page.set_timeout(
                fade_ms,
                Box::new(move |page: &mut Page| states.finish_removal(page, field, node)),
            );
            state.pending_removal = Some(timer);
        }
        self.inner.borrow_mut().insert(field, state);
    }

    fn finish_removal(&self, page: &mut Page, field: NodeKey, node: NodeKey) {
        page.document_mut().remove(node);
        if let Some(state) = self.inner.borrow_mut().get_mut(&field)
            && state.error_node == Some(node)
        {
            state.error_node = None;
            state.pending_removal = None;
        }
    }
}
