//! Client-side form hints and submit gating.

mod field_state;
mod rules;

pub use field_state::{FieldStates, FieldValidationState};
pub use rules::{FieldSnapshot, ValidationFailure, check};

use crate::config::EnhanceConfig;
use crate::rate_limit::Debouncer;
use anyhow::Result;
use core::cell::RefCell;
use dom::NodeKey;
use log::{debug, error, info, trace};
use page_host::{EventKind, EventTarget, Page, Scheduler, ScrollBehavior, ScrollBlock};
use std::collections::HashSet;
use std::rc::Rc;

pub const FORM_SELECTOR: &str = ".c-form, form";
pub const FIELD_SELECTOR: &str = "input, textarea, select";

const SPIN_STYLE_ID: &str = "c-form-spin-keyframes";
const SPIN_KEYFRAMES: &str = "@keyframes spin { to { transform: rotate(360deg); } }";
const SPINNER_CSS: &str = "display: inline-block; width: 16px; height: 16px; \
     border: 2px solid currentColor; border-top-color: transparent; border-radius: 50%; \
     animation: spin 0.6s linear infinite; margin-right: 8px;";

/// Validation state shared by every listener of every form.
#[derive(Clone)]
pub struct FormValidationEngine {
    config: Rc<EnhanceConfig>,
    fields: FieldStates,
    submitting: Rc<RefCell<HashSet<NodeKey>>>,
}

impl FormValidationEngine {
    pub fn new(config: Rc<EnhanceConfig>) -> Self {
        Self {
            config,
            fields: FieldStates::default(),
            submitting: Rc::default(),
        }
    }

    #[inline]
    pub const fn fields(&self) -> &FieldStates {
        &self.fields
    }

    /// Whether `form` passed validation and is waiting to navigate.
    pub fn is_submitting(&self, form: NodeKey) -> bool {
        self.submitting.borrow().contains(&form)
    }

    /// Run the rules on one field, then show or clear its error. Returns validity.
    pub fn validate_field(&self, page: &mut Page, field: NodeKey) -> bool {
        let snapshot = FieldSnapshot::capture(page.document(), field);
        if let Some(failure) = check(&snapshot) {
            trace!("forms: {field:?} failed {failure:?}");
            self.fields
                .show_error(page, field, failure.message(&self.config.messages));
            false
        } else {
            self.fields
                .clear_error(page, field, self.config.error_fade_ms);
            true
        }
    }

    /// Validate every field of `form` without stopping at the first failure.
    pub fn validate_form(&self, page: &mut Page, form: NodeKey) -> bool {
        let fields = page.document().query_selector_all_in(form, FIELD_SELECTOR);
        fields
            .into_iter()
            .fold(true, |valid, field| self.validate_field(page, field) && valid)
    }

    fn submit(&self, page: &mut Page, form: NodeKey) {
        if self.is_submitting(form) {
            debug!("forms: {form:?} already submitting");
            return;
        }
        if !self.validate_form(page, form) {
            if let Some(first) = page
                .document()
                .query_selector_in(form, r#"[aria-invalid="true"]"#)
            {
                page.focus(first);
                page.scroll_into_view(first, ScrollBlock::Center, ScrollBehavior::Smooth);
            }
            return;
        }
        self.submitting.borrow_mut().insert(form);
        if let Some(button) = page
            .document()
            .query_selector_in(form, r#"button[type="submit"]"#)
        {
            self.show_busy(page, button);
        }
        let target = self.config.success_url.clone();
        page.set_timeout(
            self.config.submit_delay_ms,
            Box::new(move |page: &mut Page| match page.navigate(&target) {
                Ok(url) => info!("forms: submitted, continuing to {url}"),
                Err(err) => error!("forms: success navigation failed: {err:#}"),
            }),
        );
    }

    fn show_busy(&self, page: &mut Page, button: NodeKey) {
        let document = page.document_mut();
        document.set_disabled(button, true);
        document.clear_children(button);
        let spinner = document.create_element("span");
        document.set_css_text(spinner, SPINNER_CSS);
        document.append_child(button, spinner);
        let label = document.create_text(&self.config.messages.submitting);
        document.append_child(button, label);
        if document.get_element_by_id(SPIN_STYLE_ID).is_none() {
            let style = document.create_element("style");
            document.set_attr(style, "id", SPIN_STYLE_ID);
            document.set_text_content(style, SPIN_KEYFRAMES);
            let head = document.head();
            document.append_child(head, style);
        }
    }
}

/// Wire blur, debounced input and submit handling on every form.
pub fn init(page: &mut Page, engine: &FormValidationEngine) -> Result<()> {
    let forms = page.document().query_selector_all(FORM_SELECTOR);
    if forms.is_empty() {
        debug!("forms: no forms");
        return Ok(());
    }
    for form in forms {
        for field in page.document().query_selector_all_in(form, FIELD_SELECTOR) {
            let on_blur = engine.clone();
            page.on(EventTarget::Node(field), EventKind::Blur, move |page, _| {
                on_blur.validate_field(page, field);
            });

            let on_input = engine.clone();
            let revalidate = Debouncer::new(
                engine.config.input_debounce_ms,
                move |page: &mut Page, (): ()| {
                    if page.document().has_attr(field, "aria-invalid") {
                        on_input.validate_field(page, field);
                    }
                },
            );
            page.on(EventTarget::Node(field), EventKind::Input, move |page, _| {
                revalidate.call(page, ());
            });
        }

        let on_submit = engine.clone();
        page.on(EventTarget::Node(form), EventKind::Submit, move |page, event| {
            event.prevent_default();
            event.stop_propagation();
            on_submit.submit(page, form);
        });
    }
    Ok(())
}
