//! Field classification and the validation rules.

use crate::config::ValidationMessages;
use dom::{Document, NodeKey};

#[allow(clippy::expect_used, reason = "literal patterns are checked by the unit tests")]
mod patterns {
    use regex::Regex;
    use std::sync::LazyLock;

    pub static NAME: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[a-zA-ZÀ-ÿ\s\-']{2,50}$").expect("Invalid name regex")
    });
    pub static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
    });
    pub static PHONE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[0-9\s+\-()]{10,20}$").expect("Invalid phone regex")
    });
}

/// Minimum trimmed length of a message field.
const MESSAGE_MIN_CHARS: usize = 10;

/// Why a field is invalid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValidationFailure {
    Required,
    Name,
    Email,
    Phone,
    Message,
    Checkbox,
}

impl ValidationFailure {
    pub fn message(self, messages: &ValidationMessages) -> &str {
        match self {
            Self::Required => &messages.required,
            Self::Name => &messages.name,
            Self::Email => &messages.email,
            Self::Phone => &messages.phone,
            Self::Message => &messages.message,
            Self::Checkbox => &messages.checkbox,
        }
    }
}

/// The parts of a control the rules look at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSnapshot {
    pub tag: String,
    /// Lowercased `type`; empty for elements without one.
    pub kind: String,
    /// `name` attribute, falling back to `id`.
    pub name: String,
    pub id: String,
    /// Trimmed value.
    pub value: String,
    pub required: bool,
    pub checked: bool,
}

impl FieldSnapshot {
    pub fn capture(document: &Document, field: NodeKey) -> Self {
        let id = document.element_id(field).unwrap_or_default().to_owned();
        let name = document
            .attr(field, "name")
            .filter(|name| !name.is_empty())
            .map_or_else(|| id.clone(), str::to_owned);
        Self {
            tag: document.tag_name(field).unwrap_or_default().to_owned(),
            kind: document.input_type(field).unwrap_or_default(),
            name,
            id,
            value: document.value(field).trim().to_owned(),
            required: document.has_attr(field, "required"),
            checked: document.checked(field),
        }
    }

    fn is_name_field(&self) -> bool {
        self.name.contains("name") || self.name == "form-name" || self.id == "contact-name"
    }

    fn is_email_field(&self) -> bool {
        self.kind == "email" || self.name.contains("email")
    }

    fn is_phone_field(&self) -> bool {
        self.kind == "tel" || self.name.contains("phone")
    }

    fn is_message_field(&self) -> bool {
        self.tag == "textarea" || self.name.contains("message")
    }
}

/// First failing rule for `field`, or `None` when it is valid.
pub fn check(field: &FieldSnapshot) -> Option<ValidationFailure> {
    let value = field.value.as_str();
    if value.is_empty() {
        return field.required.then_some(ValidationFailure::Required);
    }
    if field.is_name_field() && !patterns::NAME.is_match(value) {
        return Some(ValidationFailure::Name);
    }
    if field.is_email_field() && !patterns::EMAIL.is_match(value) {
        return Some(ValidationFailure::Email);
    }
    if field.is_phone_field() && !patterns::PHONE.is_match(value) {
        return Some(ValidationFailure::Phone);
    }
    if field.is_message_field() && value.chars().count() < MESSAGE_MIN_CHARS {
        return Some(ValidationFailure::Message);
    }
    if field.kind == "checkbox" && field.required && !field.checked {
        return Some(ValidationFailure::Checkbox);
    }
    None
}
