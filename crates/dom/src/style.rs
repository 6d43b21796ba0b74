use std::collections::BTreeMap;

/// Inline `style` declarations of one element, keyed by kebab-case property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: BTreeMap<String, String>,
}

impl InlineStyle {
    #[inline]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations.get(property).map(String::as_str)
    }

    /// Set a property; an empty value removes it, as assigning `''` does in a browser.
    pub fn set(&mut self, property: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.declarations.remove(property);
        } else {
            self.declarations
                .insert(property.to_ascii_lowercase(), value.to_owned());
        }
    }

    /// Parse `prop: value; prop: value` text into declarations.
    /// Entries without a colon are ignored.
    pub fn parse_declarations(css_text: &str) -> Vec<(String, String)> {
        css_text
            .split(';')
            .filter_map(|declaration| declaration.split_once(':'))
            .map(|(property, value)| {
                (
                    property.trim().to_ascii_lowercase(),
                    value.trim().to_owned(),
                )
            })
            .filter(|(property, value)| !property.is_empty() && !value.is_empty())
            .collect()
    }

    pub fn clear(&mut self) {
        self.declarations.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialized form, the way `element.style.cssText` reads.
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
