//! Declarative page fixtures, from Rust builders or JSON.

use crate::config::HostConfig;
use crate::state::{Page, ReadyState};
use anyhow::{Context as _, Result};
use dom::{Document, NodeKey, Rect};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use url::Url;

const DEFAULT_URL: &str = "https://example.com/index.html";

/// Viewport size override.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ViewportFixture {
    pub width: u32,
    pub height: u32,
}

/// One element and its subtree.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ElementFixture {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    /// Text placed before the children.
    pub text: Option<String>,
    pub rect: Option<Rect>,
    /// `false` for images that are still decoding.
    pub complete: Option<bool>,
    pub children: Vec<ElementFixture>,
}

impl ElementFixture {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    #[must_use]
    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_owned());
        self
    }

    #[must_use]
    pub const fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Some(Rect::new(x, y, width, height));
        self
    }

    /// Mark an image as not yet loaded.
    #[must_use]
    pub const fn loading_image(mut self) -> Self {
        self.complete = Some(false);
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    fn build_into(&self, document: &mut Document, parent: NodeKey) {
        let node = document.create_element(&self.tag);
        for (name, value) in &self.attrs {
            document.set_attr(node, name, value);
        }
        if let Some(css_text) = self.attrs.get("style") {
            document.set_css_text(node, css_text);
        }
        if let Some(rect) = self.rect {
            document.set_layout(node, rect);
        }
        if let Some(complete) = self.complete {
            document.set_complete(node, complete);
        }
        document.append_child(parent, node);
        if let Some(text) = &self.text {
            let text_node = document.create_text(text);
            document.append_child(node, text_node);
        }
        for child in &self.children {
            child.build_into(document, node);
        }
    }
}

/// A whole page: location, viewport, load state, stored items and markup.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    pub url: String,
    pub viewport: Option<ViewportFixture>,
    pub ready_state: ReadyState,
    /// `localStorage` items for the page's origin.
    pub storage: BTreeMap<String, String>,
    pub body_attrs: BTreeMap<String, String>,
    pub head: Vec<ElementFixture>,
    pub body: Vec<ElementFixture>,
}

impl Default for PageFixture {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            viewport: None,
            ready_state: ReadyState::Complete,
            storage: BTreeMap::new(),
            body_attrs: BTreeMap::new(),
            head: Vec::new(),
            body: Vec::new(),
        }
    }
}

impl PageFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON fixture.
    ///
    /// # Errors
    /// Returns an error when the JSON does not describe a fixture.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse page fixture")
    }

    /// Read and parse a JSON fixture file.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in fixture {}", path.display()))
    }

    #[must_use]
    pub fn url(mut self, url: &str) -> Self {
        url.clone_into(&mut self.url);
        self
    }

    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Some(ViewportFixture { width, height });
        self
    }

    #[must_use]
    pub const fn ready_state(mut self, state: ReadyState) -> Self {
        self.ready_state = state;
        self
    }

    #[must_use]
    pub fn stored(mut self, key: &str, value: &str) -> Self {
        self.storage.insert(key.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn head_child(mut self, element: ElementFixture) -> Self {
        self.head.push(element);
        self
    }

    #[must_use]
    pub fn body_child(mut self, element: ElementFixture) -> Self {
        self.body.push(element);
        self
    }

    #[must_use]
    pub fn body_children(mut self, elements: impl IntoIterator<Item = ElementFixture>) -> Self {
        self.body.extend(elements);
        self
    }

    /// Build the page with the default host settings.
    ///
    /// # Errors
    /// Returns an error when the fixture URL is invalid.
    pub fn build(&self) -> Result<Page> {
        self.build_with(HostConfig::default())
    }

    /// Build the page; the fixture's viewport wins over `config`.
    ///
    /// # Errors
    /// Returns an error when the fixture URL is invalid.
    pub fn build_with(&self, mut config: HostConfig) -> Result<Page> {
        let location = Url::parse(&self.url)
            .with_context(|| format!("invalid fixture url `{}`", self.url))?;
        if let Some(viewport) = self.viewport {
            config.viewport_width = viewport.width;
            config.viewport_height = viewport.height;
        }
        let mut document = Document::new();
        let (head, body) = (document.head(), document.body());
        for (name, value) in &self.body_attrs {
            document.set_attr(body, name, value);
        }
        for element in &self.head {
            element.build_into(&mut document, head);
        }
        for element in &self.body {
            element.build_into(&mut document, body);
        }
        document.take_updates();

        let mut page = Page::new(document, location, config);
        page.set_ready_state(self.ready_state);
        for (key, value) in &self.storage {
            page.storage_set(key, value);
        }
        Ok(page)
    }
}
