//! Scripted user sessions against an enhanced page.
//!
//! A scenario is a page fixture, an engine configuration and a list of
//! [`Step`]s. Running it bootstraps the engine, applies the steps on the
//! virtual clock and summarizes the page in a [`Report`].

pub mod cli;

use anyhow::{Context as _, Result, anyhow};
use core::cell::RefCell;
use dom::NodeKey;
use log::{debug, info};
use page_enhance::{EnhanceConfig, Enhancer, bootstrap};
use page_host::{HostConfig, Page, PageFixture, ScrollBehavior};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::rc::Rc;

const fn default_checked() -> bool {
    true
}

/// One user action or clock movement.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Click { selector: String },
    Hover { selector: String },
    Unhover { selector: String },
    PressKey { key: String },
    Focus { selector: String },
    Blur { selector: String },
    Input { selector: String, text: String },
    Check {
        selector: String,
        #[serde(default = "default_checked")]
        checked: bool,
    },
    Submit { selector: String },
    Scroll {
        top: f64,
        #[serde(default)]
        smooth: bool,
    },
    Resize { width: f64, height: f64 },
    LoadImage { selector: String },
    FinishLoading,
    Wait { ms: u64 },
    Bootstrap,
}

impl Step {
    /// Parse a JSON array of steps.
    ///
    /// # Errors
    /// Returns an error when the JSON is not a list of steps.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        serde_json::from_str(json).context("failed to parse steps")
    }

    /// Read a JSON steps file.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn load_list(path: &Path) -> Result<Vec<Self>> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read steps {}", path.display()))?;
        Self::list_from_json(&json).with_context(|| format!("in steps {}", path.display()))
    }
}

/// Header flags at the end of the run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderReport {
    pub elevated: bool,
    pub visible: bool,
}

/// Summary of the page after a scenario.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub url: String,
    pub navigations: Vec<String>,
    /// `href` of the nav link marked active.
    pub active_link: Option<String>,
    pub menu_open: bool,
    pub header: HeaderReport,
    pub consent: Option<String>,
    pub initialized: Vec<String>,
    pub invalid_fields: usize,
    pub journal_len: usize,
    pub listener_count: usize,
    pub now_ms: u64,
}

impl Report {
    pub fn capture(page: &Page, enhancer: &Enhancer) -> Self {
        let document = page.document();
        let navigation = enhancer.navigation();
        let header = enhancer.header();
        Self {
            url: page.location().to_string(),
            navigations: page.navigations().iter().map(ToString::to_string).collect(),
            active_link: document
                .query_selector(".c-nav__link.is-active")
                .and_then(|link| document.attr(link, "href"))
                .map(str::to_owned),
            menu_open: navigation.menu.is_open(),
            header: HeaderReport {
                elevated: header.elevated,
                visible: header.visible,
            },
            consent: page.storage_get(&enhancer.config().consent_key),
            initialized: enhancer
                .registry()
                .initialized()
                .iter()
                .map(ToString::to_string)
                .collect(),
            invalid_fields: document
                .query_selector_all(r#"[aria-invalid="true"]"#)
                .len(),
            journal_len: document.updates().len(),
            listener_count: page.total_listener_count(),
            now_ms: page.now_ms(),
        }
    }
}

/// A page with its engine, driven step by step.
pub struct Session {
    page: Page,
    enhancer: Rc<RefCell<Enhancer>>,
}

impl Session {
    /// Build the page with host settings from the environment and bootstrap the engine on it.
    ///
    /// # Errors
    /// Returns an error when the fixture cannot be built.
    pub fn start(fixture: &PageFixture, config: EnhanceConfig) -> Result<Self> {
        let mut page = fixture.build_with(HostConfig::from_env())?;
        let enhancer = Rc::new(RefCell::new(Enhancer::new(config)));
        bootstrap(&mut page, &enhancer);
        page.flush();
        Ok(Self { page, enhancer })
    }

    #[inline]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    fn node(&self, selector: &str) -> Result<NodeKey> {
        self.page
            .document()
            .query_selector(selector)
            .ok_or_else(|| anyhow!("no element matches `{selector}`"))
    }

    /// Apply one step.
    ///
    /// # Errors
    /// Returns an error when a step's selector matches nothing.
    pub fn apply(&mut self, step: &Step) -> Result<()> {
        debug!("step: {step:?}");
        match step {
            Step::Click { selector } => {
                let node = self.node(selector)?;
                self.page.click(node);
            }
            Step::Hover { selector } => {
                let node = self.node(selector)?;
                self.page.hover(node);
            }
            Step::Unhover { selector } => {
                let node = self.node(selector)?;
                self.page.unhover(node);
            }
            Step::PressKey { key } => self.page.press_key(key),
            Step::Focus { selector } => {
                let node = self.node(selector)?;
                self.page.focus(node);
            }
            Step::Blur { selector } => {
                let node = self.node(selector)?;
                self.page.blur(node);
            }
            Step::Input { selector, text } => {
                let node = self.node(selector)?;
                self.page.input_text(node, text);
            }
            Step::Check { selector, checked } => {
                let node = self.node(selector)?;
                self.page.set_checked(node, *checked);
            }
            Step::Submit { selector } => {
                let node = self.node(selector)?;
                self.page.submit(node);
            }
            Step::Scroll { top, smooth } => {
                let behavior = if *smooth {
                    ScrollBehavior::Smooth
                } else {
                    ScrollBehavior::Auto
                };
                self.page.scroll_to(*top, behavior);
            }
            Step::Resize { width, height } => self.page.resize(*width, *height),
            Step::LoadImage { selector } => {
                let node = self.node(selector)?;
                self.page.complete_image_load(node);
            }
            Step::FinishLoading => self.page.finish_loading(),
            Step::Wait { ms } => self.page.advance_by(*ms),
            Step::Bootstrap => {
                bootstrap(&mut self.page, &self.enhancer);
                self.page.flush();
            }
        }
        Ok(())
    }

    pub fn report(&self) -> Report {
        Report::capture(&self.page, &self.enhancer.borrow())
    }
}

/// Run `steps` against a fresh session and report the final page.
///
/// # Errors
/// Returns an error when the fixture cannot be built or a step fails.
pub fn simulate(fixture: &PageFixture, config: EnhanceConfig, steps: &[Step]) -> Result<Report> {
    let mut session = Session::start(fixture, config)?;
    for (index, step) in steps.iter().enumerate() {
        session
            .apply(step)
            .with_context(|| format!("step {} ({step:?})", index + 1))?;
    }
    let report = session.report();
    info!(
        "scenario finished after {}ms with {} navigations",
        report.now_ms,
        report.navigations.len()
    );
    Ok(report)
}
