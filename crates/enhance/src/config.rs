//! Engine settings: timings, thresholds, breakpoints and user-facing text.
//!
//! Defaults reproduce the shipped page behavior. A JSON file can override any
//! subset of fields, and `ENHANCE_*` environment variables override timings.

use anyhow::{Context as _, Result};
use page_host::env_number;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Messages shown next to invalid fields and on the busy submit button.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationMessages {
    pub required: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub checkbox: String,
    pub submitting: String,
}

impl Default for ValidationMessages {
    fn default() -> Self {
        Self {
            required: "Dieses Feld ist erforderlich".to_owned(),
            name: "Bitte geben Sie einen gültigen Namen ein (2-50 Zeichen, nur Buchstaben)"
                .to_owned(),
            email: "Bitte geben Sie eine gültige E-Mail-Adresse ein".to_owned(),
            phone: "Bitte geben Sie eine gültige Telefonnummer ein (10-20 Zeichen)".to_owned(),
            message: "Bitte geben Sie mindestens 10 Zeichen ein".to_owned(),
            checkbox: "Bitte akzeptieren Sie die Bedingungen".to_owned(),
            submitting: "Wird gesendet...".to_owned(),
        }
    }
}

/// Runtime configuration for the enhancement engine.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Debounce for the menu's resize handler
    pub resize_debounce_ms: u64,
    /// Viewport width at which an open mobile menu closes
    pub desktop_breakpoint_px: f64,
    /// Throttle for the header scroll handler
    pub header_throttle_ms: u64,
    pub header_elevate_after_px: f64,
    pub header_hide_after_px: f64,
    /// Fallback offset for smooth scrolling when the header has no height
    pub default_header_height_px: f64,
    /// `rootMargin` of the scroll spy detection band
    pub scroll_spy_margin: String,
    pub scroll_spy_threshold: f64,
    pub reveal_threshold: f64,
    pub count_up_threshold: f64,
    pub count_up_duration_ms: f64,
    pub image_fade_threshold: f64,
    /// Debounce for re-validating a field that shows an error
    pub input_debounce_ms: u64,
    /// Delay before a cleared error message is removed
    pub error_fade_ms: u64,
    /// Delay between a valid submit and the success navigation
    pub submit_delay_ms: u64,
    pub success_url: String,
    pub ripple_duration_ms: u64,
    pub scroll_to_top_throttle_ms: u64,
    pub scroll_to_top_offset_px: f64,
    pub cookie_show_delay_ms: u64,
    pub cookie_hide_delay_ms: u64,
    /// Storage key holding the consent decision
    pub consent_key: String,
    pub messages: ValidationMessages,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 150,
            desktop_breakpoint_px: 1024.0,
            header_throttle_ms: 100,
            header_elevate_after_px: 100.0,
            header_hide_after_px: 300.0,
            default_header_height_px: 80.0,
            scroll_spy_margin: "-20% 0px -70% 0px".to_owned(),
            scroll_spy_threshold: 0.0,
            reveal_threshold: 0.1,
            count_up_threshold: 0.5,
            count_up_duration_ms: 2000.0,
            image_fade_threshold: 0.1,
            input_debounce_ms: 500,
            error_fade_ms: 300,
            submit_delay_ms: 1000,
            success_url: "thank_you.html".to_owned(),
            ripple_duration_ms: 600,
            scroll_to_top_throttle_ms: 200,
            scroll_to_top_offset_px: 300.0,
            cookie_show_delay_ms: 1000,
            cookie_hide_delay_ms: 500,
            consent_key: "cookiesAccepted".to_owned(),
            messages: ValidationMessages::default(),
        }
    }
}

impl EnhanceConfig {
    /// Defaults with environment overrides applied.
    ///
    /// Reads `ENHANCE_RESIZE_DEBOUNCE_MS`, `ENHANCE_HEADER_THROTTLE_MS`,
    /// `ENHANCE_INPUT_DEBOUNCE_MS`, `ENHANCE_SUBMIT_DELAY_MS`,
    /// `ENHANCE_COOKIE_DELAY_MS` and `ENHANCE_SUCCESS_URL`.
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `ENHANCE_*` overrides on top of `self`.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ms) = env_number("ENHANCE_RESIZE_DEBOUNCE_MS") {
            self.resize_debounce_ms = ms;
        }
        if let Some(ms) = env_number("ENHANCE_HEADER_THROTTLE_MS") {
            self.header_throttle_ms = ms;
        }
        if let Some(ms) = env_number("ENHANCE_INPUT_DEBOUNCE_MS") {
            self.input_debounce_ms = ms;
        }
        if let Some(ms) = env_number("ENHANCE_SUBMIT_DELAY_MS") {
            self.submit_delay_ms = ms;
        }
        if let Some(ms) = env_number("ENHANCE_COOKIE_DELAY_MS") {
            self.cookie_show_delay_ms = ms;
        }
        if let Ok(url) = env::var("ENHANCE_SUCCESS_URL") {
            self.success_url = url;
        }
        self
    }

    /// Parse a JSON override document; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns an error when the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse enhance config")
    }

    /// Read a JSON override file.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in config {}", path.display()))
    }
}
