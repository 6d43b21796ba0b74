//! Feature flags and the once-only initialization guard.

use anyhow::Result;
use core::fmt;
use log::{debug, error};
use std::collections::HashSet;

/// Every enhancement, in bootstrap order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    LazyLoading,
    Navigation,
    SmoothScroll,
    ScrollSpy,
    Reveal,
    Ripple,
    Hover,
    CountUp,
    Forms,
    ScrollToTop,
    CookieBanner,
    ImageFade,
    Header,
}

impl Feature {
    pub const ALL: [Self; 13] = [
        Self::LazyLoading,
        Self::Navigation,
        Self::SmoothScroll,
        Self::ScrollSpy,
        Self::Reveal,
        Self::Ripple,
        Self::Hover,
        Self::CountUp,
        Self::Forms,
        Self::ScrollToTop,
        Self::CookieBanner,
        Self::ImageFade,
        Self::Header,
    ];

    /// Stable kebab-case name used in logs and reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LazyLoading => "lazy-loading",
            Self::Navigation => "navigation",
            Self::SmoothScroll => "smooth-scroll",
            Self::ScrollSpy => "scroll-spy",
            Self::Reveal => "reveal",
            Self::Ripple => "ripple",
            Self::Hover => "hover",
            Self::CountUp => "count-up",
            Self::Forms => "forms",
            Self::ScrollToTop => "scroll-to-top",
            Self::CookieBanner => "cookie-banner",
            Self::ImageFade => "image-fade",
            Self::Header => "header",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Which features have been initialized, in the order they were.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    flags: HashSet<Feature>,
    order: Vec<Feature>,
}

impl ModuleRegistry {
    /// Run `setup` unless `feature` was already initialized.
    ///
    /// The flag is set before `setup` runs; a failing setup is logged and not
    /// retried. Returns whether `setup` ran.
    pub fn initialize_once<F>(&mut self, feature: Feature, setup: F) -> bool
    where
        F: FnOnce() -> Result<()>,
    {
        if !self.flags.insert(feature) {
            debug!("{feature}: already initialized");
            return false;
        }
        self.order.push(feature);
        match setup() {
            Ok(()) => debug!("{feature}: initialized"),
            Err(err) => error!("{feature}: setup failed: {err:#}"),
        }
        true
    }

    #[inline]
    pub fn is_initialized(&self, feature: Feature) -> bool {
        self.flags.contains(&feature)
    }

    /// Initialized features in initialization order.
    #[inline]
    pub fn initialized(&self) -> &[Feature] {
        &self.order
    }
}
