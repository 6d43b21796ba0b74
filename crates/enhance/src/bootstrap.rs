//! Ordered, once-only wiring of every feature.

use crate::config::EnhanceConfig;
use crate::effects::{cookie_banner, hover, lazy_loading, ripple, scroll_to_top, smooth_scroll};
use crate::forms::{self, FormValidationEngine};
use crate::header::{self, HeaderState, SharedHeader};
use crate::navigation::{self, NavigationState, SharedNavigation};
use crate::registry::{Feature, ModuleRegistry};
use crate::viewport::ViewportTrigger;
use crate::{count_up, image_fade, reveal, scroll_spy};
use anyhow::Result;
use core::cell::RefCell;
use log::{debug, info};
use page_host::{EventKind, EventTarget, Page, ReadyState};
use std::rc::Rc;

/// State shared by the features once they are wired.
struct Features {
    config: Rc<EnhanceConfig>,
    viewport: ViewportTrigger,
    navigation: SharedNavigation,
    header: SharedHeader,
    forms: FormValidationEngine,
}

impl Features {
    fn setup(&self, feature: Feature, page: &mut Page) -> Result<()> {
        let config = &*self.config;
        match feature {
            Feature::LazyLoading => lazy_loading::init(page),
            Feature::Navigation => navigation::init(page, config, &self.navigation),
            Feature::SmoothScroll => smooth_scroll::init(page, config),
            Feature::ScrollSpy => scroll_spy::init(page, config, &self.viewport, &self.navigation),
            Feature::Reveal => reveal::init(page, config, &self.viewport),
            Feature::Ripple => ripple::init(page, config),
            Feature::Hover => hover::init(page),
            Feature::CountUp => count_up::init(page, config, &self.viewport),
            Feature::Forms => forms::init(page, &self.forms),
            Feature::ScrollToTop => scroll_to_top::init(page, config),
            Feature::CookieBanner => cookie_banner::init(page, config),
            Feature::ImageFade => image_fade::init(page, config, &self.viewport),
            Feature::Header => header::init(page, config, &self.header),
        }
    }
}

/// The enhancement engine for one page.
pub struct Enhancer {
    registry: ModuleRegistry,
    features: Features,
    deferred: bool,
}

impl Enhancer {
    pub fn new(config: EnhanceConfig) -> Self {
        let config = Rc::new(config);
        Self {
            registry: ModuleRegistry::default(),
            features: Features {
                forms: FormValidationEngine::new(Rc::clone(&config)),
                config,
                viewport: ViewportTrigger::new(),
                navigation: Rc::new(RefCell::new(NavigationState::default())),
                header: Rc::new(RefCell::new(HeaderState::default())),
            },
            deferred: false,
        }
    }

    /// Initialize every feature not yet initialized, in bootstrap order.
    pub fn init(&mut self, page: &mut Page) {
        let features = &self.features;
        let mut ran = 0_usize;
        for feature in Feature::ALL {
            if self
                .registry
                .initialize_once(feature, || features.setup(feature, page))
            {
                ran += 1;
            }
        }
        if ran > 0 {
            info!("enhance: initialized {ran} features");
        } else {
            debug!("enhance: nothing left to initialize");
        }
    }

    #[inline]
    pub fn config(&self) -> &EnhanceConfig {
        &self.features.config
    }

    #[inline]
    pub const fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    #[inline]
    pub const fn viewport(&self) -> &ViewportTrigger {
        &self.features.viewport
    }

    pub fn navigation(&self) -> NavigationState {
        self.features.navigation.borrow().clone()
    }

    pub fn header(&self) -> HeaderState {
        *self.features.header.borrow()
    }

    #[inline]
    pub const fn forms(&self) -> &FormValidationEngine {
        &self.features.forms
    }
}

/// Run [`Enhancer::init`] now, or on `DOMContentLoaded` while the document is loading.
pub fn bootstrap(page: &mut Page, enhancer: &Rc<RefCell<Enhancer>>) {
    if page.ready_state() != ReadyState::Loading {
        enhancer.borrow_mut().init(page);
        return;
    }
    if enhancer.borrow().deferred {
        debug!("enhance: already waiting for DOMContentLoaded");
        return;
    }
    enhancer.borrow_mut().deferred = true;
    let enhancer = Rc::clone(enhancer);
    page.on(
        EventTarget::Document,
        EventKind::DomContentLoaded,
        move |page, _| enhancer.borrow_mut().init(page),
    );
}
