//! Progressive enhancement for a static marketing page: navigation menu,
//! scroll-driven header and section tracking, reveal animations, form hints
//! and cosmetic feedback, wired once over a [`page_host::Page`].

pub mod bootstrap;
pub mod config;
pub mod count_up;
pub mod effects;
pub mod forms;
pub mod header;
pub mod image_fade;
pub mod navigation;
pub mod rate_limit;
pub mod registry;
pub mod reveal;
pub mod scroll_spy;
pub mod viewport;

pub use bootstrap::{Enhancer, bootstrap};
pub use config::{EnhanceConfig, ValidationMessages};
pub use forms::{FormValidationEngine, ValidationFailure};
pub use header::HeaderState;
pub use navigation::{MenuEvent, MenuState, NavigationState};
pub use rate_limit::{Debouncer, Throttler};
pub use registry::{Feature, ModuleRegistry};
pub use viewport::{ObservationMode, ViewportTrigger, VisibilityPolicy};
