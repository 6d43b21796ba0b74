//! Cosmetic interaction feedback. Every effect is independent of the others
//! and silently skips markup it does not find.

pub mod cookie_banner;
pub mod hover;
pub mod lazy_loading;
pub mod ripple;
pub mod scroll_to_top;
pub mod smooth_scroll;
