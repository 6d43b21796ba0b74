//! Host settings for the in-memory page.
//!
//! Controls the initial viewport and the animation frame interval. Settings can
//! be loaded from environment variables or constructed programmatically.

use core::str::FromStr;
use log::warn;
use std::env;

/// Runtime configuration for a [`crate::Page`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    /// Initial viewport width in CSS pixels
    pub viewport_width: u32,
    /// Initial viewport height in CSS pixels
    pub viewport_height: u32,
    /// Milliseconds between animation frames
    pub frame_interval_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new(1280, 800, 16)
    }
}

impl HostConfig {
    /// Construct a new `HostConfig` with explicit values.
    ///
    /// # Returns
    ///
    /// A new `HostConfig`; the frame interval is raised to at least 1ms
    #[inline]
    #[must_use]
    pub const fn new(viewport_width: u32, viewport_height: u32, frame_interval_ms: u64) -> Self {
        let interval = if frame_interval_ms < 1 {
            1
        } else {
            frame_interval_ms
        };
        Self {
            viewport_width,
            viewport_height,
            frame_interval_ms: interval,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `PAGE_VIEWPORT_WIDTH`: viewport width (default: 1280)
    /// - `PAGE_VIEWPORT_HEIGHT`: viewport height (default: 800)
    /// - `PAGE_FRAME_MS`: frame interval in milliseconds (default: 16)
    ///
    /// Unparsable values fall back to the default with a warning.
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self::new(
            env_number("PAGE_VIEWPORT_WIDTH").unwrap_or(defaults.viewport_width),
            env_number("PAGE_VIEWPORT_HEIGHT").unwrap_or(defaults.viewport_height),
            env_number("PAGE_FRAME_MS").unwrap_or(defaults.frame_interval_ms),
        )
    }
}

/// Parse environment variable `name`; unset or unparsable values yield `None`,
/// the latter with a warning.
pub fn env_number<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    let parsed = raw.trim().parse::<T>().ok();
    if parsed.is_none() {
        warn!("ignoring {name}={raw:?}: not a number");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::{HostConfig, env_number};

    #[test]
    fn zero_frame_interval_is_clamped() {
        assert_eq!(HostConfig::new(10, 10, 0).frame_interval_ms, 1);
        assert_eq!(HostConfig::default().frame_interval_ms, 16);
    }

    #[test]
    fn unset_variables_read_as_none() {
        assert_eq!(env_number::<u64>("PAGE_HOST_TEST_UNSET_NUMBER"), None);
        let path = env_number::<u64>("PATH");
        assert_eq!(path, None, "non-numeric values are ignored");
    }
}
