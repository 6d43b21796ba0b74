//! Animated counters for `[data-count]` elements.

use crate::config::EnhanceConfig;
use crate::viewport::{ObservationMode, ViewportTrigger, VisibilityPolicy};
use anyhow::Result;
use dom::NodeKey;
use log::{debug, warn};
use page_host::Page;
use std::rc::Rc;

/// Nominal frame length the step size is derived from.
const STEP_FRAME_MS: f64 = 16.0;

/// Leading integer of `text`, the way `parseInt` reads it.
pub fn parse_count(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

/// Counter progress from zero to `target`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CountUp {
    target: i64,
    step: f64,
    current: f64,
}

impl CountUp {
    pub fn new(target: i64, duration_ms: f64) -> Self {
        Self {
            target,
            step: target as f64 / (duration_ms / STEP_FRAME_MS),
            current: 0.0,
        }
    }

    /// Advance one step. Returns the text to show and whether another frame is needed.
    pub fn tick(&mut self) -> (String, bool) {
        self.current += self.step;
        if self.current < self.target as f64 {
            ((self.current.floor() as i64).to_string(), true)
        } else {
            (self.target.to_string(), false)
        }
    }
}

fn animate(page: &mut Page, node: NodeKey, mut counter: CountUp) {
    let (text, more) = counter.tick();
    page.document_mut().set_text_content(node, &text);
    if more {
        page.request_animation_frame(move |page: &mut Page| animate(page, node, counter));
    }
}

pub fn init(page: &mut Page, config: &EnhanceConfig, viewport: &ViewportTrigger) -> Result<()> {
    let counters = page.document().query_selector_all("[data-count]");
    if counters.is_empty() {
        debug!("count-up: no counters");
        return Ok(());
    }
    let policy = VisibilityPolicy::threshold(config.count_up_threshold);
    let duration_ms = config.count_up_duration_ms;
    for node in counters {
        let raw = page.document().attr(node, "data-count").unwrap_or_default();
        let Some(target) = parse_count(raw) else {
            warn!("count-up: ignoring data-count={raw:?} on {node:?}");
            continue;
        };
        viewport.observe(
            page,
            node,
            policy,
            ObservationMode::OneShot,
            Rc::new(move |page: &mut Page, node: NodeKey| {
                animate(page, node, CountUp::new(target, duration_ms));
            }),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CountUp, parse_count};

    #[test]
    fn parses_leading_integers_only() {
        assert_eq!(parse_count("250"), Some(250));
        assert_eq!(parse_count(" 98%"), Some(98));
        assert_eq!(parse_count("-12"), Some(-12));
        assert_eq!(parse_count("1.5k"), Some(1));
        assert_eq!(parse_count("many"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn counts_floor_values_and_ends_on_target() {
        let mut counter = CountUp::new(250, 2000.0);
        let (first, more) = counter.tick();
        assert_eq!(first, "2", "250 / 125 steps");
        assert!(more);
        let mut frames = 1;
        let last = loop {
            let (text, more) = counter.tick();
            frames += 1;
            if !more {
                break text;
            }
        };
        assert_eq!(last, "250");
        assert!((125..=126).contains(&frames), "took {frames} ticks");
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let mut counter = CountUp::new(0, 2000.0);
        assert_eq!(counter.tick(), ("0".to_owned(), false));
    }
}
