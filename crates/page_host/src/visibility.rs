//! Viewport visibility detection (the `IntersectionObserver` model).
//!
//! An observer has a detection box (the viewport grown or shrunk by a root
//! margin) and a threshold. It reports a target whenever the target's
//! visibility differs from what was last reported, and always on the first
//! check after the target is observed.

use crate::Page;
use anyhow::{Context as _, Result, anyhow, bail};
use core::fmt;
use core::str::FromStr;
use dom::{NodeKey, Rect};
use std::rc::Rc;

/// One side of a root margin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarginValue {
    Px(f64),
    /// Percentage of the viewport height (top/bottom) or width (left/right).
    Percent(f64),
}

impl MarginValue {
    #[inline]
    fn resolve(self, basis: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(percent) => basis * percent / 100.0,
        }
    }
}

impl FromStr for MarginValue {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some(number) = text.strip_suffix('%') {
            let percent = number
                .trim()
                .parse::<f64>()
                .with_context(|| format!("invalid percentage margin `{text}`"))?;
            return Ok(Self::Percent(percent));
        }
        let number = text.strip_suffix("px").unwrap_or(text).trim();
        let px = number
            .parse::<f64>()
            .with_context(|| format!("invalid pixel margin `{text}`"))?;
        if px != 0.0 && !text.ends_with("px") {
            bail!("margin `{text}` needs a `px` or `%` unit");
        }
        Ok(Self::Px(px))
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(formatter, "{px}px"),
            Self::Percent(percent) => write!(formatter, "{percent}%"),
        }
    }
}

/// Root margin in CSS `rootMargin` shorthand order (top, right, bottom, left).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

impl RootMargin {
    pub const ZERO: Self = Self {
        top: MarginValue::Px(0.0),
        right: MarginValue::Px(0.0),
        bottom: MarginValue::Px(0.0),
        left: MarginValue::Px(0.0),
    };

    /// Parse one to four lengths with the usual shorthand expansion.
    ///
    /// # Errors
    /// Returns an error for an empty string, more than four values, or a value
    /// that is not a `px`/`%` length.
    pub fn parse(text: &str) -> Result<Self> {
        let values = text
            .split_ascii_whitespace()
            .map(MarginValue::from_str)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("invalid root margin `{text}`"))?;
        match values.as_slice() {
            [all] => Ok(Self {
                top: *all,
                right: *all,
                bottom: *all,
                left: *all,
            }),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(anyhow!(
                "root margin `{text}` must have between one and four values"
            )),
        }
    }

    /// Grow (positive) or shrink (negative) `viewport` by this margin.
    pub fn apply(&self, viewport: Rect) -> Rect {
        let top = self.top.resolve(viewport.height);
        let bottom = self.bottom.resolve(viewport.height);
        let left = self.left.resolve(viewport.width);
        let right = self.right.resolve(viewport.width);
        Rect::new(
            viewport.x - left,
            viewport.y - top,
            (viewport.width + left + right).max(0.0),
            (viewport.height + top + bottom).max(0.0),
        )
    }
}

impl FromStr for RootMargin {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {} {}",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Detection box and threshold of one observer.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct VisibilityOptions {
    pub margin: RootMargin,
    /// Minimum visible fraction of the target, in `[0, 1]`.
    pub threshold: f64,
}

/// One target's state in a delivered batch.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisibilityEntry {
    pub target: NodeKey,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// Measure `target` against the detection box `root`.
///
/// Returns the visible ratio and whether it satisfies `threshold`. Targets with
/// no area count as fully visible while their box lies inside `root`.
pub fn measure(target: Rect, root: Rect, threshold: f64) -> (bool, f64) {
    let Some(overlap) = root.intersection(&target) else {
        return (false, 0.0);
    };
    let target_area = target.area();
    if target_area <= 0.0 {
        return (true, 1.0);
    }
    let ratio = (overlap.area() / target_area).clamp(0.0, 1.0);
    (overlap.area() > 0.0 && ratio >= threshold, ratio)
}

/// Callback receiving one batch of changed entries.
pub type VisibilityCallback = Rc<dyn Fn(&mut Page, &[VisibilityEntry])>;

/// Handle of a platform observer on a page.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct ObservedTarget {
    node: NodeKey,
    last_reported: Option<bool>,
}

struct ObserverSlot {
    id: ObserverId,
    options: VisibilityOptions,
    callback: VisibilityCallback,
    targets: Vec<ObservedTarget>,
}

/// All observers on a page.
#[derive(Default)]
pub(crate) struct VisibilityObservers {
    next_id: u64,
    slots: Vec<ObserverSlot>,
}

/// A computed batch waiting to be delivered.
pub(crate) struct PendingBatch {
    pub callback: VisibilityCallback,
    pub entries: Vec<VisibilityEntry>,
}

impl VisibilityObservers {
    pub fn create(&mut self, options: VisibilityOptions, callback: VisibilityCallback) -> ObserverId {
        self.next_id = self.next_id.wrapping_add(1);
        let id = ObserverId(self.next_id);
        self.slots.push(ObserverSlot {
            id,
            options,
            callback,
            targets: Vec::new(),
        });
        id
    }

    fn slot_mut(&mut self, id: ObserverId) -> Option<&mut ObserverSlot> {
        self.slots.iter_mut().find(|slot| slot.id == id)
    }

    /// Start observing; observing an already observed target is a no-op.
    pub fn observe(&mut self, id: ObserverId, node: NodeKey) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        if slot.targets.iter().any(|target| target.node == node) {
            return false;
        }
        slot.targets.push(ObservedTarget {
            node,
            last_reported: None,
        });
        true
    }

    pub fn unobserve(&mut self, id: ObserverId, node: NodeKey) {
        if let Some(slot) = self.slot_mut(id) {
            slot.targets.retain(|target| target.node != node);
        }
    }

    pub fn disconnect(&mut self, id: ObserverId) {
        self.slots.retain(|slot| slot.id != id);
    }

    pub fn target_count(&self, id: ObserverId) -> usize {
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .map_or(0, |slot| slot.targets.len())
    }

    #[inline]
    pub fn observer_count(&self) -> usize {
        self.slots.len()
    }

    /// Compute every observer's changed entries. `layout_of` returns `None`
    /// for targets that are no longer connected.
    pub fn collect_changes(
        &mut self,
        viewport: Rect,
        layout_of: impl Fn(NodeKey) -> Option<Rect>,
    ) -> Vec<PendingBatch> {
        let mut batches = Vec::new();
        for slot in &mut self.slots {
            let root = slot.options.margin.apply(viewport);
            let mut entries = Vec::new();
            for target in &mut slot.targets {
                let (is_intersecting, ratio) = layout_of(target.node)
                    .map_or((false, 0.0), |rect| measure(rect, root, slot.options.threshold));
                if target.last_reported != Some(is_intersecting) {
                    target.last_reported = Some(is_intersecting);
                    entries.push(VisibilityEntry {
                        target: target.node,
                        is_intersecting,
                        ratio,
                    });
                }
            }
            if !entries.is_empty() {
                batches.push(PendingBatch {
                    callback: Rc::clone(&slot.callback),
                    entries,
                });
            }
        }
        batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_value_margin_keeps_css_order() -> Result<()> {
        let margin = RootMargin::parse("-20% 0px -70% 0px")?;
        assert_eq!(margin.top, MarginValue::Percent(-20.0));
        assert_eq!(margin.right, MarginValue::Px(0.0));
        assert_eq!(margin.bottom, MarginValue::Percent(-70.0));
        let band = margin.apply(Rect::new(0.0, 1000.0, 1200.0, 800.0));
        assert_eq!(band, Rect::new(0.0, 1160.0, 1200.0, 80.0));
        Ok(())
    }

    #[test]
    fn shorthand_expansion() -> Result<()> {
        let margin = RootMargin::parse("10px 5%")?;
        assert_eq!(margin.bottom, MarginValue::Px(10.0));
        assert_eq!(margin.left, MarginValue::Percent(5.0));
        assert_eq!(RootMargin::parse("0")?, RootMargin::ZERO);
        Ok(())
    }

    #[test]
    fn malformed_margins_are_rejected() {
        assert!(RootMargin::parse("").is_err());
        assert!(RootMargin::parse("1px 2px 3px 4px 5px").is_err());
        assert!(RootMargin::parse("ten").is_err());
        assert!(RootMargin::parse("12").is_err(), "non-zero values need a unit");
    }

    #[test]
    fn threshold_compares_visible_fraction() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let half_visible = Rect::new(0.0, 700.0, 100.0, 200.0);
        assert_eq!(measure(half_visible, viewport, 0.5), (true, 0.5));
        assert!(!measure(half_visible, viewport, 0.6).0);
        let touching = Rect::new(0.0, 800.0, 100.0, 100.0);
        assert!(!measure(touching, viewport, 0.0).0, "edge contact is not visible area");
    }
}
