//! Viewport intersection tracking.
//!
//! The platform reports raw visible fractions through
//! [`IntersectionTracker::report`]; the tracker turns them into threshold
//! crossings. It does not debounce and does not pick a winner when several
//! items are visible at once, that is the scheduler's job.

use std::collections::HashMap;

use stashtv_contracts::visibility::VisibilitySource;

/// An item crossed the visibility threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityChanged {
    pub index: usize,
    pub visible: bool,
}

/// Axis-aligned box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Fraction of `item` that lies inside `viewport`, in `0.0..=1.0`.
pub fn visible_fraction(item: Rect, viewport: Rect) -> f32 {
    let area = item.area();
    if area <= 0.0 {
        return 0.0;
    }
    let left = item.x.max(viewport.x);
    let right = (item.x + item.width).min(viewport.x + viewport.width);
    let top = item.y.max(viewport.y);
    let bottom = (item.y + item.height).min(viewport.y + viewport.height);
    let overlap = (right - left).max(0.0) * (bottom - top).max(0.0);
    (overlap / area).clamp(0.0, 1.0)
}

#[derive(Debug)]
pub struct IntersectionTracker<S: VisibilitySource> {
    source: S,
    threshold: f32,
    /// Observed indices and whether each is currently past the threshold.
    observed: HashMap<usize, bool>,
}

impl<S: VisibilitySource> IntersectionTracker<S> {
    pub fn new(source: S, threshold: f32) -> Self {
        Self {
            source,
            threshold,
            observed: HashMap::new(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Start observing `index`. A missing handle is a no-op.
    pub fn register(&mut self, index: usize, handle: Option<&S::Handle>) {
        let Some(handle) = handle else {
            tracing::trace!(index, "register without visual handle ignored");
            return;
        };
        // Re-mounted: swap the observation onto the new handle but keep the
        // last known side of the threshold, so the next report still crosses.
        let was_visible = self.observed.get(&index).copied();
        if was_visible.is_some() {
            self.source.unobserve(index);
        }
        self.source.observe(index, handle);
        self.observed.insert(index, was_visible.unwrap_or(false));
    }

    /// Stop observing `index` and release the platform observation.
    pub fn unregister(&mut self, index: usize) {
        if self.observed.remove(&index).is_some() {
            self.source.unobserve(index);
        } else {
            tracing::trace!(index, "unregister of unobserved item ignored");
        }
    }

    pub fn is_observed(&self, index: usize) -> bool {
        self.observed.contains_key(&index)
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.observed.get(&index).copied().unwrap_or(false)
    }

    /// Feed a visible fraction for `index`. Returns a change when the
    /// threshold was crossed in either direction.
    pub fn report(
        &mut self,
        index: usize,
        fraction: f32,
    ) -> Option<VisibilityChanged> {
        let Some(was_visible) = self.observed.get_mut(&index) else {
            tracing::trace!(index, "visibility report for unobserved item");
            return None;
        };
        let visible = fraction >= self.threshold;
        if *was_visible == visible {
            return None;
        }
        *was_visible = visible;
        Some(VisibilityChanged { index, visible })
    }

    /// Detach every observation, e.g. on feed teardown.
    pub fn clear(&mut self) {
        for index in self.observed.drain().map(|(index, _)| index) {
            self.source.unobserve(index);
        }
    }
}

/// Visibility source for hosts that push fractions themselves and have no
/// observation to set up.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualVisibility;

impl VisibilitySource for ManualVisibility {
    type Handle = ();

    fn observe(&mut self, _index: usize, _handle: &()) {}

    fn unobserve(&mut self, _index: usize) {}
}
