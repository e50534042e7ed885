//! Viewport visibility as seen by the animation controllers.
//!
//! The browser's intersection primitive is wrapped behind [`Observer`] so the
//! reveal and counter controllers can be driven by recorded events in tests.
//! Whether the primitive exists at all is decided once at startup and captured
//! in [`VisibilitySource`]: with no native observer every target is treated as
//! immediately and permanently visible.

use serde::{Deserialize, Serialize};

/// Pixel offsets applied to the viewport edges before intersecting.
///
/// Negative values shrink the viewport, so a negative `bottom` makes targets
/// count as visible only once they are that far above the bottom edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RootMargin {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl RootMargin {
    /// Render in the CSS margin shorthand the browser expects.
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Observation parameters, fixed when an observer is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Visible fraction of the target, in `0.0..=1.0`.
    pub threshold: f64,
    pub root_margin: RootMargin,
}

/// One threshold crossing for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEvent<T> {
    pub target: T,
    /// True when the target is now at least `threshold` visible.
    pub is_visible: bool,
}

impl<T> VisibilityEvent<T> {
    pub fn visible(target: T) -> Self {
        Self {
            target,
            is_visible: true,
        }
    }

    pub fn hidden(target: T) -> Self {
        Self {
            target,
            is_visible: false,
        }
    }
}

/// A native intersection observer.
///
/// Events are delivered by the platform to whichever controller owns the
/// observer; this trait only covers subscription.
pub trait Observer {
    type Target;

    fn observe(&mut self, target: &Self::Target);
    fn unobserve(&mut self, target: &Self::Target);
}

/// Where visibility information comes from, chosen once at startup.
#[derive(Debug)]
pub enum VisibilitySource<O> {
    /// The platform reports crossings through `O`.
    Native(O),
    /// No intersection capability: everything counts as visible right away.
    AlwaysVisible,
}

impl<O> VisibilitySource<O> {
    /// Select the native variant when an observer could be created.
    pub fn detect(observer: Option<O>) -> Self {
        match observer {
            Some(observer) => Self::Native(observer),
            None => Self::AlwaysVisible,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }
}

impl<O: Observer> VisibilitySource<O> {
    /// Subscribe `target`. A no-op for the fallback.
    pub fn observe(&mut self, target: &O::Target) {
        if let Self::Native(observer) = self {
            observer.observe(target);
        }
    }

    /// Unsubscribe `target`. A no-op for the fallback.
    pub fn unobserve(&mut self, target: &O::Target) {
        if let Self::Native(observer) = self {
            observer.unobserve(target);
        }
    }
}
