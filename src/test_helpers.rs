//! Shared test utilities for the vitrina test suite.
//!
//! Recording fakes for every seam the controllers talk through: the
//! intersection observer, the reveal/counter DOM effects, the overlay surface
//! and the product lookup transport.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let mut overlay = overlay_controller();
//! let pending = overlay.open(ProductSummary { slug: "cafe".into() });
//! assert!(overlay.surface().scroll_locked);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use maud::Markup;

use crate::config::EnhanceConfig;
use crate::contact::ContactLink;
use crate::fetch::{FetchError, LookupResponse, ProductLookup};
use crate::overlay::{OverlayController, OverlaySurface, OverlayTexts};
use crate::render::RenderContext;
use crate::reveal::RevealSurface;
use crate::visibility::Observer;

// =========================================================================
// Visibility
// =========================================================================

/// Observer that records subscriptions.
#[derive(Debug)]
pub struct RecordingObserver<T> {
    observed: Vec<T>,
}

impl<T> Default for RecordingObserver<T> {
    fn default() -> Self {
        Self {
            observed: Vec::new(),
        }
    }
}

impl<T: Clone + PartialEq> RecordingObserver<T> {
    /// Targets currently subscribed, in subscription order.
    pub fn observing(&self) -> Vec<T> {
        self.observed.clone()
    }
}

impl<T: Clone + PartialEq> Observer for RecordingObserver<T> {
    type Target = T;

    fn observe(&mut self, target: &T) {
        if !self.observed.contains(target) {
            self.observed.push(target.clone());
        }
    }

    fn unobserve(&mut self, target: &T) {
        self.observed.retain(|t| t != target);
    }
}

// =========================================================================
// Reveal effects
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Delay(u32, u32),
    Visible(u32),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
}

impl RevealSurface<u32> for RecordingSurface {
    fn set_delay(&mut self, element: &u32, delay_ms: u32) {
        self.ops.push(SurfaceOp::Delay(*element, delay_ms));
    }

    fn mark_visible(&mut self, element: &u32) {
        self.ops.push(SurfaceOp::Visible(*element));
    }
}

// =========================================================================
// Overlay
// =========================================================================

/// Overlay surface keeping the state a visitor would see.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeOverlay {
    pub content: String,
    pub visible: bool,
    pub scroll_locked: bool,
    pub scroll_unlocks: usize,
}

impl OverlaySurface for FakeOverlay {
    fn render(&mut self, content: Markup) {
        self.content = content.into_string();
    }

    fn clear(&mut self) {
        self.content.clear();
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        if self.scroll_locked && !locked {
            self.scroll_unlocks += 1;
        }
        self.scroll_locked = locked;
    }
}

/// Render context from stock config with a known phone number.
pub fn render_context() -> RenderContext {
    let config = EnhanceConfig::default();
    RenderContext::new(
        config.labels,
        &config.contact,
        ContactLink::new(config.contact.base.clone(), "595981123456"),
    )
}

/// Overlay controller over a [`FakeOverlay`] with stock texts.
pub fn overlay_controller() -> OverlayController<FakeOverlay> {
    let config = EnhanceConfig::default();
    OverlayController::new(
        FakeOverlay::default(),
        OverlayTexts {
            loading: config.overlay.loading_text,
            error: config.overlay.error_text,
        },
        render_context(),
    )
}

// =========================================================================
// Lookup transport
// =========================================================================

/// Lookup returning one canned outcome and remembering requested URLs.
#[derive(Debug, Clone)]
pub struct CannedLookup {
    outcome: Option<LookupResponse>,
    requested: Rc<RefCell<Vec<String>>>,
}

impl CannedLookup {
    pub fn ok(body: &str) -> Self {
        Self {
            outcome: Some(LookupResponse::ok(body)),
            requested: Rc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            outcome: None,
            requested: Rc::default(),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl ProductLookup for CannedLookup {
    async fn get(&self, url: &str) -> Result<LookupResponse, FetchError> {
        self.requested.borrow_mut().push(url.to_string());
        self.outcome
            .clone()
            .ok_or_else(|| FetchError::Transport("connection refused".to_string()))
    }
}
