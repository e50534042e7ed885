//! Product detail overlay.
//!
//! ## Session lifecycle
//!
//! ```text
//!            open(slug)                 Ok(detail)
//!  Closed ─────────────▶ Loading ─────────────────▶ Loaded
//!    ▲                      │  Err(_)
//!    │                      └──────────▶ Error
//!    └──── close (control | backdrop | Escape) from any open phase
//! ```
//!
//! Every `open` issues a fresh [`RequestToken`] and makes it the session's
//! current one. The caller runs the fetch and reports back through
//! [`OverlayController::complete`] with the token it was given; results for
//! any other token (an earlier open, or a session that has since closed) are
//! dropped. In-flight requests are never aborted, only ignored.
//!
//! Opening locks page scrolling and every path back to `Closed` unlocks it.

use maud::Markup;
use tracing::debug;

use crate::fetch::FetchError;
use crate::render::{self, RenderContext};
use crate::types::{ProductDetail, ProductSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Loading,
    Loaded,
    Error,
}

/// Identifies one open request; compared on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// What triggered a close. All of them behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseControl,
    Backdrop,
    Escape,
}

/// Where a click inside the overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The overlay root itself, outside the content panel.
    Backdrop,
    /// Anything within the content panel.
    Panel,
}

/// Outcome of reporting a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied(Phase),
    /// The token was superseded or the overlay was closed; nothing rendered.
    Stale,
}

/// A lookup the caller must perform for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub token: RequestToken,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySession {
    pub phase: Phase,
    pub slug: Option<String>,
    token: Option<RequestToken>,
}

impl OverlaySession {
    fn closed() -> Self {
        Self {
            phase: Phase::Closed,
            slug: None,
            token: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }
}

/// DOM effects of the overlay.
pub trait OverlaySurface {
    /// Replace the content panel's markup.
    fn render(&mut self, content: Markup);
    /// Empty the content panel.
    fn clear(&mut self);
    fn set_visible(&mut self, visible: bool);
    /// Page-level scroll lock. Must end up unlocked on every close path.
    fn set_scroll_locked(&mut self, locked: bool);
}

/// User-facing texts of the non-detail states.
#[derive(Debug, Clone)]
pub struct OverlayTexts {
    pub loading: String,
    pub error: String,
}

pub struct OverlayController<S> {
    surface: S,
    session: OverlaySession,
    last_token: u64,
    texts: OverlayTexts,
    render_context: RenderContext,
}

impl<S: OverlaySurface> OverlayController<S> {
    pub fn new(surface: S, texts: OverlayTexts, render_context: RenderContext) -> Self {
        Self {
            surface,
            session: OverlaySession::closed(),
            last_token: 0,
            texts,
            render_context,
        }
    }

    /// Start a session for `product`, superseding any current one.
    pub fn open(&mut self, product: ProductSummary) -> PendingRequest {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        if self.session.is_open() {
            debug!(
                previous = ?self.session.slug,
                next = %product.slug,
                "superseding overlay session"
            );
        }
        self.surface.render(render::render_loading(&self.texts.loading));
        self.surface.set_visible(true);
        self.surface.set_scroll_locked(true);
        self.session = OverlaySession {
            phase: Phase::Loading,
            slug: Some(product.slug.clone()),
            token: Some(token),
        };
        debug!(slug = %product.slug, ?token, "overlay opened");
        PendingRequest {
            token,
            slug: product.slug,
        }
    }

    /// Report the lookup result for `token`.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<ProductDetail, FetchError>,
    ) -> Completion {
        if self.session.token != Some(token) || self.session.phase != Phase::Loading {
            debug!(?token, "dropping stale product detail");
            return Completion::Stale;
        }
        let phase = match result {
            Ok(detail) => {
                let view = render::detail_view(&detail, &self.render_context);
                self.surface.render(render::render_detail(&view));
                Phase::Loaded
            }
            Err(_) => {
                self.surface.render(render::render_error(&self.texts.error));
                Phase::Error
            }
        };
        self.session.phase = phase;
        Completion::Applied(phase)
    }

    /// Close the overlay. Returns false if it was already closed.
    pub fn close(&mut self, trigger: CloseTrigger) -> bool {
        if !self.session.is_open() {
            return false;
        }
        self.surface.set_visible(false);
        self.surface.clear();
        self.surface.set_scroll_locked(false);
        debug!(?trigger, slug = ?self.session.slug, "overlay closed");
        self.session = OverlaySession::closed();
        true
    }

    /// Clicks on the backdrop close; clicks inside the panel do not.
    pub fn handle_click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Backdrop => self.close(CloseTrigger::Backdrop),
            ClickTarget::Panel => false,
        }
    }

    /// Escape closes an open overlay; every other key is ignored.
    pub fn handle_key(&mut self, key: &str) -> bool {
        key == "Escape" && self.close(CloseTrigger::Escape)
    }

    pub fn session(&self) -> &OverlaySession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FakeOverlay, overlay_controller};

    fn product(slug: &str) -> ProductSummary {
        ProductSummary {
            slug: slug.to_string(),
        }
    }

    fn cafe() -> ProductDetail {
        ProductDetail {
            origin: Some("Huila".to_string()),
            ..ProductDetail::named("Café")
        }
    }

    #[test]
    fn open_shows_loading_and_locks_scroll() {
        let mut overlay = overlay_controller();
        let pending = overlay.open(product("cafe"));

        assert_eq!(pending.slug, "cafe");
        assert_eq!(overlay.phase(), Phase::Loading);
        let surface = overlay.surface();
        assert!(surface.visible);
        assert!(surface.scroll_locked);
        assert!(surface.content.contains("Cargando..."));
    }

    #[test]
    fn success_renders_detail() {
        let mut overlay = overlay_controller();
        let pending = overlay.open(product("cafe"));
        let completion = overlay.complete(pending.token, Ok(cafe()));

        assert_eq!(completion, Completion::Applied(Phase::Loaded));
        let content = &overlay.surface().content;
        assert!(content.contains(r#"<span class="modal-placeholder">C</span>"#));
        assert!(content.contains("<strong>Origen</strong><span>Huila</span>"));
    }

    #[test]
    fn failure_renders_error_and_keeps_scroll_locked_until_close() {
        let mut overlay = overlay_controller();
        let pending = overlay.open(product("cafe"));
        let failure = Err(FetchError::Transport("offline".into()));
        let completion = overlay.complete(pending.token, failure);

        assert_eq!(completion, Completion::Applied(Phase::Error));
        assert!(overlay.surface().content.contains("Error al cargar el producto."));
        assert!(overlay.surface().scroll_locked);

        assert!(overlay.close(CloseTrigger::CloseControl));
        assert!(!overlay.surface().scroll_locked);
        assert_eq!(overlay.phase(), Phase::Closed);
    }

    #[test]
    fn later_open_wins_over_earlier_response() {
        let mut overlay = overlay_controller();
        let first = overlay.open(product("cafe"));
        let second = overlay.open(product("soja"));
        assert_ne!(first.token, second.token);

        assert_eq!(overlay.complete(first.token, Ok(cafe())), Completion::Stale);
        assert!(!overlay.surface().content.contains("Café"));
        assert_eq!(overlay.phase(), Phase::Loading);

        let completion = overlay.complete(second.token, Ok(ProductDetail::named("Soja")));
        assert_eq!(completion, Completion::Applied(Phase::Loaded));
        assert!(overlay.surface().content.contains("Soja"));

        // Arriving even later changes nothing.
        assert_eq!(overlay.complete(first.token, Ok(cafe())), Completion::Stale);
        assert!(!overlay.surface().content.contains("Café"));
    }

    #[test]
    fn stale_failure_does_not_override_current_session() {
        let mut overlay = overlay_controller();
        let first = overlay.open(product("cafe"));
        let second = overlay.open(product("soja"));
        overlay.complete(second.token, Ok(ProductDetail::named("Soja")));

        let completion = overlay.complete(first.token, Err(FetchError::Status(500)));
        assert_eq!(completion, Completion::Stale);
        assert_eq!(overlay.phase(), Phase::Loaded);
    }

    #[test]
    fn result_after_close_is_dropped() {
        let mut overlay = overlay_controller();
        let pending = overlay.open(product("cafe"));
        overlay.close(CloseTrigger::Escape);

        assert_eq!(overlay.complete(pending.token, Ok(cafe())), Completion::Stale);
        assert_eq!(overlay.surface().content, "");
        assert!(!overlay.surface().visible);
    }

    #[test]
    fn duplicate_completion_is_dropped() {
        let mut overlay = overlay_controller();
        let pending = overlay.open(product("cafe"));
        overlay.complete(pending.token, Ok(cafe()));
        assert_eq!(
            overlay.complete(pending.token, Err(FetchError::Status(500))),
            Completion::Stale
        );
        assert_eq!(overlay.phase(), Phase::Loaded);
    }

    #[test]
    fn every_close_path_ends_in_the_same_state() {
        let closers: [fn(&mut OverlayController<FakeOverlay>) -> bool; 3] = [
            |o| o.close(CloseTrigger::CloseControl),
            |o| o.handle_click(ClickTarget::Backdrop),
            |o| o.handle_key("Escape"),
        ];
        let mut states = Vec::new();
        for close in closers {
            let mut overlay = overlay_controller();
            let pending = overlay.open(product("cafe"));
            overlay.complete(pending.token, Ok(cafe()));
            assert!(close(&mut overlay));
            states.push((overlay.session().clone(), overlay.surface().clone()));
        }
        assert!(states.windows(2).all(|w| w[0] == w[1]));
        let (session, surface) = &states[0];
        assert_eq!(session.phase, Phase::Closed);
        assert_eq!(session.slug, None);
        assert!(!surface.scroll_locked);
        assert!(!surface.visible);
        assert_eq!(surface.content, "");
    }

    #[test]
    fn close_is_idempotent() {
        let mut overlay = overlay_controller();
        assert!(!overlay.close(CloseTrigger::CloseControl));
        overlay.open(product("cafe"));
        assert!(overlay.close(CloseTrigger::CloseControl));
        assert!(!overlay.close(CloseTrigger::Escape));
        assert_eq!(overlay.surface().scroll_unlocks, 1);
    }

    #[test]
    fn panel_clicks_and_other_keys_keep_it_open() {
        let mut overlay = overlay_controller();
        overlay.open(product("cafe"));
        assert!(!overlay.handle_click(ClickTarget::Panel));
        assert!(!overlay.handle_key("Enter"));
        assert_eq!(overlay.phase(), Phase::Loading);
    }

    #[test]
    fn escape_while_closed_is_a_no_op() {
        let mut overlay = overlay_controller();
        assert!(!overlay.handle_key("Escape"));
        assert_eq!(overlay.surface().scroll_unlocks, 0);
    }
}
