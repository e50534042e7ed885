//! # Vitrina
//!
//! Client-side enhancements for a product catalog site, compiled to
//! WebAssembly. The server renders plain HTML; vitrina adds the motion and the
//! quick-look product viewer on top:
//!
//! - **Scroll reveal**: marked elements fade in the first time they scroll
//!   into view, in staggered waves.
//! - **Counters**: statistics count up from zero once their block is visible.
//! - **Product overlay**: clicking a product card opens an overlay, fetches
//!   the product from the lookup endpoint and renders it, with a prefilled
//!   messaging-app link for enquiries.
//! - **Page chrome**: navbar scrolled style, mobile menu, carousel pause on
//!   hover.
//!
//! # Architecture: Pure Core, Thin Browser Glue
//!
//! ```text
//!  DOM events ──▶ web::*  ──▶ controllers (reveal, counter, overlay)
//!                   ▲                 │
//!                   └── surfaces ◀────┘   (Observer, RevealSurface, OverlaySurface)
//! ```
//!
//! Every controller is a plain state machine that talks to the page only
//! through a small trait. The `web` module (compiled for `wasm32` only)
//! implements those traits on top of `web-sys` and `gloo`; tests implement
//! them with recording fakes. Nothing outside `web` touches the DOM, so the
//! whole behaviour is exercised by `cargo test` on the host.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Embedded TOML config: loading, merging over stock defaults, validation |
//! | [`visibility`] | Intersection observation seam: native observer or always-visible fallback |
//! | [`reveal`] | One-shot staggered reveal of marked elements |
//! | [`counter`] | One-shot eased counting runs and locale number grouping |
//! | [`overlay`] | Overlay session state machine with token-based supersession |
//! | [`fetch`] | Product lookup pipeline and its single error signal |
//! | [`render`] | Product → render model → maud markup |
//! | [`contact`] | Messaging-app deep links built from the page's contact link |
//! | [`nav`] | Navbar, mobile menu and carousel decisions |
//! | [`types`] | Product payload types |
//!
//! # Design Decisions
//!
//! ## Capability Chosen Once
//!
//! Whether the browser has `IntersectionObserver` is decided at startup and
//! captured in [`visibility::VisibilitySource`]. Controllers branch on the
//! variant instead of probing the platform, and the fallback is deterministic:
//! everything is visible immediately.
//!
//! ## Tokens Instead of Aborts
//!
//! Opening the overlay while a lookup is still in flight does not abort it.
//! Each open gets a fresh [`overlay::RequestToken`]; the late response is
//! compared against the session's current token and dropped on mismatch.
//!
//! ## Render Model Before Markup
//!
//! Which rows, badge and media a product gets is decided by
//! [`render::detail_view`] as data. Markup comes from maud, so product text is
//! escaped by construction.

pub mod config;
pub mod contact;
pub mod counter;
pub mod fetch;
pub mod nav;
pub mod overlay;
pub mod render;
pub mod reveal;
pub mod types;
pub mod visibility;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Build identifier logged at startup.
///
/// The package version on a release tag, `dev@<short hash>` otherwise.
pub fn version_string() -> String {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION").to_string();
    }
    match env!("GIT_HASH") {
        "" => "dev@unknown".to_string(),
        hash => format!("dev@{hash}"),
    }
}
