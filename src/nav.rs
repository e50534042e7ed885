//! Page chrome reactions: navbar styling, mobile menu, carousel pause.
//!
//! These carry no invariants beyond mirroring one boolean into the DOM. The
//! decisions live here so the browser glue only has to apply them.

/// Whether the navbar should wear its scrolled style at `scroll_y`.
pub fn navbar_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Open/closed state of the mobile navigation menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileNav {
    open: bool,
}

impl MobileNav {
    /// Flip the menu; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Following a menu link always closes the menu.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// CSS `animation-play-state` for a carousel track.
pub fn carousel_play_state(hovered: bool) -> &'static str {
    if hovered { "paused" } else { "running" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navbar_threshold_is_exclusive() {
        assert!(!navbar_scrolled(0.0, 20.0));
        assert!(!navbar_scrolled(20.0, 20.0));
        assert!(navbar_scrolled(20.5, 20.0));
    }

    #[test]
    fn mobile_nav_toggles_and_link_closes() {
        let mut nav = MobileNav::default();
        assert!(nav.toggle());
        assert!(nav.is_open());
        nav.close();
        assert!(!nav.is_open());
        assert!(nav.toggle());
        assert!(!nav.toggle());
    }

    #[test]
    fn carousel_pauses_while_hovered() {
        assert_eq!(carousel_play_state(true), "paused");
        assert_eq!(carousel_play_state(false), "running");
    }
}
