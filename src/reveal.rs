//! Scroll reveal.
//!
//! Elements start hidden (by stylesheet) and receive the visible class the
//! first time they scroll into view. Neighbouring elements get increasing
//! transition delays so a row of cards fades in as a wave; the wave repeats
//! every `stagger_buckets` elements so long lists never accumulate large
//! delays.
//!
//! Each target transitions `Pending → Visible` at most once and is
//! unsubscribed from the observer as it does, so later crossings (scrolling
//! back up, resizes) never hide it again.

use tracing::debug;

use crate::config::RevealConfig;
use crate::visibility::{Observer, VisibilityEvent, VisibilitySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Visible,
}

#[derive(Debug)]
pub struct RevealTarget<T> {
    pub element: T,
    pub state: RevealState,
    /// Position in document order, before wrapping into buckets.
    pub stagger_index: usize,
}

/// DOM effects of the reveal controller.
pub trait RevealSurface<T> {
    fn set_delay(&mut self, element: &T, delay_ms: u32);
    fn mark_visible(&mut self, element: &T);
}

/// Transition delay for the `index`-th element.
///
/// `(index mod buckets) * step`: with the stock 4 × 80ms this cycles
/// 0, 80, 160, 240, 0, 80, ...
pub fn stagger_delay_ms(index: usize, step_ms: u32, buckets: usize) -> u32 {
    if buckets == 0 {
        return 0;
    }
    (index % buckets) as u32 * step_ms
}

#[derive(Debug)]
pub struct RevealController<T> {
    targets: Vec<RevealTarget<T>>,
}

impl<T: PartialEq> RevealController<T> {
    /// Set up every element for revealing.
    ///
    /// With a native source each element gets its stagger delay and is
    /// subscribed. With the fallback every element is marked visible on the
    /// spot, without delays.
    pub fn activate<O, S>(
        elements: Vec<T>,
        config: &RevealConfig,
        source: &mut VisibilitySource<O>,
        surface: &mut S,
    ) -> Self
    where
        O: Observer<Target = T>,
        S: RevealSurface<T>,
    {
        let native = source.is_native();
        let mut targets = Vec::with_capacity(elements.len());
        for (stagger_index, element) in elements.into_iter().enumerate() {
            let state = if native {
                let delay =
                    stagger_delay_ms(stagger_index, config.stagger_step_ms, config.stagger_buckets);
                surface.set_delay(&element, delay);
                source.observe(&element);
                RevealState::Pending
            } else {
                surface.mark_visible(&element);
                RevealState::Visible
            };
            targets.push(RevealTarget {
                element,
                state,
                stagger_index,
            });
        }
        debug!(count = targets.len(), native, "scroll reveal activated");
        Self { targets }
    }

    /// Apply one visibility event. Returns true if it revealed a target.
    pub fn handle<O, S>(
        &mut self,
        event: &VisibilityEvent<T>,
        observer: &mut O,
        surface: &mut S,
    ) -> bool
    where
        O: Observer<Target = T>,
        S: RevealSurface<T>,
    {
        if !event.is_visible {
            return false;
        }
        let Some(target) = self.targets.iter_mut().find(|t| t.element == event.target) else {
            return false;
        };
        if target.state == RevealState::Visible {
            return false;
        }
        target.state = RevealState::Visible;
        surface.mark_visible(&target.element);
        observer.unobserve(&target.element);
        debug!(index = target.stagger_index, "revealed");
        true
    }

    pub fn targets(&self) -> &[RevealTarget<T>] {
        &self.targets
    }

    pub fn pending(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| t.state == RevealState::Pending)
            .count()
    }
}
