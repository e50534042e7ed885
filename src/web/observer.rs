//! `IntersectionObserver` behind the [`Observer`] trait.

use gloo::utils::window;
use js_sys::{Array, Reflect};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::visibility::{ObserveOptions, Observer, VisibilityEvent};

pub struct DomObserver {
    inner: IntersectionObserver,
}

impl Observer for DomObserver {
    type Target = Element;

    fn observe(&mut self, target: &Element) {
        self.inner.observe(target);
    }

    fn unobserve(&mut self, target: &Element) {
        self.inner.unobserve(target);
    }
}

/// Whether the browser exposes `IntersectionObserver` at all.
pub fn supported() -> bool {
    Reflect::has(&window(), &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

/// Create an observer delivering batches of crossings to `on_events`.
///
/// Returns `None` when the capability is missing or construction fails; the
/// caller then falls back to always-visible.
pub fn create<F>(options: &ObserveOptions, mut on_events: F) -> Option<DomObserver>
where
    F: FnMut(Vec<VisibilityEvent<Element>>, &mut DomObserver) + 'static,
{
    if !supported() {
        return None;
    }

    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        let events = entries
            .iter()
            .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
            .map(|entry| VisibilityEvent {
                target: entry.target(),
                is_visible: entry.is_intersecting(),
            })
            .collect();
        on_events(events, &mut DomObserver { inner: observer });
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin.to_css());

    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(inner) => {
            callback.forget();
            Some(DomObserver { inner })
        }
        Err(err) => {
            warn!(error = ?err, "IntersectionObserver construction failed");
            None
        }
    }
}
