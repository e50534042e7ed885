//! Small DOM helpers shared by the feature wiring.

use gloo::events::EventListener;
use gloo::utils::document;
use tracing::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

/// Run `f` once the document has been parsed.
pub fn on_ready(f: impl FnOnce() + 'static) {
    let doc = document();
    if doc.ready_state() == "loading" {
        EventListener::once(&doc, "DOMContentLoaded", move |_| f()).forget();
    } else {
        f();
    }
}

/// All elements matching `selector`, in document order.
pub fn query_all(selector: &str) -> Vec<Element> {
    let Ok(list) = document().query_selector_all(selector) else {
        debug!(selector, "invalid selector");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// First element matching `selector`.
pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok().flatten()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

/// Text content of the element with `id`, if present.
pub fn text_of(id: &str) -> Option<String> {
    by_id(id).and_then(|el| el.text_content())
}

pub fn add_class(element: &Element, class: &str) {
    if element.class_list().add_1(class).is_err() {
        debug!(class, "could not add class");
    }
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    if element.class_list().toggle_with_force(class, on).is_err() {
        debug!(class, "could not toggle class");
    }
}

/// Set an inline style property on an element, if it is an HTML element.
pub fn set_style(element: &Element, property: &str, value: &str) {
    let Some(html) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    if html.style().set_property(property, value).is_err() {
        debug!(property, "could not set style");
    }
}
