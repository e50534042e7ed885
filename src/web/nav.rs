//! Navigation bar, mobile menu and client carousel.

use std::cell::Cell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::utils::window;
use tracing::debug;

use super::dom;
use crate::config::NavConfig;
use crate::nav::{MobileNav, carousel_play_state, navbar_scrolled};

pub fn activate(config: &NavConfig) {
    watch_scroll(config);
    wire_mobile_menu(config);
    pause_carousels_on_hover(config);
}

fn watch_scroll(config: &NavConfig) {
    let Some(navbar) = dom::by_id(&config.navbar_id) else {
        return;
    };
    let class = config.scrolled_class.clone();
    let threshold = config.scroll_threshold;
    let update = move || {
        let y = window().scroll_y().unwrap_or(0.0);
        dom::set_class(&navbar, &class, navbar_scrolled(y, threshold));
    };
    update();
    EventListener::new(&window(), "scroll", move |_| update()).forget();
}

fn wire_mobile_menu(config: &NavConfig) {
    let (Some(toggle), Some(links)) = (dom::by_id(&config.toggle_id), dom::by_id(&config.links_id))
    else {
        debug!("no mobile navigation");
        return;
    };
    let state = Rc::new(Cell::new(MobileNav::default()));

    {
        let state = Rc::clone(&state);
        let (toggle_el, links_el) = (toggle.clone(), links.clone());
        let toggle_class = config.toggle_active_class.clone();
        let links_class = config.links_open_class.clone();
        EventListener::new(&toggle, "click", move |_| {
            let mut nav = state.get();
            let open = nav.toggle();
            state.set(nav);
            dom::set_class(&toggle_el, &toggle_class, open);
            dom::set_class(&links_el, &links_class, open);
        })
        .forget();
    }

    for link in dom::query_all(&format!("#{} a", config.links_id)) {
        let state = Rc::clone(&state);
        let (toggle_el, links_el) = (toggle.clone(), links.clone());
        let toggle_class = config.toggle_active_class.clone();
        let links_class = config.links_open_class.clone();
        EventListener::new(&link, "click", move |_| {
            let mut nav = state.get();
            nav.close();
            state.set(nav);
            dom::set_class(&toggle_el, &toggle_class, false);
            dom::set_class(&links_el, &links_class, false);
        })
        .forget();
    }
}

fn pause_carousels_on_hover(config: &NavConfig) {
    for track in dom::query_all(&config.carousel_selector) {
        for (event, hovered) in [("mouseenter", true), ("mouseleave", false)] {
            let el = track.clone();
            EventListener::new(&track, event, move |_| {
                dom::set_style(&el, "animation-play-state", carousel_play_state(hovered));
            })
            .forget();
        }
    }
}
