//! Product overlay wiring: card clicks, the three close triggers, and the
//! `fetch`-backed lookup.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::net::http::Request;
use gloo::utils::document;
use maud::Markup;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, KeyboardEvent};

use super::dom;
use crate::config::EnhanceConfig;
use crate::contact::ContactLink;
use crate::fetch::{DetailPipeline, FetchError, LookupResponse, ProductLookup};
use crate::overlay::{ClickTarget, CloseTrigger, OverlayController, OverlaySurface, OverlayTexts};
use crate::render::RenderContext;
use crate::types::ProductSummary;

struct DomOverlay {
    root: Element,
    body: Element,
    active_class: String,
}

impl OverlaySurface for DomOverlay {
    fn render(&mut self, content: Markup) {
        self.body.set_inner_html(&content.into_string());
    }

    fn clear(&mut self) {
        self.body.set_inner_html("");
    }

    fn set_visible(&mut self, visible: bool) {
        dom::set_class(&self.root, &self.active_class, visible);
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        let Some(page) = document().body() else {
            return;
        };
        let style = page.style();
        let result = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if result.is_err() {
            debug!(locked, "could not change page scroll lock");
        }
    }
}

/// [`ProductLookup`] over the browser's `fetch`.
struct BrowserLookup;

impl ProductLookup for BrowserLookup {
    async fn get(&self, url: &str) -> Result<LookupResponse, FetchError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Ok(LookupResponse { status, body })
    }
}

type SharedOverlay = Rc<RefCell<OverlayController<DomOverlay>>>;

pub fn activate(config: &EnhanceConfig) {
    let overlay_config = &config.overlay;
    let Some(root) = dom::by_id(&overlay_config.root_id) else {
        debug!(id = %overlay_config.root_id, "no overlay root, product details disabled");
        return;
    };
    let Some(body) = root.query_selector(&overlay_config.body_selector).ok().flatten() else {
        warn!(selector = %overlay_config.body_selector, "overlay root has no content panel");
        return;
    };

    let href = dom::query(&config.contact.link_selector).and_then(|el| el.get_attribute("href"));
    let contact = ContactLink::from_page_href(&config.contact.base, href.as_deref());
    if contact.digits().is_empty() {
        warn!("no contact number found on the page");
    }

    let surface = DomOverlay {
        root: root.clone(),
        body,
        active_class: overlay_config.active_class.clone(),
    };
    let texts = OverlayTexts {
        loading: overlay_config.loading_text.clone(),
        error: overlay_config.error_text.clone(),
    };
    let render_context = RenderContext::new(config.labels.clone(), &config.contact, contact);
    let overlay: SharedOverlay = Rc::new(RefCell::new(OverlayController::new(
        surface,
        texts,
        render_context,
    )));
    let pipeline = Rc::new(DetailPipeline::new(BrowserLookup, overlay_config.api_base.clone()));

    listen_for_cards(
        &overlay,
        &pipeline,
        overlay_config.card_selector.clone(),
        overlay_config.slug_attribute.clone(),
    );
    listen_for_close(&overlay, &root, &overlay_config.close_id);
}

fn listen_for_cards(
    overlay: &SharedOverlay,
    pipeline: &Rc<DetailPipeline<BrowserLookup>>,
    card_selector: String,
    slug_attribute: String,
) {
    let overlay = Rc::clone(overlay);
    let pipeline = Rc::clone(pipeline);
    let options = EventListenerOptions::enable_prevent_default();
    EventListener::new_with_options(&document(), "click", options, move |event| {
        let Some(card) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(&card_selector).ok().flatten())
        else {
            return;
        };
        let Some(slug) = card.get_attribute(&slug_attribute).filter(|s| !s.is_empty()) else {
            return;
        };
        event.prevent_default();

        let pending = overlay.borrow_mut().open(ProductSummary { slug });
        let overlay = Rc::clone(&overlay);
        let pipeline = Rc::clone(&pipeline);
        spawn_local(async move {
            let result = pipeline.fetch(&pending.slug).await;
            overlay.borrow_mut().complete(pending.token, result);
        });
    })
    .forget();
}

fn listen_for_close(overlay: &SharedOverlay, root: &Element, close_id: &str) {
    match dom::by_id(close_id) {
        Some(control) => {
            let overlay = Rc::clone(overlay);
            EventListener::new(&control, "click", move |_| {
                overlay.borrow_mut().close(CloseTrigger::CloseControl);
            })
            .forget();
        }
        None => debug!(id = close_id, "no overlay close control"),
    }

    {
        let overlay = Rc::clone(overlay);
        let backdrop = root.clone();
        EventListener::new(root, "click", move |event| {
            let on_backdrop = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .is_some_and(|el| el == backdrop);
            let target = if on_backdrop {
                ClickTarget::Backdrop
            } else {
                ClickTarget::Panel
            };
            overlay.borrow_mut().handle_click(target);
        })
        .forget();
    }

    let overlay = Rc::clone(overlay);
    EventListener::new(&document(), "keydown", move |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
            overlay.borrow_mut().handle_key(&key);
        }
    })
    .forget();
}
