//! End-to-end overlay sessions: card click to rendered detail, through the
//! fetch pipeline, with results arriving in arbitrary order.
//!
//! Run with: cargo test --test overlay_session

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::executor::block_on;
use maud::Markup;
use vitrina::config::EnhanceConfig;
use vitrina::contact::ContactLink;
use vitrina::fetch::{DetailPipeline, FetchError, LookupResponse, ProductLookup};
use vitrina::overlay::{
    ClickTarget, CloseTrigger, Completion, OverlayController, OverlaySurface, OverlayTexts, Phase,
};
use vitrina::render::RenderContext;
use vitrina::types::ProductSummary;

/// What a visitor would see.
#[derive(Debug, Clone, Default, PartialEq)]
struct Screen {
    content: String,
    visible: bool,
    scroll_locked: bool,
}

#[derive(Clone, Default)]
struct SharedScreen(Rc<RefCell<Screen>>);

impl SharedScreen {
    fn snapshot(&self) -> Screen {
        self.0.borrow().clone()
    }
}

impl OverlaySurface for SharedScreen {
    fn render(&mut self, content: Markup) {
        self.0.borrow_mut().content = content.into_string();
    }

    fn clear(&mut self) {
        self.0.borrow_mut().content.clear();
    }

    fn set_visible(&mut self, visible: bool) {
        self.0.borrow_mut().visible = visible;
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.0.borrow_mut().scroll_locked = locked;
    }
}

/// Catalog service answering from a fixed table; unknown URLs are 404.
struct Catalog {
    products: HashMap<String, String>,
}

impl Catalog {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            products: entries
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
        }
    }
}

impl ProductLookup for Catalog {
    async fn get(&self, url: &str) -> Result<LookupResponse, FetchError> {
        Ok(match self.products.get(url) {
            Some(body) => LookupResponse::ok(body.clone()),
            None => LookupResponse {
                status: 404,
                body: "{\"detail\":\"Not found\"}".to_string(),
            },
        })
    }
}

struct Page {
    overlay: OverlayController<SharedScreen>,
    screen: SharedScreen,
    pipeline: DetailPipeline<Catalog>,
}

fn page() -> Page {
    let config = EnhanceConfig::default();
    let screen = SharedScreen::default();
    let href = Some("https://wa.me/595981123456");
    let contact = ContactLink::from_page_href(&config.contact.base, href);
    let overlay = OverlayController::new(
        screen.clone(),
        OverlayTexts {
            loading: config.overlay.loading_text.clone(),
            error: config.overlay.error_text.clone(),
        },
        RenderContext::new(config.labels.clone(), &config.contact, contact),
    );
    let catalog = Catalog::new(&[
        (
            "/api/producto/cafe",
            r#"{"name":"Café","origin":"Huila","image":null,"description":""}"#,
        ),
        (
            "/api/producto/yerba",
            r#"{"name":"Yerba Mate","category_name":"Infusiones","presentation":"500 g","image":"/media/yerba.webp"}"#,
        ),
    ]);
    Page {
        overlay,
        screen,
        pipeline: DetailPipeline::new(catalog, config.overlay.api_base),
    }
}

fn card(slug: &str) -> ProductSummary {
    ProductSummary {
        slug: slug.to_string(),
    }
}

#[test]
fn clicking_a_card_renders_its_detail() {
    let mut page = page();
    let pending = page.overlay.open(card("cafe"));
    assert!(page.screen.snapshot().content.contains("Cargando..."));

    let result = block_on(page.pipeline.fetch(&pending.slug));
    assert_eq!(
        page.overlay.complete(pending.token, result),
        Completion::Applied(Phase::Loaded)
    );

    let screen = page.screen.snapshot();
    assert!(screen.visible);
    assert!(screen.scroll_locked);
    assert!(screen.content.contains(r#"<h2 class="modal-title">Café</h2>"#));
    assert!(screen.content.contains("<strong>Origen</strong><span>Huila</span>"));
    assert!(screen.content.contains(r#"<span class="modal-placeholder">C</span>"#));
    assert!(!screen.content.contains("modal-desc"));
    assert!(!screen.content.contains("modal-cat"));
    assert!(screen.content.contains(
        "https://wa.me/595981123456?text=Hola%2C%20me%20interesa%20el%20producto%3A%20Caf%C3%A9"
    ));
}

#[test]
fn full_detail_shows_badge_image_and_rows_in_order() {
    let mut page = page();
    let pending = page.overlay.open(card("yerba"));
    let result = block_on(page.pipeline.fetch(&pending.slug));
    page.overlay.complete(pending.token, result);

    let content = page.screen.snapshot().content;
    assert!(content.contains(r#"<span class="modal-cat">Infusiones</span>"#));
    assert!(content.contains(r#"<img src="/media/yerba.webp" alt="Yerba Mate">"#));
    let presentation = content.find("Presentación").expect("presentation row");
    let category = content.find("<strong>Categoría").expect("category row");
    assert!(presentation < category);
}

#[test]
fn newest_open_wins_regardless_of_arrival_order() {
    let mut page = page();
    let first = page.overlay.open(card("cafe"));
    let second = page.overlay.open(card("yerba"));
    assert_ne!(first.token, second.token);

    let second_result = block_on(page.pipeline.fetch(&second.slug));
    assert_eq!(
        page.overlay.complete(second.token, second_result),
        Completion::Applied(Phase::Loaded)
    );

    let first_result = block_on(page.pipeline.fetch(&first.slug));
    assert_eq!(page.overlay.complete(first.token, first_result), Completion::Stale);

    let content = page.screen.snapshot().content;
    assert!(content.contains("Yerba Mate"));
    assert!(!content.contains("Café"));
    assert_eq!(page.overlay.session().slug.as_deref(), Some("yerba"));
}

#[test]
fn every_close_trigger_leaves_the_same_page() {
    let mut end_states = Vec::new();
    for trigger in [CloseTrigger::CloseControl, CloseTrigger::Backdrop, CloseTrigger::Escape] {
        let mut page = page();
        let pending = page.overlay.open(card("cafe"));
        let result = block_on(page.pipeline.fetch(&pending.slug));
        page.overlay.complete(pending.token, result);

        let closed = match trigger {
            CloseTrigger::CloseControl => page.overlay.close(trigger),
            CloseTrigger::Backdrop => page.overlay.handle_click(ClickTarget::Backdrop),
            CloseTrigger::Escape => page.overlay.handle_key("Escape"),
        };
        assert!(closed);
        assert_eq!(page.overlay.phase(), Phase::Closed);
        end_states.push(page.screen.snapshot());
    }

    assert!(end_states.windows(2).all(|w| w[0] == w[1]));
    assert!(!end_states[0].visible);
    assert!(!end_states[0].scroll_locked);
}

#[test]
fn clicks_inside_the_panel_and_other_keys_keep_it_open() {
    let mut page = page();
    page.overlay.open(card("cafe"));
    assert!(!page.overlay.handle_click(ClickTarget::Panel));
    assert!(!page.overlay.handle_key("Enter"));
    assert!(page.overlay.session().is_open());
    assert!(page.screen.snapshot().scroll_locked);
}

#[test]
fn unknown_product_shows_error_and_closes_cleanly() {
    let mut page = page();
    let pending = page.overlay.open(card("does-not-exist"));
    let result = block_on(page.pipeline.fetch(&pending.slug));
    assert!(matches!(result, Err(FetchError::Status(404))));

    assert_eq!(
        page.overlay.complete(pending.token, result),
        Completion::Applied(Phase::Error)
    );
    let screen = page.screen.snapshot();
    assert!(screen.content.contains("Error al cargar el producto."));
    assert!(!screen.content.contains("404"));

    assert!(page.overlay.handle_key("Escape"));
    let screen = page.screen.snapshot();
    assert!(!screen.visible);
    assert!(!screen.scroll_locked);
}

#[test]
fn result_arriving_after_close_is_dropped() {
    let mut page = page();
    let pending = page.overlay.open(card("cafe"));
    page.overlay.close(CloseTrigger::CloseControl);

    let result = block_on(page.pipeline.fetch(&pending.slug));
    assert_eq!(page.overlay.complete(pending.token, result), Completion::Stale);

    let screen = page.screen.snapshot();
    assert!(!screen.visible);
    assert!(screen.content.is_empty());
    assert!(!screen.scroll_locked);
}
