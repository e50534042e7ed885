//! Product detail rendering.
//!
//! Rendering is split in two steps. [`detail_view`] maps a [`ProductDetail`]
//! onto a [`DetailView`]: which media to show, which labeled rows exist and in
//! what order, whether there is a badge or a description. [`render_detail`]
//! then serializes that view with maud. The field mapping can be tested
//! without looking at markup, and the markup is escaped by construction.

use maud::{Markup, PreEscaped, html};

use crate::config::{ContactConfig, DetailLabels};
use crate::contact::ContactLink;
use crate::types::ProductDetail;

const CHAT_ICON: &str = r#"<svg viewBox="0 0 32 32" width="18" height="18" fill="currentColor" aria-hidden="true"><path d="M16.004 0C7.166 0 .002 7.16.002 15.995c0 2.818.737 5.574 2.14 7.998L0 32l8.245-2.102a16.02 16.02 0 007.755 1.978h.004C24.838 31.876 32 24.716 32 15.995 32 7.16 24.838 0 16.004 0zm7.34 19.293c-.402-.202-2.38-1.174-2.75-1.31-.37-.132-.64-.2-.91.202-.27.4-1.045 1.31-1.282 1.58-.236.27-.473.304-.876.1-.402-.2-1.698-.626-3.234-1.995-1.195-1.066-2.002-2.383-2.237-2.785-.236-.402-.025-.62.177-.82.182-.18.402-.47.604-.706.2-.236.268-.404.402-.674.134-.27.067-.506-.033-.708-.1-.2-.91-2.192-1.247-3.002-.328-.788-.662-.682-.91-.694l-.774-.014c-.268 0-.706.1-1.076.506-.37.404-1.414 1.38-1.414 3.37 0 1.988 1.448 3.908 1.65 4.178.2.27 2.85 4.348 6.904 6.098.964.416 1.717.664 2.304.85.968.308 1.85.264 2.547.16.777-.116 2.38-.974 2.716-1.914.336-.94.336-1.746.236-1.914-.1-.168-.37-.268-.776-.47z"/></svg>"#;

/// Everything besides the product itself that the detail view needs.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub labels: DetailLabels,
    pub contact: ContactLink,
    pub message_prefix: String,
    pub button_label: String,
}

impl RenderContext {
    pub fn new(labels: DetailLabels, contact_config: &ContactConfig, contact: ContactLink) -> Self {
        Self {
            labels,
            contact,
            message_prefix: contact_config.message_prefix.clone(),
            button_label: contact_config.button_label.clone(),
        }
    }
}

/// Product image, or a single-letter stand-in when there is none.
#[derive(Debug, Clone, PartialEq)]
pub enum Media<'a> {
    Image { src: &'a str, alt: &'a str },
    /// First character of the name; `None` only for an empty name.
    Placeholder(Option<char>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow<'a> {
    pub label: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Description<'a> {
    pub heading: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactAction<'a> {
    pub href: String,
    pub label: &'a str,
}

/// Render model of the detail overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView<'a> {
    pub title: &'a str,
    /// Category shown above the title.
    pub badge: Option<&'a str>,
    pub media: Media<'a>,
    /// Origin, presentation, category; only those present, in that order.
    pub rows: Vec<DetailRow<'a>>,
    pub description: Option<Description<'a>>,
    pub contact: ContactAction<'a>,
}

/// Map a product onto its render model.
pub fn detail_view<'a>(detail: &'a ProductDetail, ctx: &'a RenderContext) -> DetailView<'a> {
    let media = match detail.image.as_deref() {
        Some(src) => Media::Image {
            src,
            alt: &detail.name,
        },
        None => Media::Placeholder(detail.name.chars().next()),
    };

    let rows = [
        (ctx.labels.origin.as_str(), detail.origin.as_deref()),
        (ctx.labels.presentation.as_str(), detail.presentation.as_deref()),
        (ctx.labels.category.as_str(), detail.category_name.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|value| DetailRow { label, value }))
    .collect();

    let description = detail.description.as_deref().map(|body| Description {
        heading: &ctx.labels.description,
        body,
    });

    let message = format!("{}{}", ctx.message_prefix, detail.name);

    DetailView {
        title: &detail.name,
        badge: detail.category_name.as_deref(),
        media,
        rows,
        description,
        contact: ContactAction {
            href: ctx.contact.message_url(&message),
            label: &ctx.button_label,
        },
    }
}

/// Serialize a detail view into the overlay body markup.
pub fn render_detail(view: &DetailView<'_>) -> Markup {
    html! {
        div.modal-img {
            @match &view.media {
                Media::Image { src, alt } => {
                    img src=(src) alt=(alt);
                }
                Media::Placeholder(glyph) => {
                    span.modal-placeholder {
                        @if let Some(glyph) = glyph { (glyph) }
                    }
                }
            }
        }
        div.modal-info {
            @if let Some(badge) = view.badge {
                span.modal-cat { (badge) }
            }
            h2.modal-title { (view.title) }
            @if !view.rows.is_empty() {
                div.modal-details {
                    @for row in &view.rows {
                        div.modal-detail-row {
                            strong { (row.label) }
                            span { (row.value) }
                        }
                    }
                }
            }
            @if let Some(desc) = &view.description {
                div.modal-desc {
                    h3 { (desc.heading) }
                    p { (desc.body) }
                }
            }
            a.btn.btn-primary.modal-wa-btn href=(view.contact.href) target="_blank" rel="noopener" {
                (view.contact.label) " "
                (PreEscaped(CHAT_ICON))
            }
        }
    }
}

/// Placeholder shown while the lookup is in flight.
pub fn render_loading(text: &str) -> Markup {
    html! {
        div.modal-loading { (text) }
    }
}

/// Generic failure message. Carries no detail about what went wrong.
pub fn render_error(text: &str) -> Markup {
    html! {
        div.modal-loading.modal-error role="alert" { (text) }
    }
}
