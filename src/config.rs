//! Enhancement configuration.
//!
//! Every selector, threshold, timing constant, endpoint and user-visible label
//! the controllers use lives here. Stock defaults match the catalog site's
//! markup; a page can override any subset by embedding a TOML document:
//!
//! ```html
//! <script type="application/toml" id="vitrina-config">
//! [overlay]
//! api_base = "/api/v2/product/"
//!
//! [counters]
//! duration_ms = 1500
//! </script>
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [reveal]
//! selector = ".reveal"
//! visible_class = "visible"
//! threshold = 0.12
//! stagger_step_ms = 80
//! stagger_buckets = 4
//!
//! [reveal.root_margin]
//! top = 0
//! right = 0
//! bottom = -30
//! left = 0
//!
//! [counters]
//! selector = ".stat-num[data-target]"
//! container_selector = ".stats"
//! target_attribute = "data-target"
//! threshold = 0.3
//! duration_ms = 2000
//! group_separator = "."
//! min_grouping_digits = 2
//!
//! [overlay]
//! root_id = "productModal"
//! body_selector = ".modal-body"
//! close_id = "modalClose"
//! card_selector = ".product-card[data-slug]"
//! slug_attribute = "data-slug"
//! active_class = "active"
//! api_base = "/api/producto/"
//! loading_text = "Cargando..."
//! error_text = "Error al cargar el producto."
//!
//! [labels]
//! origin = "Origen"
//! presentation = "Presentación"
//! category = "Categoría"
//! description = "Descripción"
//!
//! [contact]
//! link_selector = ".wa-float"
//! base = "https://wa.me/"
//! message_prefix = "Hola, me interesa el producto: "
//! button_label = "Consultar por WhatsApp"
//!
//! [nav]
//! navbar_id = "navbar"
//! scrolled_class = "scrolled"
//! scroll_threshold = 20.0
//! toggle_id = "navToggle"
//! links_id = "navLinks"
//! toggle_active_class = "active"
//! links_open_class = "open"
//! carousel_selector = ".clients-track"
//!
//! [logging]
//! level = "info"            # trace | debug | info | warn | error
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::visibility::{ObserveOptions, RootMargin};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration for all controllers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhanceConfig {
    /// Scroll reveal settings.
    pub reveal: RevealConfig,
    /// Animated counter settings.
    pub counters: CounterConfig,
    /// Product detail overlay settings.
    pub overlay: OverlayConfig,
    /// Labels for the detail rows.
    pub labels: DetailLabels,
    /// Contact deep link settings.
    pub contact: ContactConfig,
    /// Navbar, mobile nav and carousel anchors.
    pub nav: NavConfig,
    /// Console log verbosity.
    pub logging: LoggingConfig,
}

impl EnhanceConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("reveal.threshold", self.reveal.threshold)?;
        check_threshold("counters.threshold", self.counters.threshold)?;
        if self.reveal.stagger_buckets == 0 {
            return Err(ConfigError::Validation(
                "reveal.stagger_buckets must be non-zero".into(),
            ));
        }
        if self.counters.duration_ms == 0 {
            return Err(ConfigError::Validation(
                "counters.duration_ms must be non-zero".into(),
            ));
        }
        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of trace, debug, info, warn, error (got {:?})",
                self.logging.level
            )));
        }
        if self.overlay.api_base.trim().is_empty() {
            return Err(ConfigError::Validation(
                "overlay.api_base must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn check_threshold(key: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{key} must be within 0.0-1.0")))
    }
}

/// Scroll reveal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Elements to reveal, in document order.
    pub selector: String,
    /// Class applied once an element has been seen.
    pub visible_class: String,
    /// Fraction of the element that must be on screen.
    pub threshold: f64,
    /// Offsets applied to the viewport edges, in pixels.
    pub root_margin: RootMargin,
    /// Delay added per position within a stagger wave.
    pub stagger_step_ms: u32,
    /// Number of distinct delays before the wave repeats.
    pub stagger_buckets: usize,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".reveal".to_string(),
            visible_class: "visible".to_string(),
            threshold: 0.12,
            root_margin: RootMargin {
                top: 0,
                right: 0,
                bottom: -30,
                left: 0,
            },
            stagger_step_ms: 80,
            stagger_buckets: 4,
        }
    }
}

impl RevealConfig {
    pub fn observe_options(&self) -> ObserveOptions {
        ObserveOptions {
            threshold: self.threshold,
            root_margin: self.root_margin,
        }
    }
}

/// Animated counter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    /// Counter elements.
    pub selector: String,
    /// Ancestor shared by the counters; the only element observed.
    pub container_selector: String,
    /// Attribute carrying the final integer value.
    pub target_attribute: String,
    /// Fraction of the container that must be on screen.
    pub threshold: f64,
    /// Length of one counting run.
    pub duration_ms: u32,
    /// Thousands separator.
    pub group_separator: String,
    /// Minimum digits in the leading group before grouping kicks in.
    /// Spanish uses 2, so four-digit numbers stay ungrouped.
    pub min_grouping_digits: usize,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: ".stat-num[data-target]".to_string(),
            container_selector: ".stats".to_string(),
            target_attribute: "data-target".to_string(),
            threshold: 0.3,
            duration_ms: 2000,
            group_separator: ".".to_string(),
            min_grouping_digits: 2,
        }
    }
}

impl CounterConfig {
    pub fn observe_options(&self) -> ObserveOptions {
        ObserveOptions {
            threshold: self.threshold,
            root_margin: RootMargin::default(),
        }
    }
}

/// Product detail overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Id of the overlay root; clicks landing on it directly count as backdrop clicks.
    pub root_id: String,
    /// Content panel inside the root that receives rendered markup.
    pub body_selector: String,
    /// Id of the explicit close control.
    pub close_id: String,
    /// Product cards that open the overlay.
    pub card_selector: String,
    /// Attribute on a card holding the product identifier.
    pub slug_attribute: String,
    /// Class that shows the overlay.
    pub active_class: String,
    /// Lookup endpoint prefix; the url-encoded identifier is appended.
    pub api_base: String,
    /// Placeholder text while the lookup is in flight.
    pub loading_text: String,
    /// Generic failure message.
    pub error_text: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            root_id: "productModal".to_string(),
            body_selector: ".modal-body".to_string(),
            close_id: "modalClose".to_string(),
            card_selector: ".product-card[data-slug]".to_string(),
            slug_attribute: "data-slug".to_string(),
            active_class: "active".to_string(),
            api_base: "/api/producto/".to_string(),
            loading_text: "Cargando...".to_string(),
            error_text: "Error al cargar el producto.".to_string(),
        }
    }
}

/// Labels for the rows of the detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetailLabels {
    pub origin: String,
    pub presentation: String,
    pub category: String,
    /// Heading of the description block.
    pub description: String,
}

impl Default for DetailLabels {
    fn default() -> Self {
        Self {
            origin: "Origen".to_string(),
            presentation: "Presentación".to_string(),
            category: "Categoría".to_string(),
            description: "Descripción".to_string(),
        }
    }
}

/// Contact deep link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Existing page link whose href carries the phone number.
    pub link_selector: String,
    /// Messaging app base URL, also the prefix stripped from the page link.
    pub base: String,
    /// Prefilled message; the product name is appended.
    pub message_prefix: String,
    /// Text of the contact button in the detail view.
    pub button_label: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            link_selector: ".wa-float".to_string(),
            base: "https://wa.me/".to_string(),
            message_prefix: "Hola, me interesa el producto: ".to_string(),
            button_label: "Consultar por WhatsApp".to_string(),
        }
    }
}

/// Navbar, mobile nav and carousel anchors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub navbar_id: String,
    pub scrolled_class: String,
    /// Vertical scroll offset past which the navbar counts as scrolled.
    pub scroll_threshold: f64,
    pub toggle_id: String,
    pub links_id: String,
    pub toggle_active_class: String,
    pub links_open_class: String,
    pub carousel_selector: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            navbar_id: "navbar".to_string(),
            scrolled_class: "scrolled".to_string(),
            scroll_threshold: 20.0,
            toggle_id: "navToggle".to_string(),
            links_id: "navLinks".to_string(),
            toggle_active_class: "active".to_string(),
            links_open_class: "open".to_string(),
            carousel_selector: ".clients-track".to_string(),
        }
    }
}

/// Console log verbosity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Most verbose level forwarded to the console.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Parsed level, falling back to `INFO` for anything unrecognized.
    pub fn max_level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer page overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(EnhanceConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<EnhanceConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: EnhanceConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the text of an embedded config document.
///
/// `None` or a blank document yields the stock defaults.
pub fn load_config_str(source: Option<&str>) -> Result<EnhanceConfig, ConfigError> {
    let overlay = match source.map(str::trim) {
        Some(text) if !text.is_empty() => Some(toml::from_str::<toml::Value>(text)?),
        _ => None,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock config document with all keys.
pub fn stock_config_toml() -> &'static str {
    r##"# Vitrina Configuration
# =====================
# Embed in the page as <script type="application/toml" id="vitrina-config">.
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause the document to be rejected.

# ---------------------------------------------------------------------------
# Scroll reveal
# ---------------------------------------------------------------------------
[reveal]
selector = ".reveal"
visible_class = "visible"
# Fraction of the element that must be visible (0.0 - 1.0).
threshold = 0.12
# Element i waits (i mod stagger_buckets) * stagger_step_ms before animating.
stagger_step_ms = 80
stagger_buckets = 4

# Viewport edge offsets in px. A negative bottom reveals items just before
# they reach the edge.
[reveal.root_margin]
top = 0
right = 0
bottom = -30
left = 0

# ---------------------------------------------------------------------------
# Animated counters
# ---------------------------------------------------------------------------
[counters]
selector = ".stat-num[data-target]"
container_selector = ".stats"
target_attribute = "data-target"
threshold = 0.3
duration_ms = 2000
# Thousands separator and the minimum leading-group size before grouping.
group_separator = "."
min_grouping_digits = 2

# ---------------------------------------------------------------------------
# Product detail overlay
# ---------------------------------------------------------------------------
[overlay]
root_id = "productModal"
body_selector = ".modal-body"
close_id = "modalClose"
card_selector = ".product-card[data-slug]"
slug_attribute = "data-slug"
active_class = "active"
api_base = "/api/producto/"
loading_text = "Cargando..."
error_text = "Error al cargar el producto."

[labels]
origin = "Origen"
presentation = "Presentación"
category = "Categoría"
description = "Descripción"

# ---------------------------------------------------------------------------
# Contact deep link
# ---------------------------------------------------------------------------
[contact]
link_selector = ".wa-float"
base = "https://wa.me/"
message_prefix = "Hola, me interesa el producto: "
button_label = "Consultar por WhatsApp"

# ---------------------------------------------------------------------------
# Navbar, mobile navigation, carousels
# ---------------------------------------------------------------------------
[nav]
navbar_id = "navbar"
scrolled_class = "scrolled"
scroll_threshold = 20.0
toggle_id = "navToggle"
links_id = "navLinks"
toggle_active_class = "active"
links_open_class = "open"
carousel_selector = ".clients-track"

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# Most verbose level written to the browser console:
# trace | debug | info | warn | error
level = "info"
"##
}
