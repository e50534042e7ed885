//! Browser binding.
//!
//! Wires the controllers to the page once the DOM is ready. Each feature looks
//! up its own anchors and is skipped when they are missing, so one page can
//! use any subset (a product listing without stats, a landing page without
//! the overlay).

mod animate;
mod dom;
mod logging;
mod nav;
mod observer;
mod overlay;

use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::config::{self, EnhanceConfig};

/// Id of the optional `<script type="application/toml">` config element.
pub const CONFIG_ELEMENT_ID: &str = "vitrina-config";

#[wasm_bindgen(start)]
pub fn start() {
    dom::on_ready(bootstrap);
}

fn bootstrap() {
    let source = dom::text_of(CONFIG_ELEMENT_ID);
    let (config, config_error) = match config::load_config_str(source.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (EnhanceConfig::default(), Some(err)),
    };

    logging::init(config.logging.max_level());
    info!(version = %crate::version_string(), "vitrina starting");
    if let Some(err) = config_error {
        warn!(error = %err, "ignoring embedded config, using defaults");
    }

    nav::activate(&config.nav);
    animate::activate_reveal(&config.reveal);
    animate::activate_counters(&config.counters);
    overlay::activate(&config);
}
