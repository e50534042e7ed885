//! Payload types shared between the fetch pipeline and the renderer.
//!
//! These mirror the product lookup endpoint's JSON. The endpoint serializes
//! missing text as `""` (and occasionally `null`); both decode to `None` so
//! the renderer only ever has to ask "is it there".

use serde::{Deserialize, Deserializer, Serialize};

/// The card a visitor clicked, identified by its slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub slug: String,
}

/// Product detail as returned by the lookup endpoint.
///
/// Only `name` is required. Other fields the endpoint sends (`id`, `slug`,
/// `category_id`, `featured`, `active`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub presentation: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
}

impl ProductDetail {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
