//! EVA response models.
//!
//! Only the fields the plugin reads are modelled; everything else EVA sends is ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// Product as returned by `SearchProducts` and `GetProductDetail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaProduct {
    /// Product identifier. EVA sends integers; strings are accepted as well.
    #[serde(deserialize_with = "deserialize_product_id")]
    pub product_id: String,
    /// Display name.
    #[serde(default)]
    pub display_value: Option<String>,
    /// Primary product image.
    #[serde(default)]
    pub primary_image: Option<EvaImage>,
}

/// Image reference on an [`EvaProduct`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaImage {
    /// Public image URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// `SearchProducts` response.
///
/// Items stay raw so one malformed product cannot discard the rest of the page;
/// see [`crate::mapper::map_search_response`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaSearchResponse {
    /// Matching products, decoded one by one when mapped.
    #[serde(rename = "Products")]
    pub products: Vec<serde_json::Value>,
}

/// `GetProductDetail` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaDetailResponse {
    /// The product, absent when EVA has no match.
    #[serde(rename = "Result", default)]
    pub result: Option<EvaProduct>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_product_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawProductId::deserialize(deserializer)? {
        RawProductId::Text(id) => id,
        RawProductId::Number(id) => id.to_string(),
    })
}
