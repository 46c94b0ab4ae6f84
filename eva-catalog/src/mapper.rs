//! EVA to host resource mapping.

use tracing::warn;

use crate::{
    error::{PluginError, Result},
    eva::{EvaDetailResponse, EvaProduct, EvaSearchResponse},
    resource::{Resource, ResourceImage},
};

/// Maps one EVA product to a host resource.
///
/// `product_id` becomes both `id` and `handle`; EVA has no separate handle concept.
/// A missing display value maps to an empty title, and the image is only set when EVA
/// provides a non-empty URL.
///
/// # Examples
///
/// ```
/// use eva_catalog::{eva::EvaProduct, mapper::map_product};
///
/// let product: EvaProduct = serde_json::from_str(r#"{"product_id":"P1"}"#).unwrap();
/// let resource = map_product(product);
/// assert_eq!(resource.id, "P1");
/// assert_eq!(resource.title, "");
/// assert!(resource.image.is_none());
/// ```
#[must_use]
pub fn map_product(product: EvaProduct) -> Resource {
    let image = product
        .primary_image
        .and_then(|image| image.url)
        .filter(|url| !url.is_empty())
        .map(|src| ResourceImage { src });

    Resource {
        handle: Some(product.product_id.clone()),
        id: product.product_id,
        title: product.display_value.unwrap_or_default(),
        image,
    }
}

/// Maps a search response to host resources, preserving EVA's order.
///
/// Each item is decoded on its own. Items that are not a valid [`EvaProduct`] are
/// logged and skipped; the remaining products are still returned.
#[must_use]
pub fn map_search_response(response: EvaSearchResponse) -> Vec<Resource> {
    response
        .products
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<EvaProduct>(item) {
            Ok(product) => Some(map_product(product)),
            Err(error) => {
                warn!(index, %error, "skipping undecodable product in search results");
                None
            }
        })
        .collect()
}

/// Maps a detail response to a host resource.
///
/// # Errors
///
/// Returns [`PluginError::NotFound`] when the response carries no `Result`.
pub fn map_detail_response(requested_id: &str, response: EvaDetailResponse) -> Result<Resource> {
    response
        .result
        .map(map_product)
        .ok_or_else(|| PluginError::NotFound(requested_id.to_owned()))
}


#[cfg(test)]
#[path = "mapper/tests/proptest_mapper.rs"]
mod proptest_mapper;
