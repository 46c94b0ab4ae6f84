//! Host-facing catalog models.
//!
//! These are the shapes the host platform expects from any commerce plugin, independent
//! of EVA's own message formats.

use serde::{Deserialize, Serialize};

/// Generic catalog item handed to the host.
///
/// Optional fields are omitted from JSON when absent; the host distinguishes a missing
/// `image` key from an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// URL-friendly handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Primary image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ResourceImage>,
}

/// Image attached to a [`Resource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceImage {
    /// Image URL.
    pub src: String,
}

/// Entry shown in the host's entry picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    /// Resource identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl From<&Resource> for EntrySummary {
    fn from(resource: &Resource) -> Self {
        Self { id: resource.id.clone(), name: resource.title.clone() }
    }
}

impl From<Resource> for EntrySummary {
    fn from(resource: Resource) -> Self {
        Self { id: resource.id, name: resource.title }
    }
}
