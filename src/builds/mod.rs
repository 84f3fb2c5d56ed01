//! Canonical build and part model.
//!
//! The backend has shipped builds in several drifting shapes over time
//! (nested JSON strings, escaped JSON-in-JSON, capitalized or lowercase
//! part keys, legacy flat per-slot columns). Everything the rest of the
//! tool consumes is normalized into the types here first.

mod collection;
mod cursor;
mod image;
mod normalize;

use serde::{Deserialize, Serialize};

pub use collection::load_collection;
pub use cursor::BuildCursor;
pub use image::canonicalize_image_url;
pub use normalize::{display_type, normalize_build, normalize_part};

/// A single component of a build, normalized from any backend shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    /// Numeric identifier; 0 when absent upstream.
    #[serde(default)]
    pub id: i64,
    /// Opaque vendor-supplied identifier.
    #[serde(default)]
    pub external_id: String,
    /// Raw category label as supplied upstream (e.g. "Processors", "cpu").
    #[serde(default, rename = "type")]
    pub part_type: String,
    /// `part_type` mapped through the display-label table.
    #[serde(default, rename = "displayType")]
    pub display_type: String,
    /// Human-readable component name.
    #[serde(default)]
    pub name: String,
    /// Seller/manufacturer label.
    #[serde(default)]
    pub vendor: String,
    /// Unit price; never negative, 0 when unparsable upstream.
    #[serde(default)]
    pub price: f64,
    /// Canonicalized image URL, or "".
    #[serde(default)]
    pub image: String,
    /// Relative or absolute purchase-page link.
    #[serde(default, rename = "product")]
    pub product_link: String,
}

/// One complete build alternative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Build {
    /// Parts in the order the backend sent them.
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Backend-supplied total; not recomputed from `parts`, which may be
    /// a subset view.
    #[serde(default)]
    pub total_price: f64,
    /// Free-text rationale for the build.
    #[serde(default)]
    pub description: String,
    /// Use-case label.
    #[serde(default)]
    pub category: String,
    /// The user's original free-text request, when the backend echoes it.
    #[serde(default)]
    pub needs: String,
}

impl Build {
    /// Category label for display.
    pub fn category_label(&self) -> &str {
        if self.category.is_empty() {
            "Uncategorized"
        } else {
            &self.category
        }
    }
}

/// Requested budget bounds echoed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

/// One batch of alternative builds returned for a single request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildCollection {
    /// Normalized builds; empty when the payload was malformed, which
    /// callers treat as "no data" rather than an error.
    pub builds: Vec<Build>,
    /// Budget bounds, when the backend echoed them.
    #[serde(default)]
    pub budget_range: Option<BudgetRange>,
    /// Advisory note when the requested budget could not be honored
    /// exactly.
    #[serde(default)]
    pub budget_note: Option<String>,
}
