//! Normalization of raw backend payloads into the canonical model.
//!
//! Every function here is total: unparsable input degrades to documented
//! defaults, never to an error. The UI layer decides how to present an
//! empty result.

use serde_json::Value;

use super::image::canonicalize_image_url;
use super::{Build, Part};

/// Slot keys and display labels for the legacy flat representation
/// (`cpu_name`, `cpu_price`, `cpu_id`, ...).
const FLAT_SLOTS: [(&str, &str); 8] = [
    ("cpu", "CPU"),
    ("gpu", "GPU"),
    ("ram", "RAM"),
    ("motherboard", "Motherboard"),
    ("storage", "Storage"),
    ("cpu_cooler", "CPU Cooler"),
    ("case", "Case"),
    ("psu", "PSU"),
];

/// Map a raw part category label to its display label.
///
/// Unknown labels pass through unchanged, so new backend categories show
/// up verbatim instead of failing.
pub fn display_type(raw: &str) -> String {
    match raw {
        "Cpu" | "cpu" | "Processors" => "CPU",
        "Gpu" | "gpu" => "GPU",
        "Ram" | "ram" => "RAM",
        "Motherboard" | "motherboard" => "Motherboard",
        "Storage" | "storage" => "Storage",
        "Cpu Cooler" | "cpu_cooler" => "CPU Cooler",
        "Psu" | "psu" => "Power Supply",
        "Pc Case" | "pc_case" | "Case" => "Case",
        other => other,
    }
    .to_string()
}

/// Normalize one raw part object into a canonical [`Part`].
///
/// For each field the raw keys are probed in a fixed priority order
/// (capitalized vendor key first, then the lower-camel key, then the
/// legacy key); the first present value wins, otherwise the field
/// default. A maximally-empty input yields a structurally valid
/// all-default part.
pub fn normalize_part(raw: &Value) -> Part {
    let part_type = string_at(raw, &["Type", "partType", "type"]);
    let image = string_at(raw, &["Image", "image"]);

    Part {
        id: integer_at(raw, &["ID", "id"]),
        external_id: string_at(raw, &["external_id"]),
        display_type: display_type(&part_type),
        name: string_at(raw, &["Title", "name"]),
        vendor: string_at(raw, &["Vendor", "vendor"]),
        price: price_at(raw, &["Price", "price"]),
        image: canonicalize_image_url(&image),
        product_link: string_at(raw, &["Link", "product"]),
        part_type,
    }
}

/// Normalize one raw build payload into a canonical [`Build`].
///
/// The parts list is recovered through an ordered fallback chain; the
/// first step that yields parts wins:
///
/// 1. `build_data` — nested JSON string carrying a `parts` array (and the
///    `needs` / `description` / `category` free-text fields),
/// 2. `parts_data` — JSON array string, possibly double-escaped,
/// 3. `parts` — a direct array,
/// 4. legacy flat per-slot columns.
///
/// A parse failure in any step yields nothing for that step and the
/// chain continues. A build with no recoverable parts keeps an empty
/// parts list, which is not an error.
pub fn normalize_build(raw: &Value) -> Build {
    let mut build = Build {
        total_price: price_at(raw, &["total_price"]),
        description: string_at(raw, &["description"]),
        category: string_at(raw, &["category"]),
        needs: string_at(raw, &["needs"]),
        parts: Vec::new(),
    };

    if let Some(nested) = parse_build_data(raw) {
        if let Some(parts) = nested.get("parts").and_then(Value::as_array) {
            build.parts = parts.iter().map(normalize_part).collect();
        }
        // The nested payload is authoritative for the free-text fields.
        if let Some(needs) = nested.get("needs").and_then(Value::as_str) {
            build.needs = needs.to_string();
        }
        if let Some(description) = nested.get("description").and_then(Value::as_str) {
            build.description = description.to_string();
        }
        if let Some(category) = nested.get("category").and_then(Value::as_str) {
            build.category = category.to_string();
        }
    }

    if build.parts.is_empty() {
        if let Some(parts) = parse_parts_data(raw) {
            build.parts = parts.iter().map(normalize_part).collect();
        }
    }

    if build.parts.is_empty() {
        if let Some(parts) = raw.get("parts").and_then(Value::as_array) {
            build.parts = parts.iter().map(normalize_part).collect();
        }
    }

    if build.parts.is_empty() {
        build.parts = flat_slot_parts(raw);
    }

    build
}

/// Coerce a JSON value to a number, accepting numeric strings.
pub(super) fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First non-null value under `keys`.
fn first_present<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| raw.get(key).filter(|v| !v.is_null()))
}

/// First present value under `keys`, rendered as a string. Numbers are
/// formatted; anything else defaults to "".
fn string_at(raw: &Value, keys: &[&str]) -> String {
    match first_present(raw, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// First present value under `keys` as a non-negative price; unparsable
/// values coerce to 0.
fn price_at(raw: &Value, keys: &[&str]) -> f64 {
    first_present(raw, keys)
        .and_then(coerce_number)
        .map(|price| price.max(0.0))
        .unwrap_or(0.0)
}

/// First present value under `keys` as an integer id; unparsable values
/// coerce to 0.
fn integer_at(raw: &Value, keys: &[&str]) -> i64 {
    first_present(raw, keys)
        .and_then(coerce_number)
        .map(|id| id as i64)
        .unwrap_or(0)
}

/// Step 1: nested `build_data` JSON (a string, or an object when the
/// backend already decoded it).
fn parse_build_data(raw: &Value) -> Option<Value> {
    match raw.get("build_data")? {
        Value::String(s) => serde_json::from_str(s).ok(),
        v @ Value::Object(_) => Some(v.clone()),
        _ => None,
    }
}

/// Step 2: `parts_data`, a JSON array that may arrive double-escaped
/// from JSON-in-JSON encoding.
fn parse_parts_data(raw: &Value) -> Option<Vec<Value>> {
    match raw.get("parts_data")? {
        Value::String(s) => {
            let cleaned = s.replace("\\\"", "\"").replace("\\\\", "\\");
            serde_json::from_str::<Value>(&cleaned)
                .ok()?
                .as_array()
                .cloned()
        }
        Value::Array(parts) => Some(parts.clone()),
        _ => None,
    }
}

/// Step 4: synthesize parts from the legacy flat columns. Slots without
/// a `_name` are omitted entirely, not emitted as empty parts.
fn flat_slot_parts(raw: &Value) -> Vec<Part> {
    let mut parts = Vec::new();

    for (slot, label) in FLAT_SLOTS {
        let name_key = format!("{slot}_name");
        let price_key = format!("{slot}_price");
        let id_key = format!("{slot}_id");

        let name = string_at(raw, &[name_key.as_str()]);
        if name.is_empty() {
            continue;
        }

        parts.push(Part {
            id: integer_at(raw, &[id_key.as_str()]),
            part_type: label.to_string(),
            display_type: display_type(label),
            name,
            price: price_at(raw, &[price_key.as_str()]),
            ..Part::default()
        });
    }

    parts
}
