//! Loading a full builds-API response.

use serde_json::Value;

use super::normalize::{coerce_number, normalize_build};
use super::{BudgetRange, BuildCollection};

/// Load a raw builds-API payload into a [`BuildCollection`].
///
/// The payload is either a bare array of raw builds or an object
/// wrapping the array with budget metadata. Malformed payloads degrade
/// to an empty collection; `builds: []` is the terminal failure mode,
/// never a panic or an error.
pub fn load_collection(payload: &Value) -> BuildCollection {
    match payload {
        Value::Array(raw_builds) => BuildCollection {
            builds: raw_builds.iter().map(normalize_build).collect(),
            budget_range: None,
            budget_note: None,
        },
        Value::Object(map) => BuildCollection {
            builds: map
                .get("builds")
                .and_then(Value::as_array)
                .map(|raw| raw.iter().map(normalize_build).collect())
                .unwrap_or_default(),
            budget_range: map.get("budget_range").and_then(parse_budget_range),
            budget_note: map
                .get("budget_note")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        _ => BuildCollection::default(),
    }
}

fn parse_budget_range(value: &Value) -> Option<BudgetRange> {
    Some(BudgetRange {
        min: value.get("min").and_then(coerce_number)?,
        max: value.get("max").and_then(coerce_number)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array_payload() {
        let payload = json!([
            { "parts": [{ "Type": "cpu", "Title": "i5-12400F", "Price": 149.0 }], "total_price": 149.0 },
            { "parts": [], "total_price": 0 },
        ]);

        let collection = load_collection(&payload);
        assert_eq!(collection.builds.len(), 2);
        assert!(collection.budget_range.is_none());
        assert!(collection.budget_note.is_none());
    }

    #[test]
    fn test_object_payload_with_budget_metadata() {
        let payload = json!({
            "builds": [{ "parts": [], "total_price": "999.50" }],
            "budget_range": { "min": 800, "max": "1200" },
            "budget_note": "Adjusted to the closest viable range.",
        });

        let collection = load_collection(&payload);
        assert_eq!(collection.builds.len(), 1);
        assert_eq!(collection.builds[0].total_price, 999.5);
        assert_eq!(
            collection.budget_range,
            Some(BudgetRange { min: 800.0, max: 1200.0 })
        );
        assert_eq!(
            collection.budget_note.as_deref(),
            Some("Adjusted to the closest viable range.")
        );
    }

    #[test]
    fn test_malformed_payload_degrades_to_empty() {
        assert!(load_collection(&json!("nope")).builds.is_empty());
        assert!(load_collection(&json!(null)).builds.is_empty());
        assert!(load_collection(&json!({ "builds": "nope" })).builds.is_empty());
    }

    #[test]
    fn test_single_build_end_to_end() {
        let payload = json!({
            "builds": [{
                "parts": [{ "Type": "cpu", "Title": "Ryzen 5", "Price": "199.99" }],
                "total_price": 199.99,
            }],
        });

        let collection = load_collection(&payload);
        assert_eq!(collection.builds.len(), 1);
        let part = &collection.builds[0].parts[0];
        assert_eq!(part.display_type, "CPU");
        assert_eq!(part.name, "Ryzen 5");
        assert_eq!(part.price, 199.99);
    }
}
