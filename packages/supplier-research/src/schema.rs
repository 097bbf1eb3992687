//! Strict JSON schemas for structured model output.
//!
//! Schemas are generated from Rust types with `schemars`, then rewritten so a
//! strict structured-output endpoint accepts them:
//!
//! 1. every `$ref` is inlined and the `definitions` table dropped
//! 2. single-element `allOf` wrappers are flattened
//! 3. `default` annotations are removed
//! 4. every object gets `additionalProperties: false` and lists all of its
//!    properties in `required` (optional fields stay nullable)

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A type the extraction model can be asked to produce.
///
/// Blanket-implemented for every `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned + Send {
    /// Strict-mode schema for this type.
    fn strict_schema() -> Value {
        let mut value = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = match &mut value {
            Value::Object(map) => {
                map.remove("$schema");
                map.remove("definitions")
            }
            _ => None,
        };

        if let Some(Value::Object(defs)) = definitions {
            inline_refs(&mut value, &defs);
        }
        make_strict(&mut value);
        value
    }

    /// Schema name for this type.
    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned + Send> StructuredOutput for T {}

fn inline_refs(value: &mut Value, definitions: &Map<String, Value>) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(mut inlined) = target {
                inline_refs(&mut inlined, definitions);
                *value = inlined;
                return;
            }

            for nested in map.values_mut() {
                inline_refs(nested, definitions);
            }
        }
        Value::Array(items) => {
            for item in items {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

fn make_strict(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("default");

            // `{ "allOf": [X], "description": .. }` -> X with the description kept
            let single = match map.get("allOf") {
                Some(Value::Array(parts)) if parts.len() == 1 => Some(parts[0].clone()),
                _ => None,
            };
            if let Some(Value::Object(inner)) = single {
                map.remove("allOf");
                for (key, v) in inner {
                    map.entry(key).or_insert(v);
                }
            }

            if map.get("type").and_then(Value::as_str) == Some("object") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                let required: Option<Vec<Value>> = match map.get("properties") {
                    Some(Value::Object(props)) => {
                        Some(props.keys().cloned().map(Value::String).collect())
                    }
                    _ => None,
                };
                if let Some(required) = required {
                    map.insert("required".to_string(), Value::Array(required));
                }
            }

            for nested in map.values_mut() {
                make_strict(nested);
            }
        }
        Value::Array(items) => {
            for item in items {
                make_strict(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::supplier::{Queries, Supplier};

    fn required(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .expect("required array")
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    #[test]
    fn test_supplier_schema_is_strict_and_inlined() {
        let schema = Supplier::strict_schema();
        let text = serde_json::to_string(&schema).unwrap();

        assert!(!text.contains("$ref"));
        assert!(!text.contains("definitions"));
        assert!(!text.contains("allOf"));
        assert_eq!(schema["additionalProperties"], Value::Bool(false));

        let root_required = required(&schema);
        for field in [
            "name",
            "description",
            "standards_compliance",
            "certifications",
            "contact_details",
        ] {
            assert!(root_required.contains(&field), "{} should be required", field);
        }

        let contact = &schema["properties"]["contact_details"];
        assert_eq!(contact["type"], "object");
        assert_eq!(contact["additionalProperties"], Value::Bool(false));
        assert_eq!(required(contact).len(), 4);
    }

    #[test]
    fn test_queries_schema() {
        let schema = Queries::strict_schema();
        assert_eq!(required(&schema), vec!["queries"]);
        assert_eq!(Queries::type_name(), "Queries");
    }
}
