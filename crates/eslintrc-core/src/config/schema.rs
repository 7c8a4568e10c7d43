//! Rule option validation against declared schemas
//!
//! How rule schemas are defined is not this crate's concern; fragments'
//! declared options are checked against whatever schema the rule supplies,
//! through an injected [`SchemaChecker`] capability. The bundled checker
//! understands the JSON-schema subset rule schemas actually use: positional
//! array schemas, `enum`, `type`, `items`, `properties`, `required` and the
//! numeric/array bounds.

use serde_json::Value;

/// Capability that checks declared rule options against a schema
pub trait SchemaChecker: Send + Sync {
    /// `Ok(())` when `options` conform to `schema`, otherwise a message
    /// describing the first violation
    fn check(&self, schema: &Value, options: &[Value]) -> std::result::Result<(), String>;
}

/// Bundled [`SchemaChecker`] for the common rule-schema subset
#[derive(Debug, Default)]
pub struct BasicSchemaChecker;

impl SchemaChecker for BasicSchemaChecker {
    fn check(&self, schema: &Value, options: &[Value]) -> std::result::Result<(), String> {
        match schema {
            // Positional form: one sub-schema per option slot.
            Value::Array(slots) => {
                if options.len() > slots.len() {
                    return Err(format!(
                        "Value {} should NOT have more than {} items.",
                        Value::Array(options.to_vec()),
                        slots.len()
                    ));
                }
                for (option, slot) in options.iter().zip(slots) {
                    check_value(option, slot)?;
                }
                Ok(())
            }
            // Object form: the schema describes the whole options array.
            Value::Object(_) => check_value(&Value::Array(options.to_vec()), schema),
            _ => Ok(()),
        }
    }
}

fn check_value(value: &Value, schema: &Value) -> std::result::Result<(), String> {
    let Value::Object(schema) = schema else {
        return Ok(());
    };

    if let Some(Value::Array(allowed)) = schema.get("enum") {
        if !allowed.contains(value) {
            return Err(format!(
                "Value {value} should be equal to one of the allowed values: {}.",
                Value::Array(allowed.clone())
            ));
        }
    }

    if let Some(expected) = schema.get("type") {
        check_type(value, expected)?;
    }

    if let (Some(Value::Object(properties)), Value::Object(object)) =
        (schema.get("properties"), value)
    {
        for (key, sub_schema) in properties {
            if let Some(member) = object.get(key) {
                check_value(member, sub_schema)?;
            }
        }
    }

    if let (Some(Value::Array(required)), Value::Object(object)) =
        (schema.get("required"), value)
    {
        for key in required {
            if let Value::String(key) = key {
                if !object.contains_key(key) {
                    return Err(format!(
                        "Value {value} should have required property '{key}'."
                    ));
                }
            }
        }
    }

    if let Value::Array(items) = value {
        match schema.get("items") {
            Some(Value::Array(slots)) => {
                for (item, slot) in items.iter().zip(slots) {
                    check_value(item, slot)?;
                }
            }
            Some(item_schema @ Value::Object(_)) => {
                for item in items {
                    check_value(item, item_schema)?;
                }
            }
            _ => {}
        }

        if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
            if (items.len() as u64) < min {
                return Err(format!("Value {value} should NOT have fewer than {min} items."));
            }
        }
        if let Some(max) = schema.get("maxItems").and_then(Value::as_u64) {
            if (items.len() as u64) > max {
                return Err(format!("Value {value} should NOT have more than {max} items."));
            }
        }
    }

    if let Value::Number(number) = value {
        if let (Some(minimum), Some(actual)) =
            (schema.get("minimum").and_then(Value::as_f64), number.as_f64())
        {
            if actual < minimum {
                return Err(format!("Value {value} should be >= {minimum}."));
            }
        }
        if let (Some(maximum), Some(actual)) =
            (schema.get("maximum").and_then(Value::as_f64), number.as_f64())
        {
            if actual > maximum {
                return Err(format!("Value {value} should be <= {maximum}."));
            }
        }
    }

    Ok(())
}

fn check_type(value: &Value, expected: &Value) -> std::result::Result<(), String> {
    let matches_one = |name: &str| -> bool {
        match name {
            "string" => value.is_string(),
            "number" => value.is_number(),
            "integer" => value.is_i64() || value.is_u64(),
            "boolean" => value.is_boolean(),
            "object" => value.is_object(),
            "array" => value.is_array(),
            "null" => value.is_null(),
            _ => true,
        }
    };

    let ok = match expected {
        Value::String(name) => matches_one(name),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(matches_one),
        _ => true,
    };

    if ok {
        Ok(())
    } else {
        Err(format!("Value {value} should be of type {expected}."))
    }
}
