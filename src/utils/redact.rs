use serde_json::Value as JsonValue;

/// Mask customer-identifying fields before a payload reaches the logs.
/// Phone numbers keep their first five characters, free text is replaced entirely.
pub fn redact_sensitive_data(data: &JsonValue) -> JsonValue {
    match data {
        JsonValue::Object(map) => {
            let mut redacted_map = serde_json::Map::new();
            for (key, val) in map {
                let redacted_val = match field_kind(key) {
                    FieldKind::Phone => mask_phone_value(val),
                    FieldKind::FreeText => redact_string_value(val),
                    FieldKind::Plain => redact_sensitive_data(val),
                };
                redacted_map.insert(key.clone(), redacted_val);
            }
            JsonValue::Object(redacted_map)
        }
        JsonValue::Array(arr) => JsonValue::Array(arr.iter().map(redact_sensitive_data).collect()),
        _ => data.clone(),
    }
}

enum FieldKind {
    Phone,
    FreeText,
    Plain,
}

fn field_kind(field_name: &str) -> FieldKind {
    let lower = field_name.to_lowercase();
    match lower.as_str() {
        "phone" | "customerphone" | "customer_phone" => FieldKind::Phone,
        "comment" | "comments" | "text" | "prompt" => FieldKind::FreeText,
        _ => FieldKind::Plain,
    }
}

fn mask_phone_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::String(s) if !s.is_empty() => {
            let prefix: String = s.chars().take(5).collect();
            JsonValue::String(format!("{prefix}***"))
        }
        _ => value.clone(),
    }
}

fn redact_string_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::String(s) if !s.is_empty() => JsonValue::String("[REDACTED]".to_string()),
        _ => value.clone(),
    }
}
