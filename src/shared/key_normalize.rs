//! Normalizes inbound OCPP JSON payloads so every scalar field can be read
//! whether the charge point sent it as `camelCase` or `snake_case` (§4.5, §9:
//! "Kwarg/field names arrive in both forms" is a concrete pain point in the
//! field — this single helper is used before every `serde_json::from_value`
//! of an inbound payload instead of hand-rolling per-DTO fallbacks).

use serde_json::Value;

/// Recursively rewrites every object key from `snake_case` to `camelCase`,
/// leaving already-camelCase keys untouched. Arrays and nested objects (e.g.
/// `meterValue[].sampledValue[]`) are normalized too.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(to_camel_case(&k), normalize_keys(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

fn to_camel_case(key: &str) -> String {
    if !key.contains('_') {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaves_camel_case_alone() {
        assert_eq!(to_camel_case("connectorId"), "connectorId");
    }

    #[test]
    fn converts_snake_case() {
        assert_eq!(to_camel_case("connector_id"), "connectorId");
        assert_eq!(to_camel_case("meter_start"), "meterStart");
    }

    #[test]
    fn normalizes_nested_objects_and_arrays() {
        let input = json!({
            "connector_id": 1,
            "meter_value": [
                { "timestamp": "2024-01-01T00:00:00Z", "sampled_value": [{"value": "1", "measurand": "Energy.Active.Import.Register"}] }
            ]
        });
        let out = normalize_keys(input);
        assert_eq!(out["connectorId"], json!(1));
        assert_eq!(out["meterValue"][0]["sampledValue"][0]["value"], json!("1"));
    }
}
