//! Access to the selection payload the embedded viewer emits when an
//! object is clicked.
//!
//! The payload is a loosely-typed mapping: the object record may sit at
//! the top level or nest under `data`, fields are optional, and property
//! values may be bare scalars or `{ "value": ... }` wrappers. Accessors
//! probe instead of deserializing into a fixed shape.

use serde_json::{Map, Value};

use crate::model::Coordinate;

const LATITUDE_KEYS: &[&str] = &["latitude", "lat"];
const LONGITUDE_KEYS: &[&str] = &["longitude", "lon", "lng"];

#[derive(Debug, Clone)]
pub struct ObjectMetadata {
    raw: Value,
}

impl ObjectMetadata {
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// The object record itself, unwrapping the `data` envelope when
    /// present.
    pub fn record(&self) -> &Value {
        self.raw
            .get("data")
            .filter(|data| data.is_object())
            .unwrap_or(&self.raw)
    }

    /// Object identity, probed in the record first and the envelope
    /// second.
    pub fn id(&self) -> Option<&str> {
        self.record()
            .get("id")
            .and_then(Value::as_str)
            .or_else(|| self.raw.get("id").and_then(Value::as_str))
    }

    pub fn speckle_type(&self) -> Option<&str> {
        self.text_field("speckle_type")
    }

    pub fn name(&self) -> Option<&str> {
        self.text_field("name")
    }

    pub fn category(&self) -> Option<&str> {
        self.text_field("category")
    }

    pub fn family(&self) -> Option<&str> {
        self.text_field("family")
    }

    /// Level is a plain string in some models and an object with a
    /// `name` in others.
    pub fn level(&self) -> Option<String> {
        let level = self.record().get("level")?;
        match level {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| Some(level.to_string())),
            other => Some(other.to_string()),
        }
    }

    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.record().get("properties").and_then(Value::as_object)
    }

    pub fn parameters(&self) -> Option<&Map<String, Value>> {
        self.record().get("parameters").and_then(Value::as_object)
    }

    /// Coordinates sniffed from `properties`, then `parameters`, under
    /// the usual key spellings. `None` when the object carries none; the
    /// caller falls back to the configured default location.
    pub fn coordinates(&self) -> Option<Coordinate> {
        let mut latitude = None;
        let mut longitude = None;

        for map in [self.properties(), self.parameters()].into_iter().flatten() {
            if latitude.is_none() {
                latitude = sniff_number(map, LATITUDE_KEYS);
            }
            if longitude.is_none() {
                longitude = sniff_number(map, LONGITUDE_KEYS);
            }
            if latitude.is_some() && longitude.is_some() {
                break;
            }
        }

        Coordinate::new(latitude?, longitude?).ok()
    }

    fn text_field(&self, key: &str) -> Option<&str> {
        self.record().get(key).and_then(Value::as_str)
    }
}

fn sniff_number(map: &Map<String, Value>, candidates: &[&str]) -> Option<f64> {
    map.iter()
        .find(|(key, _)| candidates.iter().any(|c| key.eq_ignore_ascii_case(c)))
        .and_then(|(_, value)| number_from(value))
}

/// Bare number, numeric string, or a `{ "value": ... }` wrapper.
fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => map.get("value").and_then(number_from),
        _ => None,
    }
}

/// Render a loosely-typed property value for display.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "N/A".to_string(),
        Value::Object(map) => match map.get("value") {
            Some(inner) => render_plain(inner),
            None => value.to_string(),
        },
        other => render_plain(other),
    }
}

fn render_plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_unwraps_data_envelope() {
        let object = ObjectMetadata::from_value(json!({
            "data": {"id": "abc123", "name": "Wall"}
        }));
        assert_eq!(object.id(), Some("abc123"));
        assert_eq!(object.name(), Some("Wall"));
    }

    #[test]
    fn id_falls_back_to_the_envelope() {
        let object = ObjectMetadata::from_value(json!({
            "id": "outer",
            "data": {"name": "Beam"}
        }));
        assert_eq!(object.id(), Some("outer"));
    }

    #[test]
    fn level_handles_string_and_object_shapes() {
        let plain = ObjectMetadata::from_value(json!({"level": "Level 2"}));
        assert_eq!(plain.level(), Some("Level 2".to_string()));

        let named = ObjectMetadata::from_value(json!({"level": {"name": "Roof", "elevation": 12.0}}));
        assert_eq!(named.level(), Some("Roof".to_string()));
    }

    #[test]
    fn coordinates_prefer_properties_over_parameters() {
        let object = ObjectMetadata::from_value(json!({
            "properties": {"Latitude": 40.4168, "longitude": -3.7038},
            "parameters": {"lat": 0.0, "lon": 0.0}
        }));
        let coord = object.coordinates().unwrap();
        assert_eq!(coord.latitude, 40.4168);
        assert_eq!(coord.longitude, -3.7038);
    }

    #[test]
    fn coordinates_accept_value_wrappers_and_strings() {
        let object = ObjectMetadata::from_value(json!({
            "parameters": {
                "LAT": {"value": "36.8381"},
                "lng": {"value": -2.4597}
            }
        }));
        let coord = object.coordinates().unwrap();
        assert_eq!(coord.latitude, 36.8381);
        assert_eq!(coord.longitude, -2.4597);
    }

    #[test]
    fn coordinates_absent_when_either_axis_is_missing() {
        let object = ObjectMetadata::from_value(json!({
            "properties": {"latitude": 36.8381}
        }));
        assert_eq!(object.coordinates(), None);
    }

    #[test]
    fn coordinates_reject_out_of_range_values() {
        let object = ObjectMetadata::from_value(json!({
            "properties": {"latitude": 123.0, "longitude": 4.0}
        }));
        assert_eq!(object.coordinates(), None);
    }

    #[test]
    fn format_value_covers_the_wire_shapes() {
        assert_eq!(format_value(&json!(null)), "N/A");
        assert_eq!(format_value(&json!("Concrete")), "Concrete");
        assert_eq!(format_value(&json!(3.5)), "3.5");
        assert_eq!(format_value(&json!({"value": 42, "units": "mm"})), "42");
        assert_eq!(format_value(&json!({"units": "mm"})), r#"{"units":"mm"}"#);
    }
}
