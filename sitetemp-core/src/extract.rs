//! Extraction of temperature values from the provider's loosely-specified
//! JSON responses.
//!
//! The response nesting varies across at least three observed layouts, so
//! extraction runs as an ordered chain of structural attempts over an
//! untyped [`serde_json::Value`] tree: keyed-by-date map, leading array
//! element, direct scalar, then a depth-bounded scan of the whole
//! document. The first success wins.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::model::{TemperaturePoint, TemperatureSeries};

/// Sentinel the provider uses for "no observation for this slot" when the
/// response header does not declare one.
pub const DEFAULT_FILL_VALUE: f64 = -999.0;

/// Parameter code for air temperature at 2 metres above the surface.
pub const TEMPERATURE_PARAMETER: &str = "T2M";

/// Hourly series are capped to one day of points.
pub const MAX_HOURLY_POINTS: usize = 24;

const MAX_SCAN_DEPTH: usize = 5;

/// A numeric candidate classified by plausible unit range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Celsius(f64),
    Kelvin(f64),
}

impl Reading {
    /// Classify a raw candidate. Values equal to the fill sentinel and
    /// values outside both plausible ranges are rejected. The ranges are
    /// disjoint, so at most one interpretation applies.
    pub fn classify(value: f64, fill: f64) -> Option<Self> {
        if value == fill {
            return None;
        }
        if value > -50.0 && value < 60.0 {
            Some(Reading::Celsius(value))
        } else if value > 200.0 && value < 350.0 {
            Some(Reading::Kelvin(value))
        } else {
            None
        }
    }

    pub fn into_celsius(self) -> f64 {
        match self {
            Reading::Celsius(c) => c,
            Reading::Kelvin(k) => k - 273.15,
        }
    }
}

/// The provider emits numbers both as JSON numbers and as numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `header.fill_value`, falling back to the documented default.
pub fn fill_value(doc: &Value) -> f64 {
    doc.get("header")
        .and_then(|header| header.get("fill_value"))
        .and_then(as_number)
        .unwrap_or(DEFAULT_FILL_VALUE)
}

/// The parameter's value node. Observed under `properties.parameter` and,
/// in older layouts, directly under `parameter`.
fn parameter_node<'a>(doc: &'a Value, parameter: &str) -> Option<&'a Value> {
    doc.get("properties")
        .and_then(|p| p.get("parameter"))
        .and_then(|p| p.get(parameter))
        .or_else(|| doc.get("parameter").and_then(|p| p.get(parameter)))
}

fn is_date_key(key: &str) -> bool {
    key.len() == 8 && key.bytes().all(|b| b.is_ascii_digit())
}

fn is_time_key(key: &str) -> bool {
    (8..=12).contains(&key.len()) && key.bytes().all(|b| b.is_ascii_digit())
}

/// Extract a single current temperature, in Celsius, from a daily
/// response. Returns `None` when no candidate survives; remote gaps are
/// common, so absence is an expected outcome rather than an error.
pub fn scalar_from_daily(doc: &Value, parameter: &str, fill: f64) -> Option<f64> {
    if let Some(node) = parameter_node(doc, parameter) {
        if let Some(celsius) = latest_from_date_map(node, fill) {
            return Some(celsius);
        }
        if let Some(reading) = leading_element(node, fill) {
            return Some(reading.into_celsius());
        }
        if let Some(reading) = as_number(node).and_then(|v| Reading::classify(v, fill)) {
            return Some(reading.into_celsius());
        }
    }
    scan_for_reading(doc, fill, 0).map(Reading::into_celsius)
}

/// Keyed-by-date shape: `{ "YYYYMMDD": value, ... }`. Daily means are
/// reported in Celsius, so the value is taken as-is. Keys are fixed-width
/// date codes, so the lexicographically greatest key is the most recent
/// date.
fn latest_from_date_map(node: &Value, fill: f64) -> Option<f64> {
    let map = node.as_object()?;
    map.iter()
        .filter(|(key, _)| is_date_key(key))
        .filter_map(|(key, value)| as_number(value).map(|v| (key, v)))
        .filter(|(_, v)| *v != fill)
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, v)| v)
}

/// Ordered-sequence shape: take the first element. Also covers the
/// `{ "values": [...] }` wrapper some layouts use.
fn leading_element(node: &Value, fill: f64) -> Option<Reading> {
    let array = node
        .as_array()
        .or_else(|| node.get("values").and_then(Value::as_array))?;
    let first = array.first().and_then(as_number)?;
    Reading::classify(first, fill)
}

/// Last resort: walk the whole document, bounded in depth, descending
/// into temperature-named keys before the exhaustive pass.
fn scan_for_reading(value: &Value, fill: f64, depth: usize) -> Option<Reading> {
    if depth > MAX_SCAN_DEPTH {
        return None;
    }
    match value {
        Value::Number(n) => n.as_f64().and_then(|v| Reading::classify(v, fill)),
        Value::Array(items) => {
            if let Some(reading) = items
                .first()
                .and_then(Value::as_f64)
                .and_then(|v| Reading::classify(v, fill))
            {
                return Some(reading);
            }
            items
                .iter()
                .find_map(|item| scan_for_reading(item, fill, depth + 1))
        }
        Value::Object(map) => {
            for (key, child) in map {
                let name = key.to_ascii_lowercase();
                if name.contains("t2m") || name.contains("temp") {
                    if let Some(found) = scan_for_reading(child, fill, depth + 1) {
                        return Some(found);
                    }
                }
            }
            map.values()
                .find_map(|child| scan_for_reading(child, fill, depth + 1))
        }
        _ => None,
    }
}

/// Extract the newest 24 hourly points from a 2-day hourly response,
/// ascending by time key.
pub fn hourly_from_doc(
    doc: &Value,
    parameter: &str,
    fill: f64,
    now: DateTime<Utc>,
) -> Option<TemperatureSeries> {
    let node = parameter_node(doc, parameter)?;
    if let Some(points) = hourly_from_time_map(node, fill) {
        return Some(points);
    }
    hourly_from_value_array(doc, node, fill, now)
}

/// Keyed-by-timestamp shape: `{ "YYYYMMDDHH": value, ... }` with 8-12
/// digit keys. Hourly values are reported in Celsius; out-of-range and
/// sentinel slots are dropped rather than converted.
fn hourly_from_time_map(node: &Value, fill: f64) -> Option<TemperatureSeries> {
    let map = node.as_object()?;
    let mut points: TemperatureSeries = map
        .iter()
        .filter(|(key, _)| is_time_key(key))
        .filter_map(|(key, value)| as_number(value).map(|v| (key, v)))
        .filter(|(_, v)| *v != fill && *v > -50.0 && *v < 60.0)
        .map(|(key, v)| TemperaturePoint { time_key: key.clone(), celsius: v })
        .collect();
    if points.is_empty() {
        return None;
    }
    points.sort_by(|a, b| b.time_key.cmp(&a.time_key));
    points.truncate(MAX_HOURLY_POINTS);
    points.reverse();
    Some(points)
}

/// Parallel-array shape: a values array with timestamps declared
/// elsewhere in the document. When no timestamp source exists, hourly
/// keys are synthesized counting backward from `now`.
fn hourly_from_value_array(
    doc: &Value,
    node: &Value,
    fill: f64,
    now: DateTime<Utc>,
) -> Option<TemperatureSeries> {
    let values = node
        .as_array()
        .or_else(|| node.get("values").and_then(Value::as_array))?;
    let times = declared_times(doc);
    let total = values.len();

    let mut points: TemperatureSeries = Vec::new();
    for (index, value) in values.iter().enumerate() {
        let Some(v) = as_number(value) else { continue };
        if v == fill || v <= -50.0 || v >= 60.0 {
            continue;
        }
        let time_key = times
            .and_then(|t| t.get(index))
            .map(time_key_from)
            .unwrap_or_else(|| synthesized_key(now, total - index - 1));
        points.push(TemperaturePoint { time_key, celsius: v });
    }
    if points.is_empty() {
        return None;
    }
    if points.len() > MAX_HOURLY_POINTS {
        points.drain(..points.len() - MAX_HOURLY_POINTS);
    }
    Some(points)
}

/// Timestamp source for the parallel-array shape: `times`, `times.data`,
/// or the provider-declared `header.dates`.
fn declared_times(doc: &Value) -> Option<&Vec<Value>> {
    doc.get("times")
        .and_then(Value::as_array)
        .or_else(|| {
            doc.get("times")
                .and_then(|t| t.get("data"))
                .and_then(Value::as_array)
        })
        .or_else(|| {
            doc.get("header")
                .and_then(|h| h.get("dates"))
                .and_then(Value::as_array)
        })
}

fn time_key_from(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn synthesized_key(now: DateTime<Utc>, hours_back: usize) -> String {
    (now - Duration::hours(hours_back as i64))
        .format("%Y%m%d%H")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn daily(doc: &Value) -> Option<f64> {
        scalar_from_daily(doc, TEMPERATURE_PARAMETER, fill_value(doc))
    }

    fn hourly(doc: &Value) -> Option<TemperatureSeries> {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        hourly_from_doc(doc, TEMPERATURE_PARAMETER, fill_value(doc), now)
    }

    #[test]
    fn classify_accepts_celsius_range_unchanged() {
        assert_eq!(
            Reading::classify(18.5, DEFAULT_FILL_VALUE),
            Some(Reading::Celsius(18.5))
        );
        assert_eq!(Reading::classify(18.5, DEFAULT_FILL_VALUE).unwrap().into_celsius(), 18.5);
    }

    #[test]
    fn classify_converts_kelvin_range() {
        let reading = Reading::classify(291.65, DEFAULT_FILL_VALUE).unwrap();
        assert_eq!(reading, Reading::Kelvin(291.65));
        assert!((reading.into_celsius() - 18.5).abs() < 1e-9);
    }

    #[test]
    fn classify_rejects_out_of_range_candidates() {
        assert_eq!(Reading::classify(1000.0, DEFAULT_FILL_VALUE), None);
        assert_eq!(Reading::classify(-998.0, DEFAULT_FILL_VALUE), None);
        assert_eq!(Reading::classify(100.0, DEFAULT_FILL_VALUE), None);
    }

    #[test]
    fn classify_rejects_fill_sentinel_even_in_range() {
        // 0 is a plausible Celsius value but must be dropped when the
        // provider declares it as the fill sentinel.
        assert_eq!(Reading::classify(0.0, 0.0), None);
        assert_eq!(Reading::classify(-999.0, DEFAULT_FILL_VALUE), None);
    }

    #[test]
    fn fill_value_defaults_when_header_missing() {
        assert_eq!(fill_value(&json!({})), DEFAULT_FILL_VALUE);
        assert_eq!(fill_value(&json!({"header": {"fill_value": -99.0}})), -99.0);
    }

    #[test]
    fn date_map_most_recent_valid_date_wins() {
        let doc = json!({
            "header": {"fill_value": -999},
            "properties": {"parameter": {"T2M": {
                "20240101": 18.5,
                "20240103": 20.1,
                "20240102": -999
            }}}
        });
        assert_eq!(daily(&doc), Some(20.1));
    }

    #[test]
    fn date_map_with_only_fill_values_is_absent() {
        let doc = json!({
            "properties": {"parameter": {"T2M": {
                "20240101": -999,
                "20240102": -999
            }}}
        });
        assert_eq!(daily(&doc), None);
    }

    #[test]
    fn date_map_ignores_malformed_keys() {
        let doc = json!({
            "properties": {"parameter": {"T2M": {
                "2024010": 30.0,
                "202401011": 31.0,
                "20240102": 19.0
            }}}
        });
        assert_eq!(daily(&doc), Some(19.0));
    }

    #[test]
    fn leading_array_element_classified_as_celsius() {
        let doc = json!({"properties": {"parameter": {"T2M": [21.5, 22.0]}}});
        assert_eq!(daily(&doc), Some(21.5));
    }

    #[test]
    fn leading_array_element_classified_as_kelvin() {
        let doc = json!({"properties": {"parameter": {"T2M": [291.65, 290.0]}}});
        let value = daily(&doc).unwrap();
        assert!((value - 18.5).abs() < 1e-9);
    }

    #[test]
    fn values_wrapper_is_treated_as_an_array() {
        let doc = json!({"parameter": {"T2M": {"values": [294.15]}}});
        let value = daily(&doc).unwrap();
        assert!((value - 21.0).abs() < 1e-9);
    }

    #[test]
    fn direct_scalar_is_classified_by_range() {
        let doc = json!({"parameter": {"T2M": 17.2}});
        assert_eq!(daily(&doc), Some(17.2));

        let doc = json!({"parameter": {"T2M": 300.15}});
        assert!((daily(&doc).unwrap() - 27.0).abs() < 1e-9);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let doc = json!({"properties": {"parameter": {"T2M": {"20240110": "16.4"}}}});
        assert_eq!(daily(&doc), Some(16.4));
    }

    #[test]
    fn recursive_scan_prefers_temperature_named_keys() {
        let doc = json!({
            "metadata": {"elevation": 412.0},
            "observations": {"temp_surface": {"reading": 23.4}}
        });
        assert_eq!(daily(&doc), Some(23.4));
    }

    #[test]
    fn recursive_scan_skips_fill_and_out_of_range_leaves() {
        let doc = json!({
            "a": {"b": {"t2m_value": -999.0}},
            "c": {"temperature": 1000.0},
            "d": {"temp": 19.9}
        });
        assert_eq!(daily(&doc), Some(19.9));
    }

    #[test]
    fn recursive_scan_respects_depth_bound() {
        let doc = json!({
            "l1": {"l2": {"l3": {"l4": {"l5": {"l6": {"l7": {"temp": 18.0}}}}}}}
        });
        assert_eq!(daily(&doc), None);
    }

    #[test]
    fn unrecognizable_structure_is_absent_not_an_error() {
        assert_eq!(daily(&json!({"messages": ["no data"]})), None);
        assert_eq!(hourly(&json!({"messages": ["no data"]})), None);
    }

    #[test]
    fn hourly_map_keeps_newest_24_ascending() {
        // 30 hourly slots spanning 2024-06-13 18:00 .. 2024-06-14 23:00.
        let mut map = serde_json::Map::new();
        for hour in 0..30u32 {
            let day = 13 + (18 + hour) / 24;
            let key = format!("202406{:02}{:02}", day, (18 + hour) % 24);
            map.insert(key, json!(10.0 + f64::from(hour) * 0.1));
        }
        let doc = json!({"properties": {"parameter": {"T2M": map}}});

        let points = hourly(&doc).unwrap();
        assert_eq!(points.len(), 24);
        // Ascending by key, ending at the newest slot.
        assert!(points.windows(2).all(|w| w[0].time_key < w[1].time_key));
        assert_eq!(points.last().unwrap().time_key, "2024061423");
        assert_eq!(points.first().unwrap().time_key, "2024061400");
    }

    #[test]
    fn hourly_map_drops_sentinel_and_out_of_range_slots() {
        let doc = json!({"properties": {"parameter": {"T2M": {
            "2024061400": 18.0,
            "2024061401": -999,
            "2024061402": 75.0,
            "2024061403": 19.5
        }}}});
        let points = hourly(&doc).unwrap();
        let keys: Vec<&str> = points.iter().map(|p| p.time_key.as_str()).collect();
        assert_eq!(keys, vec!["2024061400", "2024061403"]);
    }

    #[test]
    fn hourly_array_pairs_with_declared_times() {
        let doc = json!({
            "header": {"dates": ["2024061410", "2024061411", "2024061412"]},
            "properties": {"parameter": {"T2M": [18.0, -999, 20.0]}}
        });
        let points = hourly(&doc).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time_key, "2024061410");
        assert_eq!(points[1].time_key, "2024061412");
    }

    #[test]
    fn hourly_array_synthesizes_keys_without_a_timestamp_source() {
        let doc = json!({"properties": {"parameter": {"T2M": [15.0, 16.0, 17.0]}}});
        let points = hourly(&doc).unwrap();
        // Counted back from 2024-06-15 12:00 at one-hour steps.
        let keys: Vec<&str> = points.iter().map(|p| p.time_key.as_str()).collect();
        assert_eq!(keys, vec!["2024061510", "2024061511", "2024061512"]);
    }

    #[test]
    fn hourly_array_keeps_only_the_last_24() {
        let values: Vec<f64> = (0..30).map(|i| 10.0 + f64::from(i) * 0.5).collect();
        let doc = json!({"properties": {"parameter": {"T2M": values}}});
        let points = hourly(&doc).unwrap();
        assert_eq!(points.len(), 24);
        assert!((points[0].celsius - 13.0).abs() < 1e-9);
        assert!((points.last().unwrap().celsius - 24.5).abs() < 1e-9);
    }
}
