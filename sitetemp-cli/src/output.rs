//! Human-friendly panel rendering for inspected objects.

use sitetemp_core::object::format_value;
use sitetemp_core::{Coordinate, ObjectMetadata};

const HIGH_TEMP_C: f64 = 25.0;
const LOW_TEMP_C: f64 = 15.0;
const MAX_ID_WIDTH: usize = 30;

pub fn print_object(object: &ObjectMetadata, raw: bool) {
    section("Basic Information");
    if let Some(id) = object.id() {
        row("ID", &truncate(id, MAX_ID_WIDTH));
    }
    if let Some(speckle_type) = object.speckle_type() {
        row("Type", speckle_type);
    }
    if let Some(name) = object.name() {
        row("Name", name);
    }
    if let Some(category) = object.category() {
        row("Category", category);
    }
    if let Some(family) = object.family() {
        row("Family", family);
    }
    if let Some(level) = object.level() {
        row("Level", &level);
    }

    for (title, entries) in [
        ("Properties", object.properties()),
        ("Parameters", object.parameters()),
    ] {
        let Some(entries) = entries else { continue };
        if entries.is_empty() {
            continue;
        }
        section(title);
        for (key, value) in entries {
            row(key, &format_value(value));
        }
    }

    if raw {
        section("Raw Data");
        println!(
            "{}",
            serde_json::to_string_pretty(object.record()).unwrap_or_default()
        );
    }
}

pub fn print_temperature(coord: Coordinate, celsius: f64) {
    section("Temperature (NASA POWER)");
    println!(
        "  {celsius:.1} °C at {:.4}, {:.4} ({})",
        coord.latitude,
        coord.longitude,
        classify(celsius)
    );
    println!("  Source: NASA POWER API");
}

pub fn print_temperature_missing(error: Option<&str>) {
    section("Temperature (NASA POWER)");
    println!("  Could not fetch temperature.");
    if let Some(error) = error {
        println!("  {error}");
    }
    println!("  Run with RUST_LOG=debug for details.");
}

fn classify(celsius: f64) -> &'static str {
    if celsius > HIGH_TEMP_C {
        "High temperature"
    } else if celsius < LOW_TEMP_C {
        "Low temperature"
    } else {
        "Normal temperature"
    }
}

fn section(title: &str) {
    println!("\n== {title} ==");
}

fn row(label: &str, value: &str) {
    println!("  {label:<12} {value}");
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_shortens_long_ids() {
        let id = "4f4ce1d871c54d72639a0dcbec246667";
        assert_eq!(truncate(id, 30), "4f4ce1d871c54d72639a0dcbec2466...");
        assert_eq!(truncate("short", 30), "short");
    }

    #[test]
    fn classification_thresholds() {
        assert_eq!(classify(30.0), "High temperature");
        assert_eq!(classify(10.0), "Low temperature");
        assert_eq!(classify(20.0), "Normal temperature");
    }
}
