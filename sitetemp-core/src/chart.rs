//! 24-hour temperature trend chart, rendered as a standalone SVG
//! document with hand-computed linear scales.

use std::fmt::Write;

use crate::model::TemperaturePoint;

const WIDTH: f64 = 400.0;
const HEIGHT: f64 = 200.0;
const PAD_TOP: f64 = 20.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_BOTTOM: f64 = 40.0;
const PAD_LEFT: f64 = 50.0;
const ACCENT: &str = "#646cff";
const AXIS_COLOR: &str = "rgba(255, 255, 255, 0.3)";
const LABEL_COLOR: &str = "rgba(255, 255, 255, 0.6)";

/// Render the series as SVG. `None` for an empty series.
pub fn render_svg(points: &[TemperaturePoint]) -> Option<String> {
    if points.is_empty() {
        return None;
    }

    let chart_width = WIDTH - PAD_LEFT - PAD_RIGHT;
    let chart_height = HEIGHT - PAD_TOP - PAD_BOTTOM;

    let min_temp = points.iter().map(|p| p.celsius).fold(f64::INFINITY, f64::min);
    let max_temp = points.iter().map(|p| p.celsius).fold(f64::NEG_INFINITY, f64::max);
    // Guard against a flat series collapsing the Y scale.
    let range = if (max_temp - min_temp).abs() < f64::EPSILON {
        1.0
    } else {
        max_temp - min_temp
    };

    let denom = points.len().saturating_sub(1).max(1) as f64;
    let scale_x = |index: usize| PAD_LEFT + (index as f64 / denom) * chart_width;
    let scale_y =
        |temp: f64| PAD_TOP + chart_height - ((temp - min_temp) / range) * chart_height;

    let mut line_path = String::new();
    for (index, point) in points.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        let _ = write!(
            line_path,
            "{}{} {:.2} {:.2}",
            if index == 0 { "" } else { " " },
            command,
            scale_x(index),
            scale_y(point.celsius)
        );
    }
    let area_path = format!(
        "{} L {:.2} {:.2} L {:.2} {:.2} Z",
        line_path,
        scale_x(points.len() - 1),
        HEIGHT - PAD_BOTTOM,
        PAD_LEFT,
        HEIGHT - PAD_BOTTOM
    );

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" style="background: rgba(0, 0, 0, 0.2); border-radius: 8px;">"#
    );
    let _ = writeln!(
        svg,
        r#"  <defs><linearGradient id="tempGradient" x1="0%" y1="0%" x2="0%" y2="100%"><stop offset="0%" stop-color="{ACCENT}" stop-opacity="0.3"/><stop offset="100%" stop-color="{ACCENT}" stop-opacity="0"/></linearGradient></defs>"#
    );
    let _ = writeln!(svg, r#"  <path d="{area_path}" fill="url(#tempGradient)"/>"#);
    let _ = writeln!(
        svg,
        r#"  <path d="{line_path}" fill="none" stroke="{ACCENT}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/>"#
    );

    for (index, point) in points.iter().enumerate() {
        let _ = writeln!(
            svg,
            r##"  <circle cx="{:.2}" cy="{:.2}" r="3" fill="{ACCENT}" stroke="#fff" stroke-width="1.5"/>"##,
            scale_x(index),
            scale_y(point.celsius)
        );
    }

    // Y axis with min / mid / max labels.
    let _ = writeln!(
        svg,
        r#"  <line x1="{PAD_LEFT}" y1="{PAD_TOP}" x2="{PAD_LEFT}" y2="{:.2}" stroke="{AXIS_COLOR}" stroke-width="1"/>"#,
        HEIGHT - PAD_BOTTOM
    );
    for label in [min_temp, (min_temp + max_temp) / 2.0, max_temp] {
        let _ = writeln!(
            svg,
            r#"  <text x="{:.2}" y="{:.2}" fill="{LABEL_COLOR}" font-size="10" text-anchor="end">{:.0}°</text>"#,
            PAD_LEFT - 10.0,
            scale_y(label) + 4.0,
            label
        );
    }

    // X axis; label every few points to keep the axis readable.
    let _ = writeln!(
        svg,
        r#"  <line x1="{PAD_LEFT}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{AXIS_COLOR}" stroke-width="1"/>"#,
        HEIGHT - PAD_BOTTOM,
        WIDTH - PAD_RIGHT,
        HEIGHT - PAD_BOTTOM
    );
    let step = (points.len() / 6).max(1);
    for (index, point) in points.iter().enumerate() {
        if index % step != 0 && index != points.len() - 1 {
            continue;
        }
        let _ = writeln!(
            svg,
            r#"  <text x="{:.2}" y="{:.2}" fill="{LABEL_COLOR}" font-size="9" text-anchor="middle">{}</text>"#,
            scale_x(index),
            HEIGHT - PAD_BOTTOM + 20.0,
            time_label(&point.time_key)
        );
    }

    svg.push_str("</svg>\n");
    Some(svg)
}

/// Axis label for a time key: `HH:00` for timestamp keys, `Day DD` for
/// bare date keys, the raw key otherwise.
fn time_label(time_key: &str) -> String {
    let all_digits = time_key.bytes().all(|b| b.is_ascii_digit());
    if all_digits && time_key.len() >= 10 {
        format!("{}:00", &time_key[8..10])
    } else if all_digits && time_key.len() == 8 {
        format!("Day {}", &time_key[6..8])
    } else {
        time_key.to_string()
    }
}
