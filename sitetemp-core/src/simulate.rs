//! Simulated diurnal series, used by the presentation layer when the
//! hourly lookup comes back empty but a current temperature exists.
//!
//! The result is a visual stand-in only. Consumers must label it as
//! simulated and never mix it with provider data.

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::Rng;

use crate::extract::MAX_HOURLY_POINTS;
use crate::model::{TemperaturePoint, TemperatureSeries};

/// 24 hourly points counted back from `now`, shaped around `current`:
/// warmer through early afternoon, cooler before dawn, with a little
/// jitter. Every point stays within `current` ± 6.
pub fn diurnal_series(current: f64, now: DateTime<Utc>) -> TemperatureSeries {
    let mut rng = rand::thread_rng();
    let mut points = Vec::with_capacity(MAX_HOURLY_POINTS);

    for back in (0..MAX_HOURLY_POINTS as i64).rev() {
        let stamp = now - Duration::hours(back);
        let hour = stamp.hour();

        let swing = if (12..=16).contains(&hour) {
            rng.gen_range(2.0..4.0)
        } else if (2..=6).contains(&hour) {
            rng.gen_range(-5.0..-3.0)
        } else {
            rng.gen_range(-1.0..1.0)
        };
        let jitter = rng.gen_range(-0.75..0.75);
        let celsius = ((current + swing + jitter) * 10.0).round() / 10.0;

        points.push(TemperaturePoint {
            time_key: stamp.format("%Y%m%d%H").to_string(),
            celsius,
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hour_of(point: &TemperaturePoint) -> u32 {
        point.time_key[8..10].parse().unwrap()
    }

    #[test]
    fn series_spans_24_ascending_hourly_points() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();
        let points = diurnal_series(18.0, now);
        assert_eq!(points.len(), 24);
        assert!(points.windows(2).all(|w| w[0].time_key < w[1].time_key));
        assert_eq!(points.last().unwrap().time_key, "2024061509");
    }

    #[test]
    fn every_point_stays_within_six_degrees_of_the_input() {
        for &current in &[-10.0, 0.0, 18.0, 35.0] {
            let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
            for point in diurnal_series(current, now) {
                assert!(
                    (point.celsius - current).abs() <= 6.0,
                    "point {} strays too far from {current}",
                    point.celsius
                );
            }
        }
    }

    #[test]
    fn afternoon_is_warmer_than_predawn_on_average() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 23, 0, 0).unwrap();
        let points = diurnal_series(20.0, now);

        let mean = |range: std::ops::RangeInclusive<u32>| {
            let picked: Vec<f64> = points
                .iter()
                .filter(|p| range.contains(&hour_of(p)))
                .map(|p| p.celsius)
                .collect();
            assert!(!picked.is_empty());
            picked.iter().sum::<f64>() / picked.len() as f64
        };

        assert!(mean(12..=16) > mean(2..=6));
    }
}
