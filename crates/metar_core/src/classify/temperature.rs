//! Temperature mode.
//!
//! Stations are bucketed by Fahrenheit decade, compared in Celsius. Stations
//! whose heat index is above the threshold flash white on the `Flash` phase.

use serde::{Deserialize, Serialize};

use super::CLEAR;
use crate::metrics::fahrenheit_to_celsius;
use crate::models::{AnimationPhase, Color, EnrichedStation};

pub const BELOW_ZERO: Color = Color::new(0, 255, 255);
pub const HOT: Color = Color::new(255, 255, 255);

/// Upper breakpoints in °F, ascending. Bucket `i` holds temperatures below
/// `BREAKPOINTS_F[i]`; anything at or above the last breakpoint takes
/// [`TOP_BUCKET`].
pub const BREAKPOINTS_F: [f64; 11] = [
    0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0,
];

/// Color for each bucket below the matching entry of [`BREAKPOINTS_F`].
pub const BUCKET_COLORS: [Color; 11] = [
    BELOW_ZERO,
    Color::new(0, 204, 255),
    Color::new(0, 153, 255),
    Color::new(0, 102, 255),
    Color::new(0, 0, 255),
    Color::new(102, 0, 255),
    Color::new(255, 0, 255),
    Color::new(255, 0, 0),
    Color::new(255, 255, 0),
    Color::new(153, 255, 0),
    Color::new(51, 255, 0),
];

/// 100 °F and up.
pub const TOP_BUCKET: Color = Color::new(0, 255, 0);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TemperatureAnimation {
    /// °F; heat index strictly above this flashes
    pub heat_index_threshold: f64,
}

impl Default for TemperatureAnimation {
    fn default() -> Self {
        TemperatureAnimation {
            heat_index_threshold: 100.0,
        }
    }
}

/// Bucket color for a Celsius temperature.
pub fn bucket_color(celsius: f64) -> Color {
    BREAKPOINTS_F
        .iter()
        .zip(BUCKET_COLORS)
        .find(|(breakpoint, _)| celsius < fahrenheit_to_celsius(**breakpoint))
        .map(|(_, color)| color)
        .unwrap_or_else(|| {
            if celsius >= fahrenheit_to_celsius(BREAKPOINTS_F[BREAKPOINTS_F.len() - 1]) {
                TOP_BUCKET
            } else {
                // NaN lands here
                CLEAR
            }
        })
}

pub fn classify_temperature(
    station: Option<&EnrichedStation>,
    phase: AnimationPhase,
    anim: &TemperatureAnimation,
) -> Color {
    let Some(station) = station else {
        return CLEAR;
    };

    let hot = station.metrics.heat_index.exceeds(anim.heat_index_threshold);
    if phase == AnimationPhase::Flash && hot {
        return HOT;
    }
    bucket_color(station.temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{self, celsius_to_fahrenheit};
    use crate::models::{DerivedMetrics, FlightCategory, HeatIndex};
    use proptest::prelude::*;

    fn station(temperature: f64, heat_index: HeatIndex) -> EnrichedStation {
        EnrichedStation {
            station_id: "KHOU".into(),
            flight_category: FlightCategory::Vfr,
            wind_speed: 0,
            wind_gust: false,
            wind_gust_speed: 0,
            lightning: false,
            temperature,
            dewpoint: temperature - 10.0,
            metrics: DerivedMetrics {
                relative_humidity: 50.0,
                heat_index,
                wet_bulb: temperature - 5.0,
                heat_stress: temperature - 3.0,
            },
        }
    }

    #[test]
    fn test_breakpoints_ascend() {
        assert!(BREAKPOINTS_F.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_bucket_edges() {
        assert_eq!(bucket_color(-40.0), BELOW_ZERO);
        // 0 °F is the first bucket's exclusive upper bound
        assert_eq!(bucket_color(fahrenheit_to_celsius(0.0)), BUCKET_COLORS[1]);
        assert_eq!(bucket_color(0.0), BUCKET_COLORS[4]);
        assert_eq!(bucket_color(fahrenheit_to_celsius(99.9)), BUCKET_COLORS[10]);
        assert_eq!(bucket_color(fahrenheit_to_celsius(100.0)), TOP_BUCKET);
        assert_eq!(bucket_color(60.0), TOP_BUCKET);
    }

    /// Position of a bucket color, `BREAKPOINTS_F.len()` for the top bucket.
    fn bucket_index(color: Color) -> Option<usize> {
        if color == TOP_BUCKET {
            return Some(BREAKPOINTS_F.len());
        }
        BUCKET_COLORS.iter().position(|c| *c == color)
    }

    fn finite() -> impl Strategy<Value = f64> {
        prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO
    }

    proptest! {
        #[test]
        fn prop_every_finite_temperature_has_a_bucket(celsius in finite()) {
            let color = bucket_color(celsius);
            prop_assert_ne!(color, CLEAR);
            prop_assert!(bucket_index(color).is_some(), "{:?} is not a bucket", color);
        }

        #[test]
        fn prop_bucket_lies_between_its_breakpoints(celsius in finite()) {
            let index = bucket_index(bucket_color(celsius)).unwrap();
            if index > 0 {
                prop_assert!(celsius >= fahrenheit_to_celsius(BREAKPOINTS_F[index - 1]));
            }
            if index < BREAKPOINTS_F.len() {
                prop_assert!(celsius < fahrenheit_to_celsius(BREAKPOINTS_F[index]));
            }
        }

        #[test]
        fn prop_buckets_never_step_back(a in -1e4..1e4f64, b in -1e4..1e4f64) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let low_index = bucket_index(bucket_color(low)).unwrap();
            let high_index = bucket_index(bucket_color(high)).unwrap();
            prop_assert!(low_index <= high_index);
            prop_assert!(high_index - low_index <= 1 || high - low >= 10.0 * 5.0 / 9.0 - 1e-9);
        }

        #[test]
        fn prop_never_hot_outside_heat_index_range(
            temperature in -60.0..60.0f64,
            spread in 0.0..60.0f64,
            threshold in -1000.0..1000.0f64
        ) {
            let fahrenheit = celsius_to_fahrenheit(temperature);
            prop_assume!(
                fahrenheit < metrics::HEAT_INDEX_MIN_F || fahrenheit > metrics::HEAT_INDEX_MAX_F
            );
            let mut observed = station(temperature, HeatIndex::InRange(0.0));
            observed.dewpoint = temperature - spread;
            observed.metrics = metrics::derive(temperature, observed.dewpoint);
            let anim = TemperatureAnimation {
                heat_index_threshold: threshold,
            };
            for phase in [AnimationPhase::Base, AnimationPhase::Flash] {
                prop_assert_ne!(classify_temperature(Some(&observed), phase, &anim), HOT);
            }
        }
    }

    #[test]
    fn test_bucket_matches_fahrenheit_decade() {
        for decade in 0..10 {
            let fahrenheit = decade as f64 * 10.0 + 5.0;
            let celsius = fahrenheit_to_celsius(fahrenheit);
            assert_eq!(bucket_color(celsius), BUCKET_COLORS[decade + 1]);
        }
    }

    #[test]
    fn test_no_data_is_clear() {
        let anim = TemperatureAnimation::default();
        assert_eq!(classify_temperature(None, AnimationPhase::Flash, &anim), CLEAR);
        assert_eq!(classify_temperature(None, AnimationPhase::Base, &anim), CLEAR);
    }

    #[test]
    fn test_hot_station_flashes() {
        let anim = TemperatureAnimation::default();
        let hot = station(38.0, HeatIndex::InRange(105.0));
        assert!(celsius_to_fahrenheit(38.0) > 100.0);

        assert_eq!(classify_temperature(Some(&hot), AnimationPhase::Flash, &anim), HOT);
        assert_eq!(classify_temperature(Some(&hot), AnimationPhase::Base, &anim), TOP_BUCKET);
    }

    #[test]
    fn test_heat_index_at_threshold_does_not_flash() {
        let anim = TemperatureAnimation::default();
        let warm = station(35.0, HeatIndex::InRange(100.0));
        assert_eq!(
            classify_temperature(Some(&warm), AnimationPhase::Flash, &anim),
            BUCKET_COLORS[10]
        );
    }

    #[test]
    fn test_out_of_range_heat_index_never_flashes() {
        let anim = TemperatureAnimation {
            heat_index_threshold: -1000.0,
        };
        for dewpoint in [-10.0, 10.0, 30.0] {
            let temperature = 48.0;
            let mut scorching = station(temperature, HeatIndex::InRange(0.0));
            scorching.metrics = metrics::derive(temperature, dewpoint);
            assert_eq!(scorching.metrics.heat_index, HeatIndex::AboveRange);
            assert_eq!(
                classify_temperature(Some(&scorching), AnimationPhase::Flash, &anim),
                TOP_BUCKET
            );
        }

        let mut cold = station(5.0, HeatIndex::InRange(0.0));
        cold.metrics = metrics::derive(5.0, 4.0);
        assert_eq!(cold.metrics.heat_index, HeatIndex::BelowRange);
        assert_ne!(classify_temperature(Some(&cold), AnimationPhase::Flash, &anim), HOT);
    }
}
