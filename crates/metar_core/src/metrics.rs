//! Derived weather metrics.
//!
//! Every value is computed from a station's dry-bulb temperature and dewpoint
//! and rounded to one decimal place before it is stored.
//!
//! # Domain
//!
//! The Magnus approximation divides by `237.3 + T`, so a temperature or
//! dewpoint of exactly -237.3 °C is outside the domain. No clamping is done;
//! surface observations never come near it.

use crate::models::{DerivedMetrics, HeatIndex};

/// Lower bound of the heat index regression, °F.
pub const HEAT_INDEX_MIN_F: f64 = 70.0;

/// Upper bound of the heat index regression, °F.
pub const HEAT_INDEX_MAX_F: f64 = 115.0;

const HEAT_STRESS_WET_WEIGHT: f64 = 0.7;
const HEAT_STRESS_DRY_WEIGHT: f64 = 0.3;

const _: () = assert!(HEAT_INDEX_MIN_F < HEAT_INDEX_MAX_F);

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Saturation vapor pressure in hPa (Magnus form).
pub fn saturation_vapor_pressure(celsius: f64) -> f64 {
    6.11 * 10f64.powf(7.5 * celsius / (237.3 + celsius))
}

/// Relative humidity in percent from temperature and dewpoint in °C.
pub fn relative_humidity(temperature: f64, dewpoint: f64) -> f64 {
    100.0 * saturation_vapor_pressure(dewpoint) / saturation_vapor_pressure(temperature)
}

/// Heat index in °F from temperature in °C and relative humidity.
///
/// Uses the extended 16-term regression, which only holds between 70 °F and
/// 115 °F. Outside that range the matching sentinel is returned.
pub fn heat_index(temperature: f64, rh: f64) -> HeatIndex {
    let t = celsius_to_fahrenheit(temperature);
    if t < HEAT_INDEX_MIN_F {
        return HeatIndex::BelowRange;
    }
    if t > HEAT_INDEX_MAX_F {
        return HeatIndex::AboveRange;
    }

    let t2 = t * t;
    let t3 = t2 * t;
    let rh2 = rh * rh;
    let rh3 = rh2 * rh;
    let hi = 16.923 + 0.185212 * t + 5.37941 * rh - 0.100254 * t * rh
        + 0.00941695 * t2
        + 0.00728898 * rh2
        + 0.000345372 * t2 * rh
        - 0.000814971 * t * rh2
        + 0.0000102102 * t2 * rh2
        - 0.000038646 * t3
        + 0.0000291583 * rh3
        + 0.00000142721 * t3 * rh
        + 0.000000197483 * t * rh3
        - 0.0000000218429 * t3 * rh2
        + 0.000000000843296 * t2 * rh3
        - 0.0000000000481975 * t3 * rh3;
    HeatIndex::InRange(hi)
}

/// Wet-bulb temperature in °C (Stull 2011 empirical fit).
pub fn wet_bulb(temperature: f64, rh: f64) -> f64 {
    temperature * (0.151977 * (rh + 8.313659).sqrt()).atan() + (temperature + rh).atan()
        - (rh - 1.676331).atan()
        + 0.00391838 * rh.powf(1.5) * (0.023101 * rh).atan()
        - 4.686035
}

pub fn heat_stress(wet_bulb: f64, temperature: f64) -> f64 {
    HEAT_STRESS_WET_WEIGHT * wet_bulb + HEAT_STRESS_DRY_WEIGHT * temperature
}

/// Round to one decimal place, ties to even.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Compute all derived metrics for one station.
///
/// Intermediate values are kept at full precision; only the stored results
/// are rounded.
pub fn derive(temperature: f64, dewpoint: f64) -> DerivedMetrics {
    let rh = relative_humidity(temperature, dewpoint);
    let hi = heat_index(temperature, rh);
    let tw = wet_bulb(temperature, rh);
    let stress = heat_stress(tw, temperature);

    DerivedMetrics {
        relative_humidity: round_tenth(rh),
        heat_index: match hi {
            HeatIndex::InRange(value) => HeatIndex::InRange(round_tenth(value)),
            sentinel => sentinel,
        },
        wet_bulb: round_tenth(tw),
        heat_stress: round_tenth(stress),
    }
}
