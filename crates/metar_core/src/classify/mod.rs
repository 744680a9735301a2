//! Per-position color selection for the two display modes.

pub mod flight;
pub mod temperature;

use crate::models::Color;

/// Dark position.
pub const CLEAR: Color = Color::new(0, 0, 0);

pub use flight::{FlightAnimation, classify_flight};
pub use temperature::{TemperatureAnimation, classify_temperature};
