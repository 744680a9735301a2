//! Flight-category mode.
//!
//! Each station shows its category color. Two animations ride on top, tied
//! to opposite animation phases so they are never shown together:
//! - **Wind** (`Flash` phase): strong wind or gusts blink the station off, or
//!   fade it to a dimmer shade of its category color.
//! - **Lightning** (`Base` phase): thunderstorms flash white.
//!
//! Precedence is lightning, then wind, then the steady color.

use serde::{Deserialize, Serialize};

use super::CLEAR;
use crate::models::{AnimationPhase, Color, EnrichedStation, FlightCategory};

pub const VFR: Color = Color::new(255, 0, 0);
pub const VFR_FADE: Color = Color::new(125, 0, 0);
pub const MVFR: Color = Color::new(0, 0, 255);
pub const MVFR_FADE: Color = Color::new(0, 0, 125);
pub const IFR: Color = Color::new(0, 255, 0);
pub const IFR_FADE: Color = Color::new(0, 125, 0);
pub const LIFR: Color = Color::new(0, 125, 125);
pub const LIFR_FADE: Color = Color::new(0, 75, 75);
pub const LIGHTNING: Color = Color::new(255, 255, 255);

/// Animation switches for flight-category mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightAnimation {
    pub wind_animation: bool,
    pub lightning_animation: bool,
    /// Fade to the dim category color instead of blinking off
    pub fade_instead_of_blink: bool,
    /// Knots; wind strictly above this animates
    pub wind_blink_threshold: u32,
    /// Animate any reported gust regardless of speed
    pub always_blink_for_gusts: bool,
}

impl Default for FlightAnimation {
    fn default() -> Self {
        FlightAnimation {
            wind_animation: true,
            lightning_animation: true,
            fade_instead_of_blink: true,
            wind_blink_threshold: 30,
            always_blink_for_gusts: false,
        }
    }
}

/// Which layer won for a station this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Lightning,
    Wind,
    Steady,
}

/// Steady and faded color for a category. `None` for unknown categories.
pub fn category_colors(category: FlightCategory) -> Option<(Color, Color)> {
    match category {
        FlightCategory::Vfr => Some((VFR, VFR_FADE)),
        FlightCategory::Mvfr => Some((MVFR, MVFR_FADE)),
        FlightCategory::Ifr => Some((IFR, IFR_FADE)),
        FlightCategory::Lifr => Some((LIFR, LIFR_FADE)),
        FlightCategory::Unknown => None,
    }
}

fn is_windy(station: &EnrichedStation, phase: AnimationPhase, anim: &FlightAnimation) -> bool {
    if !anim.wind_animation || phase != AnimationPhase::Flash {
        return false;
    }
    let threshold = anim.wind_blink_threshold;
    let gusting = station.wind_gust
        && (anim.always_blink_for_gusts
            || station.wind_gust_speed.max(station.wind_speed) > threshold);
    station.wind_speed > threshold || gusting
}

fn is_lightning(station: &EnrichedStation, phase: AnimationPhase, anim: &FlightAnimation) -> bool {
    anim.lightning_animation && phase == AnimationPhase::Base && station.lightning
}

/// Resolve the animation layer for a station, first active guard wins.
pub fn effect(station: &EnrichedStation, phase: AnimationPhase, anim: &FlightAnimation) -> Effect {
    let guards = [
        (Effect::Lightning, is_lightning(station, phase, anim)),
        (Effect::Wind, is_windy(station, phase, anim)),
    ];
    guards
        .into_iter()
        .find_map(|(effect, active)| active.then_some(effect))
        .unwrap_or(Effect::Steady)
}

pub fn classify_flight(
    station: Option<&EnrichedStation>,
    phase: AnimationPhase,
    anim: &FlightAnimation,
) -> Color {
    let Some(station) = station else {
        return CLEAR;
    };
    let Some((steady, fade)) = category_colors(station.flight_category) else {
        return CLEAR;
    };

    match effect(station, phase, anim) {
        Effect::Lightning => LIGHTNING,
        Effect::Wind if anim.fade_instead_of_blink => fade,
        Effect::Wind => CLEAR,
        Effect::Steady => steady,
    }
}
