//! Day/night brightness selection.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Where `now` falls relative to today's day window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum DayPhase {
    Day,
    Night,
    /// `now` is exactly on the window start or end. Neither strict
    /// comparison holds, so this is reported separately and lit as day.
    BoundaryAmbiguous,
}

/// Brightness scalars in `0.0..=1.0` handed to the render sink.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrightnessLevels {
    pub day: f32,
    pub night: f32,
}

impl Default for BrightnessLevels {
    fn default() -> Self {
        BrightnessLevels {
            day: 0.2,
            night: 0.08,
        }
    }
}

impl BrightnessLevels {
    pub fn level_for(&self, phase: DayPhase) -> f32 {
        match phase {
            DayPhase::Night => self.night,
            DayPhase::Day | DayPhase::BoundaryAmbiguous => self.day,
        }
    }
}

/// Classify `now` against the `[start, end]` window.
pub fn day_phase<Tz: TimeZone>(
    now: &DateTime<Tz>,
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
) -> DayPhase {
    if now < start || now > end {
        DayPhase::Night
    } else if now > start && now < end {
        DayPhase::Day
    } else {
        DayPhase::BoundaryAmbiguous
    }
}

/// Pick the brightness for `now`, logging the decision.
pub fn select<Tz: TimeZone>(
    levels: &BrightnessLevels,
    now: &DateTime<Tz>,
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
) -> (DayPhase, f32)
where
    Tz::Offset: std::fmt::Display,
{
    let phase = day_phase(now, start, end);
    match phase {
        DayPhase::Night => tracing::info!("Night time, switching at {}", start),
        DayPhase::Day => tracing::info!("Day time, switching at {}", end),
        DayPhase::BoundaryAmbiguous => {
            tracing::warn!(
                "Current time {} sits on a day window boundary, using day brightness",
                now
            )
        }
    }
    (phase, levels.level_for(phase))
}
