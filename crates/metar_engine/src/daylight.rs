use chrono::{DateTime, Utc};
use metar_core::brightness::{self, BrightnessLevels, DayPhase};

use crate::collab::{DayWindow, SolarClock};

/// Day/night brightness policy: which sun events bound the day and how bright
/// each half is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Daylight {
    pub window: DayWindow,
    pub levels: BrightnessLevels,
}

impl Daylight {
    /// Brightness for `now`, looking up the sun events of the day `now`
    /// falls on in the clock's zone.
    ///
    /// A clock failure is not fatal: the map is lit at day brightness.
    pub fn evaluate(&self, clock: &dyn SolarClock, now: DateTime<Utc>) -> (DayPhase, f32) {
        let today = clock.local_date(now);
        match clock.solar_day(today) {
            Ok(day) => {
                let (start, end) = day.window(self.window);
                brightness::select(&self.levels, &now, &start, &end)
            }
            Err(error) => {
                tracing::warn!("Could not get solar times ({error}), using day brightness");
                (DayPhase::Day, self.levels.day)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{SolarDay, SolarError};
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone};
    use std::sync::Mutex;

    struct FixedClock(Option<SolarDay>);

    impl SolarClock for FixedClock {
        fn solar_day(&self, date: NaiveDate) -> Result<SolarDay, SolarError> {
            self.0.ok_or(SolarError::Unavailable { date })
        }
    }

    fn solar_day() -> SolarDay {
        let sunrise = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        SolarDay {
            dawn: sunrise - Duration::minutes(25),
            sunrise,
            sunset: sunrise + Duration::hours(12),
            dusk: sunrise + Duration::hours(12) + Duration::minutes(25),
        }
    }

    fn daylight(window: DayWindow) -> Daylight {
        Daylight {
            window,
            levels: BrightnessLevels {
                day: 0.2,
                night: 0.08,
            },
        }
    }

    #[test]
    fn test_window_choice_matters_in_twilight() {
        let day = solar_day();
        let clock = FixedClock(Some(day));
        let twilight = day.sunrise - Duration::minutes(10);

        assert_eq!(
            daylight(DayWindow::DawnDusk).evaluate(&clock, twilight),
            (DayPhase::Day, 0.2)
        );
        assert_eq!(
            daylight(DayWindow::SunriseSunset).evaluate(&clock, twilight),
            (DayPhase::Night, 0.08)
        );
    }

    #[test]
    fn test_boundary_is_reported() {
        let day = solar_day();
        let clock = FixedClock(Some(day));
        assert_eq!(
            daylight(DayWindow::SunriseSunset).evaluate(&clock, day.sunset),
            (DayPhase::BoundaryAmbiguous, 0.2)
        );
    }

    #[test]
    fn test_missing_solar_times_default_to_day() {
        let clock = FixedClock(None);
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 3, 0, 0).unwrap();
        assert_eq!(
            daylight(DayWindow::DawnDusk).evaluate(&clock, now),
            (DayPhase::Day, 0.2)
        );
    }

    struct ZonedClock {
        offset: FixedOffset,
        asked: Mutex<Vec<NaiveDate>>,
    }

    impl SolarClock for ZonedClock {
        fn solar_day(&self, date: NaiveDate) -> Result<SolarDay, SolarError> {
            self.asked.lock().unwrap().push(date);
            Err(SolarError::Unavailable { date })
        }

        fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
            now.with_timezone(&self.offset).date_naive()
        }
    }

    #[test]
    fn test_today_comes_from_the_clock_zone() {
        let clock = ZonedClock {
            offset: FixedOffset::east_opt(10 * 3600).unwrap(),
            asked: Mutex::new(Vec::new()),
        };
        // 22:00 UTC is already the next morning at UTC+10
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 22, 0, 0).unwrap();

        daylight(DayWindow::DawnDusk).evaluate(&clock, now);
        assert_eq!(
            *clock.asked.lock().unwrap(),
            vec![NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()]
        );
    }
}
