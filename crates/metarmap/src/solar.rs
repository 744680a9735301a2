use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use metar_engine::{SolarClock, SolarDay, SolarError};

use crate::config::SolarTimes;

/// Sun events at fixed local wall-clock times, the same every day.
///
/// Stands in for an ephemeris: the map owner keeps the table roughly in step
/// with the season.
pub struct FixedSolarTable<Tz: TimeZone = Local> {
    times: SolarTimes,
    zone: Tz,
}

impl FixedSolarTable<Local> {
    pub fn new(times: SolarTimes) -> Self {
        FixedSolarTable { times, zone: Local }
    }
}

impl<Tz: TimeZone> FixedSolarTable<Tz> {
    pub fn in_zone(times: SolarTimes, zone: Tz) -> Self {
        FixedSolarTable { times, zone }
    }

    fn instant(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<DateTime<Utc>, SolarError> {
        self.zone
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| SolarError::InvalidLocalTime {
                date,
                time: time.to_string(),
            })
    }
}

impl<Tz> SolarClock for FixedSolarTable<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Send + Sync,
{
    fn solar_day(&self, date: NaiveDate) -> Result<SolarDay, SolarError> {
        Ok(SolarDay {
            dawn: self.instant(date, self.times.dawn)?,
            sunrise: self.instant(date, self.times.sunrise)?,
            sunset: self.instant(date, self.times.sunset)?,
            dusk: self.instant(date, self.times.dusk)?,
        })
    }

    fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.zone).date_naive()
    }
}
