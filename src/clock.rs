use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

/// Source of "now" in the organization's time zone.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Drops seconds and fractions.
pub fn to_minute(t: NaiveTime) -> NaiveTime {
    t.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(t)
}

/// Reads the system clock and converts it into a fixed zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: Tz,
}

impl SystemClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let utc: DateTime<Utc> = Utc::now();
        utc.with_timezone(&self.zone).naive_local()
    }
}

/// A clock pinned to one local instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
        Self::new(date.and_time(time))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minute_truncation_drops_seconds() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_milli_opt(14, 5, 59, 900)
            .unwrap();
        let clock = FixedClock::new(now);
        assert_eq!(to_minute(clock.now().time()), NaiveTime::from_hms_opt(14, 5, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    }

    #[test]
    fn system_clock_follows_zone() {
        let kolkata = SystemClock::new(chrono_tz::Asia::Kolkata).now();
        let utc = Utc::now().naive_utc();
        let offset = (kolkata - utc).num_minutes();
        // +05:30, allowing for the instants not being identical
        assert!((329..=331).contains(&offset), "offset was {offset}");
    }
}
