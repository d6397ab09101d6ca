use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::model::LeaveDates;

/// Every calendar date covered by `dates`, ascending, both ends included.
pub fn expand(dates: &LeaveDates) -> Vec<NaiveDate> {
    days_between(dates.first(), dates.last())
}

/// `from` through `to`; empty when `to < from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|d| *d <= to).collect()
}

/// First and last date shared by `a` and `b`.
pub fn overlap(a: &LeaveDates, b: &LeaveDates) -> Option<(NaiveDate, NaiveDate)> {
    let from = a.first().max(b.first());
    let to = a.last().min(b.last());
    (from <= to).then_some((from, to))
}

/// A calendar month of a year, the reporting unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct Period {
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 6)]
    pub month: u32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth(month));
        }
        let period = Self { year, month };
        // make sure both ends are representable
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|_| period.next_first_day())
            .ok_or(ValidationError::InvalidYear(year))?;
        Ok(period)
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next_first_day()
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    fn next_first_day(&self) -> Option<NaiveDate> {
        if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        }
    }

    /// The dates of `dates` inside this month. Only the clipped part is expanded.
    pub fn clip(&self, dates: &LeaveDates) -> Vec<NaiveDate> {
        days_between(
            dates.first().max(self.first_day()),
            dates.last().min(self.last_day()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn single_date_expands_to_itself() {
        assert_eq!(expand(&LeaveDates::single(d(2025, 3, 10))), vec![d(2025, 3, 10)]);
    }

    #[test]
    fn range_is_inclusive_ascending_and_gapless() {
        let from = d(2025, 2, 26);
        let to = d(2025, 3, 3);
        let days = expand(&LeaveDates::range(from, to).unwrap());

        assert_eq!(days.len() as i64, (to - from).num_days() + 1);
        assert_eq!(days.first(), Some(&from));
        assert_eq!(days.last(), Some(&to));
        assert!(days.windows(2).all(|w| (w[1] - w[0]).num_days() == 1));
    }

    #[test]
    fn range_across_year_end() {
        let days = expand(&LeaveDates::range(d(2024, 12, 30), d(2025, 1, 2)).unwrap());
        assert_eq!(
            days,
            vec![d(2024, 12, 30), d(2024, 12, 31), d(2025, 1, 1), d(2025, 1, 2)]
        );
    }

    #[test]
    fn period_bounds() {
        let feb = Period::new(2, 2024).unwrap();
        assert_eq!(feb.first_day(), d(2024, 2, 1));
        assert_eq!(feb.last_day(), d(2024, 2, 29));
        assert!(feb.contains(d(2024, 2, 29)));
        assert!(!feb.contains(d(2025, 2, 1)));

        let dec = Period::new(12, 2025).unwrap();
        assert_eq!(dec.last_day(), d(2025, 12, 31));
        assert_eq!(Period::of(d(2025, 12, 5)), dec);
    }

    #[test]
    fn period_rejects_bad_month() {
        assert_eq!(Period::new(0, 2025), Err(ValidationError::InvalidMonth(0)));
        assert_eq!(Period::new(13, 2025), Err(ValidationError::InvalidMonth(13)));
        assert!(matches!(Period::new(1, 400_000), Err(ValidationError::InvalidYear(_))));
    }

    #[test]
    fn clip_keeps_only_the_month() {
        let june = Period::new(6, 2025).unwrap();
        let spanning = LeaveDates::range(d(2025, 5, 30), d(2025, 6, 2)).unwrap();
        assert_eq!(june.clip(&spanning), vec![d(2025, 6, 1), d(2025, 6, 2)]);
        assert!(june.clip(&LeaveDates::single(d(2025, 7, 1))).is_empty());
    }

    #[test]
    fn clip_does_not_walk_the_whole_range() {
        // a stored row may predate the span cap
        let huge = LeaveDates::Range {
            from: d(1, 1, 1),
            to: d(9999, 12, 31),
        };
        assert_eq!(Period::new(2, 2025).unwrap().clip(&huge).len(), 28);
    }

    #[test]
    fn overlap_is_the_shared_span() {
        let a = LeaveDates::range(d(2025, 6, 1), d(2025, 6, 10)).unwrap();
        let b = LeaveDates::range(d(2025, 6, 8), d(2025, 6, 20)).unwrap();
        assert_eq!(overlap(&a, &b), Some((d(2025, 6, 8), d(2025, 6, 10))));
        assert_eq!(overlap(&a, &LeaveDates::single(d(2025, 6, 11))), None);
    }
}
