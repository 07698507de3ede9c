use cardapio_shared::DateRange;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use time::{Date, Duration, OffsetDateTime, Time, Weekday, macros::time};
use time_tz::{ToTimezone, timezones};

const END_OF_DAY: Time = time!(23:59:59);

/// First day of a calendar week.
///
/// Both conventions exist among clients: Monday (ISO) is the default,
/// Sunday can be selected through configuration.
#[derive(
    EnumString, Display, AsRefStr, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Monday,
            WeekStart::Sunday => Weekday::Sunday,
        }
    }

    fn days_since_start(&self, weekday: Weekday) -> i64 {
        match self {
            WeekStart::Monday => weekday.number_days_from_monday() as i64,
            WeekStart::Sunday => weekday.number_days_from_sunday() as i64,
        }
    }
}

/// Start and end instants of a period, start at midnight and end at 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl Week {
    pub fn contains(&self, value: OffsetDateTime) -> bool {
        self.start <= value && value <= self.end
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start.date(), self.end.date())
    }
}

/// Current wall-clock time in the given IANA time zone, UTC when unknown.
pub fn now(tz: impl AsRef<str>) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    match timezones::get_by_name(tz.as_ref()) {
        Some(tz) => now.to_timezone(tz),
        None => now,
    }
}

pub fn today(tz: impl AsRef<str>) -> Date {
    now(tz).date()
}

/// Week containing `date`.
pub fn week_range(date: Date, week_start: WeekStart) -> DateRange {
    let start = date - Duration::days(week_start.days_since_start(date.weekday()));

    DateRange::new(start, start + Duration::days(6))
}

/// First to last day of the month containing `date`.
pub fn month_range(date: Date) -> DateRange {
    let start = date - Duration::days(date.day() as i64 - 1);
    let days = time::util::days_in_year_month(date.year(), date.month());

    DateRange::new(start, start + Duration::days(days as i64 - 1))
}

pub fn week_bounds(value: OffsetDateTime, week_start: WeekStart) -> Week {
    bounds(value, week_range(value.date(), week_start))
}

pub fn month_bounds(value: OffsetDateTime) -> Week {
    bounds(value, month_range(value.date()))
}

fn bounds(value: OffsetDateTime, range: DateRange) -> Week {
    let start = value.replace_date(range.start).replace_time(Time::MIDNIGHT);
    let end = value.replace_date(range.end).replace_time(END_OF_DAY);

    Week { start, end }
}

/// Compares calendar days only. No time zone conversion happens: both values
/// are read in their own offset.
pub fn is_same_day(a: OffsetDateTime, b: OffsetDateTime) -> bool {
    a.date() == b.date()
}

/// The week containing `from` followed by the `count - 1` next weeks.
pub fn current_and_next_weeks(from: Date, count: usize, week_start: WeekStart) -> Vec<DateRange> {
    let current = week_range(from, week_start);

    (0..count as i64)
        .map(|i| {
            let start = current.start + Duration::weeks(i);
            DateRange::new(start, start + Duration::days(6))
        })
        .collect()
}

/// The `count` weeks following the one containing `from`.
pub fn next_weeks(from: Date, count: usize, week_start: WeekStart) -> Vec<DateRange> {
    current_and_next_weeks(from, count + 1, week_start)
        .into_iter()
        .skip(1)
        .collect()
}
