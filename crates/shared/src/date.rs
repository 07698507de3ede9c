use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Iso8601},
    macros::format_description,
};

pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` calendar date.
///
/// Full ISO 8601 timestamps (`2024-01-03T00:00:00Z`) are accepted as well and
/// keep the date as written, ignoring the time and offset: older payloads
/// stored the planned date as a timestamp. Anything else is rejected.
pub fn parse_date(value: impl AsRef<str>) -> crate::Result<Date> {
    let value = value.as_ref().trim();
    if value.len() == 10 {
        return Ok(Date::parse(value, DATE_FORMAT)?);
    }
    if !value.contains('T') {
        crate::bail!("invalid date: {value}");
    }

    let date = OffsetDateTime::parse(value, &Iso8601::DEFAULT)
        .map(OffsetDateTime::date)
        .or_else(|_| PrimitiveDateTime::parse(value, &Iso8601::DEFAULT).map(|dt| dt.date()))?;

    Ok(date)
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Serde adapter for `YYYY-MM-DD` dates, usable with `#[serde(with = "...")]`.
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let value = String::deserialize(deserializer)?;

        super::parse_date(&value).map_err(D::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
        use time::Date;

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_str(&super::super::format_date(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            let Some(value) = Option::<String>::deserialize(deserializer)? else {
                return Ok(None);
            };

            super::super::parse_date(&value)
                .map(Some)
                .map_err(D::Error::custom)
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
    #[serde(with = "iso_date")]
    pub start: Date,
    #[serde(with = "iso_date")]
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    pub fn single(date: Date) -> Self {
        Self::new(date, date)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, both ends included.
    pub fn len_days(&self) -> usize {
        if self.is_empty() {
            return 0;
        }

        ((self.end - self.start).whole_days() + 1) as usize
    }

    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end = self.end;

        std::iter::successors(Some(self.start), |day| day.next_day())
            .take_while(move |day| *day <= end)
    }
}
