//! The date capability the selection engine is written against.
//!
//! Every algorithm in this crate compares, shifts, parses, and formats dates
//! only through a [`DateAdapter`].  [`TimeAdapter`] is the stock
//! implementation over [`time::Date`].
use std::cmp::Ordering;
use std::fmt;
use time::{
    format_description, macros::format_description, Date, Duration, Month, OffsetDateTime,
};

pub trait DateAdapter {
    /// An opaque calendar day.  Values are immutable and freely copied.
    type Date: Copy + fmt::Debug;

    /// The current day according to the adapter's notion of "now"
    fn today(&self) -> Self::Date;

    /// Compares two dates at day granularity
    fn compare(&self, a: Self::Date, b: Self::Date) -> Ordering;

    fn is_before(&self, a: Self::Date, b: Self::Date) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    fn is_after(&self, a: Self::Date, b: Self::Date) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    fn is_same_day(&self, a: Self::Date, b: Self::Date) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    /// Tests whether `date` lies in `[start, end]`, inclusive at both ends
    fn is_within_range(&self, date: Self::Date, start: Self::Date, end: Self::Date) -> bool {
        !self.is_before(date, start) && !self.is_after(date, end)
    }

    fn start_of_day(&self, date: Self::Date) -> Self::Date;

    fn start_of_month(&self, date: Self::Date) -> Self::Date;

    fn end_of_month(&self, date: Self::Date) -> Self::Date;

    fn start_of_year(&self, date: Self::Date) -> Self::Date;

    fn end_of_year(&self, date: Self::Date) -> Self::Date;

    /// Shifts `date` by `days`, saturating at the ends of the representable
    /// range
    fn add_days(&self, date: Self::Date, days: i64) -> Self::Date;

    /// Shifts `date` by `months`.  When the day of month does not exist in
    /// the target month (e.g., January 31 plus one month), the last day of
    /// the target month is used instead.
    fn add_months(&self, date: Self::Date, months: i32) -> Self::Date;

    /// Builds a date from a year, a one-based month, and a day of month.
    /// Returns `None` if the components do not name a real day.
    fn from_ymd(&self, year: i32, month: u8, day: u8) -> Option<Self::Date>;

    /// Free-form parsing of user input
    fn parse(&self, text: &str) -> Option<Self::Date>;

    /// Renders `date` using a named pattern
    fn format(&self, date: Self::Date, pattern: &str) -> String;

    fn year(&self, date: Self::Date) -> i32;

    /// Zero-based month of the year (January is 0)
    fn month(&self, date: Self::Date) -> u8;
}

/// Where a [`TimeAdapter`] gets "today" from
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Clock {
    /// The local calendar day at the moment of the call, or the UTC day if
    /// the local offset cannot be determined
    #[default]
    Local,
    /// A pinned day
    Fixed(Date),
}

impl Clock {
    pub fn today(self) -> Date {
        match self {
            Clock::Local => OffsetDateTime::now_local()
                .unwrap_or_else(|e| {
                    tracing::trace!(error = %e, "local offset unavailable; using UTC");
                    OffsetDateTime::now_utc()
                })
                .date(),
            Clock::Fixed(date) => date,
        }
    }
}

/// [`DateAdapter`] over [`time::Date`]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimeAdapter {
    clock: Clock,
}

impl TimeAdapter {
    pub const fn new(clock: Clock) -> TimeAdapter {
        TimeAdapter { clock }
    }

    /// An adapter whose "today" is always `today`
    pub const fn fixed(today: Date) -> TimeAdapter {
        TimeAdapter::new(Clock::Fixed(today))
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }
}

impl DateAdapter for TimeAdapter {
    type Date = Date;

    fn today(&self) -> Date {
        self.clock.today()
    }

    fn compare(&self, a: Date, b: Date) -> Ordering {
        a.cmp(&b)
    }

    fn start_of_day(&self, date: Date) -> Date {
        date
    }

    fn start_of_month(&self, date: Date) -> Date {
        first_of_month(date.year(), date.month()).unwrap_or(date)
    }

    fn end_of_month(&self, date: Date) -> Date {
        let last = last_day_of_month(date.year(), date.month());
        date.replace_day(last).unwrap_or(date)
    }

    fn start_of_year(&self, date: Date) -> Date {
        first_of_month(date.year(), Month::January).unwrap_or(date)
    }

    fn end_of_year(&self, date: Date) -> Date {
        Date::from_calendar_date(date.year(), Month::December, 31).unwrap_or(date)
    }

    fn add_days(&self, date: Date, days: i64) -> Date {
        date.saturating_add(Duration::days(days))
    }

    fn add_months(&self, date: Date, months: i32) -> Date {
        let total = i64::from(date.year()) * 12
            + i64::from(u8::from(date.month()) - 1)
            + i64::from(months);
        let target = i32::try_from(total.div_euclid(12))
            .ok()
            .zip(u8::try_from(total.rem_euclid(12) + 1).ok())
            .and_then(|(year, month)| {
                let month = Month::try_from(month).ok()?;
                let day = date.day().min(last_day_of_month(year, month));
                Date::from_calendar_date(year, month, day).ok()
            });
        match target {
            Some(d) => d,
            None if months < 0 => Date::MIN,
            None => Date::MAX,
        }
    }

    fn from_ymd(&self, year: i32, month: u8, day: u8) -> Option<Date> {
        let month = Month::try_from(month).ok()?;
        Date::from_calendar_date(year, month, day).ok()
    }

    fn parse(&self, text: &str) -> Option<Date> {
        let text = text.trim();
        Date::parse(text, format_description!("[year]-[month]-[day]"))
            .or_else(|_| Date::parse(text, format_description!("[year]/[month]/[day]")))
            .or_else(|_| {
                Date::parse(
                    text,
                    format_description!(
                        "[month repr:long case_sensitive:false] [day padding:none], [year]"
                    ),
                )
            })
            .or_else(|_| {
                Date::parse(
                    text,
                    format_description!(
                        "[month repr:short case_sensitive:false] [day padding:none], [year]"
                    ),
                )
            })
            .or_else(|_| {
                Date::parse(
                    text,
                    format_description!(
                        "[day padding:none] [month repr:short case_sensitive:false] [year]"
                    ),
                )
            })
            .ok()
    }

    #[allow(deprecated)]
    fn format(&self, date: Date, pattern: &str) -> String {
        let rendered = match pattern {
            "fullDate" => date.format(format_description!(
                "[month repr:long] [day padding:none], [year]"
            )),
            "monthAndYear" => date.format(format_description!("[month repr:long] [year]")),
            "yyyy-mm-dd" => date.format(format_description!("[year]-[month]-[day]")),
            "dd/mm/yyyy" => date.format(format_description!("[day]/[month]/[year]")),
            "mm/dd/yyyy" => date.format(format_description!("[month]/[day]/[year]")),
            custom => match format_description::parse(custom) {
                Ok(items) => date.format(items.as_slice()),
                Err(e) => {
                    tracing::trace!(pattern = custom, error = %e, "invalid date pattern; using ISO");
                    date.format(format_description!("[year]-[month]-[day]"))
                }
            },
        };
        // Formatting a valid Date with a fixed description cannot fail in
        // practice, but a custom description may ask for time components.
        rendered.unwrap_or_else(|_| date.to_string())
    }

    fn year(&self, date: Date) -> i32 {
        date.year()
    }

    fn month(&self, date: Date) -> u8 {
        u8::from(date.month()) - 1
    }
}

fn first_of_month(year: i32, month: Month) -> Option<Date> {
    Date::from_calendar_date(year, month, 1).ok()
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    (28..=31)
        .rev()
        .find(|&day| Date::from_calendar_date(year, month, day).is_ok())
        .unwrap_or(28)
}
