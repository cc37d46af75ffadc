//! Converting model values to and from the text a user types
use crate::adapter::DateAdapter;
use crate::config::ConfigError;
use crate::model::{build_date_range, ModelValue, RangeEdges};
use std::fmt;
use std::str::FromStr;
use time::{macros::format_description, parsing::Parsed};

/// Layout of typed dates
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum InputFormat {
    /// `yyyy-mm-dd`
    #[default]
    YearMonthDay,
    /// `dd/mm/yyyy`
    DayMonthYear,
    /// `mm/dd/yyyy`
    MonthDayYear,
    /// Whatever the date adapter's own parser accepts
    Adapter,
}

impl InputFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            InputFormat::YearMonthDay => "yyyy-mm-dd",
            InputFormat::DayMonthYear => "dd/mm/yyyy",
            InputFormat::MonthDayYear => "mm/dd/yyyy",
            InputFormat::Adapter => "auto",
        }
    }

    /// Parses one date.  Returns `None` on empty input, on text that does
    /// not match the layout, or on components that do not name a real day.
    pub fn parse<A: DateAdapter>(self, adapter: &A, text: &str) -> Option<A::Date> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let items = match self {
            InputFormat::YearMonthDay => format_description!("[year]-[month]-[day]"),
            InputFormat::DayMonthYear => format_description!("[day]/[month]/[year]"),
            InputFormat::MonthDayYear => format_description!("[month]/[day]/[year]"),
            InputFormat::Adapter => return adapter.parse(text),
        };
        // Only the digits are read here; whether they name a real day is
        // up to the adapter.
        let mut parsed = Parsed::new();
        let rest = parsed.parse_items(text.as_bytes(), items).ok()?;
        if !rest.is_empty() {
            return None;
        }
        let year = parsed.year().filter(|y| (0..=9999).contains(y))?;
        let month = u8::from(parsed.month()?);
        adapter.from_ymd(year, month, parsed.day()?.get())
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

impl FromStr for InputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<InputFormat, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yyyy-mm-dd" => Ok(InputFormat::YearMonthDay),
            "dd/mm/yyyy" => Ok(InputFormat::DayMonthYear),
            "mm/dd/yyyy" => Ok(InputFormat::MonthDayYear),
            "auto" => Ok(InputFormat::Adapter),
            _ => Err(ConfigError::UnknownInputFormat(s.to_owned())),
        }
    }
}

/// Renders one date for display
pub type DateFormatter<D> = Box<dyn Fn(D) -> String>;

/// How dates are shown to the user
pub enum DisplayFormat<D> {
    /// A pattern name understood by the date adapter
    Pattern(String),
    Custom(DateFormatter<D>),
}

impl<D> DisplayFormat<D> {
    pub fn format_one<A>(&self, adapter: &A, date: D) -> String
    where
        A: DateAdapter<Date = D>,
    {
        match self {
            DisplayFormat::Pattern(pattern) => adapter.format(date, pattern),
            DisplayFormat::Custom(func) => func(date),
        }
    }
}

impl<D> Default for DisplayFormat<D> {
    fn default() -> Self {
        DisplayFormat::Pattern(String::from("fullDate"))
    }
}

impl<D> From<&str> for DisplayFormat<D> {
    fn from(pattern: &str) -> Self {
        DisplayFormat::Pattern(pattern.to_owned())
    }
}

impl<D> fmt::Debug for DisplayFormat<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFormat::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            DisplayFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug)]
pub struct FormatOptions<'a, D> {
    pub range: bool,
    pub separator: &'a str,
    pub display: &'a DisplayFormat<D>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseOptions<'a> {
    pub range: bool,
    pub separator: &'a str,
    pub input: InputFormat,
}

/// Renders a model value.  A range whose end falls on its start day is shown
/// as that one day.
pub fn format_display_value<A: DateAdapter>(
    adapter: &A,
    value: &ModelValue<A::Date>,
    options: &FormatOptions<'_, A::Date>,
) -> String {
    let RangeEdges { start, end } = value.edges();
    let Some(start) = start else {
        return String::new();
    };
    let first = options.display.format_one(adapter, start);
    if !options.range {
        return first;
    }
    match end {
        Some(end) if !adapter.is_same_day(start, end) => format!(
            "{first}{}{}",
            options.separator,
            options.display.format_one(adapter, end)
        ),
        _ => first,
    }
}

/// Parses typed text into a model value.  Anything unparsable yields an
/// empty value rather than an error.
pub fn parse_input_value<A: DateAdapter>(
    adapter: &A,
    raw: &str,
    options: &ParseOptions<'_>,
) -> ModelValue<A::Date> {
    let input = raw.trim();
    if !options.range {
        return options
            .input
            .parse(adapter, input)
            .map_or(ModelValue::Empty, ModelValue::Single);
    }
    let parts = if options.separator.is_empty() {
        vec![input]
    } else {
        input
            .split(options.separator)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
    };
    let dates = match parts.as_slice() {
        [] => Vec::new(),
        [only] => options.input.parse(adapter, only).into_iter().collect(),
        [first, .., last] => {
            match (
                options.input.parse(adapter, first),
                options.input.parse(adapter, last),
            ) {
                (Some(start), Some(end)) => build_date_range(adapter, start, end),
                _ => Vec::new(),
            }
        }
    };
    if dates.is_empty() && !input.is_empty() {
        tracing::trace!(input, "unparsable range text");
    }
    ModelValue::Dates(dates)
}
