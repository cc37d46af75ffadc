//! Picker configuration
use crate::adapter::DateAdapter;
use crate::gesture::SwipeThresholds;
use crate::presets::PresetDefinition;
use crate::selection::AllowedDates;
use crate::text::{DisplayFormat, InputFormat};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_SEPARATOR: &str = " - ";

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown input format {0:?} (expected yyyy-mm-dd, dd/mm/yyyy, mm/dd/yyyy, or auto)")]
    UnknownInputFormat(String),
    #[error("unknown fullscreen mode {0:?} (expected true, false, or auto)")]
    UnknownFullscreenMode(String),
    #[error("at least one month must be shown")]
    ZeroMonths,
    #[error("minimum date {min} is after maximum date {max}")]
    InvertedBounds { min: String, max: String },
    #[error("{value:?} is not a valid {field} date")]
    InvalidDate { field: &'static str, value: String },
}

/// Whether the picker takes over the whole surface
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum FullscreenMode {
    On,
    #[default]
    Off,
    /// Fullscreen on mobile-sized layouts only
    Auto,
}

impl FullscreenMode {
    pub fn resolve(self, mobile: bool) -> bool {
        match self {
            FullscreenMode::On => true,
            FullscreenMode::Off => false,
            FullscreenMode::Auto => mobile,
        }
    }
}

impl FromStr for FullscreenMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<FullscreenMode, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" => Ok(FullscreenMode::On),
            "false" | "off" | "no" => Ok(FullscreenMode::Off),
            "auto" => Ok(FullscreenMode::Auto),
            _ => Err(ConfigError::UnknownFullscreenMode(s.to_owned())),
        }
    }
}

/// Everything a [`DateRangePicker`](crate::picker::DateRangePicker) can be
/// configured with.  Built with chained setters:
///
/// ```
/// use rangepick::adapter::TimeAdapter;
/// use rangepick::config::PickerOptions;
///
/// let options = PickerOptions::<TimeAdapter>::new()
///     .range(true)
///     .months(2)
///     .auto_apply(false);
/// assert_eq!(options.months, 2);
/// ```
pub struct PickerOptions<A: DateAdapter> {
    pub range: bool,
    pub months: usize,
    pub auto_apply: bool,
    pub min: Option<A::Date>,
    pub max: Option<A::Date>,
    pub allowed_dates: Option<AllowedDates<A::Date>>,
    pub separator: String,
    pub input_format: InputFormat,
    pub display_format: DisplayFormat<A::Date>,
    pub fullscreen: FullscreenMode,
    pub swipeable: bool,
    pub swipe: SwipeThresholds,
    /// Presets to offer; `None` means the default set
    pub presets: Option<Vec<PresetDefinition<A>>>,
    pub show_presets: bool,
}

impl<A: DateAdapter> PickerOptions<A> {
    pub fn new() -> Self {
        PickerOptions {
            range: false,
            months: 1,
            auto_apply: true,
            min: None,
            max: None,
            allowed_dates: None,
            separator: String::from(DEFAULT_SEPARATOR),
            input_format: InputFormat::default(),
            display_format: DisplayFormat::default(),
            fullscreen: FullscreenMode::default(),
            swipeable: true,
            swipe: SwipeThresholds::default(),
            presets: None,
            show_presets: true,
        }
    }

    pub fn range(mut self, range: bool) -> Self {
        self.range = range;
        self
    }

    pub fn months(mut self, months: usize) -> Self {
        self.months = months;
        self
    }

    pub fn auto_apply(mut self, auto_apply: bool) -> Self {
        self.auto_apply = auto_apply;
        self
    }

    pub fn min(mut self, min: Option<A::Date>) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: Option<A::Date>) -> Self {
        self.max = max;
        self
    }

    pub fn allowed_dates<F>(mut self, allowed: F) -> Self
    where
        F: Fn(A::Date) -> bool + 'static,
    {
        self.allowed_dates = Some(Box::new(allowed));
        self
    }

    pub fn separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn input_format(mut self, format: InputFormat) -> Self {
        self.input_format = format;
        self
    }

    pub fn display_format<F: Into<DisplayFormat<A::Date>>>(mut self, format: F) -> Self {
        self.display_format = format.into();
        self
    }

    pub fn fullscreen(mut self, mode: FullscreenMode) -> Self {
        self.fullscreen = mode;
        self
    }

    pub fn swipeable(mut self, swipeable: bool) -> Self {
        self.swipeable = swipeable;
        self
    }

    pub fn swipe(mut self, thresholds: SwipeThresholds) -> Self {
        self.swipe = thresholds;
        self
    }

    pub fn presets(mut self, presets: Vec<PresetDefinition<A>>) -> Self {
        self.presets = Some(presets);
        self
    }

    pub fn show_presets(mut self, show: bool) -> Self {
        self.show_presets = show;
        self
    }

    /// Checks the options for contradictions
    pub fn validate(&self, adapter: &A) -> Result<(), ConfigError> {
        if self.months == 0 {
            return Err(ConfigError::ZeroMonths);
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if adapter.is_after(min, max) {
                return Err(ConfigError::InvertedBounds {
                    min: adapter.format(min, "yyyy-mm-dd"),
                    max: adapter.format(max, "yyyy-mm-dd"),
                });
            }
        }
        Ok(())
    }
}

impl<A: DateAdapter> Default for PickerOptions<A> {
    fn default() -> Self {
        PickerOptions::new()
    }
}

impl<A: DateAdapter> fmt::Debug for PickerOptions<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerOptions")
            .field("range", &self.range)
            .field("months", &self.months)
            .field("auto_apply", &self.auto_apply)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("allowed_dates", &self.allowed_dates.as_ref().map(|_| ".."))
            .field("separator", &self.separator)
            .field("input_format", &self.input_format)
            .field("display_format", &self.display_format)
            .field("fullscreen", &self.fullscreen)
            .field("swipeable", &self.swipeable)
            .field("swipe", &self.swipe)
            .field("presets", &self.presets.as_ref().map(Vec::len))
            .field("show_presets", &self.show_presets)
            .finish()
    }
}
