mod grid;
mod hits;
mod presets;
mod widget;
pub(crate) use self::hits::HitMap;
pub(crate) use self::presets::{PresetList, PRESETS_WIDTH, PRESET_KEYS};
pub(crate) use self::widget::{Calendar, MONTH_GAP, MONTH_HEIGHT, MONTH_WIDTH};
use crate::theme::{
    BASE_STYLE, CURSOR_MODIFIER, DISABLED_STYLE, IN_RANGE_STYLE, PREVIEW_EDGE_STYLE,
    PREVIEW_STYLE, SELECTED_STYLE, TODAY_STYLE,
};
use rangepick::adapter::{DateAdapter, TimeAdapter};
use rangepick::picker::DateRangePicker;
use ratatui::style::Style;
use time::Date;

pub(crate) trait DateStyler {
    fn date_style(&self, date: Date) -> Style;
}

/// Styles days from the state of a picker, highlighting the keyboard cursor
#[derive(Clone, Copy, Debug)]
pub(crate) struct PickerStyler<'a> {
    picker: &'a DateRangePicker<TimeAdapter>,
    today: Date,
    cursor: Option<Date>,
}

impl<'a> PickerStyler<'a> {
    pub(crate) fn new(picker: &'a DateRangePicker<TimeAdapter>) -> Self {
        PickerStyler {
            picker,
            today: picker.adapter().today(),
            cursor: None,
        }
    }

    pub(crate) fn cursor(mut self, cursor: Date) -> Self {
        self.cursor = Some(cursor);
        self
    }
}

impl DateStyler for PickerStyler<'_> {
    fn date_style(&self, date: Date) -> Style {
        let p = self.picker;
        let style = if p.is_date_disabled(date) {
            DISABLED_STYLE
        } else if p.is_selected(date) {
            SELECTED_STYLE
        } else if p.is_preview_start(date) || p.is_preview_end(date) {
            PREVIEW_EDGE_STYLE
        } else if p.is_in_selected_range(date) {
            IN_RANGE_STYLE
        } else if p.is_in_preview_range(date) {
            PREVIEW_STYLE
        } else if date == self.today {
            TODAY_STYLE
        } else {
            BASE_STYLE
        };
        if self.cursor == Some(date) {
            style.add_modifier(CURSOR_MODIFIER)
        } else {
            style
        }
    }
}
