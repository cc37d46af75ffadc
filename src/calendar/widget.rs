use super::grid::{MonthGrid, WeekdayExt};
use super::{DateStyler, HitMap};
use crate::theme::{NAV_STYLE, TITLE_STYLE, WEEKDAY_STYLE};
use rangepick::viewport::MonthDescriptor;
use ratatui::{layout::Flex, prelude::*};
use time::Date;

static HEADER: &str = "Su Mo Tu We Th Fr Sa";

/// Width of one month in columns
pub(crate) const MONTH_WIDTH: u16 = 20;

/// Columns between adjacent months
pub(crate) const MONTH_GAP: u16 = 3;

/// Title, weekday header, rule, and six weeks
pub(crate) const MONTH_HEIGHT: u16 = 9;

/// Number of lines above the first week
const HEADER_LINES: u16 = 3;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 3;

const ACS_HLINE: char = '─';

/// Months drawn side by side.  Every day drawn is recorded in the
/// [`HitMap`] so that mouse events can be mapped back to dates.
#[derive(Debug)]
pub(crate) struct Calendar<'a, S> {
    months: &'a [MonthDescriptor<Date>],
    styler: &'a S,
    can_go_prev: bool,
    can_go_next: bool,
}

impl<'a, S> Calendar<'a, S> {
    pub(crate) fn new(months: &'a [MonthDescriptor<Date>], styler: &'a S) -> Self {
        Calendar {
            months,
            styler,
            can_go_prev: false,
            can_go_next: false,
        }
    }

    pub(crate) fn navigation(mut self, can_go_prev: bool, can_go_next: bool) -> Self {
        self.can_go_prev = can_go_prev;
        self.can_go_next = can_go_next;
        self
    }

    pub(crate) fn width_for(months: usize) -> u16 {
        let months = u16::try_from(months).unwrap_or(u16::MAX);
        months
            .saturating_mul(MONTH_WIDTH + MONTH_GAP)
            .saturating_sub(MONTH_GAP)
    }
}

impl<S: DateStyler> StatefulWidget for Calendar<'_, S> {
    type State = HitMap;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [area] = Layout::horizontal([Self::width_for(self.months.len()).min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let mut canvas = BufferCanvas::new(area, buf, state);
        let last = self.months.len().saturating_sub(1);
        let mut left = 0u16;
        for (i, month) in self.months.iter().enumerate() {
            canvas.draw_title(left, month);
            if i == 0 && self.can_go_prev {
                canvas.mvprint(0, left, "<", NAV_STYLE);
            }
            if i == last && self.can_go_next {
                canvas.mvprint(0, left + MONTH_WIDTH - 1, ">", NAV_STYLE);
            }
            canvas.mvprint(1, left, HEADER, WEEKDAY_STYLE);
            canvas.hline(2, left, ACS_HLINE, MONTH_WIDTH);
            let grid = MonthGrid::new(month.date);
            for (week_no, week) in std::iter::zip(0u16.., grid.weeks()) {
                for (wd, date) in week.enumerate() {
                    canvas.draw_day(
                        HEADER_LINES + week_no,
                        left + DAY_WIDTH * wd.index0(),
                        date,
                        self.styler.date_style(date),
                    );
                }
            }
            left = left.saturating_add(MONTH_WIDTH + MONTH_GAP);
        }
    }
}

#[derive(Debug)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
    hits: &'a mut HitMap,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer, hits: &'a mut HitMap) -> Self {
        Self { area, buf, hits }
    }

    fn draw_title(&mut self, left: u16, month: &MonthDescriptor<Date>) {
        let title = format!("{} {}", month.date.month(), month.year);
        let width = u16::try_from(title.len()).unwrap_or(MONTH_WIDTH);
        let pad = MONTH_WIDTH.saturating_sub(width) / 2;
        self.mvprint(0, left + pad, title, TITLE_STYLE);
    }

    fn draw_day(&mut self, y: u16, x: u16, date: Date, style: Style) {
        if let Some(rect) = self.mvprint(y, x, format!("{:2}", date.day()), style) {
            self.hits.add_day(rect, date);
        }
    }

    /// Prints `s` at the given offsets into the canvas, truncated at its
    /// right edge.  Returns the area actually written.
    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) -> Option<Rect> {
        if y < self.area.height && x < self.area.width {
            let max_width = usize::from(self.area.width - x);
            let (end, _) =
                self.buf
                    .set_stringn(x + self.area.x, y + self.area.y, s, max_width, style);
            Some(Rect {
                x: x + self.area.x,
                y: y + self.area.y,
                width: end - (x + self.area.x),
                height: 1,
            })
        } else {
            None
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), Style::new());
    }
}
