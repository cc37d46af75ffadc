use ratatui::layout::{Position, Rect};
use time::Date;

/// Where each clickable thing was drawn during the last render
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct HitMap {
    days: Vec<(Rect, Date)>,
    presets: Vec<(Rect, usize)>,
}

impl HitMap {
    pub(crate) fn new() -> HitMap {
        HitMap::default()
    }

    pub(crate) fn clear(&mut self) {
        self.days.clear();
        self.presets.clear();
    }

    pub(super) fn add_day(&mut self, area: Rect, date: Date) {
        self.days.push((area, date));
    }

    pub(super) fn add_preset(&mut self, area: Rect, index: usize) {
        self.presets.push((area, index));
    }

    pub(crate) fn date_at(&self, column: u16, row: u16) -> Option<Date> {
        let pos = Position::new(column, row);
        self.days
            .iter()
            .find(|(area, _)| area.contains(pos))
            .map(|&(_, date)| date)
    }

    pub(crate) fn preset_at(&self, column: u16, row: u16) -> Option<usize> {
        let pos = Position::new(column, row);
        self.presets
            .iter()
            .find(|(area, _)| area.contains(pos))
            .map(|&(_, index)| index)
    }
}
