//! Previewing the range a pending click would complete
use crate::adapter::DateAdapter;
use crate::model::DatePair;
use crate::selection::Phase;

/// The day currently under the pointer.  Purely transient; never part of
/// the selection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HoverPreview<D> {
    hovered: Option<D>,
}

impl<D: Copy> HoverPreview<D> {
    pub fn new() -> Self {
        HoverPreview { hovered: None }
    }

    pub fn hovered(&self) -> Option<D> {
        self.hovered
    }

    pub fn set_hovered(&mut self, date: Option<D>) {
        self.hovered = date;
    }

    /// Called when the pointer leaves the calendar
    pub fn clear(&mut self) {
        self.hovered = None;
    }

    /// The range that would be selected if the hovered day were clicked.
    /// Only exists while a range's start has been chosen and its end has
    /// not.
    pub fn preview<A>(&self, adapter: &A, phase: Phase, start: Option<D>) -> Option<PreviewRange<D>>
    where
        A: DateAdapter<Date = D>,
    {
        if phase != Phase::StartSelected {
            return None;
        }
        let start = start?;
        let hovered = self.hovered?;
        Some(PreviewRange(DatePair::new(adapter, start, hovered)))
    }
}

impl<D: Copy> Default for HoverPreview<D> {
    fn default() -> Self {
        HoverPreview::new()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PreviewRange<D>(pub DatePair<D>);

impl<D: Copy> PreviewRange<D> {
    pub fn start(&self) -> D {
        self.0.start()
    }

    pub fn end(&self) -> D {
        self.0.end()
    }

    pub fn contains<A: DateAdapter<Date = D>>(&self, adapter: &A, date: D) -> bool {
        self.0.contains(adapter, date)
    }

    pub fn is_start<A: DateAdapter<Date = D>>(&self, adapter: &A, date: D) -> bool {
        adapter.is_same_day(date, self.0.start())
    }

    pub fn is_end<A: DateAdapter<Date = D>>(&self, adapter: &A, date: D) -> bool {
        adapter.is_same_day(date, self.0.end())
    }
}
