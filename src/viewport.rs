//! The window of consecutive months a picker shows
use crate::adapter::DateAdapter;
use crate::model::ModelValue;

/// Width class of the surface the picker is drawn on
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum LayoutTier {
    Xs,
    Sm,
    Md,
    #[default]
    Lg,
    Xl,
    Xxl,
}

impl LayoutTier {
    /// Most months that fit side by side, or `None` if there is no limit
    pub fn month_ceiling(self) -> Option<usize> {
        match self {
            LayoutTier::Xs | LayoutTier::Sm => Some(1),
            LayoutTier::Md => Some(2),
            LayoutTier::Lg => Some(3),
            LayoutTier::Xl | LayoutTier::Xxl => None,
        }
    }
}

/// Answer to the host's layout query
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Breakpoint {
    pub tier: LayoutTier,
    pub mobile: bool,
}

impl Breakpoint {
    pub fn new(tier: LayoutTier) -> Breakpoint {
        Breakpoint {
            tier,
            mobile: tier <= LayoutTier::Sm,
        }
    }

    /// Clamps a requested month count to what this layout can show
    pub fn clamp_months(self, requested: usize) -> usize {
        if self.mobile {
            return 1;
        }
        let ceiling = self.tier.month_ceiling().unwrap_or(usize::MAX);
        requested.min(ceiling).max(1)
    }
}

/// One visible month
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthDescriptor<D> {
    /// First day of the month
    pub date: D,
    pub year: i32,
    /// Zero-based month of the year
    pub month: u8,
    /// Identifies the month uniquely, e.g. `"2026-0"` for January 2026
    pub key: String,
}

#[derive(Clone, Debug)]
pub struct MonthWindow<A: DateAdapter> {
    adapter: A,
    // Invariant: always the first day of a month and within the bounds
    anchor: A::Date,
    requested: usize,
    breakpoint: Breakpoint,
    min_month: Option<A::Date>,
    max_month: Option<A::Date>,
}

impl<A: DateAdapter> MonthWindow<A> {
    /// Creates a window of `requested` months anchored at the current month
    pub fn new(adapter: A, requested: usize, breakpoint: Breakpoint) -> Self {
        let anchor = adapter.start_of_month(adapter.today());
        MonthWindow {
            adapter,
            anchor,
            requested,
            breakpoint,
            min_month: None,
            max_month: None,
        }
    }

    /// Builder form of [`MonthWindow::set_bounds`]
    pub fn bounds(mut self, min: Option<A::Date>, max: Option<A::Date>) -> Self {
        self.set_bounds(min, max);
        self
    }

    pub fn anchor(&self) -> A::Date {
        self.anchor
    }

    pub fn requested_months(&self) -> usize {
        self.requested
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn effective_months(&self) -> usize {
        self.breakpoint.clamp_months(self.requested)
    }

    pub fn set_requested_months(&mut self, requested: usize) {
        self.requested = requested;
        self.reclamp();
    }

    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.breakpoint = breakpoint;
        self.reclamp();
    }

    pub fn set_bounds(&mut self, min: Option<A::Date>, max: Option<A::Date>) {
        self.min_month = min.map(|d| self.adapter.start_of_month(d));
        self.max_month = max.map(|d| self.adapter.start_of_month(d));
        self.reclamp();
    }

    /// Anchors the window at the month of `date`, or the current month if
    /// `None`
    pub fn set_anchor(&mut self, date: Option<A::Date>) {
        let date = date.unwrap_or_else(|| self.adapter.today());
        self.anchor = self.clamp(date);
    }

    /// Re-anchors the window on the start of an externally changed value.
    /// Values without a start leave the window where it is.
    pub fn sync_to_value(&mut self, value: &ModelValue<A::Date>) {
        if let Some(start) = value.edges().start {
            self.set_anchor(Some(start));
        }
    }

    /// Shifts the window by `months`.  Returns `false` if the bounds kept the
    /// anchor where it was.
    pub fn move_by(&mut self, months: i32) -> bool {
        let before = self.anchor;
        self.anchor = self.clamp(self.adapter.add_months(self.anchor, months));
        let moved = !self.adapter.is_same_day(before, self.anchor);
        if moved {
            tracing::debug!(anchor = ?self.anchor, months, "moved month window");
        }
        moved
    }

    pub fn previous(&mut self) -> bool {
        self.move_by(-1)
    }

    pub fn next(&mut self) -> bool {
        self.move_by(1)
    }

    pub fn can_go_prev(&self) -> bool {
        let Some(min) = self.min_month else {
            return true;
        };
        let candidate = self.adapter.add_months(self.anchor, -1);
        !self.adapter.is_before(candidate, min)
            && !self.adapter.is_same_day(candidate, self.anchor)
    }

    pub fn can_go_next(&self) -> bool {
        let Some(limit) = self.last_anchor() else {
            return true;
        };
        let candidate = self.adapter.add_months(self.anchor, 1);
        !self.adapter.is_after(candidate, limit)
            && !self.adapter.is_same_day(candidate, self.anchor)
    }

    pub fn month_views(&self) -> Vec<MonthDescriptor<A::Date>> {
        (0..self.effective_months())
            .map_while(|i| i32::try_from(i).ok())
            .map(|i| {
                let date = self.adapter.add_months(self.anchor, i);
                let year = self.adapter.year(date);
                let month = self.adapter.month(date);
                MonthDescriptor {
                    date,
                    year,
                    month,
                    key: format!("{year}-{month}"),
                }
            })
            .collect()
    }

    /// Tests whether `date` falls in one of the visible months
    pub fn is_visible(&self, date: A::Date) -> bool {
        let month = self.adapter.start_of_month(date);
        let last = self.adapter.add_months(self.anchor, self.span());
        !self.adapter.is_before(month, self.anchor) && !self.adapter.is_after(month, last)
    }

    /// Latest anchor that keeps the window's last month at or before the
    /// max month
    fn last_anchor(&self) -> Option<A::Date> {
        self.max_month
            .map(|max| self.adapter.add_months(max, -self.span()))
    }

    // Number of months between the first and last visible month
    fn span(&self) -> i32 {
        i32::try_from(self.effective_months() - 1).unwrap_or(i32::MAX)
    }

    fn clamp(&self, date: A::Date) -> A::Date {
        let mut anchor = self.adapter.start_of_month(date);
        if let Some(min) = self.min_month {
            if self.adapter.is_before(anchor, min) {
                anchor = min;
            }
        }
        if let Some(limit) = self.last_anchor() {
            if self.adapter.is_after(anchor, limit) {
                anchor = limit;
            }
        }
        anchor
    }

    fn reclamp(&mut self) {
        self.anchor = self.clamp(self.anchor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::TimeAdapter;
    use time::macros::date;

    fn window(requested: usize, tier: LayoutTier) -> MonthWindow<TimeAdapter> {
        MonthWindow::new(
            TimeAdapter::fixed(date!(2026 - 01 - 15)),
            requested,
            Breakpoint::new(tier),
        )
    }

    #[test]
    fn test_starts_at_current_month() {
        let w = window(2, LayoutTier::Xl);
        assert_eq!(w.anchor(), date!(2026 - 01 - 01));
        let views = w.month_views();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].key, "2026-0");
        assert_eq!(views[1].key, "2026-1");
        assert_eq!(views[1].date, date!(2026 - 02 - 01));
        assert_eq!(views[1].month, 1);
        assert_eq!(views[1].year, 2026);
    }

    #[test]
    fn test_month_ceiling_by_tier() {
        assert_eq!(window(4, LayoutTier::Xs).effective_months(), 1);
        assert_eq!(window(4, LayoutTier::Sm).effective_months(), 1);
        assert_eq!(window(4, LayoutTier::Md).effective_months(), 2);
        assert_eq!(window(4, LayoutTier::Lg).effective_months(), 3);
        assert_eq!(window(4, LayoutTier::Xl).effective_months(), 4);
        assert_eq!(window(0, LayoutTier::Xl).effective_months(), 1);
        let mobile = Breakpoint {
            tier: LayoutTier::Xxl,
            mobile: true,
        };
        assert_eq!(mobile.clamp_months(3), 1);
    }

    #[test]
    fn test_year_rollover_keys() {
        let mut w = window(3, LayoutTier::Xl);
        w.set_anchor(Some(date!(2025 - 11 - 20)));
        let keys = w.month_views().into_iter().map(|m| m.key).collect::<Vec<_>>();
        assert_eq!(keys, ["2025-10", "2025-11", "2026-0"]);
    }

    #[test]
    fn test_clamp_to_min() {
        let mut w = window(2, LayoutTier::Xl).bounds(Some(date!(2026 - 03 - 14)), None);
        assert_eq!(w.anchor(), date!(2026 - 03 - 01));
        assert!(!w.can_go_prev());
        assert!(!w.previous());
        assert_eq!(w.anchor(), date!(2026 - 03 - 01));
        assert!(w.next());
        assert!(w.can_go_prev());
        w.set_anchor(Some(date!(2020 - 01 - 01)));
        assert_eq!(w.anchor(), date!(2026 - 03 - 01));
    }

    #[test]
    fn test_clamp_to_max_with_two_months() {
        let mut w = window(2, LayoutTier::Xl).bounds(None, Some(date!(2026 - 06 - 20)));
        w.set_anchor(Some(date!(2026 - 06 - 10)));
        assert_eq!(w.anchor(), date!(2026 - 05 - 01));
        assert!(!w.can_go_next());
        assert!(!w.next());
        assert!(w.can_go_prev());
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let mut w = window(3, LayoutTier::Xl).bounds(
            Some(date!(2026 - 01 - 10)),
            Some(date!(2026 - 04 - 10)),
        );
        w.set_anchor(Some(date!(2026 - 09 - 01)));
        let first = w.anchor();
        w.set_anchor(Some(first));
        assert_eq!(w.anchor(), first);
        assert_eq!(first, date!(2026 - 02 - 01));
    }

    #[test]
    fn test_reclamp_on_breakpoint_change() {
        let mut w = window(1, LayoutTier::Xl).bounds(None, Some(date!(2026 - 06 - 01)));
        w.set_anchor(Some(date!(2026 - 06 - 01)));
        assert_eq!(w.anchor(), date!(2026 - 06 - 01));
        w.set_requested_months(3);
        assert_eq!(w.anchor(), date!(2026 - 04 - 01));
        w.set_breakpoint(Breakpoint::new(LayoutTier::Md));
        assert_eq!(w.effective_months(), 2);
        assert_eq!(w.anchor(), date!(2026 - 04 - 01));
        assert!(w.can_go_next());
    }

    #[test]
    fn test_unbounded_navigation() {
        let mut w = window(1, LayoutTier::Xl);
        assert!(w.can_go_prev());
        assert!(w.can_go_next());
        assert!(w.move_by(-13));
        assert_eq!(w.anchor(), date!(2024 - 12 - 01));
    }

    #[test]
    fn test_sync_to_value() {
        let mut w = window(2, LayoutTier::Xl);
        w.sync_to_value(&ModelValue::Dates(vec![
            date!(2026 - 07 - 04),
            date!(2026 - 08 - 04),
        ]));
        assert_eq!(w.anchor(), date!(2026 - 07 - 01));
        w.sync_to_value(&ModelValue::Empty);
        assert_eq!(w.anchor(), date!(2026 - 07 - 01));
        assert!(w.is_visible(date!(2026 - 08 - 31)));
        assert!(!w.is_visible(date!(2026 - 09 - 01)));
        assert!(!w.is_visible(date!(2026 - 06 - 30)));
    }
}
