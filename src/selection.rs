//! The selection state machine
//!
//! A [`SelectionMachine`] consumes day clicks and range requests, keeps the
//! in-progress edges and the buffered draft apart from the externally owned
//! model value, and reports what the host should do with each input as an
//! [`Outcome`].
use crate::adapter::DateAdapter;
use crate::model::{DatePair, ModelValue, RangeEdges};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    /// A range's first edge has been chosen and its second is awaited
    StartSelected,
    Complete,
}

/// What became of an input
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome<D> {
    /// The input was rejected or had nothing to act on; state is unchanged
    Ignored,
    /// The selection changed and is buffered until [`SelectionMachine::apply`]
    Pending(ModelValue<D>),
    /// The host should adopt this value as the new model value
    Committed(ModelValue<D>),
}

impl<D> Outcome<D> {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored)
    }
}

/// Predicate deciding whether a day may be picked
pub type AllowedDates<D> = Box<dyn Fn(D) -> bool>;

/// The rules that decide which days can be selected and when selections are
/// committed
pub struct SelectionRules<D> {
    pub range: bool,
    pub auto_apply: bool,
    pub min: Option<D>,
    pub max: Option<D>,
    pub allowed_dates: Option<AllowedDates<D>>,
}

impl<D> Default for SelectionRules<D> {
    fn default() -> Self {
        SelectionRules {
            range: false,
            auto_apply: true,
            min: None,
            max: None,
            allowed_dates: None,
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for SelectionRules<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionRules")
            .field("range", &self.range)
            .field("auto_apply", &self.auto_apply)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("allowed_dates", &self.allowed_dates.as_ref().map(|_| ".."))
            .finish()
    }
}

#[derive(Debug)]
pub struct SelectionMachine<A: DateAdapter> {
    adapter: A,
    rules: SelectionRules<A::Date>,
    phase: Phase,
    edges: RangeEdges<A::Date>,
    // Draft awaiting `apply()`; kept apart from `edges` so that cancelling
    // never touches what was committed.
    pending: Option<ModelValue<A::Date>>,
    // The model value most recently received from the host
    external: ModelValue<A::Date>,
}

impl<A: DateAdapter> SelectionMachine<A> {
    pub fn new(adapter: A, rules: SelectionRules<A::Date>) -> Self {
        SelectionMachine {
            adapter,
            rules,
            phase: Phase::Idle,
            edges: RangeEdges::default(),
            pending: None,
            external: ModelValue::Empty,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start(&self) -> Option<A::Date> {
        self.edges.start
    }

    pub fn end(&self) -> Option<A::Date> {
        self.edges.end
    }

    pub fn edges(&self) -> RangeEdges<A::Date> {
        self.edges
    }

    pub fn pending(&self) -> Option<&ModelValue<A::Date>> {
        self.pending.as_ref()
    }

    pub fn rules(&self) -> &SelectionRules<A::Date> {
        &self.rules
    }

    pub fn is_range(&self) -> bool {
        self.rules.range
    }

    pub fn set_bounds(&mut self, min: Option<A::Date>, max: Option<A::Date>) {
        self.rules.min = min;
        self.rules.max = max;
    }

    pub fn is_date_disabled(&self, date: A::Date) -> bool {
        let date = self.adapter.start_of_day(date);
        if let Some(min) = self.rules.min {
            if self.adapter.is_before(date, self.adapter.start_of_day(min)) {
                return true;
            }
        }
        if let Some(max) = self.rules.max {
            if self.adapter.is_after(date, self.adapter.start_of_day(max)) {
                return true;
            }
        }
        self.rules
            .allowed_dates
            .as_ref()
            .is_some_and(|allowed| !allowed(date))
    }

    pub fn select_date(&mut self, date: A::Date) -> Outcome<A::Date> {
        if self.is_date_disabled(date) {
            tracing::trace!(?date, "ignoring click on disabled date");
            return Outcome::Ignored;
        }
        if !self.rules.range {
            self.edges = RangeEdges {
                start: Some(date),
                end: None,
            };
            self.phase = Phase::Complete;
            return self.settle(ModelValue::Single(date));
        }
        match (self.phase, self.edges.start) {
            (Phase::StartSelected, Some(start)) => {
                self.complete(DatePair::new(&self.adapter, start, date))
            }
            _ => {
                self.edges = RangeEdges {
                    start: Some(date),
                    end: None,
                };
                self.phase = Phase::StartSelected;
                let draft = ModelValue::Dates(vec![date]);
                self.pending = Some(draft.clone());
                Outcome::Pending(draft)
            }
        }
    }

    /// Selects a whole range at once, as a preset does
    pub fn set_range(&mut self, a: A::Date, b: A::Date) -> Outcome<A::Date> {
        if self.is_date_disabled(a) || self.is_date_disabled(b) {
            tracing::trace!(?a, ?b, "ignoring range with a disabled edge");
            return Outcome::Ignored;
        }
        let pair = DatePair::new(&self.adapter, a, b);
        if self.rules.range {
            self.complete(pair)
        } else {
            self.select_date(pair.start())
        }
    }

    pub fn apply(&mut self) -> Outcome<A::Date> {
        match self.pending.take() {
            Some(value) => {
                tracing::debug!(?value, "applying pending selection");
                Outcome::Committed(value)
            }
            None => Outcome::Ignored,
        }
    }

    /// Discards uncommitted clicks, returning to the last external value
    pub fn cancel(&mut self) {
        tracing::debug!("cancelling selection");
        self.restore_from_external();
    }

    pub fn reset(&mut self) {
        self.edges = RangeEdges::default();
        self.pending = None;
        self.phase = Phase::Idle;
    }

    /// Recomputes the selection from a new externally owned value.  Nothing
    /// is emitted.
    pub fn sync_external(&mut self, value: ModelValue<A::Date>) {
        self.external = value;
        self.restore_from_external();
    }

    fn restore_from_external(&mut self) {
        self.pending = None;
        let RangeEdges { start, end } = self.external.edges();
        match (start, end) {
            (None, _) => {
                self.edges = RangeEdges::default();
                self.phase = Phase::Idle;
            }
            (Some(start), Some(end)) => {
                let pair = DatePair::new(&self.adapter, start, end);
                self.edges = RangeEdges {
                    start: Some(pair.start()),
                    end: Some(pair.end()),
                };
                self.phase = Phase::Complete;
            }
            (Some(start), None) => {
                self.edges = RangeEdges {
                    start: Some(start),
                    end: None,
                };
                // A lone date seeds the first edge of a range.
                self.phase = if self.rules.range {
                    Phase::StartSelected
                } else {
                    Phase::Complete
                };
            }
        }
    }

    fn complete(&mut self, pair: DatePair<A::Date>) -> Outcome<A::Date> {
        self.edges = RangeEdges {
            start: Some(pair.start()),
            end: Some(pair.end()),
        };
        self.phase = Phase::Complete;
        self.settle(ModelValue::from_pair(pair))
    }

    fn settle(&mut self, value: ModelValue<A::Date>) -> Outcome<A::Date> {
        if self.rules.auto_apply {
            self.pending = None;
            tracing::debug!(?value, "committing selection");
            Outcome::Committed(value)
        } else {
            self.pending = Some(value.clone());
            Outcome::Pending(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::TimeAdapter;
    use time::macros::date;
    use time::{Date, Weekday};

    fn machine(range: bool, auto_apply: bool) -> SelectionMachine<TimeAdapter> {
        SelectionMachine::new(
            TimeAdapter::fixed(date!(2026 - 01 - 15)),
            SelectionRules {
                range,
                auto_apply,
                ..SelectionRules::default()
            },
        )
    }

    fn pair(a: Date, b: Date) -> ModelValue<Date> {
        ModelValue::Dates(vec![a, b])
    }

    #[test]
    fn test_range_click_sequence() {
        let mut sm = machine(true, true);
        assert_eq!(sm.phase(), Phase::Idle);
        assert_eq!(
            sm.select_date(date!(2026 - 01 - 12)),
            Outcome::Pending(ModelValue::Dates(vec![date!(2026 - 01 - 12)]))
        );
        assert_eq!(sm.phase(), Phase::StartSelected);
        assert_eq!(sm.start(), Some(date!(2026 - 01 - 12)));
        assert_eq!(sm.end(), None);
        assert_eq!(
            sm.select_date(date!(2026 - 01 - 10)),
            Outcome::Committed(pair(date!(2026 - 01 - 10), date!(2026 - 01 - 12)))
        );
        assert_eq!(sm.phase(), Phase::Complete);
        assert_eq!(sm.start(), Some(date!(2026 - 01 - 10)));
        assert_eq!(sm.end(), Some(date!(2026 - 01 - 12)));
    }

    #[test]
    fn test_same_day_twice_is_single_day_range() {
        let mut sm = machine(true, true);
        sm.select_date(date!(2026 - 01 - 10));
        assert_eq!(
            sm.select_date(date!(2026 - 01 - 10)),
            Outcome::Committed(pair(date!(2026 - 01 - 10), date!(2026 - 01 - 10)))
        );
        assert_eq!(sm.phase(), Phase::Complete);
    }

    #[test]
    fn test_click_after_complete_restarts() {
        let mut sm = machine(true, true);
        sm.set_range(date!(2026 - 01 - 10), date!(2026 - 01 - 12));
        assert!(matches!(
            sm.select_date(date!(2026 - 02 - 01)),
            Outcome::Pending(_)
        ));
        assert_eq!(sm.phase(), Phase::StartSelected);
        assert_eq!(sm.end(), None);
    }

    #[test]
    fn test_set_range_normalizes() {
        let mut sm = machine(true, true);
        let outcome = sm.set_range(date!(2026 - 03 - 05), date!(2026 - 02 - 20));
        assert_eq!(
            outcome,
            Outcome::Committed(pair(date!(2026 - 02 - 20), date!(2026 - 03 - 05)))
        );
        assert_eq!(sm.start(), Some(date!(2026 - 02 - 20)));
        assert_eq!(sm.end(), Some(date!(2026 - 03 - 05)));
    }

    #[test]
    fn test_deferred_commit_until_apply() {
        let mut sm = machine(true, false);
        assert!(matches!(
            sm.select_date(date!(2026 - 01 - 10)),
            Outcome::Pending(_)
        ));
        assert!(matches!(
            sm.select_date(date!(2026 - 01 - 12)),
            Outcome::Pending(_)
        ));
        assert_eq!(
            sm.apply(),
            Outcome::Committed(pair(date!(2026 - 01 - 10), date!(2026 - 01 - 12)))
        );
        assert_eq!(sm.apply(), Outcome::Ignored);
    }

    #[test]
    fn test_apply_single_start_draft() {
        let mut sm = machine(true, false);
        sm.select_date(date!(2026 - 01 - 10));
        assert_eq!(
            sm.apply(),
            Outcome::Committed(ModelValue::Dates(vec![date!(2026 - 01 - 10)]))
        );
    }

    #[test]
    fn test_cancel_restores_external_value() {
        let mut sm = machine(true, false);
        let external = pair(date!(2026 - 01 - 01), date!(2026 - 01 - 05));
        sm.sync_external(external);
        sm.select_date(date!(2026 - 02 - 10));
        sm.select_date(date!(2026 - 02 - 12));
        sm.cancel();
        assert_eq!(sm.phase(), Phase::Complete);
        assert_eq!(sm.start(), Some(date!(2026 - 01 - 01)));
        assert_eq!(sm.end(), Some(date!(2026 - 01 - 05)));
        assert_eq!(sm.pending(), None);
        assert_eq!(sm.apply(), Outcome::Ignored);
    }

    #[test]
    fn test_cancel_from_empty() {
        let mut sm = machine(true, false);
        sm.select_date(date!(2026 - 02 - 10));
        sm.cancel();
        assert_eq!(sm.phase(), Phase::Idle);
        assert_eq!(sm.start(), None);
        assert_eq!(sm.apply(), Outcome::Ignored);
    }

    #[test]
    fn test_single_mode() {
        let mut sm = machine(false, true);
        assert_eq!(
            sm.select_date(date!(2026 - 01 - 10)),
            Outcome::Committed(ModelValue::Single(date!(2026 - 01 - 10)))
        );
        assert_eq!(sm.phase(), Phase::Complete);
        let mut deferred = machine(false, false);
        assert_eq!(
            deferred.select_date(date!(2026 - 01 - 10)),
            Outcome::Pending(ModelValue::Single(date!(2026 - 01 - 10)))
        );
        assert_eq!(
            deferred.apply(),
            Outcome::Committed(ModelValue::Single(date!(2026 - 01 - 10)))
        );
    }

    #[test]
    fn test_single_mode_set_range_picks_start() {
        let mut sm = machine(false, true);
        assert_eq!(
            sm.set_range(date!(2026 - 01 - 12), date!(2026 - 01 - 10)),
            Outcome::Committed(ModelValue::Single(date!(2026 - 01 - 10)))
        );
    }

    #[test]
    fn test_disabled_dates_ignored() {
        let mut sm = SelectionMachine::new(
            TimeAdapter::fixed(date!(2026 - 01 - 15)),
            SelectionRules {
                range: true,
                auto_apply: true,
                min: Some(date!(2026 - 01 - 05)),
                max: Some(date!(2026 - 01 - 24)),
                allowed_dates: Some(Box::new(|d: Date| d.weekday() != Weekday::Sunday)),
            },
        );
        assert!(sm.is_date_disabled(date!(2026 - 01 - 04)));
        assert!(!sm.is_date_disabled(date!(2026 - 01 - 05)));
        assert!(!sm.is_date_disabled(date!(2026 - 01 - 24)));
        assert!(sm.is_date_disabled(date!(2026 - 01 - 26)));
        assert!(sm.is_date_disabled(date!(2026 - 01 - 27)));
        assert!(sm.is_date_disabled(date!(2026 - 01 - 11)));
        assert_eq!(sm.select_date(date!(2026 - 01 - 04)), Outcome::Ignored);
        assert_eq!(sm.select_date(date!(2026 - 01 - 11)), Outcome::Ignored);
        assert_eq!(sm.phase(), Phase::Idle);
        assert_eq!(
            sm.set_range(date!(2026 - 01 - 10), date!(2026 - 02 - 10)),
            Outcome::Ignored
        );
    }

    #[test]
    fn test_sync_external() {
        let mut sm = machine(true, true);
        sm.sync_external(ModelValue::Single(date!(2026 - 01 - 10)));
        assert_eq!(sm.phase(), Phase::StartSelected);
        assert_eq!(sm.start(), Some(date!(2026 - 01 - 10)));
        sm.sync_external(pair(date!(2026 - 01 - 12), date!(2026 - 01 - 10)));
        assert_eq!(sm.phase(), Phase::Complete);
        assert_eq!(sm.start(), Some(date!(2026 - 01 - 10)));
        assert_eq!(sm.end(), Some(date!(2026 - 01 - 12)));
        sm.sync_external(ModelValue::Empty);
        assert_eq!(sm.phase(), Phase::Idle);
        assert_eq!(sm.start(), None);

        let mut single = machine(false, true);
        single.sync_external(ModelValue::Single(date!(2026 - 01 - 10)));
        assert_eq!(single.phase(), Phase::Complete);
    }

    #[test]
    fn test_seeded_start_completes_on_click() {
        let mut sm = machine(true, true);
        sm.sync_external(ModelValue::Single(date!(2026 - 01 - 10)));
        assert_eq!(
            sm.select_date(date!(2026 - 01 - 14)),
            Outcome::Committed(pair(date!(2026 - 01 - 10), date!(2026 - 01 - 14)))
        );
    }

    #[test]
    fn test_reset() {
        let mut sm = machine(true, false);
        sm.select_date(date!(2026 - 01 - 10));
        sm.reset();
        assert_eq!(sm.phase(), Phase::Idle);
        assert_eq!(sm.start(), None);
        assert_eq!(sm.pending(), None);
    }
}
