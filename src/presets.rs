//! Named ranges such as "Last 7 Days"
//!
//! Presets are resolved every time they are read so that ranges relative to
//! "today" stay correct however long a picker stays open.
use crate::adapter::DateAdapter;
use crate::model::DatePair;
use std::fmt;

/// Computes a preset's range at the moment it is read
pub type PresetFactory<A> = Box<dyn Fn(&A) -> DatePair<<A as DateAdapter>::Date>>;

pub enum PresetValue<A: DateAdapter> {
    Fixed(DatePair<A::Date>),
    Computed(PresetFactory<A>),
}

impl<A: DateAdapter> PresetValue<A> {
    pub fn resolve(&self, adapter: &A) -> DatePair<A::Date> {
        match self {
            PresetValue::Fixed(pair) => *pair,
            PresetValue::Computed(factory) => factory(adapter),
        }
    }
}

impl<A: DateAdapter> fmt::Debug for PresetValue<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetValue::Fixed(pair) => f.debug_tuple("Fixed").field(pair).finish(),
            PresetValue::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

#[derive(Debug)]
pub struct PresetDefinition<A: DateAdapter> {
    pub label: String,
    pub value: PresetValue<A>,
    /// Key under which a renderer may substitute custom content
    pub slot: Option<String>,
}

impl<A: DateAdapter> PresetDefinition<A> {
    pub fn fixed<S: Into<String>>(label: S, pair: DatePair<A::Date>) -> Self {
        PresetDefinition {
            label: label.into(),
            value: PresetValue::Fixed(pair),
            slot: None,
        }
    }

    pub fn computed<S, F>(label: S, factory: F) -> Self
    where
        S: Into<String>,
        F: Fn(&A) -> DatePair<A::Date> + 'static,
    {
        PresetDefinition {
            label: label.into(),
            value: PresetValue::Computed(Box::new(factory)),
            slot: None,
        }
    }

    pub fn slot<S: Into<String>>(mut self, key: S) -> Self {
        self.slot = Some(key.into());
        self
    }

    pub fn resolve(&self, adapter: &A) -> ResolvedPreset<A::Date> {
        ResolvedPreset {
            label: self.label.clone(),
            range: self.value.resolve(adapter),
            slot: self.slot.clone(),
        }
    }
}

/// A preset with its range materialized
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedPreset<D> {
    pub label: String,
    pub range: DatePair<D>,
    pub slot: Option<String>,
}

#[derive(Debug)]
pub struct PresetSet<A: DateAdapter> {
    definitions: Vec<PresetDefinition<A>>,
}

impl<A: DateAdapter + 'static> PresetSet<A> {
    /// The presets offered when the caller supplies none
    pub fn defaults() -> Self {
        PresetSet::new(vec![
            PresetDefinition::computed("Today", |a: &A| {
                let today = a.today();
                DatePair::new(a, today, today)
            }),
            PresetDefinition::computed("Yesterday", |a: &A| {
                let day = a.add_days(a.today(), -1);
                DatePair::new(a, day, day)
            }),
            PresetDefinition::computed("Last 7 Days", |a: &A| trailing_days(a, 7)),
            PresetDefinition::computed("Last 30 Days", |a: &A| trailing_days(a, 30)),
            PresetDefinition::computed("This Month", |a: &A| month_of(a, a.today())),
            PresetDefinition::computed("Last Month", |a: &A| {
                month_of(a, a.add_months(a.start_of_month(a.today()), -1))
            }),
            PresetDefinition::computed("This Quarter", |a: &A| {
                quarter_from(a, quarter_start(a, a.today()))
            }),
            PresetDefinition::computed("Last Quarter", |a: &A| {
                quarter_from(a, a.add_months(quarter_start(a, a.today()), -3))
            }),
            PresetDefinition::computed("Year to Date", |a: &A| {
                let today = a.today();
                DatePair::new(a, a.start_of_year(today), today)
            }),
            PresetDefinition::computed("Last Year", |a: &A| {
                let last_year = a.add_months(a.start_of_year(a.today()), -12);
                DatePair::new(a, a.start_of_year(last_year), a.end_of_year(last_year))
            }),
        ])
    }
}

impl<A: DateAdapter> PresetSet<A> {
    pub fn new(definitions: Vec<PresetDefinition<A>>) -> Self {
        PresetSet { definitions }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PresetDefinition<A>> {
        self.definitions.get(index)
    }

    pub fn resolve(&self, adapter: &A) -> Vec<ResolvedPreset<A::Date>> {
        self.definitions.iter().map(|p| p.resolve(adapter)).collect()
    }

    /// Index of the first preset whose range falls on the same days as
    /// `start` and `end`
    pub fn active_index(
        &self,
        adapter: &A,
        start: Option<A::Date>,
        end: Option<A::Date>,
    ) -> Option<usize> {
        let (start, end) = start.zip(end)?;
        self.definitions.iter().position(|p| {
            let range = p.value.resolve(adapter);
            adapter.is_same_day(range.start(), start) && adapter.is_same_day(range.end(), end)
        })
    }
}

/// The `days` days ending today
fn trailing_days<A: DateAdapter>(adapter: &A, days: i64) -> DatePair<A::Date> {
    let today = adapter.today();
    DatePair::new(adapter, adapter.add_days(today, 1 - days), today)
}

fn month_of<A: DateAdapter>(adapter: &A, date: A::Date) -> DatePair<A::Date> {
    DatePair::new(adapter, adapter.start_of_month(date), adapter.end_of_month(date))
}

fn quarter_start<A: DateAdapter>(adapter: &A, date: A::Date) -> A::Date {
    let offset = i32::from(adapter.month(date) / 3 * 3);
    adapter.add_months(adapter.start_of_year(date), offset)
}

fn quarter_from<A: DateAdapter>(adapter: &A, start: A::Date) -> DatePair<A::Date> {
    let last_month = adapter.add_months(start, 2);
    DatePair::new(adapter, start, adapter.end_of_month(last_month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::TimeAdapter;
    use time::macros::date;
    use time::Date;

    fn resolved(today: Date) -> Vec<(String, Date, Date)> {
        let adapter = TimeAdapter::fixed(today);
        PresetSet::defaults()
            .resolve(&adapter)
            .into_iter()
            .map(|p| (p.label, p.range.start(), p.range.end()))
            .collect()
    }

    #[test]
    fn test_defaults_mid_year() {
        let presets = resolved(date!(2026 - 08 - 17));
        let expected = [
            ("Today", date!(2026 - 08 - 17), date!(2026 - 08 - 17)),
            ("Yesterday", date!(2026 - 08 - 16), date!(2026 - 08 - 16)),
            ("Last 7 Days", date!(2026 - 08 - 11), date!(2026 - 08 - 17)),
            ("Last 30 Days", date!(2026 - 07 - 19), date!(2026 - 08 - 17)),
            ("This Month", date!(2026 - 08 - 01), date!(2026 - 08 - 31)),
            ("Last Month", date!(2026 - 07 - 01), date!(2026 - 07 - 31)),
            ("This Quarter", date!(2026 - 07 - 01), date!(2026 - 09 - 30)),
            ("Last Quarter", date!(2026 - 04 - 01), date!(2026 - 06 - 30)),
            ("Year to Date", date!(2026 - 01 - 01), date!(2026 - 08 - 17)),
            ("Last Year", date!(2025 - 01 - 01), date!(2025 - 12 - 31)),
        ];
        assert_eq!(presets.len(), expected.len());
        for ((label, start, end), (xlabel, xstart, xend)) in presets.into_iter().zip(expected) {
            assert_eq!(label, xlabel);
            assert_eq!(start, xstart, "start of {label}");
            assert_eq!(end, xend, "end of {label}");
        }
    }

    #[test]
    fn test_defaults_in_first_quarter() {
        let presets = resolved(date!(2026 - 02 - 03));
        assert_eq!(
            presets[5],
            (
                String::from("Last Month"),
                date!(2026 - 01 - 01),
                date!(2026 - 01 - 31)
            )
        );
        assert_eq!(
            presets[6],
            (
                String::from("This Quarter"),
                date!(2026 - 01 - 01),
                date!(2026 - 03 - 31)
            )
        );
        assert_eq!(
            presets[7],
            (
                String::from("Last Quarter"),
                date!(2025 - 10 - 01),
                date!(2025 - 12 - 31)
            )
        );
    }

    #[test]
    fn test_last_month_from_january() {
        let presets = resolved(date!(2026 - 01 - 31));
        assert_eq!(presets[5].1, date!(2025 - 12 - 01));
        assert_eq!(presets[5].2, date!(2025 - 12 - 31));
    }

    #[test]
    fn test_active_index() {
        let adapter = TimeAdapter::fixed(date!(2026 - 08 - 17));
        let presets = PresetSet::defaults();
        assert_eq!(
            presets.active_index(
                &adapter,
                Some(date!(2026 - 08 - 11)),
                Some(date!(2026 - 08 - 17))
            ),
            Some(2)
        );
        assert_eq!(
            presets.active_index(
                &adapter,
                Some(date!(2026 - 08 - 12)),
                Some(date!(2026 - 08 - 17))
            ),
            None
        );
        assert_eq!(
            presets.active_index(&adapter, Some(date!(2026 - 08 - 17)), None),
            None
        );
    }

    #[test]
    fn test_first_match_wins() {
        let adapter = TimeAdapter::fixed(date!(2026 - 08 - 17));
        let pair = DatePair::new(&adapter, date!(2026 - 08 - 17), date!(2026 - 08 - 17));
        let presets = PresetSet::new(vec![
            PresetDefinition::fixed("Pinned", pair).slot("pinned"),
            PresetDefinition::computed("Today", |a: &TimeAdapter| {
                DatePair::new(a, a.today(), a.today())
            }),
        ]);
        assert_eq!(
            presets.active_index(&adapter, Some(pair.start()), Some(pair.end())),
            Some(0)
        );
        let resolved = presets.resolve(&adapter);
        assert_eq!(resolved[0].slot.as_deref(), Some("pinned"));
        assert_eq!(resolved[1].slot, None);
    }

    #[test]
    fn test_computed_presets_follow_the_clock() {
        let presets = PresetSet::<TimeAdapter>::defaults();
        let monday = TimeAdapter::fixed(date!(2026 - 08 - 17));
        let tuesday = TimeAdapter::fixed(date!(2026 - 08 - 18));
        let first = presets.get(0).unwrap();
        assert_eq!(first.resolve(&monday).range.start(), date!(2026 - 08 - 17));
        assert_eq!(first.resolve(&tuesday).range.start(), date!(2026 - 08 - 18));
    }
}
