//! Model values and the helpers that convert between them and range edges
use crate::adapter::DateAdapter;

/// Upper bound on the number of days [`build_date_range()`] will produce
pub const MAX_RANGE_DAYS: usize = 4000;

/// The externally owned value of a picker
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum ModelValue<D> {
    /// Nothing selected
    #[default]
    Empty,
    /// A single-mode selection
    Single(D),
    /// A range-mode selection.  The range's edges are the first and last
    /// elements.  One element is a range with only its start chosen; no
    /// elements is a cleared range.
    Dates(Vec<D>),
}

impl<D: Copy> ModelValue<D> {
    /// The committed form of a completed range
    pub fn from_pair(pair: DatePair<D>) -> ModelValue<D> {
        ModelValue::Dates(vec![pair.start(), pair.end()])
    }

    /// Returns `true` if the value holds no dates at all
    pub fn is_empty(&self) -> bool {
        match self {
            ModelValue::Empty => true,
            ModelValue::Single(_) => false,
            ModelValue::Dates(dates) => dates.is_empty(),
        }
    }

    pub fn edges(&self) -> RangeEdges<D> {
        match self {
            ModelValue::Empty => RangeEdges::default(),
            ModelValue::Single(d) => RangeEdges {
                start: Some(*d),
                end: None,
            },
            ModelValue::Dates(dates) => match dates.as_slice() {
                [] => RangeEdges::default(),
                [only] => RangeEdges {
                    start: Some(*only),
                    end: None,
                },
                [first, .., last] => RangeEdges {
                    start: Some(*first),
                    end: Some(*last),
                },
            },
        }
    }

    pub fn to_vec(&self) -> Vec<D> {
        match self {
            ModelValue::Empty => Vec::new(),
            ModelValue::Single(d) => vec![*d],
            ModelValue::Dates(dates) => dates.clone(),
        }
    }

    /// Reports the edges and number of dates, as announced alongside range
    /// boundary events
    pub fn boundary(&self) -> RangeBoundary<D> {
        let RangeEdges { start, end } = self.edges();
        let count = match self {
            ModelValue::Empty => 0,
            ModelValue::Single(_) => 1,
            ModelValue::Dates(dates) => dates.len(),
        };
        RangeBoundary { start, end, count }
    }
}

/// The start and end of a (possibly incomplete) range
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RangeEdges<D> {
    pub start: Option<D>,
    pub end: Option<D>,
}

impl<D> Default for RangeEdges<D> {
    fn default() -> Self {
        RangeEdges {
            start: None,
            end: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RangeBoundary<D> {
    pub start: Option<D>,
    pub end: Option<D>,
    pub count: usize,
}

/// An inclusive pair of days with `start <= end`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DatePair<D> {
    start: D,
    end: D,
}

impl<D: Copy> DatePair<D> {
    /// Orders `a` and `b` chronologically
    pub fn new<A>(adapter: &A, a: D, b: D) -> DatePair<D>
    where
        A: DateAdapter<Date = D>,
    {
        let (start, end) = if adapter.is_after(a, b) { (b, a) } else { (a, b) };
        DatePair { start, end }
    }

    pub fn start(&self) -> D {
        self.start
    }

    pub fn end(&self) -> D {
        self.end
    }

    pub fn contains<A>(&self, adapter: &A, date: D) -> bool
    where
        A: DateAdapter<Date = D>,
    {
        adapter.is_within_range(date, self.start, self.end)
    }
}

/// Expands two days into the inclusive sequence of days between them,
/// swapping the bounds if they are reversed.  At most [`MAX_RANGE_DAYS`]
/// days are produced; longer spans are truncated.
pub fn build_date_range<A: DateAdapter>(adapter: &A, a: A::Date, b: A::Date) -> Vec<A::Date> {
    let pair = DatePair::new(adapter, a, b);
    let end = adapter.start_of_day(pair.end());
    let mut days = Vec::new();
    let mut cursor = adapter.start_of_day(pair.start());
    while days.len() < MAX_RANGE_DAYS {
        days.push(cursor);
        if !adapter.is_before(cursor, end) {
            break;
        }
        cursor = adapter.add_days(cursor, 1);
    }
    if days.len() == MAX_RANGE_DAYS && adapter.is_before(cursor, end) {
        tracing::debug!(limit = MAX_RANGE_DAYS, "date range truncated");
    }
    days
}
