use std::iter::successors;
use time::{Date, Weekday, Weekday::*};

const DAYS_IN_WEEK: usize = 7;

pub(super) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

/// The days of one month laid out Sunday-first, one row per week
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct MonthGrid {
    weeks: Vec<Week>,
}

impl MonthGrid {
    /// `first` must be the first day of the month
    pub(super) fn new(first: Date) -> MonthGrid {
        let month = first.month();
        let mut weeks: Vec<Week> = Vec::with_capacity(6);
        for date in successors(Some(first), |d| d.next_day()).take_while(|d| d.month() == month) {
            match weeks.last_mut() {
                Some(week) if date.weekday() != Sunday => week.set(date),
                _ => weeks.push(Week::new(date)),
            }
        }
        MonthGrid { weeks }
    }

    pub(super) fn weeks(&self) -> &[Week] {
        &self.weeks
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
// Invariant: At least one element of the array is Some
pub(super) struct Week([Option<Date>; DAYS_IN_WEEK]);

impl Week {
    fn new(date: Date) -> Self {
        let mut this = Week([None; DAYS_IN_WEEK]);
        this.set(date);
        this
    }

    fn set(&mut self, date: Date) {
        if let Some(slot) = self.0.get_mut(usize::from(date.weekday().index0())) {
            *slot = Some(date);
        }
    }

    pub(super) fn enumerate(&self) -> EnumerateWeek<'_> {
        EnumerateWeek::new(self)
    }

    fn get(&self, wd: Weekday) -> Option<Date> {
        self.0.get(usize::from(wd.index0())).copied().flatten()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct EnumerateWeek<'a> {
    week: &'a Week,
    next_weekday: Option<Weekday>,
}

impl<'a> EnumerateWeek<'a> {
    fn new(week: &'a Week) -> Self {
        EnumerateWeek {
            week,
            next_weekday: Some(Sunday),
        }
    }
}

impl Iterator for EnumerateWeek<'_> {
    type Item = (Weekday, Date);

    fn next(&mut self) -> Option<(Weekday, Date)> {
        loop {
            let wd = self.next_weekday?;
            self.next_weekday = match wd.next() {
                Sunday => None,
                wd2 => Some(wd2),
            };
            if let Some(date) = self.week.get(wd) {
                return Some((wd, date));
            }
        }
    }
}
