//! Month grid layout and per-day event lookup.
//!
//! Everything here is pure: the grid is rebuilt on every render and the
//! index whenever the event list changes. Dates are keyed from their local
//! calendar fields only.

use std::collections::HashMap;

use chrono::{Datelike, Days, Months, NaiveDate};

use super::event::CalendarEvent;

/// One real day in the month grid. Padding slots are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Number of days in the month containing `date`: day 0 of the next month.
pub fn days_in_month(date: NaiveDate) -> u32 {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        // only December of the last representable year has no successor month
        .map_or(31, |last| last.day())
}

/// Sunday-first weekday column of the first of the month (0 = Sunday).
pub fn leading_padding(date: NaiveDate) -> usize {
    first_of_month(date).weekday().num_days_from_sunday() as usize
}

/// Leading `None` placeholders so day 1 lands under its weekday, then one
/// cell per day. The final row is not padded.
pub fn build_month_grid(reference: NaiveDate) -> Vec<Option<DayCell>> {
    let first = first_of_month(reference);
    let padding = leading_padding(first);
    let days = days_in_month(first);

    let mut cells = Vec::with_capacity(padding + days as usize);
    cells.extend(std::iter::repeat(None).take(padding));
    cells.extend(
        first
            .iter_days()
            .take(days as usize)
            .map(|date| Some(DayCell { date })),
    );
    cells
}

/// `YYYY-MM-DD` built from the date's own fields.
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Events bucketed by local calendar day, each bucket sorted by start time.
#[derive(Debug, Clone, Default)]
pub struct EventIndex {
    buckets: HashMap<String, Vec<CalendarEvent>>,
}

impl EventIndex {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn events_on(&self, date: NaiveDate) -> &[CalendarEvent] {
        events_on_date(self, date)
    }
}

/// Group events by `date_key`. Buckets are stably sorted by start time and
/// duplicates are kept.
pub fn index_events_by_date<'a, I>(events: I) -> EventIndex
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let mut buckets: HashMap<String, Vec<CalendarEvent>> = HashMap::new();
    for ev in events {
        buckets.entry(date_key(ev.date)).or_default().push(ev.clone());
    }
    for bucket in buckets.values_mut() {
        bucket.sort_by_key(|ev| ev.start_time);
    }
    EventIndex { buckets }
}

pub fn events_on_date(index: &EventIndex, date: NaiveDate) -> &[CalendarEvent] {
    index
        .buckets
        .get(&date_key(date))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
