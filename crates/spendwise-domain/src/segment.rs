//! Calendar helpers that split every month into three spending segments.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days of the month on which a new segment begins.
pub const SEGMENT_START_DAYS: [u32; 3] = [1, 11, 21];

/// Length of the two fixed-size segments at the start of each month.
const FIXED_SEGMENT_DAYS: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Position of a segment within its month.
pub enum SegmentIndex {
    First,
    Second,
    Third,
}

impl SegmentIndex {
    /// Maps a day-of-month onto its segment.
    pub fn for_day(day: u32) -> Self {
        match day {
            0..=10 => SegmentIndex::First,
            11..=20 => SegmentIndex::Second,
            _ => SegmentIndex::Third,
        }
    }

    /// One-based ordinal (1, 2 or 3).
    pub fn number(self) -> u8 {
        match self {
            SegmentIndex::First => 1,
            SegmentIndex::Second => 2,
            SegmentIndex::Third => 3,
        }
    }

    pub fn start_day(self) -> u32 {
        SEGMENT_START_DAYS[usize::from(self.number() - 1)]
    }
}

impl fmt::Display for SegmentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Identifies a segment across months, e.g. `2024-02 #3`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentKey {
    pub year: i32,
    pub month: u32,
    pub index: SegmentIndex,
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02} #{}", self.year, self.month, self.index)
    }
}

/// The segment enclosing a reference date, with day counts relative to it.
///
/// `days_elapsed_inclusive` and `days_remaining_inclusive` both count the
/// reference date itself, so they always sum to `length_days + 1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    pub index: SegmentIndex,
    pub reference: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub length_days: u32,
    pub days_elapsed_inclusive: u32,
    pub days_remaining_inclusive: u32,
}

impl Segment {
    /// Returns the segment that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let day = date.day();
        let index = SegmentIndex::for_day(day);
        let start_day = index.start_day();
        let end_day = match index {
            SegmentIndex::Third => last_day_of_month(date.year(), date.month()),
            _ => start_day + FIXED_SEGMENT_DAYS - 1,
        };
        Self {
            index,
            reference: date,
            start_date: date - Duration::days(i64::from(day - start_day)),
            end_date: date + Duration::days(i64::from(end_day - day)),
            length_days: end_day - start_day + 1,
            days_elapsed_inclusive: day - start_day + 1,
            days_remaining_inclusive: end_day - day + 1,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn key(&self) -> SegmentKey {
        SegmentKey {
            year: self.start_date.year(),
            month: self.start_date.month(),
            index: self.index,
        }
    }

    /// Days left after the reference date, excluding it.
    pub fn days_remaining_after_reference(&self) -> u32 {
        self.days_remaining_inclusive.saturating_sub(1)
    }

    /// The segment that follows this one, anchored at its first day.
    pub fn next(&self) -> Segment {
        Segment::containing(self.end_date + Duration::days(1))
    }

    pub fn is_first_day(&self) -> bool {
        self.days_elapsed_inclusive == 1
    }
}

/// Shorthand for [`Segment::containing`].
pub fn segment_of(date: NaiveDate) -> Segment {
    Segment::containing(date)
}

/// Returns `true` when `date` is the first day of a segment (the 1st, 11th or 21st).
pub fn is_segment_start(date: NaiveDate) -> bool {
    SEGMENT_START_DAYS.contains(&date.day())
}

/// Last calendar day of `month` (1-12) in `year`, leap years included.
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        // Only reachable past the last representable year.
        None => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_ten_days_form_segment_one() {
        let segment = segment_of(date(2025, 3, 4));
        assert_eq!(segment.index, SegmentIndex::First);
        assert_eq!(segment.start_date, date(2025, 3, 1));
        assert_eq!(segment.end_date, date(2025, 3, 10));
        assert_eq!(segment.length_days, 10);
        assert_eq!(segment.days_elapsed_inclusive, 4);
        assert_eq!(segment.days_remaining_inclusive, 7);
    }

    #[test]
    fn boundary_days_stay_consistent() {
        let first = segment_of(date(2025, 3, 11));
        assert_eq!(first.index, SegmentIndex::Second);
        assert_eq!(first.days_elapsed_inclusive, 1);
        assert_eq!(first.days_remaining_inclusive, 10);
        assert!(first.is_first_day());

        let last = segment_of(date(2025, 3, 20));
        assert_eq!(last.index, SegmentIndex::Second);
        assert_eq!(last.days_elapsed_inclusive, 10);
        assert_eq!(last.days_remaining_inclusive, 1);
        assert_eq!(last.days_remaining_after_reference(), 0);
    }

    #[test]
    fn third_segment_ends_on_leap_day() {
        assert_eq!(segment_of(date(2024, 2, 21)).end_date, date(2024, 2, 29));
        assert_eq!(segment_of(date(2024, 2, 21)).length_days, 9);
    }

    #[test]
    fn third_segment_ends_on_non_leap_february() {
        assert_eq!(segment_of(date(2023, 2, 21)).end_date, date(2023, 2, 28));
        assert_eq!(segment_of(date(2023, 2, 21)).length_days, 8);
    }

    #[test]
    fn third_segment_covers_thirty_one_day_months() {
        let segment = segment_of(date(2025, 12, 31));
        assert_eq!(segment.start_date, date(2025, 12, 21));
        assert_eq!(segment.length_days, 11);
        assert_eq!(segment.days_remaining_inclusive, 1);
    }

    #[test]
    fn next_rolls_over_month_end() {
        let next = segment_of(date(2025, 12, 25)).next();
        assert_eq!(next.index, SegmentIndex::First);
        assert_eq!(next.start_date, date(2026, 1, 1));
        assert_eq!(next.key().year, 2026);
    }

    #[test]
    fn segment_starts_are_flagged() {
        assert!(is_segment_start(date(2025, 5, 1)));
        assert!(is_segment_start(date(2025, 5, 11)));
        assert!(is_segment_start(date(2025, 5, 21)));
        assert!(!is_segment_start(date(2025, 5, 12)));
    }

    #[test]
    fn keys_distinguish_months_with_same_index() {
        let december = segment_of(date(2024, 12, 3)).key();
        let january = segment_of(date(2025, 1, 3)).key();
        assert_eq!(december.index, january.index);
        assert_ne!(december, january);
        assert_eq!(january.to_string(), "2025-01 #1");
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (1990i32..2100, 1u32..=12, 1u32..=31).prop_map(|(y, m, d)| {
            let d = d.min(last_day_of_month(y, m));
            NaiveDate::from_ymd_opt(y, m, d).unwrap()
        })
    }

    proptest! {
        #[test]
        fn elapsed_plus_remaining_is_length_plus_one(d in any_date()) {
            let segment = segment_of(d);
            prop_assert_eq!(
                segment.days_elapsed_inclusive + segment.days_remaining_inclusive,
                segment.length_days + 1
            );
            prop_assert!(segment.contains(d));
            prop_assert!((8..=11).contains(&segment.length_days));
        }

        #[test]
        fn segments_tile_the_month(y in 1990i32..2100, m in 1u32..=12) {
            let first = segment_of(NaiveDate::from_ymd_opt(y, m, 1).unwrap());
            let second = first.next();
            let third = second.next();
            prop_assert_eq!(second.start_date, first.end_date + Duration::days(1));
            prop_assert_eq!(third.start_date, second.end_date + Duration::days(1));
            prop_assert_eq!(third.end_date.day(), last_day_of_month(y, m));
            prop_assert_eq!(third.next().start_date.day(), 1);
            prop_assert_eq!(
                first.length_days + second.length_days + third.length_days,
                last_day_of_month(y, m)
            );
        }
    }
}
