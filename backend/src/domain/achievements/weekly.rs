//! ISO-8601 week grouping for weekly workout patterns.
//!
//! Weeks start on Monday and week 1 is the week holding the year's first
//! Thursday. Timestamps are bucketed in UTC.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};

/// ISO week-numbering year and week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeekKey {
    pub year: i32,
    pub week: u32,
}

impl IsoWeekKey {
    /// Bucket for a UTC timestamp.
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        let iso = timestamp.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

/// Count workouts per ISO week.
pub fn group_by_iso_week(timestamps: &[DateTime<Utc>]) -> BTreeMap<IsoWeekKey, u32> {
    timestamps.iter().fold(BTreeMap::new(), |mut weeks, timestamp| {
        *weeks.entry(IsoWeekKey::of(timestamp)).or_insert(0) += 1;
        weeks
    })
}

/// Highest workout count in any single ISO week; zero for no workouts.
pub fn best_week_count(timestamps: &[DateTime<Utc>]) -> u32 {
    group_by_iso_week(timestamps)
        .into_values()
        .max()
        .unwrap_or(0)
}
