//! Facility-local calendar day boundaries.
//!
//! The facility operates in a single fixed UTC offset; "today" means the
//! local calendar day at that offset. Numbering partitions and the retention
//! sweep both key off this boundary.

use chrono::{DateTime, FixedOffset, LocalResult, Offset, TimeZone, Utc};

/// Daily boundary service for a fixed facility offset.
#[derive(Debug, Clone, Copy)]
pub struct BusinessDay {
    offset: FixedOffset,
}

impl Default for BusinessDay {
    /// The facility default, UTC+07:00.
    fn default() -> Self {
        // east_opt(7h) is always in range.
        Self::from_east_hours(7).unwrap_or(Self { offset: Utc.fix() })
    }
}

impl BusinessDay {
    /// Build from an explicit offset.
    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Build from whole hours east of UTC; `None` when out of range.
    pub fn from_east_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(|offset| Self { offset })
    }

    /// Partition key for the local day containing `now`, formatted `YYYYMMDD`.
    pub fn day_key(&self, now: DateTime<Utc>) -> String {
        now.with_timezone(&self.offset).format("%Y%m%d").to_string()
    }

    /// Whether two instants fall on the same local calendar day.
    pub fn is_same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.day_key(a) == self.day_key(b)
    }

    /// Start of the local day containing `now`, as a UTC instant.
    pub fn day_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local = now.with_timezone(&self.offset);
        let Some(midnight) = local.date_naive().and_hms_opt(0, 0, 0) else {
            return now;
        };
        match self.offset.from_local_datetime(&midnight) {
            // Fixed offsets have no gaps or folds.
            LocalResult::Single(start) => start.with_timezone(&Utc),
            _ => now,
        }
    }
}
