//! Pure aggregation helpers behind the statistics view.
//!
//! The SQL layer produces per-day sums; picking the busiest day and counting
//! recent sessions are folds kept here so the guest path can reuse them and
//! they stay unit-testable without a database.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{DurationMs, Timestamp};

/// Summed work time for one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWork {
    pub day: NaiveDate,
    pub work_ms: DurationMs,
}

/// The day with the most accumulated work time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusiestDay {
    pub day: NaiveDate,
    pub work_ms: DurationMs,
}

/// Pick the day with the maximal work total. Ties resolve to the earliest
/// day so the result is deterministic. Days with zero work are ignored.
pub fn busiest_day(days: &[DailyWork]) -> Option<BusiestDay> {
    days.iter()
        .filter(|d| d.work_ms > 0)
        .fold(None, |best: Option<BusiestDay>, d| match best {
            Some(b) if b.work_ms >= d.work_ms => Some(b),
            _ => Some(BusiestDay {
                day: d.day,
                work_ms: d.work_ms,
            }),
        })
}

/// Count records created within the trailing `days` days of `now`.
pub fn recent_count(created: &[Timestamp], now: Timestamp, days: i64) -> usize {
    let cutoff = now - chrono::Duration::days(days);
    created.iter().filter(|&&c| c >= cutoff).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn test_busiest_day_picks_max() {
        let days = [
            DailyWork { day: d(1), work_ms: 1_000 },
            DailyWork { day: d(2), work_ms: 9_000 },
            DailyWork { day: d(3), work_ms: 4_000 },
        ];
        let best = busiest_day(&days).unwrap();
        assert_eq!(best.day, d(2));
        assert_eq!(best.work_ms, 9_000);
    }

    #[test]
    fn test_busiest_day_tie_is_earliest() {
        let days = [
            DailyWork { day: d(5), work_ms: 7_000 },
            DailyWork { day: d(6), work_ms: 7_000 },
        ];
        assert_eq!(busiest_day(&days).unwrap().day, d(5));
    }

    #[test]
    fn test_busiest_day_empty_and_zero() {
        assert_eq!(busiest_day(&[]), None);
        let days = [DailyWork { day: d(1), work_ms: 0 }];
        assert_eq!(busiest_day(&days), None);
    }

    #[test]
    fn test_recent_count_window() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let created = [
            now - chrono::Duration::days(1),
            now - chrono::Duration::days(6),
            now - chrono::Duration::days(8),
        ];
        assert_eq!(recent_count(&created, now, 7), 2);
    }
}
