//! Spot availability calculation.
//!
//! A "spot" is one unit of remaining appointment capacity, distinct from a
//! concrete time slot. The calculation is a pure function of its inputs:
//! callers supply the clock reading, so it is deterministic and unit
//! testable with literal windows.

use serde::{Deserialize, Serialize};
use time::{Time, Weekday};

/// One practitioner's bookable window on a given weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub weekday: Weekday,
    pub start: Time,
    pub end: Time,
}

impl AvailabilityWindow {
    pub fn new(weekday: Weekday, start: Time, end: Time) -> Self {
        Self {
            weekday,
            start,
            end,
        }
    }

    /// Whether this window is active at `now` on `weekday`.
    ///
    /// Start-inclusive: a query at exactly the opening time counts the
    /// full window.
    fn is_active(&self, weekday: Weekday, now: Time) -> bool {
        self.weekday == weekday && self.start <= now && now < self.end
    }
}

/// Number of additional patients that can be admitted right now.
///
/// For every active window, the remaining seconds until the window closes
/// are divided by the per-appointment duration and the quotients are summed
/// across all practitioners. Patients already waiting are presumed to
/// consume one upcoming spot each, so the queue length is subtracted from
/// the sum. The result is clamped at zero.
pub fn available_spots(
    duration_secs: u32,
    weekday: Weekday,
    now: Time,
    windows: &[AvailabilityWindow],
    queue_len: usize,
) -> u32 {
    if duration_secs == 0 {
        return 0;
    }

    let total: i64 = windows
        .iter()
        .filter(|w| w.is_active(weekday, now))
        .map(|w| (w.end - now).whole_seconds() / i64::from(duration_secs))
        .sum();

    let remaining = total - queue_len as i64;
    u32::try_from(remaining).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::time;

    const SEVEN_MINUTES: u32 = 420;

    fn all_day(weekday: Weekday) -> AvailabilityWindow {
        AvailabilityWindow::new(weekday, time!(00:00), time!(23:59))
    }

    #[test]
    fn test_full_day_boundary() {
        // 23:59:00 - 00:00:00 = 86340 s; 86340 / 420 = 205 whole appointments.
        let windows: Vec<AvailabilityWindow> = [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ]
        .into_iter()
        .map(all_day)
        .collect();

        let spots = available_spots(
            SEVEN_MINUTES,
            Weekday::Monday,
            time!(00:00:00),
            &windows,
            0,
        );
        assert_eq!(spots, 205);
    }

    #[test]
    fn test_queue_length_consumes_spots() {
        let windows = [all_day(Weekday::Monday)];
        let free = available_spots(SEVEN_MINUTES, Weekday::Monday, time!(00:00), &windows, 0);
        let with_queue =
            available_spots(SEVEN_MINUTES, Weekday::Monday, time!(00:00), &windows, 3);
        assert_eq!(with_queue, free - 3);
    }

    #[test]
    fn test_clamped_at_zero() {
        // Only one appointment fits but four patients already wait.
        let windows = [AvailabilityWindow::new(
            Weekday::Monday,
            time!(09:00),
            time!(09:10),
        )];
        let spots = available_spots(SEVEN_MINUTES, Weekday::Monday, time!(09:00), &windows, 4);
        assert_eq!(spots, 0);
    }

    #[test]
    fn test_weekday_must_match() {
        let windows = [all_day(Weekday::Tuesday)];
        let spots = available_spots(SEVEN_MINUTES, Weekday::Monday, time!(12:00), &windows, 0);
        assert_eq!(spots, 0);
    }

    #[test]
    fn test_query_outside_window_counts_nothing() {
        let windows = [AvailabilityWindow::new(
            Weekday::Monday,
            time!(09:00),
            time!(12:00),
        )];
        assert_eq!(
            available_spots(SEVEN_MINUTES, Weekday::Monday, time!(08:59), &windows, 0),
            0
        );
        assert_eq!(
            available_spots(SEVEN_MINUTES, Weekday::Monday, time!(12:00), &windows, 0),
            0
        );
    }

    #[test]
    fn test_multiple_practitioners_sum() {
        // Two practitioners, one hour each: 8 + 8 appointments of 420 s.
        let windows = [
            AvailabilityWindow::new(Weekday::Friday, time!(09:00), time!(10:00)),
            AvailabilityWindow::new(Weekday::Friday, time!(09:00), time!(10:00)),
        ];
        let spots = available_spots(SEVEN_MINUTES, Weekday::Friday, time!(09:00), &windows, 0);
        assert_eq!(spots, 16);
    }

    #[test]
    fn test_mid_window_query_uses_remaining_time() {
        let windows = [AvailabilityWindow::new(
            Weekday::Monday,
            time!(09:00),
            time!(10:00),
        )];
        // 30 minutes remain: 1800 / 420 = 4.
        let spots = available_spots(SEVEN_MINUTES, Weekday::Monday, time!(09:30), &windows, 0);
        assert_eq!(spots, 4);
    }

    #[test]
    fn test_zero_duration_yields_zero() {
        let windows = [all_day(Weekday::Monday)];
        assert_eq!(
            available_spots(0, Weekday::Monday, time!(09:00), &windows, 0),
            0
        );
    }
}
