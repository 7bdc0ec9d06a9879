use crate::traffic::types::Trip;

/// Half-width of the scrub window in minutes, inclusive on both ends.
pub const WINDOW_HALF_WIDTH: u32 = 60;

/// Time-of-day restriction applied before aggregation.
///
/// The map slider reports -1 for "whole day"; [`TimeFilter::from_slider`]
/// keeps that convention at the UI boundary so the core never sees a
/// sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    /// No restriction.
    All,
    /// Minute of day in `[0, 1439]` the window is centered on.
    Minute(u32),
}

impl TimeFilter {
    /// Maps a raw slider value: any negative means "whole day".
    pub fn from_slider(value: i32) -> Self {
        if value < 0 {
            TimeFilter::All
        } else {
            TimeFilter::Minute(value as u32)
        }
    }

    /// Returns `true` when a window is active.
    pub fn is_active(&self) -> bool {
        matches!(self, TimeFilter::Minute(_))
    }
}

/// Keeps trips whose start or end minute lies within [`WINDOW_HALF_WIDTH`]
/// of the reference, inclusive.
///
/// `TimeFilter::All` passes the input through unchanged. The window never
/// wraps past midnight: a reference of 30 does not match a 23:50 start.
/// Relative order of surviving trips is preserved.
pub fn filter_by_time(trips: &[Trip], filter: TimeFilter) -> Vec<Trip> {
    match filter {
        TimeFilter::All => trips.to_vec(),
        TimeFilter::Minute(reference) => trips
            .iter()
            .filter(|t| {
                in_window(t.start_minute(), reference) || in_window(t.end_minute(), reference)
            })
            .cloned()
            .collect(),
    }
}

fn in_window(minute: u32, reference: u32) -> bool {
    minute.abs_diff(reference) <= WINDOW_HALF_WIDTH
}
