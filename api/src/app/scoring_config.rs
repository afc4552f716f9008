//! Scoring configuration constants
//!
//! Fixed values shared by the calculator, the evaluation service and the
//! read-side analytics.

/// Attendance status that counts as present
pub const ATTENDANCE_PRESENT_STATUS: &str = "hadir";

/// Attendance value for a present record
pub const ATTENDANCE_PRESENT_VALUE: f64 = 100.0;

/// Earliest year accepted for an evaluation period
pub const MIN_PERIOD_YEAR: i32 = 2020;

/// Default leaderboard size when the caller gives none
pub const DEFAULT_LEADERBOARD_LIMIT: u64 = 10;

/// Default and maximum page size for evaluation listings
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Team comparison accepts between 2 and 10 people
pub const MIN_COMPARE_PERSONS: usize = 2;
pub const MAX_COMPARE_PERSONS: usize = 10;

/// Admin overview defaults
pub const DEFAULT_TOP_PERFORMERS: usize = 5;
pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// Upper bounds of the score distribution buckets. The last bucket is
/// closed at 100.
pub const DISTRIBUTION_BOUNDS: [f64; 5] = [20.0, 40.0, 60.0, 80.0, 100.0];
