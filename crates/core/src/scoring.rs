//! Scoring module - line scores, leveling, and the gravity speed curve
//!
//! Classic table scoring: 100/300/500/800 points for 1-4 simultaneous
//! lines, multiplied by the level at the time of the clear. One level
//! per 10 total lines; each level shrinks the drop interval by 20%.

use blockfall_types::{DROP_INTERVAL_FLOOR_MS, LINES_PER_LEVEL, LINE_SCORES, SPEED_FACTOR};

/// Points for clearing `cleared` rows at `level`.
///
/// A lock clears at most 4 rows; larger counts score nothing.
pub fn score_for(cleared: usize, level: u32) -> u32 {
    if cleared == 0 || cleared >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[cleared] * level
}

/// Level for a total line count. Starts at 1, +1 every 10 lines.
pub fn level_for(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Drop interval for a level: `base * 0.8^(level-1)`, floored.
///
/// The curve alone never reaches zero but gets arbitrarily close; the
/// floor keeps the interval a positive duration at any level.
pub fn drop_interval_ms(base_ms: u32, level: u32) -> u32 {
    let scaled = (base_ms as f64) * SPEED_FACTOR.powi(level.saturating_sub(1) as i32);
    (scaled as u32).max(DROP_INTERVAL_FLOOR_MS)
}
