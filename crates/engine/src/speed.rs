//! Adaptive fall speed - a pacing signal for the host, derived from how well
//! the player is clearing lines. It plays no part in placement search.

use arcade_advisor_types::{DROP_INTERVALS, DROP_INTERVAL_FLOOR_MS, DROP_INTERVAL_MIN_MS};

/// Lines per piece of a perfect player (ten cells per line, four per piece)
pub const PERFECT_LINES_PER_PIECE: f64 = 0.4;

/// Below this many placed pieces the rate is too noisy to adjust for
pub const MIN_SAMPLE_PIECES: u32 = 10;

/// Largest speed-up for an efficient player
pub const MAX_SPEEDUP: f64 = 0.25;

/// Largest slow-down for a struggling player
pub const MAX_SLOWDOWN: f64 = 0.15;

/// Calculate drop interval based on level
/// Returns milliseconds between gravity drops
pub fn level_drop_interval_ms(level: u32) -> u32 {
    if (level as usize) < DROP_INTERVALS.len() {
        DROP_INTERVALS[level as usize]
    } else {
        DROP_INTERVAL_FLOOR_MS
    }
}

/// Player efficiency in `[0, 1]`: lines cleared per piece relative to a perfect player
pub fn clear_efficiency(lines_cleared: u32, pieces_placed: u32) -> f64 {
    if pieces_placed == 0 {
        return 0.0;
    }
    let rate = lines_cleared as f64 / pieces_placed as f64;
    (rate / PERFECT_LINES_PER_PIECE).clamp(0.0, 1.0)
}

/// Drop interval for `level`, shortened by up to 25% for an efficient player
/// and lengthened by up to 15% for a struggling one. Never below
/// `DROP_INTERVAL_MIN_MS`.
pub fn adaptive_drop_interval_ms(level: u32, lines_cleared: u32, pieces_placed: u32) -> u32 {
    let base = level_drop_interval_ms(level);
    if pieces_placed < MIN_SAMPLE_PIECES {
        return base;
    }

    let efficiency = clear_efficiency(lines_cleared, pieces_placed);
    let factor = if efficiency >= 0.5 {
        1.0 - MAX_SPEEDUP * (efficiency - 0.5) / 0.5
    } else {
        1.0 + MAX_SLOWDOWN * (0.5 - efficiency) / 0.5
    };

    ((base as f64 * factor).round() as u32).max(DROP_INTERVAL_MIN_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_drop_intervals() {
        assert_eq!(level_drop_interval_ms(0), 1000);
        assert_eq!(level_drop_interval_ms(8), 160);
        assert_eq!(level_drop_interval_ms(9), 120);
        assert_eq!(level_drop_interval_ms(20), 120); // Floor at 120
    }

    #[test]
    fn test_small_sample_keeps_base() {
        assert_eq!(adaptive_drop_interval_ms(2, 3, 5), 650);
    }

    #[test]
    fn test_efficient_player_speeds_up() {
        // 40 lines over 100 pieces is the perfect rate: full 25% speed-up.
        assert_eq!(adaptive_drop_interval_ms(0, 40, 100), 750);
        // Exactly half efficiency: no change.
        assert_eq!(adaptive_drop_interval_ms(0, 20, 100), 1000);
    }

    #[test]
    fn test_struggling_player_slows_down() {
        assert_eq!(adaptive_drop_interval_ms(0, 0, 100), 1150);
        assert_eq!(adaptive_drop_interval_ms(3, 0, 50), 575);
    }

    #[test]
    fn test_never_below_minimum() {
        assert_eq!(adaptive_drop_interval_ms(30, 400, 1000), DROP_INTERVAL_MIN_MS);
    }
}
