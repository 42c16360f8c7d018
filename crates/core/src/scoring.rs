//! Scoring module - line clear points, combo bonus, level and gravity
//!
//! All arithmetic is integer:
//! - A clear of N lines scores `LINE_SCORES[N] * level` plus a combo bonus.
//! - The combo bonus is `COMBO_STEP` per previous consecutive clearing lock,
//!   capped at `COMBO_CAP`. The first clear of a chain earns none.
//! - `level = lines / LINES_PER_LEVEL + 1` (levels start at 1).
//! - Gravity speeds up by `DROP_STEP_MS` per level down to `MIN_DROP_MS`.

use crate::types::{
    BASE_DROP_MS, COMBO_CAP, COMBO_STEP, DROP_STEP_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_DROP_MS,
};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Level-multiplied points for the lines themselves.
    pub line_clear_score: u32,
    /// Combo bonus added on top of `line_clear_score`.
    pub combo_bonus: u32,
    pub total: u32,
}

/// Calculate line clear score
/// lines: number of lines cleared; anything outside 1..=4 scores 0
/// level: current level (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    LINE_SCORES
        .get(lines)
        .copied()
        .unwrap_or(0)
        .saturating_mul(level)
}

/// Combo bonus for a clear.
///
/// `combo` counts consecutive clearing locks including the current one, so
/// `combo <= 1` means no chain yet.
pub fn calculate_combo_bonus(combo: u32) -> u32 {
    combo
        .saturating_sub(1)
        .saturating_mul(COMBO_STEP)
        .min(COMBO_CAP)
}

/// Calculate complete score for a line clear
pub fn calculate_score(lines: usize, level: u32, combo: u32) -> ScoreResult {
    let line_clear_score = calculate_line_score(lines, level);
    let combo_bonus = if line_clear_score > 0 {
        calculate_combo_bonus(combo)
    } else {
        0
    };
    ScoreResult {
        line_clear_score,
        combo_bonus,
        total: line_clear_score.saturating_add(combo_bonus),
    }
}

/// Level management
/// Level increases every 10 lines cleared, starting at 1
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Get drop interval for a level (in milliseconds), clamped at the floor
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS.saturating_sub(speedup).max(MIN_DROP_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(calculate_line_score(1, 1), 100);
        assert_eq!(calculate_line_score(2, 1), 300);
        assert_eq!(calculate_line_score(3, 1), 500);
        assert_eq!(calculate_line_score(4, 1), 800);

        assert_eq!(calculate_line_score(1, 3), 300);
        assert_eq!(calculate_line_score(4, 5), 4000);
    }

    #[test]
    fn test_unlisted_line_counts_score_nothing() {
        assert_eq!(calculate_line_score(0, 1), 0);
        assert_eq!(calculate_line_score(5, 1), 0);
        assert_eq!(calculate_score(5, 2, 3).total, 0);
    }

    #[test]
    fn test_combo_bonus() {
        assert_eq!(calculate_combo_bonus(0), 0);
        assert_eq!(calculate_combo_bonus(1), 0);
        assert_eq!(calculate_combo_bonus(2), 50);
        assert_eq!(calculate_combo_bonus(4), 150);
        assert_eq!(calculate_combo_bonus(11), 500);
        assert_eq!(calculate_combo_bonus(50), 500);
    }

    #[test]
    fn test_full_score_calculation() {
        let result = calculate_score(1, 1, 1);
        assert_eq!(result.line_clear_score, 100);
        assert_eq!(result.combo_bonus, 0);
        assert_eq!(result.total, 100);

        let result = calculate_score(2, 2, 3);
        assert_eq!(result.line_clear_score, 600);
        assert_eq!(result.combo_bonus, 100);
        assert_eq!(result.total, 700);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(9), 1);
        assert_eq!(calculate_level(10), 2);
        assert_eq!(calculate_level(29), 3);
        assert_eq!(calculate_level(100), 11);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(get_drop_interval_ms(1), 500);
        assert_eq!(get_drop_interval_ms(2), 450);
        assert_eq!(get_drop_interval_ms(9), 100);
        assert_eq!(get_drop_interval_ms(10), 100);
        assert_eq!(get_drop_interval_ms(u32::MAX), 100);
        // Level 0 never happens, but must not underflow.
        assert_eq!(get_drop_interval_ms(0), 500);
    }
}
