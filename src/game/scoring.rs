//! Score for a clear event: line points, streak bonus and capture bonus.

use serde::{Deserialize, Serialize};

pub const POINTS_PER_LINE: u64 = 100;
pub const STREAK_BONUS: u64 = 25;
pub const CAPTURE_BONUS: u64 = 50;
/// Chain-reaction clears score this many times the normal formula.
pub const CHAIN_MULTIPLIER: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub line_points: u64,
    pub streak_bonus: u64,
    pub capture_bonus: u64,
    pub multiplier: u64,
    pub total: u64,
}

/// `100 * lines` (times `lines` again for multi-line clears) + `25 * streak` + `50 * captures`,
/// all multiplied by 2 for a chain reaction.
pub fn score_clear(lines: usize, streak: u32, captures: usize, chain: bool) -> ScoreBreakdown {
    let lines = lines as u64;
    let mut line_points = lines * POINTS_PER_LINE;
    if lines > 1 {
        line_points *= lines;
    }
    let streak_bonus = u64::from(streak) * STREAK_BONUS;
    let capture_bonus = captures as u64 * CAPTURE_BONUS;
    let multiplier = if chain { CHAIN_MULTIPLIER } else { 1 };
    ScoreBreakdown {
        line_points,
        streak_bonus,
        capture_bonus,
        multiplier,
        total: (line_points + streak_bonus + capture_bonus) * multiplier,
    }
}
