//! Per-level difficulty scaling and mystery-word selection.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::config::RulesConfig;
use crate::engine::error::GameError;

/// Levels above this reuse its profile.
pub const MAX_SCALED_LEVEL: u32 = 10;

/// Levels up to this start with every mystery-word position revealed.
pub const LAST_REVEALED_LEVEL: u32 = 2;

/// Generation parameters derived from the level number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// The clamped level the profile was computed from.
    pub level: u32,
    pub letter_bias: f64,
    pub move_bonus: i32,
    pub max_repeated_letters: u32,
    pub min_word_length: usize,
    pub big_piece_bias: f64,
}

pub fn profile_for(level: u32) -> DifficultyProfile {
    let l = level.clamp(1, MAX_SCALED_LEVEL);
    let min_word_length = match l {
        0..=3 => 5,
        4..=6 => 6,
        _ => 7,
    };
    DifficultyProfile {
        level: l,
        letter_bias: 0.50 - f64::from(l - 1) * 0.033,
        move_bonus: 6 - l as i32,
        max_repeated_letters: 4u32.saturating_sub(l / 3).max(1),
        min_word_length,
        big_piece_bias: f64::from(l - 1) * 0.05,
    }
}

/// Sum over letters of `count - 1` for letters that occur more than once.
pub fn repeated_letter_excess(word: &str) -> u32 {
    let mut counts: HashMap<char, u32> = HashMap::new();
    for ch in word.chars() {
        *counts.entry(ch.to_ascii_uppercase()).or_default() += 1;
    }
    counts.values().map(|&n| n.saturating_sub(1)).sum()
}

/// Choose a word uniformly among those meeting both the length and repeated-letter limits.
/// Falls back to the length limit alone, then to the whole dictionary.
pub fn pick_word<R: Rng + ?Sized>(
    profile: &DifficultyProfile,
    dictionary: &[String],
    rng: &mut R,
) -> Result<String, GameError> {
    let long_enough = |w: &&String| w.chars().count() >= profile.min_word_length;

    let strict: Vec<&String> = dictionary
        .iter()
        .filter(long_enough)
        .filter(|w| repeated_letter_excess(w) <= profile.max_repeated_letters)
        .collect();
    if let Some(word) = strict.choose(rng) {
        return Ok(word.to_uppercase());
    }

    tracing::warn!(
        level = profile.level,
        min_len = profile.min_word_length,
        max_repeats = profile.max_repeated_letters,
        "no word satisfies the difficulty filter, relaxing repeated-letter limit"
    );
    let relaxed: Vec<&String> = dictionary.iter().filter(long_enough).collect();
    if let Some(word) = relaxed.choose(rng) {
        return Ok(word.to_uppercase());
    }

    tracing::warn!(level = profile.level, "no word is long enough, using any dictionary word");
    dictionary
        .choose(rng)
        .map(|w| w.to_uppercase())
        .ok_or(GameError::NoEligibleWord)
}

/// `base_moves + word_len + move_bonus`, never below `min_moves`.
pub fn move_budget(word_len: usize, profile: &DifficultyProfile, rules: &RulesConfig) -> u32 {
    let raw = i64::from(rules.base_moves) + word_len as i64 + i64::from(profile.move_bonus);
    raw.max(i64::from(rules.min_moves.max(1))) as u32
}

pub fn starts_revealed(level: u32) -> bool {
    level <= LAST_REVEALED_LEVEL
}
