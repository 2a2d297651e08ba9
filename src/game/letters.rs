//! Letter generation biased toward the mystery word.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;

use super::pieces::LetterSource;

/// English letter frequencies used for unbiased draws.
pub const LETTER_WEIGHTS: [(char, usize); 26] = [
    ('E', 12), ('T', 9), ('A', 8), ('O', 8), ('I', 7), ('N', 7), ('S', 6), ('H', 6), ('R', 6),
    ('D', 4), ('L', 4), ('C', 3), ('U', 3), ('M', 3), ('W', 2), ('F', 2), ('G', 2), ('Y', 2),
    ('P', 2), ('B', 2), ('V', 1), ('K', 1), ('J', 1), ('X', 1), ('Q', 1), ('Z', 1),
];

static BASE_POOL: Lazy<Vec<char>> = Lazy::new(|| {
    LETTER_WEIGHTS
        .iter()
        .flat_map(|&(letter, weight)| std::iter::repeat(letter).take(weight))
        .collect()
});

/// Tracks which mystery-word letters are still needed and biases draws toward them.
#[derive(Debug, Clone, Default)]
pub struct LetterPool {
    word: Vec<char>,
    needed: Vec<char>,
    letter_bias: f64,
}

impl LetterPool {
    pub fn new(letter_bias: f64) -> Self {
        Self {
            letter_bias: letter_bias.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Install a new word. Nothing is needed until `update_needed` says which positions
    /// are revealed.
    pub fn set_mystery_word(&mut self, word: &str) {
        self.word = word.to_uppercase().chars().collect();
        self.needed.clear();
    }

    pub fn set_letter_bias(&mut self, p: f64) {
        self.letter_bias = p.clamp(0.0, 1.0);
    }

    pub fn letter_bias(&self) -> f64 {
        self.letter_bias
    }

    /// Recompute the needed set: distinct letters at revealed, uncaptured positions,
    /// in first-occurrence order.
    pub fn update_needed(&mut self, captured: &[bool], revealed: &[bool]) {
        assert_eq!(captured.len(), self.word.len(), "capture flags do not match word length");
        assert_eq!(revealed.len(), self.word.len(), "reveal flags do not match word length");
        self.needed.clear();
        for (i, &letter) in self.word.iter().enumerate() {
            if revealed[i] && !captured[i] && !self.needed.contains(&letter) {
                self.needed.push(letter);
            }
        }
    }

    pub fn needed_letters(&self) -> &[char] {
        &self.needed
    }

    pub fn is_needed(&self, letter: char) -> bool {
        self.needed.contains(&letter.to_ascii_uppercase())
    }
}

impl LetterSource for LetterPool {
    /// With probability `letter_bias` (and a non-empty needed set) pick a needed letter
    /// uniformly; otherwise draw from the frequency-weighted base pool.
    fn next_letter<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        if !self.needed.is_empty() && rng.gen_bool(self.letter_bias.clamp(0.0, 1.0)) {
            if let Some(&letter) = self.needed.choose(rng) {
                return letter;
            }
        }
        BASE_POOL.choose(rng).copied().unwrap_or('E')
    }
}
