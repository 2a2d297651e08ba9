//! Engine data types: round configuration, moves, the ordered event log and round results.

use serde::{Deserialize, Serialize};

use crate::game::scoring::ScoreBreakdown;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    #[serde(default = "default_level")]
    pub level: u32,
    pub random_seed: Option<u64>,
}

fn default_level() -> u32 {
    1
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            random_seed: None,
        }
    }
}

/// A fully specified placement: rotate the slot's piece `rotation` quarter turns
/// clockwise, then put its top-left corner at the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub slot: usize,
    pub rotation: u8,
    pub anchor_row: usize,
    pub anchor_col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    OutOfMoves,
    NoSpace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "reason", rename_all = "snake_case")]
pub enum RoundPhase {
    AwaitingPlacement,
    Won,
    Lost(LossReason),
}

impl RoundPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoundPhase::AwaitingPlacement)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedCell {
    pub row: usize,
    pub col: usize,
    pub letter: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub position: usize,
    pub letter: char,
}

/// Discrete steps of turn resolution, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum Event {
    RoundStarted {
        level: u32,
        word_len: usize,
        move_budget: u32,
    },
    PiecePlaced {
        slot: usize,
        piece_id: u64,
        cells: Vec<(usize, usize)>,
        moves_remaining: u32,
    },
    LinesCleared {
        rows: Vec<usize>,
        cols: Vec<usize>,
        cells: Vec<ClearedCell>,
        chain_depth: u32,
    },
    LettersRevealed {
        positions: Vec<usize>,
    },
    LettersCaptured {
        captures: Vec<Capture>,
    },
    ScoreAwarded {
        breakdown: ScoreBreakdown,
        round_score: u64,
        streak: u32,
    },
    StreakReset,
    GravityApplied {
        moved: bool,
    },
    ChainDetected {
        depth: u32,
    },
    TrayRefilled {
        piece_ids: Vec<u64>,
    },
    Won {
        score: u64,
    },
    Lost {
        reason: LossReason,
    },
}

/// What one accepted placement did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub slot: usize,
    pub anchor_row: i32,
    pub anchor_col: i32,
    pub points: u64,
    pub lines_cleared: usize,
    pub letters_captured: usize,
    pub chain_reactions: u32,
    pub phase: RoundPhase,
    pub events: Vec<Event>,
}

/// End-of-round statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub level: u32,
    pub word: String,
    pub won: bool,
    pub loss_reason: Option<LossReason>,
    pub score: u64,
    pub lines_cleared: usize,
    pub letters_found: usize,
    pub word_len: usize,
    pub moves_used: u32,
}
