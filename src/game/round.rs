//! Turn resolution for one round.
//!
//! `Round` owns the whole round state: grid, tray, mystery word, counters and the random
//! source. A placement resolves synchronously: the piece is written, complete lines are
//! cleared and scored, letters are revealed and captured, gravity runs, and any lines that
//! gravity completes are resolved again as chain reactions. Then the round checks for a
//! win, refills an empty tray and checks for a loss. Every step is appended to an ordered
//! event log that callers can replay for presentation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::engine::config::RulesConfig;
use crate::engine::error::GameError;
use crate::engine::models::*;
use crate::game::board::{
    apply_gravity, can_place, centered_anchor, find_complete_lines, has_any_placement, place,
    valid_anchors, CompleteLines,
};
use crate::game::difficulty::{
    move_budget, pick_word, profile_for, starts_revealed, DifficultyProfile,
};
use crate::game::letters::LetterPool;
use crate::game::pieces::{rotate, rotated, PieceFactory};
use crate::game::scoring::score_clear;
use crate::game::types::{Grid, MysteryWord, Piece, SlotDisplay, Tray, TRAY_SIZE};

/// Read-only view of a round for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub level: u32,
    pub grid: Grid,
    pub tray: Tray,
    pub word: Vec<SlotDisplay>,
    pub needed_letters: Vec<char>,
    pub score: u64,
    pub streak: u32,
    pub moves_remaining: u32,
    pub move_budget: u32,
    pub lines_cleared: usize,
    pub phase: RoundPhase,
}

#[derive(Debug, Clone)]
pub struct Round {
    level: u32,
    profile: DifficultyProfile,
    grid: Grid,
    tray: Tray,
    word: MysteryWord,
    letters: LetterPool,
    factory: PieceFactory,
    rng: StdRng,
    moves_remaining: u32,
    move_budget: u32,
    score: u64,
    streak: u32,
    lines_cleared: usize,
    phase: RoundPhase,
    events: Vec<Event>,
}

fn deal_tray(
    factory: &mut PieceFactory,
    letters: &LetterPool,
    big_piece_bias: f64,
    rng: &mut StdRng,
) -> Tray {
    Tray::new(std::array::from_fn(|_| factory.generate_piece(letters, big_piece_bias, rng)))
}

impl Round {
    /// Start a round at `config.level`, seeding the random source from `config.random_seed`
    /// (or from entropy when absent).
    pub fn new(
        config: &RoundConfig,
        dictionary: &[String],
        rules: &RulesConfig,
    ) -> Result<Self, GameError> {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config.level, dictionary, rules, rng)
    }

    /// Start a round with an explicit random source.
    pub fn with_rng(
        level: u32,
        dictionary: &[String],
        rules: &RulesConfig,
        mut rng: StdRng,
    ) -> Result<Self, GameError> {
        let profile = profile_for(level);
        let word = pick_word(&profile, dictionary, &mut rng)?;
        Ok(Self::with_word(level, &word, rules, rng))
    }

    /// Start a round with a fixed mystery word.
    pub fn with_word(level: u32, word: &str, rules: &RulesConfig, mut rng: StdRng) -> Self {
        let level = level.max(1);
        let profile = profile_for(level);
        let word = MysteryWord::new(word, starts_revealed(level));
        assert!(!word.is_empty(), "mystery word must not be empty");

        let mut letters = LetterPool::default();
        letters.set_mystery_word(&word.word());
        letters.set_letter_bias(profile.letter_bias);
        letters.update_needed(word.captured(), word.revealed());

        let mut factory = PieceFactory::new();
        let tray = deal_tray(&mut factory, &letters, profile.big_piece_bias, &mut rng);
        let budget = move_budget(word.len(), &profile, rules);

        tracing::info!(
            level,
            word_len = word.len(),
            move_budget = budget,
            revealed = starts_revealed(level),
            "round started"
        );

        let events = vec![Event::RoundStarted {
            level,
            word_len: word.len(),
            move_budget: budget,
        }];

        Self {
            level,
            profile,
            grid: Grid::new(),
            tray,
            word,
            letters,
            factory,
            rng,
            moves_remaining: budget,
            move_budget: budget,
            score: 0,
            streak: 0,
            lines_cleared: 0,
            phase: RoundPhase::AwaitingPlacement,
            events,
        }
    }

    // ------------------------------------------------------------------ //
    //  Setup for hand-built positions
    // ------------------------------------------------------------------ //

    /// Replace the grid, e.g. to set up a puzzle position.
    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    /// Replace the tray, e.g. to set up a puzzle position.
    pub fn set_tray(&mut self, tray: Tray) {
        self.tray = tray;
    }

    // ------------------------------------------------------------------ //
    //  Queries
    // ------------------------------------------------------------------ //

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    pub fn word(&self) -> &MysteryWord {
        &self.word
    }

    pub fn word_display(&self) -> Vec<SlotDisplay> {
        self.word.display()
    }

    pub fn needed_letters(&self) -> &[char] {
        self.letters.needed_letters()
    }

    pub fn is_needed(&self, letter: char) -> bool {
        self.letters.is_needed(letter)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn move_budget(&self) -> u32 {
        self.move_budget
    }

    pub fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Every event since the round started.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Fraction of mystery-word positions captured.
    pub fn capture_progress(&self) -> f64 {
        self.word.captured_count() as f64 / self.word.len() as f64
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            level: self.level,
            grid: self.grid.clone(),
            tray: self.tray.clone(),
            word: self.word.display(),
            needed_letters: self.needed_letters().to_vec(),
            score: self.score,
            streak: self.streak,
            moves_remaining: self.moves_remaining,
            move_budget: self.move_budget,
            lines_cleared: self.lines_cleared,
            phase: self.phase,
        }
    }

    /// End-of-round statistics, once the round is over.
    pub fn summary(&self) -> Option<RoundSummary> {
        let loss_reason = match self.phase {
            RoundPhase::AwaitingPlacement => return None,
            RoundPhase::Won => None,
            RoundPhase::Lost(reason) => Some(reason),
        };
        Some(RoundSummary {
            level: self.level,
            word: self.word.word(),
            won: self.phase == RoundPhase::Won,
            loss_reason,
            score: self.score,
            lines_cleared: self.lines_cleared,
            letters_found: self.word.captured_count(),
            word_len: self.word.len(),
            moves_used: self.move_budget - self.moves_remaining,
        })
    }

    /// Every placement available right now, over all slots and rotations.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        let mut moves = Vec::new();
        for (slot, piece) in self.tray.pieces() {
            for rotation in 0..4u8 {
                let turned = rotated(piece, rotation);
                for (anchor_row, anchor_col) in valid_anchors(&self.grid, &turned) {
                    moves.push(Move {
                        slot,
                        rotation,
                        anchor_row,
                        anchor_col,
                    });
                }
            }
        }
        moves
    }

    // ------------------------------------------------------------------ //
    //  Input
    // ------------------------------------------------------------------ //

    fn slot_piece(&self, slot: usize) -> Result<&Piece, GameError> {
        if self.is_over() {
            return Err(GameError::RoundOver);
        }
        if slot >= TRAY_SIZE {
            return Err(GameError::SlotOutOfRange { slot });
        }
        self.tray.get(slot).ok_or(GameError::EmptyTraySlot { slot })
    }

    /// Rotate the piece in `slot` a quarter turn clockwise.
    pub fn rotate_slot(&mut self, slot: usize) -> Result<(), GameError> {
        let turned = rotate(self.slot_piece(slot)?);
        self.tray.set(slot, Some(turned));
        Ok(())
    }

    /// Place the piece in `slot` centered on the target cell.
    pub fn attempt_placement(
        &mut self,
        slot: usize,
        target_row: i32,
        target_col: i32,
    ) -> Result<PlacementReport, GameError> {
        let piece = self.slot_piece(slot)?;
        let (anchor_row, anchor_col) = centered_anchor(piece, target_row, target_col);
        self.place_at_anchor(slot, anchor_row, anchor_col)
    }

    /// Apply a move from `legal_moves`. A rejected move leaves the tray unrotated.
    pub fn apply_move(&mut self, mv: &Move) -> Result<PlacementReport, GameError> {
        let turned = rotated(self.slot_piece(mv.slot)?, mv.rotation);
        let (anchor_row, anchor_col) = (mv.anchor_row as i32, mv.anchor_col as i32);
        if !can_place(&self.grid, &turned, anchor_row, anchor_col) {
            return Err(GameError::InvalidPlacement {
                anchor_row,
                anchor_col,
            });
        }
        self.tray.set(mv.slot, Some(turned));
        self.place_at_anchor(mv.slot, anchor_row, anchor_col)
    }

    /// Place the piece in `slot` with its top-left corner at the anchor and resolve the turn.
    pub fn place_at_anchor(
        &mut self,
        slot: usize,
        anchor_row: i32,
        anchor_col: i32,
    ) -> Result<PlacementReport, GameError> {
        if !can_place(&self.grid, self.slot_piece(slot)?, anchor_row, anchor_col) {
            return Err(GameError::InvalidPlacement {
                anchor_row,
                anchor_col,
            });
        }
        let piece = self
            .tray
            .take(slot)
            .unwrap_or_else(|| unreachable!("slot {slot} was checked to hold a piece"));

        let cells = place(&mut self.grid, &piece, anchor_row, anchor_col);
        self.moves_remaining = self.moves_remaining.saturating_sub(1);

        let score_before = self.score;
        let lines_before = self.lines_cleared;
        let captured_before = self.word.captured_count();
        let first_event = self.events.len();

        self.events.push(Event::PiecePlaced {
            slot,
            piece_id: piece.id,
            cells,
            moves_remaining: self.moves_remaining,
        });

        let chain_reactions = self.resolve_clears();
        self.finish_turn();

        Ok(PlacementReport {
            slot,
            anchor_row,
            anchor_col,
            points: self.score - score_before,
            lines_cleared: self.lines_cleared - lines_before,
            letters_captured: self.word.captured_count() - captured_before,
            chain_reactions,
            phase: self.phase,
            events: self.events[first_event..].to_vec(),
        })
    }

    // ------------------------------------------------------------------ //
    //  Resolution
    // ------------------------------------------------------------------ //

    /// Clear complete lines, then keep resolving gravity-induced chains.
    /// Returns the number of chain reactions.
    fn resolve_clears(&mut self) -> u32 {
        let mut lines = find_complete_lines(&self.grid);
        if lines.is_empty() {
            self.streak = 0;
            self.events.push(Event::StreakReset);
            return 0;
        }

        let mut depth = 0;
        loop {
            self.clear_lines(&lines, depth);

            let moved = apply_gravity(&mut self.grid);
            self.events.push(Event::GravityApplied { moved });
            if !moved {
                break;
            }

            lines = find_complete_lines(&self.grid);
            if lines.is_empty() {
                break;
            }
            depth += 1;
            tracing::debug!(depth, lines = lines.line_count(), "chain reaction");
            self.events.push(Event::ChainDetected { depth });
        }
        depth
    }

    /// One clear event: reveal, pick captures, score, empty the cells, apply captures.
    fn clear_lines(&mut self, lines: &CompleteLines, depth: u32) {
        let cleared: Vec<ClearedCell> = lines
            .cells()
            .into_iter()
            .filter_map(|(row, col)| {
                self.grid
                    .get(row, col)
                    .letter()
                    .map(|letter| ClearedCell { row, col, letter })
            })
            .collect();

        let mut revealed = Vec::new();
        let mut captures: Vec<Capture> = Vec::new();
        let mut seen: Vec<char> = Vec::new();
        for cell in &cleared {
            for i in 0..self.word.len() {
                if self.word.letters()[i] == cell.letter && !self.word.is_revealed(i) {
                    self.word.reveal(i);
                    revealed.push(i);
                }
            }
            if seen.contains(&cell.letter) {
                continue;
            }
            seen.push(cell.letter);
            let slot = (0..self.word.len())
                .find(|&i| self.word.letters()[i] == cell.letter && !self.word.is_captured(i));
            if let Some(position) = slot {
                captures.push(Capture {
                    position,
                    letter: cell.letter,
                });
            }
        }

        let chain = depth > 0;
        let breakdown = score_clear(lines.line_count(), self.streak, captures.len(), chain);
        if !chain {
            self.streak += 1;
        }
        self.score += breakdown.total;
        self.lines_cleared += lines.line_count();

        tracing::debug!(
            rows = ?lines.rows,
            cols = ?lines.cols,
            captures = captures.len(),
            points = breakdown.total,
            depth,
            "lines cleared"
        );

        for cell in &cleared {
            self.grid.clear(cell.row, cell.col);
        }
        for capture in &captures {
            self.word.capture(capture.position);
        }
        self.letters
            .update_needed(self.word.captured(), self.word.revealed());

        revealed.sort_unstable();
        self.events.push(Event::LinesCleared {
            rows: lines.rows.clone(),
            cols: lines.cols.clone(),
            cells: cleared,
            chain_depth: depth,
        });
        if !revealed.is_empty() {
            self.events.push(Event::LettersRevealed { positions: revealed });
        }
        if !captures.is_empty() {
            self.events.push(Event::LettersCaptured { captures });
        }
        self.events.push(Event::ScoreAwarded {
            breakdown,
            round_score: self.score,
            streak: self.streak,
        });
    }

    /// Win check, tray refill, then loss checks.
    fn finish_turn(&mut self) {
        if self.word.all_captured() {
            self.phase = RoundPhase::Won;
            self.events.push(Event::Won { score: self.score });
            tracing::info!(level = self.level, score = self.score, "round won");
            return;
        }

        if self.tray.is_empty() {
            self.tray = deal_tray(
                &mut self.factory,
                &self.letters,
                self.profile.big_piece_bias,
                &mut self.rng,
            );
            let piece_ids = self.tray.pieces().map(|(_, p)| p.id).collect();
            self.events.push(Event::TrayRefilled { piece_ids });
        }

        let loss = if self.moves_remaining == 0 {
            Some(LossReason::OutOfMoves)
        } else if !has_any_placement(&self.grid, &self.tray) {
            Some(LossReason::NoSpace)
        } else {
            None
        };
        if let Some(reason) = loss {
            self.phase = RoundPhase::Lost(reason);
            self.events.push(Event::Lost { reason });
            tracing::info!(level = self.level, score = self.score, ?reason, "round lost");
        }
    }
}
