//! Domain types for the Verbra puzzle: grid cells, pieces, the tray and the mystery word.

use serde::{Deserialize, Serialize};

/// Side length of the square grid.
pub const GRID_SIZE: usize = 6;

/// Number of slots in the piece tray.
pub const TRAY_SIZE: usize = 3;

/// A grid cell. An empty cell never carries a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    letter: Option<char>,
}

impl Cell {
    pub const EMPTY: Cell = Cell { letter: None };

    pub fn filled(letter: char) -> Self {
        Self {
            letter: Some(letter),
        }
    }

    pub fn is_filled(&self) -> bool {
        self.letter.is_some()
    }

    pub fn letter(&self) -> Option<char> {
        self.letter
    }
}

/// The fixed 6x6 board, indexed `[row][col]` with row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from row strings: `.` is empty, any other character is a filled
    /// cell with that letter. Missing rows/columns stay empty.
    pub fn from_rows(rows: &[&str]) -> Self {
        assert!(rows.len() <= GRID_SIZE, "too many rows for a {GRID_SIZE}x{GRID_SIZE} grid");
        let mut grid = Self::new();
        for (r, line) in rows.iter().enumerate() {
            assert!(line.chars().count() <= GRID_SIZE, "row {r} is wider than the grid");
            for (c, ch) in line.chars().enumerate() {
                if ch != '.' {
                    grid.cells[r][c] = Cell::filled(ch);
                }
            }
        }
        grid
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    pub fn clear(&mut self, row: usize, col: usize) {
        self.cells[row][col] = Cell::EMPTY;
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells[row][col].is_filled()
    }

    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }

    pub fn rows(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Letters of one column from top to bottom, skipping empty cells.
    pub fn column_letters(&self, col: usize) -> Vec<char> {
        (0..GRID_SIZE)
            .filter_map(|row| self.cells[row][col].letter())
            .collect()
    }
}

/// The eleven piece shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShapeKind {
    I4,
    O,
    T,
    S,
    Z,
    L,
    J,
    I3,
    L3,
    I2,
    Dot,
}

/// One square of a piece: its offset inside the piece's bounding box and the letter it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceCell {
    pub row: usize,
    pub col: usize,
    pub letter: char,
}

/// A generated piece instance. Letters belong to cells, so rotation moves them with
/// the geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: u64,
    pub shape: ShapeKind,
    pub cells: Vec<PieceCell>,
    pub width: usize,
    pub height: usize,
}

impl Piece {
    pub fn letters(&self) -> Vec<char> {
        self.cells.iter().map(|c| c.letter).collect()
    }

    /// Cell offsets as a sorted list, for geometry comparisons.
    pub fn footprint(&self) -> Vec<(usize, usize)> {
        let mut offsets: Vec<(usize, usize)> = self.cells.iter().map(|c| (c.row, c.col)).collect();
        offsets.sort_unstable();
        offsets
    }
}

/// The three-slot holding area. A slot is `None` once its piece has been placed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tray {
    slots: [Option<Piece>; TRAY_SIZE],
}

impl Tray {
    pub fn new(pieces: [Piece; TRAY_SIZE]) -> Self {
        Self {
            slots: pieces.map(Some),
        }
    }

    pub fn get(&self, slot: usize) -> Option<&Piece> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    pub fn set(&mut self, slot: usize, piece: Option<Piece>) {
        self.slots[slot] = piece;
    }

    pub fn take(&mut self, slot: usize) -> Option<Piece> {
        self.slots.get_mut(slot).and_then(|s| s.take())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    pub fn slots(&self) -> &[Option<Piece>; TRAY_SIZE] {
        &self.slots
    }

    /// Occupied slots with their indices.
    pub fn pieces(&self) -> impl Iterator<Item = (usize, &Piece)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|p| (i, p)))
    }
}

/// How one mystery-word position is shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "letter", rename_all = "lowercase")]
pub enum SlotDisplay {
    Captured(char),
    Revealed(char),
    Hidden,
}

/// The hidden word with per-position capture and reveal flags.
///
/// A captured position is always revealed, and a capture is never undone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MysteryWord {
    letters: Vec<char>,
    captured: Vec<bool>,
    revealed: Vec<bool>,
}

impl MysteryWord {
    pub fn new(word: &str, revealed_at_start: bool) -> Self {
        let letters: Vec<char> = word.to_uppercase().chars().collect();
        let len = letters.len();
        Self {
            letters,
            captured: vec![false; len],
            revealed: vec![revealed_at_start; len],
        }
    }

    pub fn word(&self) -> String {
        self.letters.iter().collect()
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn captured(&self) -> &[bool] {
        &self.captured
    }

    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    pub fn is_captured(&self, index: usize) -> bool {
        self.captured[index]
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed[index]
    }

    pub fn reveal(&mut self, index: usize) {
        self.revealed[index] = true;
    }

    pub fn capture(&mut self, index: usize) {
        self.revealed[index] = true;
        self.captured[index] = true;
    }

    pub fn captured_count(&self) -> usize {
        self.captured.iter().filter(|&&c| c).count()
    }

    pub fn all_captured(&self) -> bool {
        self.captured.iter().all(|&c| c)
    }

    pub fn display(&self) -> Vec<SlotDisplay> {
        self.letters
            .iter()
            .enumerate()
            .map(|(i, &ch)| {
                if self.captured[i] {
                    SlotDisplay::Captured(ch)
                } else if self.revealed[i] {
                    SlotDisplay::Revealed(ch)
                } else {
                    SlotDisplay::Hidden
                }
            })
            .collect()
    }
}
