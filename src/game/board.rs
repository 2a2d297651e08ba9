//! Board rules: placement validity, line detection and gravity.
//!
//! Anchors are signed because a centered anchor can sit above or left of the grid; such
//! anchors are simply rejected by `can_place`.

use serde::{Deserialize, Serialize};

use super::pieces::rotated;
use super::types::{Cell, Grid, Piece, Tray, GRID_SIZE};

/// Anchor that centers `piece` on the target cell: `row - height/2, col - width/2`.
pub fn centered_anchor(piece: &Piece, row: i32, col: i32) -> (i32, i32) {
    (
        row.saturating_sub((piece.height / 2) as i32),
        col.saturating_sub((piece.width / 2) as i32),
    )
}

/// Absolute grid position of one piece cell, if it lands inside the grid.
fn cell_target(anchor_row: i32, anchor_col: i32, row: usize, col: usize) -> Option<(usize, usize)> {
    let r = anchor_row.checked_add(row as i32)?;
    let c = anchor_col.checked_add(col as i32)?;
    let n = GRID_SIZE as i32;
    if (0..n).contains(&r) && (0..n).contains(&c) {
        Some((r as usize, c as usize))
    } else {
        None
    }
}

/// True iff every cell of `piece` at the anchor lands inside the grid on an empty cell.
pub fn can_place(grid: &Grid, piece: &Piece, anchor_row: i32, anchor_col: i32) -> bool {
    piece.cells.iter().all(|cell| {
        matches!(
            cell_target(anchor_row, anchor_col, cell.row, cell.col),
            Some((r, c)) if !grid.is_filled(r, c)
        )
    })
}

/// Write the piece's letters into the grid. Returns the filled coordinates in cell order.
///
/// Panics if the placement is not legal; callers validate with `can_place` first.
pub fn place(
    grid: &mut Grid,
    piece: &Piece,
    anchor_row: i32,
    anchor_col: i32,
) -> Vec<(usize, usize)> {
    assert!(
        can_place(grid, piece, anchor_row, anchor_col),
        "illegal placement of piece {} at ({anchor_row}, {anchor_col})",
        piece.id
    );
    piece
        .cells
        .iter()
        .filter_map(|cell| {
            let (r, c) = cell_target(anchor_row, anchor_col, cell.row, cell.col)?;
            grid.set(r, c, Cell::filled(cell.letter));
            Some((r, c))
        })
        .collect()
}

/// Complete rows and columns found in one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteLines {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl CompleteLines {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    /// Every cell on a complete line, once each: row cells first, then column cells
    /// not already covered by a row.
    pub fn cells(&self) -> Vec<(usize, usize)> {
        let mut out: Vec<(usize, usize)> = Vec::new();
        for &row in &self.rows {
            out.extend((0..GRID_SIZE).map(|col| (row, col)));
        }
        for &col in &self.cols {
            for row in 0..GRID_SIZE {
                if !self.rows.contains(&row) {
                    out.push((row, col));
                }
            }
        }
        out
    }
}

pub fn find_complete_lines(grid: &Grid) -> CompleteLines {
    let rows = (0..GRID_SIZE)
        .filter(|&r| (0..GRID_SIZE).all(|c| grid.is_filled(r, c)))
        .collect();
    let cols = (0..GRID_SIZE)
        .filter(|&c| (0..GRID_SIZE).all(|r| grid.is_filled(r, c)))
        .collect();
    CompleteLines { rows, cols }
}

/// Compact each column downward, keeping the top-to-bottom order of its cells.
/// Returns whether any cell changed row.
pub fn apply_gravity(grid: &mut Grid) -> bool {
    let mut moved = false;
    for col in 0..GRID_SIZE {
        let mut write_row = GRID_SIZE;
        for row in (0..GRID_SIZE).rev() {
            let cell = grid.get(row, col);
            if !cell.is_filled() {
                continue;
            }
            write_row -= 1;
            if write_row != row {
                grid.set(write_row, col, cell);
                grid.clear(row, col);
                moved = true;
            }
        }
    }
    moved
}

/// Every anchor (top-left, inside the grid) where `piece` fits as oriented.
pub fn valid_anchors(grid: &Grid, piece: &Piece) -> Vec<(usize, usize)> {
    if piece.height > GRID_SIZE || piece.width > GRID_SIZE {
        return Vec::new();
    }
    let mut anchors = Vec::new();
    for row in 0..=GRID_SIZE - piece.height {
        for col in 0..=GRID_SIZE - piece.width {
            if can_place(grid, piece, row as i32, col as i32) {
                anchors.push((row, col));
            }
        }
    }
    anchors
}

/// Whether any tray piece fits anywhere in any of its four rotations.
pub fn has_any_placement(grid: &Grid, tray: &Tray) -> bool {
    tray.pieces().any(|(_, piece)| {
        (0..4).any(|turns| !valid_anchors(grid, &rotated(piece, turns)).is_empty())
    })
}
