//! Piece catalog: the eleven shapes, weighted shape selection, piece generation and rotation.
//!
//! Shapes are declared with top-left-normalized `(row, col)` offsets and a tight bounding box.
//! Selection draws uniformly from a pool where each shape appears `weight` times, so a larger
//! weight means a more common shape.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{Piece, PieceCell, ShapeKind};

/// Static definition of one shape.
#[derive(Debug)]
pub struct ShapeDef {
    pub kind: ShapeKind,
    pub cells: &'static [(usize, usize)],
    pub width: usize,
    pub height: usize,
    pub weight: usize,
}

#[rustfmt::skip]
pub static SHAPES: [ShapeDef; 11] = [
    // 4-cell
    ShapeDef { kind: ShapeKind::I4, cells: &[(0, 0), (0, 1), (0, 2), (0, 3)], width: 4, height: 1, weight: 2 },
    ShapeDef { kind: ShapeKind::O, cells: &[(0, 0), (0, 1), (1, 0), (1, 1)], width: 2, height: 2, weight: 3 },
    ShapeDef { kind: ShapeKind::T, cells: &[(0, 0), (0, 1), (0, 2), (1, 1)], width: 3, height: 2, weight: 2 },
    ShapeDef { kind: ShapeKind::S, cells: &[(0, 1), (0, 2), (1, 0), (1, 1)], width: 3, height: 2, weight: 2 },
    ShapeDef { kind: ShapeKind::Z, cells: &[(0, 0), (0, 1), (1, 1), (1, 2)], width: 3, height: 2, weight: 2 },
    ShapeDef { kind: ShapeKind::L, cells: &[(0, 0), (1, 0), (2, 0), (2, 1)], width: 2, height: 3, weight: 2 },
    ShapeDef { kind: ShapeKind::J, cells: &[(0, 1), (1, 1), (2, 0), (2, 1)], width: 2, height: 3, weight: 2 },
    // 3-cell
    ShapeDef { kind: ShapeKind::I3, cells: &[(0, 0), (0, 1), (0, 2)], width: 3, height: 1, weight: 5 },
    ShapeDef { kind: ShapeKind::L3, cells: &[(0, 0), (1, 0), (1, 1)], width: 2, height: 2, weight: 5 },
    // 2-cell
    ShapeDef { kind: ShapeKind::I2, cells: &[(0, 0), (0, 1)], width: 2, height: 1, weight: 6 },
    // 1-cell
    ShapeDef { kind: ShapeKind::Dot, cells: &[(0, 0)], width: 1, height: 1, weight: 2 },
];

/// Each shape repeated `weight` times.
static SHAPE_POOL: Lazy<Vec<&'static ShapeDef>> = Lazy::new(|| {
    SHAPES
        .iter()
        .flat_map(|def| std::iter::repeat(def).take(def.weight))
        .collect()
});

/// The four-cell shapes, drawn from uniformly when the big-piece bias fires.
static BIG_SHAPES: Lazy<Vec<&'static ShapeDef>> =
    Lazy::new(|| SHAPES.iter().filter(|def| def.cells.len() == 4).collect());

pub fn shape_def(kind: ShapeKind) -> &'static ShapeDef {
    SHAPES
        .iter()
        .find(|def| def.kind == kind)
        .unwrap_or_else(|| unreachable!("every ShapeKind has a catalog entry"))
}

/// Pick a shape. With probability `big_piece_bias` the choice is uniform over the
/// four-cell shapes; otherwise it is a weighted draw over the whole catalog.
pub fn random_shape<R: Rng + ?Sized>(rng: &mut R, big_piece_bias: f64) -> &'static ShapeDef {
    let pool = if rng.gen_bool(big_piece_bias.clamp(0.0, 1.0)) {
        &BIG_SHAPES
    } else {
        &SHAPE_POOL
    };
    pool.choose(rng)
        .copied()
        .unwrap_or_else(|| unreachable!("shape pools are never empty"))
}

/// Something that hands out one letter per generated piece cell.
pub trait LetterSource {
    fn next_letter<R: Rng + ?Sized>(&self, rng: &mut R) -> char;
}

/// Generates pieces with round-unique instance ids.
#[derive(Debug, Clone, Default)]
pub struct PieceFactory {
    next_id: u64,
}

impl PieceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a piece of the given shape, assigning letters in cell-declaration order.
    pub fn build<R, L>(&mut self, def: &ShapeDef, letters: &L, rng: &mut R) -> Piece
    where
        R: Rng + ?Sized,
        L: LetterSource,
    {
        self.next_id += 1;
        Piece {
            id: self.next_id,
            shape: def.kind,
            cells: def
                .cells
                .iter()
                .map(|&(row, col)| PieceCell {
                    row,
                    col,
                    letter: letters.next_letter(rng),
                })
                .collect(),
            width: def.width,
            height: def.height,
        }
    }

    pub fn generate_piece<R, L>(&mut self, letters: &L, big_piece_bias: f64, rng: &mut R) -> Piece
    where
        R: Rng + ?Sized,
        L: LetterSource,
    {
        let def = random_shape(rng, big_piece_bias);
        self.build(def, letters, rng)
    }
}

/// Rotate 90° clockwise: `(r, c) -> (c, height - 1 - r)`, then shift so the minimum row
/// and column are 0. Width and height swap; each letter stays on its cell.
pub fn rotate(piece: &Piece) -> Piece {
    let rotated: Vec<PieceCell> = piece
        .cells
        .iter()
        .map(|cell| PieceCell {
            row: cell.col,
            col: piece.height - 1 - cell.row,
            letter: cell.letter,
        })
        .collect();

    let min_row = rotated.iter().map(|c| c.row).min().unwrap_or(0);
    let min_col = rotated.iter().map(|c| c.col).min().unwrap_or(0);

    Piece {
        id: piece.id,
        shape: piece.shape,
        cells: rotated
            .into_iter()
            .map(|c| PieceCell {
                row: c.row - min_row,
                col: c.col - min_col,
                letter: c.letter,
            })
            .collect(),
        width: piece.height,
        height: piece.width,
    }
}

/// The piece after `quarter_turns` clockwise rotations.
pub fn rotated(piece: &Piece, quarter_turns: u8) -> Piece {
    let mut out = piece.clone();
    for _ in 0..quarter_turns % 4 {
        out = rotate(&out);
    }
    out
}
