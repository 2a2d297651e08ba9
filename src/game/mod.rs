//! Verbra puzzle rules: a 6x6 letter grid, a three-piece tray and a mystery word whose
//! letters are captured by clearing lines.

pub mod board;
pub mod difficulty;
pub mod letters;
pub mod pieces;
pub mod round;
pub mod scoring;
pub mod session;
pub mod types;
pub mod words;
