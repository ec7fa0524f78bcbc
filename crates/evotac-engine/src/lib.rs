//! Board and rules engine for generalized tic-tac-toe.
//!
//! The board size and the length of the line needed to win are configured
//! through [`Rules`]. The crate is split in two layers:
//!
//! - [`core`] - Plain data: [`Side`], [`Rules`], [`Board`]
//! - [`engine`] - Game flow: [`play_match`], [`GameRecord`], [`ReplayCursor`]
//!
//! # Example
//!
//! ```
//! use evotac_engine::{Board, Rules, Side};
//!
//! let rules = Rules::new(3, 3).unwrap();
//! let mut board = Board::new(rules.board_size());
//! for index in [0, 1, 2] {
//!     board.place(index, Side::X).unwrap();
//! }
//! let (winner, line) = board.winner(rules.win_line()).unwrap();
//! assert_eq!(winner, Side::X);
//! assert_eq!(line, vec![(0, 0), (0, 1), (0, 2)]);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RulesError {
    #[display("board size must be at least 1")]
    EmptyBoard,
    #[display("a {board_size}x{board_size} board has more cells than can be addressed")]
    BoardTooLarge { board_size: usize },
    #[display("win line {win_line} does not fit on a {board_size}x{board_size} board")]
    WinLineOutOfRange { board_size: usize, win_line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("cell {index} is outside the board ({cells} cells)")]
    OutOfBounds { index: usize, cells: usize },
    #[display("cell ({row}, {col}) is already occupied")]
    OccupiedCell { row: usize, col: usize },
}
