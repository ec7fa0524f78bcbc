use serde::{Deserialize, Serialize};

use crate::RulesError;

/// Board size and winning line length of one game configuration.
///
/// # Example
///
/// ```
/// use evotac_engine::Rules;
///
/// let rules = Rules::new(4, 3).unwrap();
/// assert_eq!(rules.max_moves(), 16);
/// assert!(Rules::new(3, 4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    board_size: usize,
    win_line: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            board_size: 3,
            win_line: 3,
        }
    }
}

impl Rules {
    pub fn new(board_size: usize, win_line: usize) -> Result<Self, RulesError> {
        if board_size == 0 {
            return Err(RulesError::EmptyBoard);
        }
        if board_size.checked_mul(board_size).is_none() {
            return Err(RulesError::BoardTooLarge { board_size });
        }
        if win_line == 0 || win_line > board_size {
            return Err(RulesError::WinLineOutOfRange {
                board_size,
                win_line,
            });
        }
        Ok(Self {
            board_size,
            win_line,
        })
    }

    #[must_use]
    pub const fn board_size(&self) -> usize {
        self.board_size
    }

    #[must_use]
    pub const fn win_line(&self) -> usize {
        self.win_line
    }

    /// Number of cells, which is also the longest possible game.
    #[must_use]
    pub const fn max_moves(&self) -> usize {
        self.board_size * self.board_size
    }

    /// Short label used in file names, e.g. `3x3_3`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{0}x{0}_{1}", self.board_size, self.win_line)
    }
}
